use sift_core::model::{push_unique, AnalysisBead, BeadType, Cluster, Signal};
use sift_core::resolve_signal_ref;

/// Resolve a cluster's `sig-N` references, skipping any that don't resolve.
pub(crate) fn resolve_members<'a>(cluster: &Cluster, signals: &'a [Signal]) -> Vec<&'a Signal> {
    cluster
        .signal_ids
        .iter()
        .filter_map(|id| match resolve_signal_ref(id, signals.len()) {
            Some(idx) => Some(&signals[idx]),
            None => {
                tracing::debug!("Cluster {} references unknown signal '{id}'", cluster.id);
                None
            }
        })
        .collect()
}

/// Fold a cluster into at most one task bead. No LLM involved.
///
/// A single member passes straight through with cluster and signal tags
/// combined. Several members become one consolidated bead that lists each
/// member in its description and carries only the cluster's tags.
pub fn merge_cluster_to_beads(cluster: &Cluster, signals: &[Signal]) -> Vec<AnalysisBead> {
    let members = resolve_members(cluster, signals);

    match members.as_slice() {
        [] => Vec::new(),
        [only] => {
            let mut tags = cluster.tags.clone();
            for tag in &only.tags {
                push_unique(&mut tags, tag);
            }
            vec![AnalysisBead {
                id: cluster.id.clone(),
                title: only.title.clone(),
                description: only.description.clone(),
                bead_type: BeadType::Task,
                confidence: only.confidence,
                tags,
                parent_id: String::new(),
                source_signals: vec![(*only).clone()],
            }]
        }
        many => {
            let confidence = many
                .iter()
                .map(|s| s.confidence)
                .fold(cluster.confidence, f64::max);
            vec![AnalysisBead {
                id: cluster.id.clone(),
                title: cluster.name.clone(),
                description: consolidated_description(&cluster.description, many),
                bead_type: BeadType::Task,
                confidence,
                tags: cluster.tags.clone(),
                parent_id: String::new(),
                source_signals: many.iter().map(|s| (*s).clone()).collect(),
            }]
        }
    }
}

fn consolidated_description(summary: &str, members: &[&Signal]) -> String {
    let mut out = String::from(summary);
    out.push_str("\n\n");
    let bullets: Vec<String> = members
        .iter()
        .map(|s| {
            let location = s.location();
            if location.is_empty() {
                format!("- {}", s.title)
            } else {
                format!("- {} ({location})", s.title)
            }
        })
        .collect();
    out.push_str(&bullets.join("\n"));
    out
}
