use sift_core::model::{AnalysisBead, Signal};

/// Turn beads back into signals so priority and dependency inference can run
/// over the clustered backlog.
///
/// Each bead starts from a copy of its first source signal (keeping source,
/// location, author and timestamp) and takes the bead's title, description,
/// confidence and tags. Epics get kind `epic`. Beads without source signals
/// have nothing to anchor them and are skipped.
pub fn beads_to_signals(beads: &[AnalysisBead]) -> Vec<Signal> {
    beads
        .iter()
        .filter_map(|bead| {
            let Some(first) = bead.source_signals.first() else {
                tracing::debug!("Bead {} has no source signals, skipping", bead.id);
                return None;
            };
            let mut sig = first.clone();
            sig.title = bead.title.clone();
            sig.description = bead.description.clone();
            sig.confidence = bead.confidence;
            sig.tags = bead.tags.clone();
            if bead.is_epic() {
                sig.kind = "epic".to_string();
            }
            Some(sig)
        })
        .collect()
}
