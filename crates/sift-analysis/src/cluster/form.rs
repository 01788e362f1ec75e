use std::collections::HashSet;

use sift_core::llm::{complete_cancellable, CompletionProvider, CompletionRequest};
use sift_core::model::{push_unique, Cluster, Signal};
use sift_core::{resolve_signal_ref, signal_ref};
use tokio_util::sync::CancellationToken;

use crate::error::AnalysisError;
use crate::parse::parse_cluster_response;
use crate::prefilter::SignalGroup;
use crate::text::prompt_snippet;

const SYSTEM_PROMPT: &str = "You are a senior engineer triaging a code-health backlog. \
You group related work items so each group can be tracked as one unit of work. \
Respond with JSON only, no prose.";

const DESCRIPTION_LIMIT: usize = 200;
const MAX_TOKENS: u32 = 4096;

/// Ask the LLM to confirm clusters over pre-filtered groups.
///
/// Returned clusters only reference real signals: unknown IDs are dropped,
/// an ID claimed by an earlier cluster is dropped from later ones, and a
/// cluster left with no members is discarded. Provider and parse failures
/// propagate to the caller, which owns the fallback.
pub async fn form_clusters(
    groups: &[SignalGroup<'_>],
    provider: &dyn CompletionProvider,
    cancel: &CancellationToken,
    signals: &[Signal],
) -> Result<Vec<Cluster>, AnalysisError> {
    let request = CompletionRequest::new(build_cluster_prompt(groups))
        .with_system(SYSTEM_PROMPT)
        .with_max_tokens(MAX_TOKENS);
    let response = complete_cancellable(provider, cancel, request).await?;
    let items = parse_cluster_response(&response.content)?;

    let mut claimed = HashSet::new();
    let mut clusters = Vec::new();

    for item in items {
        let mut indices = Vec::new();
        for raw in &item.signal_ids {
            match resolve_signal_ref(raw, signals.len()) {
                Some(idx) if claimed.insert(idx) => indices.push(idx),
                Some(idx) => {
                    tracing::debug!("Cluster '{}' re-claims {}, ignoring", item.name, signal_ref(idx));
                }
                None => {
                    tracing::debug!("Cluster '{}' references unknown signal '{raw}'", item.name);
                }
            }
        }
        if indices.is_empty() {
            tracing::debug!("Dropping cluster '{}' with no valid members", item.name);
            continue;
        }

        let (confidence, tags) = member_summary(&indices, signals);
        clusters.push(Cluster {
            id: format!("cluster-{}", clusters.len()),
            name: item.name,
            description: item.description,
            signal_ids: indices.into_iter().map(signal_ref).collect(),
            confidence,
            tags,
        });
    }

    Ok(clusters)
}

/// Highest member confidence and the ordered union of member tags.
pub(super) fn member_summary(indices: &[usize], signals: &[Signal]) -> (f64, Vec<String>) {
    let confidence = indices
        .iter()
        .map(|&i| signals[i].confidence)
        .fold(0.0_f64, f64::max);
    let mut tags = Vec::new();
    for &i in indices {
        for tag in &signals[i].tags {
            push_unique(&mut tags, tag);
        }
    }
    (confidence, tags)
}

fn build_cluster_prompt(groups: &[SignalGroup<'_>]) -> String {
    let mut prompt = String::from(
        "Group the following work signals into clusters of items that describe the same \
         underlying problem or belong to the same piece of work.\n\n\
         Signals are listed in candidate groups found by a lexical pre-filter. The groups are \
         hints only: split or merge them as needed.\n",
    );

    for (n, group) in groups.iter().enumerate() {
        prompt.push_str(&format!("\n## Candidate group {}\n", n + 1));
        for (&idx, sig) in group.member_indices.iter().zip(&group.members) {
            prompt.push_str(&format!(
                "- {}: {} [kind: {}, source: {}",
                signal_ref(idx),
                sig.title,
                sig.kind,
                sig.source
            ));
            let location = sig.location();
            if !location.is_empty() {
                prompt.push_str(&format!(", path: {location}"));
            }
            prompt.push_str("]\n");
            if !sig.description.trim().is_empty() {
                prompt.push_str(&format!(
                    "  description: {}\n",
                    prompt_snippet(&sig.description, DESCRIPTION_LIMIT)
                ));
            }
        }
    }

    prompt.push_str(
        "\nRespond with a single JSON object of this exact shape:\n\
         {\"clusters\": [{\"name\": \"short name\", \"description\": \"one or two sentences\", \
         \"signal_ids\": [\"sig-0\", \"sig-3\"]}]}\n\n\
         Rules:\n\
         - Every signal ID above must appear in exactly one cluster.\n\
         - A signal with no related items forms its own single-member cluster.\n\
         - Only use the signal IDs listed above.\n",
    );
    prompt
}
