//! Signal clustering: lexical pre-filter, one LLM call, size constraints.

pub mod constraints;
mod form;

pub use constraints::enforce_constraints;
pub use form::form_clusters;

use sift_core::config::ClusterConfig;
use sift_core::llm::CompletionProvider;
use sift_core::model::{Cluster, ClusterResult, Signal};
use sift_core::signal_ref;
use tokio_util::sync::CancellationToken;

use crate::prefilter::pre_filter;

/// Cluster `signals` into related groups. Never fails.
///
/// When the LLM call or its parse fails, every signal becomes its own
/// single-member cluster and nothing is left unclustered; size constraints
/// are only applied to LLM-confirmed clusters.
pub async fn cluster_signals(
    signals: &[Signal],
    provider: &dyn CompletionProvider,
    cancel: &CancellationToken,
    config: ClusterConfig,
) -> ClusterResult {
    if signals.is_empty() {
        return ClusterResult::default();
    }
    let config = config.normalized();

    let groups = pre_filter(signals, config.similarity_threshold);
    match form_clusters(&groups, provider, cancel, signals).await {
        Ok(clusters) => {
            let result = enforce_constraints(
                clusters,
                signals,
                config.min_cluster_size,
                config.max_cluster_size,
            );
            tracing::info!(
                "Clustered {} signals into {} clusters ({} unclustered)",
                signals.len(),
                result.clusters.len(),
                result.unclustered.len()
            );
            result
        }
        Err(e) => {
            tracing::warn!("Clustering failed, falling back to one cluster per signal: {e}");
            singleton_clusters(signals)
        }
    }
}

fn singleton_clusters(signals: &[Signal]) -> ClusterResult {
    let clusters = signals
        .iter()
        .enumerate()
        .map(|(i, sig)| Cluster {
            id: format!("cluster-{i}"),
            name: sig.title.clone(),
            description: sig.description.clone(),
            signal_ids: vec![signal_ref(i)],
            confidence: sig.confidence,
            tags: sig.tags.clone(),
        })
        .collect();
    ClusterResult {
        clusters,
        unclustered: Vec::new(),
    }
}
