use std::collections::HashSet;

use sift_core::model::{Cluster, ClusterResult, Signal};
use sift_core::{resolve_signal_ref, signal_ref};

use super::form::member_summary;

/// Apply size bounds and compute the unclustered remainder.
///
/// Clusters smaller than `min_size` are dropped whole (their members become
/// unclustered). Clusters larger than `max_size` keep their first `max_size`
/// members, with confidence and tags recomputed from the kept members; the
/// rest become unclustered. `unclustered` lists every index of `signals`
/// that no surviving cluster references, in index order.
pub fn enforce_constraints(
    clusters: Vec<Cluster>,
    signals: &[Signal],
    min_size: usize,
    max_size: usize,
) -> ClusterResult {
    let mut kept = Vec::with_capacity(clusters.len());

    for mut cluster in clusters {
        if cluster.signal_ids.len() < min_size {
            tracing::debug!(
                "Discarding cluster '{}' ({} < min size {min_size})",
                cluster.name,
                cluster.signal_ids.len()
            );
            continue;
        }
        if cluster.signal_ids.len() > max_size {
            tracing::debug!(
                "Truncating cluster '{}' from {} to {max_size} members",
                cluster.name,
                cluster.signal_ids.len()
            );
            cluster.signal_ids.truncate(max_size);
            let kept_indices: Vec<usize> = cluster
                .signal_ids
                .iter()
                .filter_map(|id| resolve_signal_ref(id, signals.len()))
                .collect();
            (cluster.confidence, cluster.tags) = member_summary(&kept_indices, signals);
        }
        kept.push(cluster);
    }

    let claimed: HashSet<usize> = kept
        .iter()
        .flat_map(|c| c.signal_ids.iter())
        .filter_map(|id| resolve_signal_ref(id, signals.len()))
        .collect();
    let unclustered = (0..signals.len())
        .filter(|i| !claimed.contains(i))
        .map(signal_ref)
        .collect();

    ClusterResult {
        clusters: kept,
        unclustered,
    }
}
