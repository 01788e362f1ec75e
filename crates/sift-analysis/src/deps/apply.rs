use std::collections::HashMap;

use sift_core::model::{push_unique, BeadDependency, DependencyType, Signal};
use sift_core::signal_id;

/// Mirror "blocks" dependencies onto the signals they connect.
///
/// For each blocks edge whose endpoints both map to a signal (by stable bead
/// ID under `id_prefix`), the blocker gains `to_id` in `blocks` and the
/// blocked signal gains `from_id` in `depends_on`. Parent and relates-to
/// edges are informational and left alone. Re-applying is a no-op.
pub fn apply_deps_to_signals(signals: &mut [Signal], deps: &[BeadDependency], id_prefix: &str) {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(signals.len());
    for (i, sig) in signals.iter().enumerate() {
        positions.entry(signal_id(sig, id_prefix)).or_insert(i);
    }

    for dep in deps.iter().filter(|d| d.dep_type == DependencyType::Blocks) {
        let (Some(&from), Some(&to)) = (positions.get(&dep.from_id), positions.get(&dep.to_id))
        else {
            tracing::debug!("Skipping dependency {} -> {}: unknown endpoint", dep.from_id, dep.to_id);
            continue;
        };
        push_unique(&mut signals[from].blocks, &dep.to_id);
        push_unique(&mut signals[to].depends_on, &dep.from_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::signal;

    fn dep(from: &Signal, to: &Signal, dep_type: DependencyType) -> BeadDependency {
        BeadDependency {
            from_id: signal_id(from, "sft-"),
            to_id: signal_id(to, "sft-"),
            dep_type,
            confidence: 0.8,
        }
    }

    fn signals() -> Vec<Signal> {
        vec![
            signal("Add schema", "db/schema.sql", 0.5),
            signal("Migrate users", "db/migrate.rs", 0.5),
            signal("Update docs", "docs/db.md", 0.5),
        ]
    }

    #[test]
    fn test_blocks_are_mirrored() {
        let mut sigs = signals();
        let deps = vec![
            dep(&sigs[0], &sigs[1], DependencyType::Blocks),
            dep(&sigs[1], &sigs[2], DependencyType::RelatesTo),
            dep(&sigs[0], &sigs[2], DependencyType::Parent),
        ];
        let (id0, id1) = (signal_id(&sigs[0], "sft-"), signal_id(&sigs[1], "sft-"));

        apply_deps_to_signals(&mut sigs, &deps, "sft-");

        assert_eq!(sigs[0].blocks, vec![id1]);
        assert_eq!(sigs[1].depends_on, vec![id0]);
        assert!(sigs[2].blocks.is_empty() && sigs[2].depends_on.is_empty());
        assert!(sigs[0].depends_on.is_empty());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut once = signals();
        let deps = vec![
            dep(&once[0], &once[1], DependencyType::Blocks),
            dep(&once[0], &once[2], DependencyType::Blocks),
            dep(&once[0], &once[1], DependencyType::Blocks),
        ];
        let mut twice = once.clone();

        apply_deps_to_signals(&mut once, &deps, "sft-");
        apply_deps_to_signals(&mut twice, &deps, "sft-");
        apply_deps_to_signals(&mut twice, &deps, "sft-");

        assert_eq!(once, twice);
        assert_eq!(once[0].blocks.len(), 2);
    }

    #[test]
    fn test_unknown_endpoints_and_prefix_mismatch_are_skipped() {
        let mut sigs = signals();
        let mut stray = dep(&sigs[0], &sigs[1], DependencyType::Blocks);
        stray.to_id = "sft-00000000".into();
        let deps = vec![stray, dep(&sigs[1], &sigs[2], DependencyType::Blocks)];

        apply_deps_to_signals(&mut sigs, &deps, "other-");

        assert!(sigs.iter().all(|s| s.blocks.is_empty() && s.depends_on.is_empty()));
    }
}
