//! Semantic analysis for Sift.
//!
//! Turns a flat list of collector signals into a backlog: near-duplicate
//! clusters, epic/task hierarchies, P1-P4 priorities and an acyclic
//! "blocks" graph. Each entry point makes at most one LLM call and falls
//! back to a deterministic result when the call or its parse fails.

pub mod bridge;
pub mod cluster;
pub mod deps;
pub mod epic;
pub mod error;
pub mod merge;
pub mod parse;
pub mod prefilter;
pub mod priority;
mod text;

#[cfg(test)]
mod test_support;

pub use bridge::beads_to_signals;
pub use cluster::{cluster_signals, form_clusters};
pub use deps::{apply_deps_to_signals, infer_dependencies};
pub use epic::{create_epic_hierarchy, EPIC_THRESHOLD};
pub use error::{AnalysisError, ParseError};
pub use merge::merge_cluster_to_beads;
pub use prefilter::{jaccard_similarity, pre_filter, SignalGroup};
pub use priority::{apply_overrides, infer_priorities};
