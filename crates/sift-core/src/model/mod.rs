pub mod bead;
pub mod cluster;
pub mod dependency;
pub mod priority;
pub mod signal;

pub use bead::{AnalysisBead, BeadType};
pub use cluster::{Cluster, ClusterResult};
pub use dependency::{BeadDependency, DependencyType};
pub use priority::PriorityOverride;
pub use signal::{push_unique, Signal};
