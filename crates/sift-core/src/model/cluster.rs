use serde::{Deserialize, Serialize};

/// A group of related signals confirmed by the LLM.
///
/// `signal_ids` hold call-scoped `sig-<index>` references into the signal
/// slice the cluster was formed from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub signal_ids: Vec<String>,
    /// Highest confidence among the members.
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Clusters that survived size constraints plus every signal none of them claimed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClusterResult {
    pub clusters: Vec<Cluster>,
    #[serde(default)]
    pub unclustered: Vec<String>,
}

impl ClusterResult {
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty() && self.unclustered.is_empty()
    }
}
