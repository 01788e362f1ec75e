use serde::{Deserialize, Serialize};

use super::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeadType {
    Task,
    Epic,
}

impl BeadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BeadType::Task => "task",
            BeadType::Epic => "epic",
        }
    }
}

impl std::fmt::Display for BeadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A backlog-ready unit of work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisBead {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub bead_type: BeadType,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Empty for top-level beads. Weak reference by ID; epics are always
    /// emitted before their children.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_signals: Vec<Signal>,
}

impl AnalysisBead {
    pub fn is_epic(&self) -> bool {
        self.bead_type == BeadType::Epic
    }
}
