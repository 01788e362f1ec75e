use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One detected work-item candidate produced by a collector.
///
/// Analysis never owns signals. It reads them, and a few entry points write
/// back `priority`, `blocks` and `depends_on` in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Signal {
    pub title: String,
    #[serde(default)]
    pub kind: String,
    /// Name of the collector that produced this signal.
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// 1 (most urgent) to 4. `None` means unassigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    /// Stable bead IDs this signal blocks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<String>,
    /// Stable bead IDs this signal depends on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub workspace: String,
}

impl Signal {
    /// `path:line`, `path`, or empty when the signal has no location.
    pub fn location(&self) -> String {
        match (self.file_path.is_empty(), self.line) {
            (true, _) => String::new(),
            (false, Some(line)) if line > 0 => format!("{}:{}", self.file_path, line),
            (false, _) => self.file_path.clone(),
        }
    }
}

/// Append `value` unless it is already present. First occurrence wins.
pub fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
