use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::DEFAULT_ID_PREFIX;
use crate::model::PriorityOverride;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 1;
pub const DEFAULT_MAX_CLUSTER_SIZE: usize = 20;

/// Knobs for the clustering pass. Zero or negative values mean "use the default".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub similarity_threshold: f64,
    pub min_cluster_size: usize,
    pub max_cluster_size: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
            max_cluster_size: DEFAULT_MAX_CLUSTER_SIZE,
        }
    }
}

impl ClusterConfig {
    /// Replace non-positive fields with their defaults.
    pub fn normalized(self) -> Self {
        Self {
            similarity_threshold: if self.similarity_threshold > 0.0 {
                self.similarity_threshold
            } else {
                DEFAULT_SIMILARITY_THRESHOLD
            },
            min_cluster_size: if self.min_cluster_size > 0 {
                self.min_cluster_size
            } else {
                DEFAULT_MIN_CLUSTER_SIZE
            },
            max_cluster_size: if self.max_cluster_size > 0 {
                self.max_cluster_size
            } else {
                DEFAULT_MAX_CLUSTER_SIZE
            },
        }
    }
}

/// Settings for an analysis run, read from a JSON file (usually `sift.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub similarity_threshold: f64,
    pub min_cluster_size: usize,
    pub max_cluster_size: usize,
    pub id_prefix: String,
    pub priority_overrides: Vec<PriorityOverride>,
    /// argv of the command-backed completion provider, e.g. `["claude", "-p"]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_command: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::default_init()
    }
}

impl AnalysisConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        for o in &self.priority_overrides {
            o.validate()?;
            if o.pattern.trim().is_empty() {
                return Err(CoreError::Config("priority override with empty pattern".into()));
            }
        }
        if self.id_prefix.chars().any(char::is_whitespace) {
            return Err(CoreError::Config(format!(
                "id_prefix must not contain whitespace: '{}'",
                self.id_prefix
            )));
        }
        if let Some(cmd) = &self.llm_command {
            if cmd.is_empty() {
                return Err(CoreError::Config("llm_command must not be empty".into()));
            }
        }
        Ok(())
    }

    pub fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig {
            similarity_threshold: self.similarity_threshold,
            min_cluster_size: self.min_cluster_size,
            max_cluster_size: self.max_cluster_size,
        }
        .normalized()
    }

    pub fn default_init() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
            max_cluster_size: DEFAULT_MAX_CLUSTER_SIZE,
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            priority_overrides: Vec::new(),
            llm_command: None,
            model: None,
            max_tokens: None,
            temperature: None,
        }
    }
}
