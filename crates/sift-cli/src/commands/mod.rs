pub mod beads;
pub mod cluster;
pub mod deps;
pub mod prioritize;

use std::path::Path;

use anyhow::{Context as _, Result};
use clap::{Subcommand, ValueEnum};
use sift_core::config::AnalysisConfig;
use sift_core::llm::CompletionProvider;
use sift_core::model::Signal;
use tokio_util::sync::CancellationToken;

use crate::provider::{split_command_line, CommandProvider, ConfiguredProvider, NoProvider};

#[derive(Subcommand)]
pub enum Commands {
    /// Group related signals into clusters
    Cluster(cluster::ClusterArgs),
    /// Turn clusters into backlog beads (epics for large clusters)
    Beads(beads::BeadsArgs),
    /// Assign P1-P4 priorities to signals
    Prioritize(prioritize::PrioritizeArgs),
    /// Infer dependencies between signals
    Deps(deps::DepsArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// `command` when an LLM command is configured, `none` otherwise
    Auto,
    /// No LLM: every step uses its deterministic fallback
    None,
    /// Pipe prompts through an external command
    Command,
}

/// Everything a subcommand needs besides its own arguments.
pub struct Context {
    pub config: AnalysisConfig,
    pub provider: Box<dyn CompletionProvider>,
    pub cancel: CancellationToken,
}

impl Context {
    pub fn build(
        config_path: Option<&Path>,
        kind: ProviderKind,
        llm_command: Option<&str>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => AnalysisConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => AnalysisConfig::default_init(),
        };
        if let Some(line) = llm_command {
            config.llm_command = Some(split_command_line(line));
        }

        let base: Box<dyn CompletionProvider> = match (kind, &config.llm_command) {
            (ProviderKind::None, _) | (ProviderKind::Auto, None) => Box::new(NoProvider),
            (ProviderKind::Command, None) => {
                anyhow::bail!("--provider command needs --llm-command or llm_command in the config")
            }
            (ProviderKind::Command | ProviderKind::Auto, Some(argv)) => {
                Box::new(CommandProvider::new(argv.clone())?)
            }
        };
        let provider = Box::new(ConfiguredProvider::new(base, &config));

        Ok(Self {
            config,
            provider,
            cancel,
        })
    }
}

/// Read a JSON array of signals.
pub fn load_signals(path: &Path) -> Result<Vec<Signal>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let signals: Vec<Signal> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of signals", path.display()))?;
    tracing::info!("Loaded {} signals from {}", signals.len(), path.display());
    Ok(signals)
}
