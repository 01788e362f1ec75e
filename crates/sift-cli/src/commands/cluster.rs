use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use sift_analysis::cluster_signals;
use sift_core::config::ClusterConfig;

use super::{load_signals, Context};
use crate::output::format::format_cluster_result;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct ClusterArgs {
    /// JSON file containing an array of signals
    pub signals: PathBuf,

    #[command(flatten)]
    pub sizing: ClusterSizing,
}

/// Per-run overrides of the clustering knobs in the config file.
#[derive(Args)]
pub struct ClusterSizing {
    /// Title similarity (0-1) above which signals are pre-grouped
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Clusters smaller than this are discarded
    #[arg(long)]
    pub min_size: Option<usize>,

    /// Clusters larger than this are truncated
    #[arg(long)]
    pub max_size: Option<usize>,
}

impl ClusterSizing {
    pub fn resolve(&self, ctx: &Context) -> ClusterConfig {
        let base = ctx.config.cluster_config();
        ClusterConfig {
            similarity_threshold: self.threshold.unwrap_or(base.similarity_threshold),
            min_cluster_size: self.min_size.unwrap_or(base.min_cluster_size),
            max_cluster_size: self.max_size.unwrap_or(base.max_cluster_size),
        }
        .normalized()
    }
}

pub async fn run(args: &ClusterArgs, ctx: &Context, fmt: OutputFormat) -> Result<()> {
    let signals = load_signals(&args.signals)?;
    let config = args.sizing.resolve(ctx);

    let result = cluster_signals(&signals, ctx.provider.as_ref(), &ctx.cancel, config).await;

    print!("{}", format_cluster_result(&result, fmt));
    Ok(())
}
