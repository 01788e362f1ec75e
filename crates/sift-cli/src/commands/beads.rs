use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use sift_analysis::{beads_to_signals, cluster_signals, create_epic_hierarchy};

use super::cluster::ClusterSizing;
use super::{load_signals, Context};
use crate::output::format::{format_beads, format_signals};
use crate::output::OutputFormat;

#[derive(Args)]
pub struct BeadsArgs {
    /// JSON file containing an array of signals
    pub signals: PathBuf,

    #[command(flatten)]
    pub sizing: ClusterSizing,

    /// Emit the beads converted back into signals
    #[arg(long)]
    pub as_signals: bool,
}

pub async fn run(args: &BeadsArgs, ctx: &Context, fmt: OutputFormat) -> Result<()> {
    let signals = load_signals(&args.signals)?;
    let result =
        cluster_signals(&signals, ctx.provider.as_ref(), &ctx.cancel, args.sizing.resolve(ctx))
            .await;

    let mut beads = Vec::new();
    for cluster in &result.clusters {
        beads.extend(
            create_epic_hierarchy(cluster, &signals, ctx.provider.as_ref(), &ctx.cancel).await,
        );
    }
    if !result.unclustered.is_empty() {
        tracing::info!("{} signals left unclustered", result.unclustered.len());
    }

    if args.as_signals {
        print!("{}", format_signals(&beads_to_signals(&beads), fmt));
    } else {
        print!("{}", format_beads(&beads, fmt));
    }
    Ok(())
}
