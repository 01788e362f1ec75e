use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use sift_analysis::{apply_deps_to_signals, infer_dependencies};

use super::{load_signals, Context};
use crate::output::format::{format_dependencies, format_signals};
use crate::output::OutputFormat;

#[derive(Args)]
pub struct DepsArgs {
    /// JSON file containing an array of signals
    pub signals: PathBuf,

    /// Write "blocks" edges onto the signals and print the signals instead
    #[arg(long)]
    pub apply: bool,

    /// Prefix for stable bead IDs (overrides the config file)
    #[arg(long)]
    pub id_prefix: Option<String>,
}

pub async fn run(args: &DepsArgs, ctx: &Context, fmt: OutputFormat) -> Result<()> {
    let mut signals = load_signals(&args.signals)?;
    let prefix = args.id_prefix.as_deref().unwrap_or(&ctx.config.id_prefix);

    let deps = infer_dependencies(&signals, ctx.provider.as_ref(), &ctx.cancel, prefix).await;

    if args.apply {
        apply_deps_to_signals(&mut signals, &deps, prefix);
        print!("{}", format_signals(&signals, fmt));
    } else {
        print!("{}", format_dependencies(&deps, fmt));
    }
    Ok(())
}
