use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use sift_analysis::infer_priorities;
use sift_core::model::PriorityOverride;

use super::{load_signals, Context};
use crate::output::format::format_signals;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct PrioritizeArgs {
    /// JSON file containing an array of signals
    pub signals: PathBuf,

    /// Force a priority for matching paths, e.g. `auth/**=1`. Repeatable;
    /// earlier overrides win, and these come before the config file's.
    #[arg(long = "override", value_name = "PATTERN=P")]
    pub overrides: Vec<String>,
}

pub async fn run(args: &PrioritizeArgs, ctx: &Context, fmt: OutputFormat) -> Result<()> {
    let mut signals = load_signals(&args.signals)?;

    let mut overrides = args
        .overrides
        .iter()
        .map(|raw| PriorityOverride::parse(raw).context("Invalid --override"))
        .collect::<Result<Vec<_>>>()?;
    overrides.extend(ctx.config.priority_overrides.iter().cloned());

    infer_priorities(&mut signals, ctx.provider.as_ref(), &ctx.cancel, &overrides).await;

    print!("{}", format_signals(&signals, fmt));
    Ok(())
}
