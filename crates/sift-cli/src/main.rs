use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod output;
mod provider;

#[derive(Parser)]
#[command(
    name = "sift",
    version,
    about = "Cluster, prioritize and link mechanically extracted work signals"
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: output::OutputFormat,

    /// Path to a JSON config file
    #[arg(long, global = true, env = "SIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Completion backend
    #[arg(long, global = true, value_enum, default_value = "auto")]
    provider: commands::ProviderKind,

    /// Command line for the `command` provider (overrides the config file)
    #[arg(long, global = true, env = "SIFT_LLM_COMMAND")]
    llm_command: Option<String>,

    #[command(subcommand)]
    command: commands::Commands,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, abandoning in-flight LLM call");
            on_interrupt.cancel();
        }
    });

    let ctx = commands::Context::build(
        cli.config.as_deref(),
        cli.provider,
        cli.llm_command.as_deref(),
        cancel,
    )?;

    match &cli.command {
        commands::Commands::Cluster(args) => commands::cluster::run(args, &ctx, cli.format).await,
        commands::Commands::Beads(args) => commands::beads::run(args, &ctx, cli.format).await,
        commands::Commands::Prioritize(args) => {
            commands::prioritize::run(args, &ctx, cli.format).await
        }
        commands::Commands::Deps(args) => commands::deps::run(args, &ctx, cli.format).await,
    }
}
