use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tsalign_cli::resync::{self, ResyncArgs};
use tsalign_core::engine::ResyncStatus;

#[derive(Parser)]
#[command(name = "tsalign")]
#[command(about = "MPEG transport stream resynchronizer", long_about = None)]
#[command(version)]
struct Cli {
    /// Display verbose information
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    args: ResyncArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout carries the packet stream.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let summary = resync::execute(&cli.args)?;
    match summary.status {
        ResyncStatus::EndOfInput => Ok(()),
        ResyncStatus::SyncLost => anyhow::bail!(
            "synchronization lost after {} packets",
            summary.out_packets
        ),
        _ => anyhow::bail!("resynchronization failed"),
    }
}
