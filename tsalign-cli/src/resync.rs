//! The resync command: drive the core engine over files or stdio.

use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use tracing::info;

use tsalign_core::constants::{
    DEFAULT_CONTIG_SIZE, DEFAULT_SYNC_SIZE, MAX_CONTIG_SIZE, MAX_SYNC_SIZE, MIN_CONTIG_SIZE,
    MIN_SYNC_SIZE, PKT_SIZE,
};
use tsalign_core::engine::{ResyncConfig, ResyncSummary, Resynchronizer};
use tsalign_core::io::{ReadSource, WriteSink};
use tsalign_core::Framing;

/// Options for the resynchronizer
#[derive(Args, Debug, Clone)]
pub struct ResyncArgs {
    /// Input transport stream file (standard input if omitted)
    pub input: Option<String>,

    /// Output file name (standard output by default)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Continue resynchronizing after a loss of synchronization.
    /// By default, stop after the first packet not starting with 0x47.
    #[arg(short = 'c', long = "continue")]
    pub cont: bool,

    /// Keep the input packet size on output. By default, strip extra
    /// data and reduce packets to 188 bytes.
    #[arg(short, long)]
    pub keep: bool,

    /// Minimum size of a slice of contiguous valid packets to accept it
    /// as actual transport stream content
    #[arg(
        short = 'm',
        long,
        default_value_t = DEFAULT_CONTIG_SIZE as u64,
        value_parser = clap::value_parser!(u64).range(MIN_CONTIG_SIZE as u64..=MAX_CONTIG_SIZE as u64)
    )]
    pub min_contiguous: u64,

    /// Expected input packet size in bytes. By default, try 188-byte
    /// (standard), 204-byte (trailing 16-byte Reed-Solomon outer FEC)
    /// and 192-byte (leading 4-byte M2TS timestamp) packets.
    #[arg(
        short = 'p',
        long,
        value_parser = clap::value_parser!(u64).range(PKT_SIZE as u64..=0x7FFF_FFFF)
    )]
    pub packet_size: Option<u64>,

    /// Size of extra data preceding each packet in the input file.
    /// Only meaningful together with --packet-size.
    #[arg(long, default_value_t = 0)]
    pub header_size: u64,

    /// Number of initial bytes to analyze to find the start of packet
    /// synchronization
    #[arg(
        short = 's',
        long,
        default_value_t = DEFAULT_SYNC_SIZE as u64,
        value_parser = clap::value_parser!(u64).range(MIN_SYNC_SIZE as u64..=MAX_SYNC_SIZE as u64)
    )]
    pub sync_size: u64,
}

impl ResyncArgs {
    /// Translate CLI options into an engine configuration. The framing
    /// invariant is checked here, before any file is opened.
    pub fn to_config(&self) -> Result<ResyncConfig> {
        let framing = match self.packet_size {
            Some(packet_size) => Some(
                Framing::new(packet_size as usize, self.header_size as usize)
                    .context("--header-size too large for the specified --packet-size")?,
            ),
            None => None,
        };
        Ok(ResyncConfig {
            sync_size: self.sync_size as usize,
            contig_size: self.min_contiguous as usize,
            framing,
            keep: self.keep,
            continue_after_loss: self.cont,
        })
    }
}

/// Resynchronize the configured input into the configured output.
///
/// Returns the run summary; the caller decides the exit code from the
/// terminal status. Output written before a loss of synchronization is
/// kept as a valid truncated stream.
pub fn execute(args: &ResyncArgs) -> Result<ResyncSummary> {
    let config = args.to_config()?;

    let input: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open input file: {path}"))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file: {path}"))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let mut engine = Resynchronizer::new(ReadSource::new(input), WriteSink::new(output), config)?;
    let result = engine.run();

    let summary = engine.summary();
    info!(
        "Output {} bytes, {} {}-byte packets",
        summary.out_bytes, summary.out_packets, summary.out_packet_size
    );

    // Surface I/O failures after reporting the totals.
    result?;
    Ok(summary)
}
