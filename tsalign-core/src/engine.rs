//! The resynchronization engine
//!
//! Owns the detection buffer and drives the search → stream →
//! re-search cycle over an injected byte source and sink. One engine
//! instance handles one run; several engines may coexist.

use crate::constants::{
    DEFAULT_CONTIG_SIZE, DEFAULT_SYNC_SIZE, MAX_CONTIG_SIZE, MAX_SYNC_SIZE, MIN_CONTIG_SIZE,
    MIN_SYNC_SIZE, SYNC_BYTE,
};
use crate::detector::find_sync;
use crate::error::ResyncError;
use crate::framing::Framing;
use crate::io::{ByteSink, ByteSource};
use bytes::BytesMut;

#[cfg(feature = "logging")]
use tracing::{debug, info, warn};

/// Processing status of a resynchronization session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResyncStatus {
    /// In sync, processing
    Ok,
    /// Sync marker mismatch after previously valid packets
    SyncLost,
    /// Source exhausted while in sync; the successful terminal status
    EndOfInput,
    /// Unrecoverable failure: detection exhausted or sink write failed
    Error,
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct ResyncConfig {
    /// Number of initial bytes analyzed per detection attempt
    pub sync_size: usize,

    /// Minimum run of contiguous valid packets to accept a framing
    pub contig_size: usize,

    /// Explicit input framing; `None` enables blind detection over the
    /// framing catalog
    pub framing: Option<Framing>,

    /// Emit packets in the input framing instead of stripping down to
    /// bare 188-byte packets
    pub keep: bool,

    /// Re-enter detection after a loss of synchronization instead of
    /// stopping
    pub continue_after_loss: bool,
}

impl Default for ResyncConfig {
    fn default() -> Self {
        Self {
            sync_size: DEFAULT_SYNC_SIZE,
            contig_size: DEFAULT_CONTIG_SIZE,
            framing: None,
            keep: false,
            continue_after_loss: false,
        }
    }
}

impl ResyncConfig {
    /// Validate window bounds. The framing invariant itself is enforced
    /// by [`Framing::new`] when the explicit framing is built.
    pub fn validate(&self) -> Result<(), ResyncError> {
        if self.sync_size < MIN_SYNC_SIZE || self.sync_size > MAX_SYNC_SIZE {
            return Err(ResyncError::WindowOutOfRange {
                name: "sync-size",
                value: self.sync_size,
                min: MIN_SYNC_SIZE,
                max: MAX_SYNC_SIZE,
            });
        }
        if self.contig_size < MIN_CONTIG_SIZE || self.contig_size > MAX_CONTIG_SIZE {
            return Err(ResyncError::WindowOutOfRange {
                name: "min-contiguous",
                value: self.contig_size,
                min: MIN_CONTIG_SIZE,
                max: MAX_CONTIG_SIZE,
            });
        }
        Ok(())
    }
}

/// Totals for one engine run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResyncSummary {
    /// Bytes written to the sink
    pub out_bytes: u64,

    /// Packets written to the sink
    pub out_packets: u64,

    /// Size of each output packet
    pub out_packet_size: usize,

    /// Number of times synchronization was acquired
    pub sync_acquisitions: u32,

    /// Terminal status of the run
    pub status: ResyncStatus,
}

/// Streaming resynchronizer over an injected source and sink
pub struct Resynchronizer<S, K> {
    source: S,
    sink: K,
    config: ResyncConfig,
    /// Working buffer of at least `sync_size + contig_size` bytes,
    /// allocated once
    buf: BytesMut,
    /// Bytes carried over at the front of `buf` between phases
    pre: usize,
    status: ResyncStatus,
    in_framing: Option<Framing>,
    out_framing: Framing,
    out_bytes: u64,
    sync_acquisitions: u32,
}

impl<S: ByteSource, K: ByteSink> Resynchronizer<S, K> {
    /// Create an engine. Fails when the configured windows are out of
    /// bounds; no I/O happens here.
    pub fn new(source: S, sink: K, config: ResyncConfig) -> Result<Self, ResyncError> {
        config.validate()?;
        let mut capacity = config.sync_size + config.contig_size;
        if let Some(f) = config.framing {
            // An oversized explicit framing must still fit the buffer
            // with room for the streaming top-up.
            capacity = capacity.max(2 * f.packet_size);
        }
        Ok(Self {
            source,
            sink,
            buf: BytesMut::zeroed(capacity),
            pre: 0,
            status: ResyncStatus::Ok,
            in_framing: None,
            out_framing: Framing::STANDARD,
            out_bytes: 0,
            sync_acquisitions: 0,
            config,
        })
    }

    /// Current status
    pub fn status(&self) -> ResyncStatus {
        self.status
    }

    /// Input framing selected by detection, if any
    pub fn input_framing(&self) -> Option<Framing> {
        self.in_framing
    }

    /// Bytes written so far
    pub fn out_bytes(&self) -> u64 {
        self.out_bytes
    }

    /// Packets written so far
    pub fn out_packets(&self) -> u64 {
        self.out_bytes / self.out_framing.packet_size as u64
    }

    /// Snapshot of the run totals; valid during and after a run
    pub fn summary(&self) -> ResyncSummary {
        ResyncSummary {
            out_bytes: self.out_bytes,
            out_packets: self.out_packets(),
            out_packet_size: self.out_framing.packet_size,
            sync_acquisitions: self.sync_acquisitions,
            status: self.status,
        }
    }

    /// Give back the source and sink
    pub fn into_parts(self) -> (S, K) {
        (self.source, self.sink)
    }

    /// Run the session to completion.
    ///
    /// Detection happens once at the start, then again after every loss
    /// of synchronization when the continue policy is enabled. Stream
    /// outcomes (`EndOfInput`, `SyncLost`, detection `Error`) land in the
    /// summary status; only I/O failures surface as `Err`. The summary
    /// getters above stay valid even on the error path.
    pub fn run(&mut self) -> Result<ResyncSummary, ResyncError> {
        let mut first = true;
        loop {
            self.status = ResyncStatus::Ok;
            self.in_framing = None;

            self.search(first)?;
            first = false;
            if self.status == ResyncStatus::Ok {
                self.stream()?;
            }
            if !(self.status == ResyncStatus::SyncLost && self.config.continue_after_loss) {
                break;
            }
        }
        self.sink.flush()?;
        Ok(self.summary())
    }

    /// One detection pass: fill the window, locate the sync offset and
    /// framing, drain validated packets, compact the leftover.
    fn search(&mut self, first: bool) -> Result<(), ResyncError> {
        let capacity = self.buf.len();
        let read = self.read_into(self.pre, capacity)?;
        let filled = self.pre + read;
        if read == 0 {
            self.status = ResyncStatus::EndOfInput;
        }

        #[cfg(feature = "logging")]
        info!(
            "Analyzing {} {} bytes",
            if first { "first" } else { "next" },
            filled
        );
        #[cfg(not(feature = "logging"))]
        let _ = first;

        // Only offsets with a full contiguity window ahead are candidates.
        let search_len = self.config.contig_size.min(filled);
        let located = match self.config.framing {
            Some(f) => find_sync(&self.buf[..filled], search_len, &[f]),
            None => find_sync(&self.buf[..filled], search_len, &Framing::CATALOG),
        };
        let Some(located) = located else {
            #[cfg(feature = "logging")]
            warn!("Cannot find TS packets after {} bytes", search_len);
            self.status = ResyncStatus::Error;
            return Ok(());
        };

        self.sync_acquisitions += 1;
        self.in_framing = Some(located.framing);
        self.out_framing = located.framing.output(self.config.keep);
        #[cfg(feature = "logging")]
        {
            info!("Found synchronization after {} bytes", located.offset);
            if located.framing.header_size > 0 {
                info!(
                    "Packet size is {} bytes ({}-byte header)",
                    located.framing.packet_size, located.framing.header_size
                );
            } else {
                info!("Packet size is {} bytes", located.framing.packet_size);
            }
        }

        // Drain every packet from the found offset to the end of the
        // window, re-checking each slot: the validated sub-window may be
        // shorter than the fill, and the tail can hold a broken packet.
        let framing = located.framing;
        let mut start = located.offset;
        while start + framing.packet_size <= filled
            && self.buf[start + framing.header_size] == SYNC_BYTE
        {
            self.write_packet_at(framing, start)?;
            start += framing.packet_size;
        }
        if self.status != ResyncStatus::Ok {
            return Ok(());
        }

        // Compact: carry the partial tail as the seed for the next fill.
        if start >= filled {
            self.pre = 0;
        } else {
            self.pre = filled - start;
            self.buf.copy_within(start..filled, 0);
        }

        // A full packet left over means the drain stopped on a bad sync
        // byte, not on running out of data.
        if self.pre >= framing.packet_size {
            self.status = ResyncStatus::SyncLost;
        }
        Ok(())
    }

    /// Packet-by-packet streaming until end of input or loss of sync.
    fn stream(&mut self) -> Result<(), ResyncError> {
        let Some(framing) = self.in_framing else {
            return Ok(());
        };
        let pkt_size = framing.packet_size;
        while self.status == ResyncStatus::Ok {
            debug_assert!(self.pre < pkt_size);
            // Top up the carried residue to one full packet.
            let remain = pkt_size - self.pre;
            let got = self.read_into(self.pre, pkt_size)?;
            if got != remain {
                // Lossy by design: a truncated tail packet is dropped,
                // but gets its own diagnostic, unlike a clean EOF.
                #[cfg(feature = "logging")]
                if self.pre + got > 0 {
                    debug!(
                        "Dropping {}-byte partial packet at end of input",
                        self.pre + got
                    );
                }
                self.status = ResyncStatus::EndOfInput;
            } else if self.buf[framing.header_size] != SYNC_BYTE {
                #[cfg(feature = "logging")]
                warn!(
                    "Synchronization lost after {} TS packets: got {:#04x} instead of {:#04x} at start of packet",
                    self.out_packets(),
                    self.buf[framing.header_size],
                    SYNC_BYTE
                );
                self.status = ResyncStatus::SyncLost;
                // Keep the bad packet: it seeds the next detection window.
                self.pre = pkt_size;
            } else {
                self.write_packet_at(framing, 0)?;
                self.pre = 0;
            }
        }
        Ok(())
    }

    /// Fill `buf[from..to]` from the source, retrying short reads.
    fn read_into(&mut self, from: usize, to: usize) -> Result<usize, ResyncError> {
        match self.source.read_fill(&mut self.buf[from..to]) {
            Ok(n) => Ok(n),
            Err(e) => {
                self.status = ResyncStatus::Error;
                Err(e)
            }
        }
    }

    /// Write the output view of the packet whose slot starts at `at`.
    fn write_packet_at(&mut self, framing: Framing, at: usize) -> Result<(), ResyncError> {
        let skip = framing.header_size - self.out_framing.header_size;
        let out = &self.buf[at + skip..at + skip + self.out_framing.packet_size];
        match self.sink.write_packet(out) {
            Ok(()) => {
                self.out_bytes += self.out_framing.packet_size as u64;
                Ok(())
            }
            Err(e) => {
                #[cfg(feature = "logging")]
                warn!("Error writing output");
                self.status = ResyncStatus::Error;
                Err(e)
            }
        }
    }
}
