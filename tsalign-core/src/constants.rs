//! Constants and limits for transport stream resynchronization

/// Size in bytes of a standard TS packet
pub const PKT_SIZE: usize = 188;

/// Synchronization byte expected at the start of every TS packet
pub const SYNC_BYTE: u8 = 0x47;

/// Size of a TS packet with a trailing 16-byte Reed-Solomon outer FEC
pub const PKT_RS_SIZE: usize = 204;

/// Size of the Reed-Solomon trailer following the packet body
pub const RS_TRAILER_SIZE: usize = PKT_RS_SIZE - PKT_SIZE;

/// Size of a TS packet with a leading 4-byte timestamp (M2TS, Blu-ray discs)
pub const PKT_M2TS_SIZE: usize = 192;

/// Size of the leading timestamp header in M2TS files
pub const M2TS_HEADER_SIZE: usize = 4;

/// Minimum number of initial bytes to analyze for synchronization (1 kB)
pub const MIN_SYNC_SIZE: usize = 1024;

/// Maximum number of initial bytes to analyze for synchronization (8 MB)
pub const MAX_SYNC_SIZE: usize = 8 * 1024 * 1024;

/// Default number of initial bytes to analyze for synchronization (1 MB)
pub const DEFAULT_SYNC_SIZE: usize = 1024 * 1024;

/// Minimum size of a run of contiguous valid packets (2 packets)
pub const MIN_CONTIG_SIZE: usize = 2 * PKT_SIZE;

/// Maximum size of a run of contiguous valid packets (8 MB)
pub const MAX_CONTIG_SIZE: usize = 8 * 1024 * 1024;

/// Default size of a run of contiguous valid packets (512 kB)
pub const DEFAULT_CONTIG_SIZE: usize = 512 * 1024;
