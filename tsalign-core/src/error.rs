//! Error types for resynchronization operations

use alloc::string::String;

/// Errors that can occur while configuring or running the resynchronizer
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResyncError {
    /// A full 188-byte packet does not fit after the header
    #[cfg_attr(
        feature = "std",
        error("Header size {header_size} too large for packet size {packet_size}")
    )]
    InvalidFraming {
        /// Total slot size in the byte stream.
        packet_size: usize,
        /// Extra bytes preceding each packet.
        header_size: usize,
    },

    /// A detection window size is outside its allowed bounds
    #[cfg_attr(
        feature = "std",
        error("{name} of {value} bytes outside allowed range [{min}, {max}]")
    )]
    WindowOutOfRange {
        /// Name of the offending option.
        name: &'static str,
        /// The configured value.
        value: usize,
        /// Lower bound, inclusive.
        min: usize,
        /// Upper bound, inclusive.
        max: usize,
    },

    /// IO error during read/write
    #[cfg_attr(feature = "std", error("IO error: {0}"))]
    Io(String),
}

#[cfg(feature = "std")]
impl From<std::io::Error> for ResyncError {
    fn from(err: std::io::Error) -> Self {
        ResyncError::Io(err.to_string())
    }
}
