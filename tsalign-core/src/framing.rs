//! Packet framings: how TS packets are encapsulated in the raw byte stream

use crate::constants::{M2TS_HEADER_SIZE, PKT_M2TS_SIZE, PKT_RS_SIZE, PKT_SIZE};
use crate::error::ResyncError;
use core::ops::Range;
use serde::{Deserialize, Serialize};

/// A packet encapsulation: the total slot size in the byte stream and the
/// number of bytes preceding the 188-byte packet body within each slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framing {
    /// Total size of one slot in the byte stream
    pub packet_size: usize,

    /// Extra bytes preceding the packet body within its slot
    pub header_size: usize,
}

impl Framing {
    /// Standard bare TS packets
    pub const STANDARD: Framing = Framing {
        packet_size: PKT_SIZE,
        header_size: 0,
    };

    /// TS packets with a trailing 16-byte Reed-Solomon outer FEC
    pub const RS_FEC: Framing = Framing {
        packet_size: PKT_RS_SIZE,
        header_size: 0,
    };

    /// TS packets with a leading 4-byte timestamp (M2TS, Blu-ray discs)
    pub const M2TS: Framing = Framing {
        packet_size: PKT_M2TS_SIZE,
        header_size: M2TS_HEADER_SIZE,
    };

    /// Known framings, in detection priority order
    pub const CATALOG: [Framing; 3] = [Self::STANDARD, Self::RS_FEC, Self::M2TS];

    /// Create a framing, validating that a full packet fits after the header
    pub fn new(packet_size: usize, header_size: usize) -> Result<Self, ResyncError> {
        if packet_size < PKT_SIZE || header_size + PKT_SIZE > packet_size {
            return Err(ResyncError::InvalidFraming {
                packet_size,
                header_size,
            });
        }
        Ok(Self {
            packet_size,
            header_size,
        })
    }

    /// Offset of the sync byte within a slot
    pub const fn sync_offset(&self) -> usize {
        self.header_size
    }

    /// Range of the 188-byte packet body within a slot
    pub fn body_range(&self) -> Range<usize> {
        self.header_size..self.header_size + PKT_SIZE
    }

    /// Framing emitted on output: the input framing when `keep` is set,
    /// bare 188-byte packets otherwise
    pub const fn output(&self, keep: bool) -> Framing {
        if keep {
            *self
        } else {
            Self::STANDARD
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_invariant() {
        for f in Framing::CATALOG {
            assert!(f.header_size + PKT_SIZE <= f.packet_size);
        }
    }

    #[test]
    fn test_new_rejects_oversized_header() {
        assert!(Framing::new(188, 0).is_ok());
        assert!(Framing::new(204, 16).is_ok());
        assert!(Framing::new(204, 17).is_err());
        assert!(Framing::new(100, 0).is_err());
        assert!(Framing::new(192, 5).is_err());
    }

    #[test]
    fn test_output_derivation() {
        assert_eq!(Framing::M2TS.output(true), Framing::M2TS);
        assert_eq!(Framing::M2TS.output(false), Framing::STANDARD);
        assert_eq!(Framing::RS_FEC.output(false), Framing::STANDARD);
        assert_eq!(Framing::STANDARD.output(true), Framing::STANDARD);
    }

    #[test]
    fn test_body_range() {
        assert_eq!(Framing::STANDARD.body_range(), 0..188);
        assert_eq!(Framing::M2TS.body_range(), 4..192);
        assert_eq!(Framing::RS_FEC.body_range(), 0..188);
    }
}
