//! Sync-byte validation and blind offset search over a detection window

use crate::constants::SYNC_BYTE;
use crate::framing::Framing;

#[cfg(feature = "logging")]
use tracing::debug;

/// A synchronization point located in a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedSync {
    /// Byte offset at which the framing validates
    pub offset: usize,

    /// The framing that validates at that offset
    pub framing: Framing,
}

/// Check whether `buf` is fully covered by packets of the given framing.
///
/// The buffer is partitioned into consecutive `packet_size` slots starting
/// at offset 0; every slot that fully fits must carry the sync byte at the
/// framing's header offset. Returns false as soon as one slot fails, and
/// false when not even one slot fits.
///
/// Requiring the sync byte across a whole multi-hundred-kilobyte window
/// (thousands of packets) is what keeps blind detection reliable: 0x47
/// occurs in real payloads, but not at every packet-sized stride.
pub fn check_sync(buf: &[u8], framing: Framing) -> bool {
    if buf.len() < framing.packet_size {
        return false;
    }
    let mut pos = 0;
    while pos + framing.packet_size <= buf.len() {
        if buf[pos + framing.header_size] != SYNC_BYTE {
            return false;
        }
        pos += framing.packet_size;
    }
    true
}

/// Search `buf` for the earliest offset at which one of the candidate
/// framings validates over a `window`-byte sub-window.
///
/// Offsets are tried in ascending order; among framings at the same
/// offset, catalog order decides. Returns `None` when `window` does not
/// fit in the buffer or nothing validates.
pub fn find_sync(buf: &[u8], window: usize, catalog: &[Framing]) -> Option<LocatedSync> {
    if window == 0 || window > buf.len() || catalog.is_empty() {
        return None;
    }
    let last_start = buf.len() - window;
    let max_header = catalog.iter().map(|f| f.header_size).max().unwrap_or(0);

    let mut start = 0;
    while start <= last_start {
        // A framing can only validate here if a sync byte sits within
        // reach of one of the candidate header offsets.
        let probe_end = (start + max_header + 1).min(buf.len());
        if memchr::memchr(SYNC_BYTE, &buf[start..probe_end]).is_none() {
            // Skip to just before the next sync byte in the buffer;
            // offsets in between cannot match any candidate framing.
            match memchr::memchr(SYNC_BYTE, &buf[probe_end..]) {
                Some(rel) => {
                    start = core::cmp::max(start + 1, (probe_end + rel).saturating_sub(max_header));
                    continue;
                }
                None => return None,
            }
        }
        for &framing in catalog {
            if check_sync(&buf[start..start + window], framing) {
                #[cfg(feature = "logging")]
                debug!(
                    "Sync candidate validated at offset {} ({}-byte packets, {}-byte header)",
                    start, framing.packet_size, framing.header_size
                );
                return Some(LocatedSync {
                    offset: start,
                    framing,
                });
            }
        }
        start += 1;
    }
    None
}
