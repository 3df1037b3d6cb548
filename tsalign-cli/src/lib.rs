//! Library entry for tsalign-cli used by integration tests and embedding.

pub mod resync;

// Re-export the command surface for convenience
pub use resync::{execute, ResyncArgs};
