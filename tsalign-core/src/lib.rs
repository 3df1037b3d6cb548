//! # Tsalign Core
//!
//! MPEG transport stream resynchronization: locate the packet boundary in
//! an arbitrary byte stream, determine the framing (bare 188-byte packets,
//! 204-byte Reed-Solomon FEC, 192-byte M2TS, or a user-supplied
//! encapsulation), then stream validated packets while watching for loss
//! of synchronization.
//!
//! ## Modules
//!
//! - `constants`: TS packet constants and detection window limits
//! - `framing`: packet encapsulation catalog
//! - `detector`: sync-byte window validation and blind offset search
//! - `engine`: the streaming resynchronization state machine
//! - `io`: byte source/sink contracts and std adapters

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod constants;
pub mod detector;
#[cfg(feature = "std")]
pub mod engine;
pub mod error;
pub mod framing;
#[cfg(feature = "std")]
pub mod io;

// Re-export commonly used types
pub use error::ResyncError;
pub use framing::Framing;

/// Result type alias for resynchronization operations
pub type Result<T> = core::result::Result<T, ResyncError>;
