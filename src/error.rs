//! # Error Types
//!
//! Error handling for the zone-protocol decoder.
//!
//! Most irregular input is *not* an error: unrecognized opcodes, over-declared
//! target counts, out-of-range waymark indices and zero target ids are all
//! absorbed by the decoder. The variants here cover what is left:
//!
//! ## Error Categories
//! - **Framing Errors**: buffers shorter than the fixed layout they claim to be
//! - **Configuration Errors**: unreadable files, bad TOML, duplicate opcodes
//! - **Intake Errors**: a capture source that cannot attach (fatal at startup)
//! - **Subscriber Errors**: failures reported by event handlers
//!
//! ## Example Usage
//! ```rust
//! use zone_net::error::{NetworkError, Result};
//! use tracing::error;
//!
//! fn load(path: &str) -> Result<zone_net::config::DecoderConfig> {
//!     zone_net::config::DecoderConfig::from_file(path)
//! }
//!
//! if let Err(e) = load("missing.toml") {
//!     error!(error = %e, "Failed to load decoder config");
//!     assert!(matches!(e, NetworkError::ConfigError(_)));
//! }
//! ```

use crate::protocol::opcode::Direction;
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Event channel errors
    pub const ERR_CHANNEL_WRITE_LOCK: &str = "Failed to acquire write lock on event channel";

    /// Framing errors
    pub const ERR_SERVER_SEGMENT_TOO_SHORT: &str = "Server segment shorter than IPC header";
    pub const ERR_CLIENT_SEGMENT_TOO_SHORT: &str = "Client segment shorter than IPC header";

    /// Subscriber errors
    pub const ERR_SUBSCRIBER_PANICKED: &str = "Event subscriber panicked";
}

/// NetworkError is the primary error type for all decoder operations
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Truncated {kind} payload: need {needed} bytes, have {actual}")]
    Truncated {
        kind: &'static str,
        needed: usize,
        actual: usize,
    },

    #[error("Invalid segment: {0}")]
    InvalidSegment(String),

    #[error("Duplicate {direction} opcode 0x{opcode:04X}")]
    DuplicateOpcode { direction: Direction, opcode: u16 },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Capture source '{source_name}' unavailable: {reason}")]
    IntakeUnavailable { source_name: String, reason: String },

    #[error("Subscriber error: {0}")]
    Subscriber(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

/// Type alias for Results using NetworkError
pub type Result<T> = std::result::Result<T, NetworkError>;
