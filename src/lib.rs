//! # zone-net
//!
//! Decoder and event-normalization layer for the zone protocol spoken between a
//! game client and its server.
//!
//! Captured messages enter through [`service::NetworkService::handle`], are routed
//! by `(direction, opcode)`, decoded from fixed little-endian layouts, have their
//! re-based action identifiers corrected, and are published synchronously as typed
//! events to subscribers of [`service::EventBus`].
//!
//! ## Modules
//! - **core**: byte-level reading and IPC segment framing
//! - **protocol**: opcodes, wire layouts, identifier correction, decoding
//! - **service**: the intake facade and the event publisher
//! - **utils**: logging, metrics and the diagnostic dump formatter
//!
//! ## Example
//! ```rust
//! use zone_net::config::DecoderConfig;
//! use zone_net::service::NetworkService;
//!
//! let service = NetworkService::new(DecoderConfig::default()).expect("valid config");
//! service
//!     .events()
//!     .target_icon
//!     .subscribe(|icon| {
//!         println!("icon {} on {:#x}", icon.icon_id, icon.actor_id);
//!         Ok(())
//!     })
//!     .expect("subscribe");
//! assert_eq!(service.identifier_delta(), 0);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod service;
pub mod utils;

pub use crate::core::ipc::RawMessage;
pub use crate::error::{NetworkError, Result};
pub use crate::protocol::opcode::Direction;
pub use crate::service::{EventBus, HandleOutcome, NetworkService};
