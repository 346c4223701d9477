//! # Zone Protocol
//!
//! Opcode routing, wire layouts, identifier correction and decoding.
//!
//! ## Components
//! - **Opcode**: direction-scoped message kinds
//! - **Dispatcher**: one O(1) routing table per direction
//! - **Layout**: fixed-offset readers producing wire records
//! - **Corrector**: the self-calibrating identifier delta
//! - **Decoder**: wire records to domain events
//! - **Message**: the event types consumers subscribe to
//!
//! ## Pipeline
//! ```text
//! RawMessage -> Dispatcher::dispatch -> WireRecord -> MessageDecoder::decode -> DecodedMessage
//! ```

pub mod corrector;
pub mod decoder;
pub mod dispatcher;
pub mod layout;
pub mod message;
pub mod opcode;
