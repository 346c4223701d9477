//! # Core Wire Components
//!
//! Low-level byte handling shared by every decoder.
//!
//! ## Components
//! - **Reader**: bounds-checked little-endian field reads at fixed offsets
//! - **IPC**: framing of captured segments into [`ipc::RawMessage`] values
//!
//! ## Segment Format
//! ```text
//! server->client: [Reserved(2)] [Type(2)] [Unk(2)] [Server(2)] [Epoch(4)] [Unk(4)] [Payload(N)]
//! client->server: [Type(2)] [Unk(30)] [Payload(N)]
//! ```
//!
//! Payload sizes are fixed per message kind; a reader validates the whole
//! layout once, so individual field reads never fail.

pub mod ipc;
pub mod reader;
