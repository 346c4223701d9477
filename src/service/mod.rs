//! # Service Layer
//!
//! The intake facade that turns captured messages into published events,
//! and the typed channels those events are published on.

pub mod events;
pub mod network;

pub use events::{Channel, EventBus, PublishReport, SubscriptionId};
pub use network::{CaptureSource, HandleOutcome, NetworkService};
