//! Observability and Metrics
//!
//! Counters for decoder throughput and health.
//!
//! Uses atomic counters so a shared snapshot can be read from any thread while
//! the decoder keeps running.

use crate::protocol::opcode::Direction;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Metrics collector owned by a network service
#[derive(Debug)]
pub struct Metrics {
    /// Server->client messages handed to the decoder
    pub server_messages: AtomicU64,
    /// Client->server messages handed to the decoder
    pub client_messages: AtomicU64,
    /// Messages that matched a route and parsed
    pub messages_decoded: AtomicU64,
    /// Messages with no route for their direction
    pub messages_unrecognized: AtomicU64,
    /// Messages shorter than their fixed layout
    pub messages_truncated: AtomicU64,
    /// Decoded messages that produced no event
    pub messages_dropped: AtomicU64,
    /// Events handed to channels
    pub events_published: AtomicU64,
    /// Subscriber errors and panics
    pub subscriber_failures: AtomicU64,
    /// Identifier delta recalibrations
    pub delta_updates: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            server_messages: AtomicU64::new(0),
            client_messages: AtomicU64::new(0),
            messages_decoded: AtomicU64::new(0),
            messages_unrecognized: AtomicU64::new(0),
            messages_truncated: AtomicU64::new(0),
            messages_dropped: AtomicU64::new(0),
            events_published: AtomicU64::new(0),
            subscriber_failures: AtomicU64::new(0),
            delta_updates: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn message_received(&self, direction: Direction) {
        match direction {
            Direction::ServerToClient => self.server_messages.fetch_add(1, Ordering::Relaxed),
            Direction::ClientToServer => self.client_messages.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn message_decoded(&self) {
        self.messages_decoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn message_unrecognized(&self) {
        self.messages_unrecognized.fetch_add(1, Ordering::Relaxed);
    }

    pub fn message_truncated(&self) {
        self.messages_truncated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn message_dropped(&self) {
        self.messages_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn events_published(&self, count: u64) {
        self.events_published.fetch_add(count, Ordering::Relaxed);
    }

    pub fn subscriber_failures(&self, count: u64) {
        self.subscriber_failures.fetch_add(count, Ordering::Relaxed);
    }

    pub fn delta_updated(&self) {
        self.delta_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            server_messages: self.server_messages.load(Ordering::Relaxed),
            client_messages: self.client_messages.load(Ordering::Relaxed),
            messages_decoded: self.messages_decoded.load(Ordering::Relaxed),
            messages_unrecognized: self.messages_unrecognized.load(Ordering::Relaxed),
            messages_truncated: self.messages_truncated.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
            events_published: self.events_published.load(Ordering::Relaxed),
            subscriber_failures: self.subscriber_failures.load(Ordering::Relaxed),
            delta_updates: self.delta_updates.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            server_messages = snapshot.server_messages,
            client_messages = snapshot.client_messages,
            messages_decoded = snapshot.messages_decoded,
            messages_unrecognized = snapshot.messages_unrecognized,
            messages_truncated = snapshot.messages_truncated,
            messages_dropped = snapshot.messages_dropped,
            events_published = snapshot.events_published,
            subscriber_failures = snapshot.subscriber_failures,
            delta_updates = snapshot.delta_updates,
            uptime_seconds = snapshot.uptime_seconds,
            "Decoder metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub server_messages: u64,
    pub client_messages: u64,
    pub messages_decoded: u64,
    pub messages_unrecognized: u64,
    pub messages_truncated: u64,
    pub messages_dropped: u64,
    pub events_published: u64,
    pub subscriber_failures: u64,
    pub delta_updates: u64,
    pub uptime_seconds: u64,
}
