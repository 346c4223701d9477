//! # Event Publisher
//!
//! One typed channel per decoded category. Delivery is synchronous: every
//! subscriber runs, in subscription order, before `publish` returns.
//!
//! A failing subscriber is isolated. Errors are logged and counted, panics are
//! caught, and the remaining subscribers still receive the event.
//!
//! ## Usage
//! ```rust
//! use zone_net::service::events::Channel;
//!
//! let channel: Channel<u32> = Channel::new("numbers");
//! let id = channel.subscribe(|n| {
//!     assert_eq!(*n, 7);
//!     Ok(())
//! }).expect("subscribe");
//!
//! let report = channel.publish(&7);
//! assert_eq!(report.delivered, 1);
//! assert!(channel.unsubscribe(id).expect("unsubscribe"));
//! ```

use crate::error::{constants, NetworkError, Result};
use crate::protocol::message::{
    ActionRejected, ActorCastEvent, CancelCast, CastStartEvent, DirectorUpdate,
    EnvironmentControlEvent, PendingActionRequest, TargetIcon, Tether, TetherCancel,
    WaymarkUpdate,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::warn;

type HandlerFn<E> = dyn Fn(&E) -> Result<()> + Send + Sync + 'static;

/// Handle returned by [`Channel::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Outcome of a single publish
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Subscribers that returned `Ok`
    pub delivered: usize,
    /// Subscribers that returned an error or panicked
    pub failed: usize,
}

impl PublishReport {
    fn merge(&mut self, other: PublishReport) {
        self.delivered += other.delivered;
        self.failed += other.failed;
    }
}

/// Synchronous multicast channel for one event type
pub struct Channel<E> {
    name: &'static str,
    next_id: AtomicU64,
    subscribers: RwLock<Vec<(SubscriptionId, Arc<HandlerFn<E>>)>>,
}

impl<E> std::fmt::Debug for Channel<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<E> Channel<E> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            next_id: AtomicU64::new(1),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Add a subscriber; it receives events after all earlier subscribers
    pub fn subscribe<F>(&self, handler: F) -> Result<SubscriptionId>
    where
        F: Fn(&E) -> Result<()> + Send + Sync + 'static,
    {
        let mut subscribers = self
            .subscribers
            .write()
            .map_err(|_| NetworkError::LockPoisoned(constants::ERR_CHANNEL_WRITE_LOCK))?;

        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        subscribers.push((id, Arc::new(handler)));
        Ok(id)
    }

    /// Remove a subscriber. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool> {
        let mut subscribers = self
            .subscribers
            .write()
            .map_err(|_| NetworkError::LockPoisoned(constants::ERR_CHANNEL_WRITE_LOCK))?;

        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        Ok(subscribers.len() != before)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Deliver `event` to every current subscriber, in subscription order.
    ///
    /// The subscriber list is snapshotted first, so handlers may subscribe or
    /// unsubscribe while being called; such changes apply from the next event.
    pub fn publish(&self, event: &E) -> PublishReport {
        let handlers: Vec<(SubscriptionId, Arc<HandlerFn<E>>)> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, handler)| (*id, Arc::clone(handler)))
            .collect();

        let mut report = PublishReport::default();
        for (id, handler) in handlers {
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    report.failed += 1;
                    warn!(channel = self.name, subscription = id.0, error = %e, "Subscriber failed");
                }
                Err(_) => {
                    report.failed += 1;
                    warn!(
                        channel = self.name,
                        subscription = id.0,
                        "{}",
                        constants::ERR_SUBSCRIBER_PANICKED
                    );
                }
            }
        }
        report
    }

    /// Publish each event in order
    pub fn publish_all<'a, I>(&self, events: I) -> PublishReport
    where
        I: IntoIterator<Item = &'a E>,
        E: 'a,
    {
        let mut report = PublishReport::default();
        for event in events {
            report.merge(self.publish(event));
        }
        report
    }
}

/// Every event channel the decoder publishes to
#[derive(Debug)]
pub struct EventBus {
    pub action_effect: Channel<ActorCastEvent>,
    pub cast_start: Channel<CastStartEvent>,
    pub cancel_cast: Channel<CancelCast>,
    pub target_icon: Channel<TargetIcon>,
    pub tether: Channel<Tether>,
    pub tether_cancel: Channel<TetherCancel>,
    pub action_rejected: Channel<ActionRejected>,
    pub director_update: Channel<DirectorUpdate>,
    pub environment_control: Channel<EnvironmentControlEvent>,
    pub waymark: Channel<WaymarkUpdate>,
    pub action_request: Channel<PendingActionRequest>,
    pub action_request_ground_targeted: Channel<PendingActionRequest>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            action_effect: Channel::new("action_effect"),
            cast_start: Channel::new("cast_start"),
            cancel_cast: Channel::new("cancel_cast"),
            target_icon: Channel::new("target_icon"),
            tether: Channel::new("tether"),
            tether_cancel: Channel::new("tether_cancel"),
            action_rejected: Channel::new("action_rejected"),
            director_update: Channel::new("director_update"),
            environment_control: Channel::new("environment_control"),
            waymark: Channel::new("waymark"),
            action_request: Channel::new("action_request"),
            action_request_ground_targeted: Channel::new("action_request_ground_targeted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn zero_subscribers_is_a_no_op() {
        let channel: Channel<u8> = Channel::new("empty");
        assert_eq!(channel.publish(&1), PublishReport::default());
    }

    #[test]
    fn delivery_follows_subscription_order() {
        let channel: Channel<u8> = Channel::new("ordered");
        let log = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            channel
                .subscribe(move |_| {
                    log.lock().unwrap().push(tag);
                    Ok(())
                })
                .unwrap();
        }
        channel.publish(&0);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let channel: Channel<u8> = Channel::new("unsub");
        let hits = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&hits);
        let id = channel
            .subscribe(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();

        channel.publish(&0);
        assert!(channel.unsubscribe(id).unwrap());
        assert!(!channel.unsubscribe(id).unwrap());
        channel.publish(&0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn failing_subscribers_do_not_block_others() {
        let channel: Channel<u8> = Channel::new("isolated");
        let hits = Arc::new(AtomicU64::new(0));

        channel
            .subscribe(|_| Err(NetworkError::Subscriber("boom".to_string())))
            .unwrap();
        channel.subscribe(|_| panic!("subscriber panic")).unwrap();
        let counter = Arc::clone(&hits);
        channel
            .subscribe(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();

        let report = channel.publish(&3);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscribing_from_inside_a_handler_applies_next_time() {
        let channel: Arc<Channel<u8>> = Arc::new(Channel::new("reentrant"));
        let inner = Arc::clone(&channel);
        channel
            .subscribe(move |_| {
                inner.subscribe(|_| Ok(()))?;
                Ok(())
            })
            .unwrap();

        assert_eq!(channel.publish(&0).delivered, 1);
        assert_eq!(channel.subscriber_count(), 2);
    }

    #[test]
    fn publish_all_merges_reports() {
        let channel: Channel<u8> = Channel::new("batch");
        channel.subscribe(|_| Ok(())).unwrap();
        let report = channel.publish_all(&[1, 2, 3]);
        assert_eq!(report.delivered, 3);
    }
}
