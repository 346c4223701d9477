//! # Network Service
//!
//! Intake boundary of the decoder. A capture hook hands every zone message to
//! [`NetworkService::handle`], which routes it, optionally dumps it, decodes it
//! and publishes the resulting events before returning.
//!
//! `handle` takes `&mut self`: messages are processed one at a time, and the
//! identifier delta a message observes is the one it is corrected with. Hosts
//! that capture on several threads share the service behind a `Mutex`.

use crate::config::{DecoderConfig, DiagnosticsConfig};
use crate::core::ipc::RawMessage;
use crate::error::{NetworkError, Result};
use crate::protocol::decoder::{DecodedMessage, MessageDecoder};
use crate::protocol::dispatcher::Dispatcher;
use crate::protocol::layout::WireRecord;
use crate::protocol::message::{ActorControlEvent, ActorId};
use crate::protocol::opcode::{Direction, MessageKind};
use crate::service::events::{EventBus, PublishReport};
use crate::utils::diagnostics;
use crate::utils::logging::DUMP_TARGET;
use crate::utils::metrics::Metrics;
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// What happened to one message handed to [`NetworkService::handle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleOutcome {
    /// No route for the opcode in the message's direction
    Unrecognized,
    /// Recognized and parsed, but carried nothing to publish
    Dropped,
    /// This many events were published
    Published(usize),
}

/// Something that feeds captured segments into the service.
///
/// Attaching happens once at startup; there is no retry.
pub trait CaptureSource {
    fn name(&self) -> &str;

    fn attach(&mut self) -> Result<()>;
}

#[derive(Debug)]
pub struct NetworkService {
    dispatcher: Dispatcher,
    decoder: MessageDecoder,
    diagnostics: DiagnosticsConfig,
    events: Arc<EventBus>,
    metrics: Arc<Metrics>,
}

impl NetworkService {
    pub fn new(config: DecoderConfig) -> Result<Self> {
        config.validate_strict()?;
        let dispatcher = Dispatcher::from_config(&config.opcodes)?;
        info!(
            server_routes = dispatcher.len(Direction::ServerToClient),
            client_routes = dispatcher.len(Direction::ClientToServer),
            dump_server = config.diagnostics.dump_server_messages,
            dump_client = config.diagnostics.dump_client_messages,
            "Network service ready"
        );

        Ok(Self {
            dispatcher,
            decoder: MessageDecoder::new(),
            diagnostics: config.diagnostics,
            events: Arc::new(EventBus::new()),
            metrics: Arc::new(Metrics::new()),
        })
    }

    /// Channels to subscribe on. Shared, so it can outlive a borrow of the service.
    pub fn events(&self) -> Arc<EventBus> {
        Arc::clone(&self.events)
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Current identifier delta
    pub fn identifier_delta(&self) -> i32 {
        self.decoder.corrector().delta()
    }

    /// Attach a capture source. Failure is fatal for the host.
    pub fn attach<S>(&self, source: &mut S) -> Result<()>
    where
        S: CaptureSource + ?Sized,
    {
        match source.attach() {
            Ok(()) => {
                info!(source = source.name(), "Capture source attached");
                Ok(())
            }
            Err(e) => {
                error!(source = source.name(), error = %e, "Failed to attach capture source");
                Err(NetworkError::IntakeUnavailable {
                    source_name: source.name().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Swap in a new configuration. Routes and dump switches are replaced;
    /// the identifier delta and existing subscriptions are kept.
    pub fn apply_config(&mut self, config: DecoderConfig) -> Result<()> {
        config.validate_strict()?;
        self.dispatcher = Dispatcher::from_config(&config.opcodes)?;
        self.diagnostics = config.diagnostics;
        info!(
            delta = self.identifier_delta(),
            dump_server = self.diagnostics.dump_server_messages,
            dump_client = self.diagnostics.dump_client_messages,
            "Decoder configuration reloaded"
        );
        Ok(())
    }

    /// Frame and handle a server segment that still carries its IPC header
    pub fn handle_server_segment(
        &mut self,
        segment: &[u8],
        target_actor_id: u32,
    ) -> Result<HandleOutcome> {
        let msg = RawMessage::from_server_segment(segment, target_actor_id)?;
        self.handle(msg)
    }

    /// Frame and handle a client segment
    pub fn handle_client_segment(&mut self, segment: &[u8]) -> Result<HandleOutcome> {
        let msg = RawMessage::from_client_segment(segment)?;
        self.handle(msg)
    }

    /// Route, decode and publish one message.
    ///
    /// Every subscriber has run by the time this returns. Subscriber failures
    /// are counted, never returned; the only error is a payload shorter than
    /// its layout.
    pub fn handle(&mut self, msg: RawMessage<'_>) -> Result<HandleOutcome> {
        self.metrics.message_received(msg.direction);
        let dump = self.dump_enabled(msg.direction);

        let Some(route) = self.dispatcher.route(msg.direction, msg.opcode).copied() else {
            if dump {
                self.dump(&msg, None, None);
            }
            self.metrics.message_unrecognized();
            trace!(direction = %msg.direction, opcode = msg.opcode, "Unrecognized opcode");
            return Ok(HandleOutcome::Unrecognized);
        };

        let record = match (route.parse)(msg.payload) {
            Ok(record) => record,
            Err(e) => {
                if dump {
                    self.dump(&msg, Some(route.kind), None);
                }
                self.metrics.message_truncated();
                warn!(kind = %route.kind, opcode = msg.opcode, error = %e, "Dropping malformed message");
                return Err(e);
            }
        };

        if dump {
            self.dump(&msg, Some(route.kind), Some(&record));
        }
        self.metrics.message_decoded();

        let before = self.identifier_delta();
        let decoded = self.decoder.decode(&record, msg.target_actor_id as ActorId);
        if self.identifier_delta() != before {
            self.metrics.delta_updated();
        }

        let Some(decoded) = decoded else {
            self.metrics.message_dropped();
            debug!(kind = %route.kind, "Message carried nothing to publish");
            return Ok(HandleOutcome::Dropped);
        };

        match self.publish(decoded) {
            Some((count, report)) => {
                self.metrics.events_published(count as u64);
                self.metrics.subscriber_failures(report.failed as u64);
                Ok(HandleOutcome::Published(count))
            }
            None => {
                self.metrics.message_dropped();
                Ok(HandleOutcome::Dropped)
            }
        }
    }

    fn dump_enabled(&self, direction: Direction) -> bool {
        match direction {
            Direction::ServerToClient => self.diagnostics.dump_server_messages,
            Direction::ClientToServer => self.diagnostics.dump_client_messages,
        }
    }

    fn dump(&self, msg: &RawMessage<'_>, kind: Option<MessageKind>, record: Option<&WireRecord>) {
        for line in diagnostics::render(msg, kind, record, self.identifier_delta()) {
            info!(target: DUMP_TARGET, "{line}");
        }
    }

    /// Publish on the channel for the event's category.
    /// `None` for categories that are only ever dumped.
    fn publish(&self, decoded: DecodedMessage) -> Option<(usize, PublishReport)> {
        let events = &self.events;
        let report = match decoded {
            DecodedMessage::ActionEffect(event) => events.action_effect.publish(&event),
            DecodedMessage::CastStart(event) => events.cast_start.publish(&event),
            DecodedMessage::Control(control) => match control {
                ActorControlEvent::CancelCast(event) => events.cancel_cast.publish(&event),
                ActorControlEvent::TargetIcon(event) => events.target_icon.publish(&event),
                ActorControlEvent::Tether(event) => events.tether.publish(&event),
                ActorControlEvent::TetherCancel(event) => events.tether_cancel.publish(&event),
                ActorControlEvent::SelfActionRejected(event) => {
                    events.action_rejected.publish(&event)
                }
                ActorControlEvent::SelfDirectorUpdate(event) => {
                    events.director_update.publish(&event)
                }
                ActorControlEvent::GainEffect(_) | ActorControlEvent::LoseEffect(_) => {
                    return None
                }
            },
            DecodedMessage::EnvironmentControl(event) => {
                events.environment_control.publish(&event)
            }
            DecodedMessage::Waymarks(updates) => {
                let report = events.waymark.publish_all(&updates);
                return Some((updates.len(), report));
            }
            DecodedMessage::ActionRequest(event) => events.action_request.publish(&event),
            DecodedMessage::ActionRequestGroundTargeted(event) => {
                events.action_request_ground_targeted.publish(&event)
            }
        };
        Some((1, report))
    }
}
