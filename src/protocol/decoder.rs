//! # Message Decoder
//!
//! Turns wire records into domain events. This is the only place identifier
//! correction is applied, and the decoder owns the corrector so the delta is
//! instance state rather than a process global.

use crate::protocol::corrector::IdentifierCorrector;
use crate::protocol::layout::{
    category, ActionEffectRecord, ActorCastRecord, ActorControlRecord, ActorControlSelfRecord,
    PresetWaymarkRecord, WaymarkRecord, WireRecord, COORDINATE_SCALE,
};
use crate::protocol::message::{
    ActionId, ActionRejected, ActionType, ActorCastEvent, ActorControlEvent, ActorId, CancelCast,
    CastStartEvent, DirectorUpdate, EnvironmentControlEvent, PendingActionRequest, StatusChange,
    TargetEffectRecord, TargetIcon, Tether, TetherCancel, Vec3, Waymark, WaymarkUpdate,
};

/// Result of decoding one message
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedMessage {
    ActionEffect(ActorCastEvent),
    CastStart(CastStartEvent),
    Control(ActorControlEvent),
    EnvironmentControl(EnvironmentControlEvent),
    Waymarks(Vec<WaymarkUpdate>),
    ActionRequest(PendingActionRequest),
    ActionRequestGroundTargeted(PendingActionRequest),
}

#[derive(Debug, Default)]
pub struct MessageDecoder {
    corrector: IdentifierCorrector,
}

impl MessageDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn corrector(&self) -> &IdentifierCorrector {
        &self.corrector
    }

    /// Decode `record`, which arrived concerning `actor_id`.
    ///
    /// Returns `None` when the message carries nothing to publish: an
    /// unhandled control category or an out-of-range waymark index.
    pub fn decode(&mut self, record: &WireRecord, actor_id: ActorId) -> Option<DecodedMessage> {
        match record {
            WireRecord::ActionEffect(rec) => {
                Some(DecodedMessage::ActionEffect(self.action_effect(rec, actor_id)))
            }
            WireRecord::ActorCast(rec) => {
                Some(DecodedMessage::CastStart(self.cast_start(rec, actor_id)))
            }
            WireRecord::ActorControl(rec) => self
                .actor_control(rec, actor_id)
                .map(DecodedMessage::Control),
            WireRecord::ActorControlSelf(rec) => {
                actor_control_self(rec, actor_id).map(DecodedMessage::Control)
            }
            WireRecord::EnvironmentControl(rec) => {
                Some(DecodedMessage::EnvironmentControl(EnvironmentControlEvent {
                    director_id: rec.director_id,
                    index: rec.index,
                    state: rec.state,
                }))
            }
            WireRecord::Waymark(rec) => {
                waymark(rec).map(|update| DecodedMessage::Waymarks(vec![update]))
            }
            WireRecord::PresetWaymark(rec) => {
                Some(DecodedMessage::Waymarks(preset_waymarks(rec)))
            }
            WireRecord::ActionRequest(rec) => {
                Some(DecodedMessage::ActionRequest(PendingActionRequest {
                    action: self.action_id(rec.action_type, rec.action_id),
                    target_id: rec.target_id,
                    sequence: rec.sequence as u32,
                    location: None,
                }))
            }
            WireRecord::ActionRequestGroundTargeted(rec) => {
                let [x, y, z] = rec.location;
                Some(DecodedMessage::ActionRequestGroundTargeted(PendingActionRequest {
                    action: self.action_id(rec.action_type, rec.action_id),
                    target_id: 0,
                    sequence: rec.sequence as u32,
                    location: Some(Vec3::new(x, y, z)),
                }))
            }
        }
    }

    fn action_id(&self, kind: ActionType, encoded: u32) -> ActionId {
        ActionId::new(kind, self.corrector.correct(encoded))
    }

    fn action_effect(&mut self, rec: &ActionEffectRecord, caster_id: ActorId) -> ActorCastEvent {
        let header = &rec.header;
        if header.action_type == ActionType::Spell {
            self.corrector
                .observe_spell_effect(header.action_id, header.action_animation_id);
        }

        ActorCastEvent {
            caster_id,
            action: self.action_id(header.action_type, header.action_id),
            main_target_id: header.animation_target_id,
            animation_lock: header.animation_lock,
            max_targets: rec.capacity as u32,
            source_sequence: header.source_sequence as u32,
            global_effect_counter: header.global_effect_counter,
            rotation: header.rotation_degrees(),
            targets: rec
                .targets
                .iter()
                .map(|t| TargetEffectRecord {
                    target_id: t.target_id,
                    effects: t.effects,
                })
                .collect(),
        }
    }

    fn cast_start(&self, rec: &ActorCastRecord, actor_id: ActorId) -> CastStartEvent {
        CastStartEvent {
            actor_id,
            action: self.action_id(rec.action_type, rec.action_id as u32),
            cast_time: rec.cast_time,
            target_id: rec.target_id as ActorId,
        }
    }

    fn actor_control(
        &self,
        rec: &ActorControlRecord,
        actor_id: ActorId,
    ) -> Option<ActorControlEvent> {
        let [p1, p2, p3, p4, _] = rec.params;
        Some(match rec.category {
            category::CANCEL_CAST => ActorControlEvent::CancelCast(CancelCast {
                actor_id,
                action_id: p3,
                interrupted: p4 == 1,
            }),
            category::TARGET_ICON => ActorControlEvent::TargetIcon(TargetIcon {
                actor_id,
                icon_id: self.corrector.correct(p1),
            }),
            category::TETHER => ActorControlEvent::Tether(Tether {
                actor_id,
                target_id: p3 as ActorId,
                tether_id: p2,
            }),
            category::TETHER_CANCEL => ActorControlEvent::TetherCancel(TetherCancel { actor_id }),
            category::GAIN_EFFECT => ActorControlEvent::GainEffect(StatusChange {
                actor_id,
                status_id: p1,
            }),
            category::LOSE_EFFECT => ActorControlEvent::LoseEffect(StatusChange {
                actor_id,
                status_id: p1,
            }),
            _ => return None,
        })
    }
}

fn actor_control_self(
    rec: &ActorControlSelfRecord,
    actor_id: ActorId,
) -> Option<ActorControlEvent> {
    let [p1, p2, p3, p4, p5, p6, _] = rec.params;
    match rec.category {
        category::ACTION_REJECTED => Some(ActorControlEvent::SelfActionRejected(ActionRejected {
            actor_id,
            action_id: p3,
            source_sequence: p6,
        })),
        category::DIRECTOR_UPDATE => Some(ActorControlEvent::SelfDirectorUpdate(DirectorUpdate {
            director_id: p1,
            update_id: p2,
            params: [p3, p4, p5, p6],
        })),
        _ => None,
    }
}

fn scaled(raw: [i32; 3]) -> Vec3 {
    Vec3::new(
        raw[0] as f32 / COORDINATE_SCALE,
        raw[1] as f32 / COORDINATE_SCALE,
        raw[2] as f32 / COORDINATE_SCALE,
    )
}

fn waymark(rec: &WaymarkRecord) -> Option<WaymarkUpdate> {
    let waymark = Waymark::from_index(rec.index)?;
    Some(WaymarkUpdate {
        waymark,
        position: (rec.active != 0).then(|| scaled(rec.position)),
    })
}

fn preset_waymarks(rec: &PresetWaymarkRecord) -> Vec<WaymarkUpdate> {
    Waymark::ALL
        .iter()
        .map(|&waymark| {
            let i = waymark.index();
            WaymarkUpdate {
                waymark,
                position: (rec.mask & (1 << i) != 0)
                    .then(|| scaled([rec.x[i], rec.y[i], rec.z[i]])),
            }
        })
        .collect()
}
