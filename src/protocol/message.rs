//! # Domain Events
//!
//! Typed, direction-free records published to subscribers. Consumers never see
//! raw bytes; everything they need is carried by these types.
//!
//! Action identifiers found here have already been corrected for the
//! identifier delta that was current when the message was decoded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity identifier as carried on the wire
pub type ActorId = u64;

/// Number of opaque effect slots per target
pub const EFFECTS_PER_TARGET: usize = 8;

/// Category tag of an [`ActionId`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    None,
    Spell,
    Item,
    KeyItem,
    Ability,
    General,
    Companion,
    CraftAction,
    MainCommand,
    PetAction,
    Mount,
    PvPAction,
    Waymark,
    ChocoboRaceAbility,
    ChocoboRaceItem,
    SquadronAction,
    Accessory,
    Unknown(u8),
}

impl From<u8> for ActionType {
    fn from(raw: u8) -> Self {
        match raw {
            0 => ActionType::None,
            1 => ActionType::Spell,
            2 => ActionType::Item,
            3 => ActionType::KeyItem,
            4 => ActionType::Ability,
            5 => ActionType::General,
            6 => ActionType::Companion,
            9 => ActionType::CraftAction,
            10 => ActionType::MainCommand,
            11 => ActionType::PetAction,
            13 => ActionType::Mount,
            14 => ActionType::PvPAction,
            15 => ActionType::Waymark,
            16 => ActionType::ChocoboRaceAbility,
            17 => ActionType::ChocoboRaceItem,
            19 => ActionType::SquadronAction,
            20 => ActionType::Accessory,
            other => ActionType::Unknown(other),
        }
    }
}

impl From<ActionType> for u8 {
    fn from(kind: ActionType) -> Self {
        match kind {
            ActionType::None => 0,
            ActionType::Spell => 1,
            ActionType::Item => 2,
            ActionType::KeyItem => 3,
            ActionType::Ability => 4,
            ActionType::General => 5,
            ActionType::Companion => 6,
            ActionType::CraftAction => 9,
            ActionType::MainCommand => 10,
            ActionType::PetAction => 11,
            ActionType::Mount => 13,
            ActionType::PvPAction => 14,
            ActionType::Waymark => 15,
            ActionType::ChocoboRaceAbility => 16,
            ActionType::ChocoboRaceItem => 17,
            ActionType::SquadronAction => 19,
            ActionType::Accessory => 20,
            ActionType::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Unknown(raw) => write!(f, "Unknown{raw}"),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

/// A game action: the numeric id is meaningless without its type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId {
    pub kind: ActionType,
    pub id: u32,
}

impl ActionId {
    pub fn new(kind: ActionType, id: u32) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}, {:.3}]", self.x, self.y, self.z)
    }
}

/// Placeable field marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Waymark {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Waymark {
    pub const COUNT: usize = 8;

    pub const ALL: [Waymark; Waymark::COUNT] = [
        Waymark::A,
        Waymark::B,
        Waymark::C,
        Waymark::D,
        Waymark::E,
        Waymark::F,
        Waymark::G,
        Waymark::H,
    ];

    /// Waymark for a wire index, `None` when out of range
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Effects landing on one target of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetEffectRecord {
    pub target_id: ActorId,
    /// Opaque effect words in wire order
    pub effects: [u64; EFFECTS_PER_TARGET],
}

/// Resolved action: one per action-effect message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorCastEvent {
    pub caster_id: ActorId,
    pub action: ActionId,
    pub main_target_id: ActorId,
    /// Seconds
    pub animation_lock: f32,
    /// Capacity of the wire variant the event was decoded from
    pub max_targets: u32,
    pub source_sequence: u32,
    pub global_effect_counter: u32,
    /// Facing in degrees, -180..=180
    pub rotation: f32,
    pub targets: Vec<TargetEffectRecord>,
}

/// An actor started casting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CastStartEvent {
    pub actor_id: ActorId,
    pub action: ActionId,
    /// Seconds
    pub cast_time: f32,
    pub target_id: ActorId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelCast {
    pub actor_id: ActorId,
    pub action_id: u32,
    pub interrupted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetIcon {
    pub actor_id: ActorId,
    pub icon_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tether {
    pub actor_id: ActorId,
    pub target_id: ActorId,
    pub tether_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TetherCancel {
    pub actor_id: ActorId,
}

/// The server refused an action the local player requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRejected {
    pub actor_id: ActorId,
    pub action_id: u32,
    /// Echo of [`PendingActionRequest::sequence`]
    pub source_sequence: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorUpdate {
    pub director_id: u32,
    pub update_id: u32,
    pub params: [u32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub actor_id: ActorId,
    pub status_id: u32,
}

/// Decoded actor-control message, one variant per handled category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorControlEvent {
    CancelCast(CancelCast),
    TargetIcon(TargetIcon),
    Tether(Tether),
    TetherCancel(TetherCancel),
    SelfActionRejected(ActionRejected),
    SelfDirectorUpdate(DirectorUpdate),
    /// Diagnostic only, never published
    GainEffect(StatusChange),
    /// Diagnostic only, never published
    LoseEffect(StatusChange),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentControlEvent {
    pub director_id: u32,
    pub index: u8,
    pub state: u32,
}

/// A waymark was placed (`Some`) or cleared (`None`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaymarkUpdate {
    pub waymark: Waymark,
    pub position: Option<Vec3>,
}

/// An action the local player asked the server to execute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingActionRequest {
    pub action: ActionId,
    /// 0 for ground-targeted requests
    pub target_id: ActorId,
    pub sequence: u32,
    /// Ground location, only for ground-targeted requests
    pub location: Option<Vec3>,
}
