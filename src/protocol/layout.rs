//! # Wire Layouts
//!
//! Fixed payload layouts and the routines that read them into typed records.
//!
//! Records mirror the wire exactly: identifiers are still encoded and unknown
//! fields are kept for the diagnostic formatter. Turning records into events
//! (and correcting identifiers) is [`crate::protocol::decoder`]'s job.
//!
//! ## Action-effect layout
//! ```text
//! 0x00                header (0x2A bytes)
//! 0x2A                effects: [u64; N * 8], flat, addressed by slot * 8 + j
//! 0x30 + N * 0x40     target ids: [u64; N]
//! 0x30 + N * 0x48     effect flags: u32, u16, padding (N > 1 only)
//! ```
//! `N` is the variant capacity, one of 1, 8, 16, 24 or 32.

use crate::core::reader::WireReader;
use crate::error::Result;
use crate::protocol::message::{ActionType, EFFECTS_PER_TARGET};

pub const ACTION_EFFECT_HEADER_SIZE: usize = 0x2A;
pub const ACTION_EFFECT_EFFECTS_OFFSET: usize = ACTION_EFFECT_HEADER_SIZE;
pub const ACTOR_CAST_SIZE: usize = 0x20;
pub const ACTOR_CONTROL_SIZE: usize = 0x18;
pub const ACTOR_CONTROL_SELF_SIZE: usize = 0x20;
pub const ENVIRONMENT_CONTROL_SIZE: usize = 0x10;
pub const WAYMARK_SIZE: usize = 0x10;
pub const PRESET_WAYMARK_SIZE: usize = 0x64;
pub const ACTION_REQUEST_SIZE: usize = 0x20;

/// Waymark coordinates are sent in thousandths
pub const COORDINATE_SCALE: f32 = 1000.0;

/// Offset of the target id array for a variant of `capacity` targets
pub const fn action_effect_targets_offset(capacity: usize) -> usize {
    0x30 + capacity * 0x40
}

/// Total payload size of an action-effect variant.
/// The single-target variant has no effect-flags block, only a trailing u32.
pub const fn action_effect_size(capacity: usize) -> usize {
    if capacity == 1 {
        0x7C
    } else {
        0x30 + capacity * 0x48 + 12
    }
}

/// Actor-control categories the decoder understands
pub mod category {
    pub const CANCEL_CAST: u16 = 15;
    pub const COOLDOWN: u16 = 17;
    pub const GAIN_EFFECT: u16 = 20;
    pub const LOSE_EFFECT: u16 = 21;
    pub const TARGET_ICON: u16 = 34;
    pub const TETHER: u16 = 35;
    pub const TETHER_CANCEL: u16 = 47;
    pub const DIRECTOR_UPDATE: u16 = 109;
    pub const ACTION_REJECTED: u16 = 700;

    pub fn name(category: u16) -> Option<&'static str> {
        Some(match category {
            CANCEL_CAST => "CancelCast",
            COOLDOWN => "Cooldown",
            GAIN_EFFECT => "GainEffect",
            LOSE_EFFECT => "LoseEffect",
            TARGET_ICON => "TargetIcon",
            TETHER => "Tether",
            TETHER_CANCEL => "TetherCancel",
            DIRECTOR_UPDATE => "DirectorUpdate",
            ACTION_REJECTED => "ActionRejected",
            _ => return None,
        })
    }
}

/// Signature shared by every layout routine in the dispatch tables
pub type ParseFn = fn(&[u8]) -> Result<WireRecord>;

/// A payload read into its wire shape
#[derive(Debug, Clone, PartialEq)]
pub enum WireRecord {
    ActionEffect(ActionEffectRecord),
    ActorCast(ActorCastRecord),
    ActorControl(ActorControlRecord),
    ActorControlSelf(ActorControlSelfRecord),
    EnvironmentControl(EnvironmentControlRecord),
    Waymark(WaymarkRecord),
    PresetWaymark(PresetWaymarkRecord),
    ActionRequest(ActionRequestRecord),
    ActionRequestGroundTargeted(GroundActionRequestRecord),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionEffectHeader {
    pub animation_target_id: u64,
    /// Encoded, still carries the identifier delta
    pub action_id: u32,
    pub global_effect_counter: u32,
    pub animation_lock: f32,
    pub some_target_id: u32,
    pub source_sequence: u16,
    pub rotation: u16,
    /// True id for spell-type actions
    pub action_animation_id: u16,
    pub variation: u8,
    pub action_type: ActionType,
    pub unknown20: u8,
    pub num_targets: u8,
}

impl ActionEffectHeader {
    fn read(r: &WireReader<'_>) -> Self {
        Self {
            animation_target_id: r.u64_at(0x00),
            action_id: r.u32_at(0x08),
            global_effect_counter: r.u32_at(0x0C),
            animation_lock: r.f32_at(0x10),
            some_target_id: r.u32_at(0x14),
            source_sequence: r.u16_at(0x18),
            rotation: r.u16_at(0x1A),
            action_animation_id: r.u16_at(0x1C),
            variation: r.u8_at(0x1E),
            action_type: ActionType::from(r.u8_at(0x1F)),
            unknown20: r.u8_at(0x20),
            num_targets: r.u8_at(0x21),
        }
    }

    /// Facing in degrees: 0 maps to -180, 65535 to +180
    pub fn rotation_degrees(&self) -> f32 {
        rotation_degrees(self.rotation)
    }
}

pub fn rotation_degrees(raw: u16) -> f32 {
    raw as f32 / 65535.0 * 360.0 - 180.0
}

/// A non-empty target slot; `slot` is the raw array position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSlot {
    pub slot: usize,
    pub target_id: u64,
    pub effects: [u64; EFFECTS_PER_TARGET],
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionEffectRecord {
    pub header: ActionEffectHeader,
    pub capacity: usize,
    /// Present targets in slot order; zero ids are skipped
    pub targets: Vec<TargetSlot>,
    pub effect_flags1: u32,
    pub effect_flags2: u16,
}

fn effect_kind(capacity: usize) -> &'static str {
    match capacity {
        1 => "ActionEffect1",
        8 => "ActionEffect8",
        16 => "ActionEffect16",
        24 => "ActionEffect24",
        _ => "ActionEffect32",
    }
}

/// Shared decode for all five action-effect variants
pub fn parse_action_effect<const N: usize>(buf: &[u8]) -> Result<WireRecord> {
    let r = WireReader::new(buf, effect_kind(N), action_effect_size(N))?;
    let header = ActionEffectHeader::read(&r);
    let targets_offset = action_effect_targets_offset(N);

    // over-declared counts are clamped, never rejected
    let count = (header.num_targets as usize).min(N);
    let mut targets = Vec::with_capacity(count);
    for slot in 0..count {
        let target_id = r.u64_elem(targets_offset, slot);
        if target_id == 0 {
            continue;
        }
        let mut effects = [0u64; EFFECTS_PER_TARGET];
        for (j, effect) in effects.iter_mut().enumerate() {
            *effect = r.u64_elem(
                ACTION_EFFECT_EFFECTS_OFFSET,
                slot * EFFECTS_PER_TARGET + j,
            );
        }
        targets.push(TargetSlot {
            slot,
            target_id,
            effects,
        });
    }

    let (effect_flags1, effect_flags2) = if N > 1 {
        let flags_offset = targets_offset + N * 8;
        (r.u32_at(flags_offset), r.u16_at(flags_offset + 4))
    } else {
        (0, 0)
    };

    Ok(WireRecord::ActionEffect(ActionEffectRecord {
        header,
        capacity: N,
        targets,
        effect_flags1,
        effect_flags2,
    }))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorCastRecord {
    /// Encoded
    pub action_id: u16,
    pub action_type: ActionType,
    pub unknown: u8,
    pub unknown1: u32,
    pub cast_time: f32,
    pub target_id: u32,
    pub rotation: u16,
    pub flags: u16,
    pub unknown2: u32,
    pub position: [u16; 3],
    pub unknown3: u16,
}

pub fn parse_actor_cast(buf: &[u8]) -> Result<WireRecord> {
    let r = WireReader::new(buf, "ActorCast", ACTOR_CAST_SIZE)?;
    Ok(WireRecord::ActorCast(ActorCastRecord {
        action_id: r.u16_at(0x00),
        action_type: ActionType::from(r.u8_at(0x02)),
        unknown: r.u8_at(0x03),
        unknown1: r.u32_at(0x04),
        cast_time: r.f32_at(0x08),
        target_id: r.u32_at(0x0C),
        rotation: r.u16_at(0x10),
        flags: r.u16_at(0x12),
        unknown2: r.u32_at(0x14),
        position: [r.u16_at(0x18), r.u16_at(0x1A), r.u16_at(0x1C)],
        unknown3: r.u16_at(0x1E),
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorControlRecord {
    pub category: u16,
    pub unk0: u16,
    /// param1..param5
    pub params: [u32; 5],
}

pub fn parse_actor_control(buf: &[u8]) -> Result<WireRecord> {
    let r = WireReader::new(buf, "ActorControl", ACTOR_CONTROL_SIZE)?;
    let mut params = [0u32; 5];
    for (i, p) in params.iter_mut().enumerate() {
        *p = r.u32_at(0x04 + i * 4);
    }
    Ok(WireRecord::ActorControl(ActorControlRecord {
        category: r.u16_at(0x00),
        unk0: r.u16_at(0x02),
        params,
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorControlSelfRecord {
    pub category: u16,
    pub unk0: u16,
    /// param1..param7
    pub params: [u32; 7],
}

pub fn parse_actor_control_self(buf: &[u8]) -> Result<WireRecord> {
    let r = WireReader::new(buf, "ActorControlSelf", ACTOR_CONTROL_SELF_SIZE)?;
    let mut params = [0u32; 7];
    for (i, p) in params.iter_mut().enumerate() {
        *p = r.u32_at(0x04 + i * 4);
    }
    Ok(WireRecord::ActorControlSelf(ActorControlSelfRecord {
        category: r.u16_at(0x00),
        unk0: r.u16_at(0x02),
        params,
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentControlRecord {
    pub director_id: u32,
    pub state: u32,
    pub index: u8,
    pub u0: u8,
    pub u1: u16,
    pub u2: u32,
}

pub fn parse_environment_control(buf: &[u8]) -> Result<WireRecord> {
    let r = WireReader::new(buf, "EnvironmentControl", ENVIRONMENT_CONTROL_SIZE)?;
    Ok(WireRecord::EnvironmentControl(EnvironmentControlRecord {
        director_id: r.u32_at(0x00),
        state: r.u32_at(0x04),
        index: r.u8_at(0x08),
        u0: r.u8_at(0x09),
        u1: r.u16_at(0x0A),
        u2: r.u32_at(0x0C),
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaymarkRecord {
    pub index: u8,
    pub active: u8,
    pub unknown: u16,
    /// Thousandths
    pub position: [i32; 3],
}

pub fn parse_waymark(buf: &[u8]) -> Result<WireRecord> {
    let r = WireReader::new(buf, "Waymark", WAYMARK_SIZE)?;
    Ok(WireRecord::Waymark(WaymarkRecord {
        index: r.u8_at(0x00),
        active: r.u8_at(0x01),
        unknown: r.u16_at(0x02),
        position: [r.i32_at(0x04), r.i32_at(0x08), r.i32_at(0x0C)],
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetWaymarkRecord {
    /// Bit i set: waymark i is placed
    pub mask: u8,
    pub x: [i32; 8],
    pub y: [i32; 8],
    pub z: [i32; 8],
}

pub fn parse_preset_waymark(buf: &[u8]) -> Result<WireRecord> {
    let r = WireReader::new(buf, "PresetWaymark", PRESET_WAYMARK_SIZE)?;
    let mut rec = PresetWaymarkRecord {
        mask: r.u8_at(0x00),
        x: [0; 8],
        y: [0; 8],
        z: [0; 8],
    };
    for i in 0..8 {
        rec.x[i] = r.i32_elem(0x04, i);
        rec.y[i] = r.i32_elem(0x24, i);
        rec.z[i] = r.i32_elem(0x44, i);
    }
    Ok(WireRecord::PresetWaymark(rec))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRequestRecord {
    pub u0: u8,
    pub action_type: ActionType,
    pub u1: u16,
    pub action_id: u32,
    pub sequence: u16,
    pub u2: u16,
    pub u3: u32,
    pub target_id: u64,
    pub item_source_slot: u16,
    pub item_source_container: u16,
    pub u5: u32,
}

pub fn parse_action_request(buf: &[u8]) -> Result<WireRecord> {
    let r = WireReader::new(buf, "ActionRequest", ACTION_REQUEST_SIZE)?;
    Ok(WireRecord::ActionRequest(ActionRequestRecord {
        u0: r.u8_at(0x00),
        action_type: ActionType::from(r.u8_at(0x01)),
        u1: r.u16_at(0x02),
        action_id: r.u32_at(0x04),
        sequence: r.u16_at(0x08),
        u2: r.u16_at(0x0A),
        u3: r.u32_at(0x0C),
        target_id: r.u64_at(0x10),
        item_source_slot: r.u16_at(0x18),
        item_source_container: r.u16_at(0x1A),
        u5: r.u32_at(0x1C),
    }))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundActionRequestRecord {
    pub u0: u8,
    pub action_type: ActionType,
    pub u1: u16,
    pub action_id: u32,
    pub sequence: u16,
    pub u2: u16,
    pub u3: u32,
    pub location: [f32; 3],
    pub u4: u32,
}

pub fn parse_action_request_ground_targeted(buf: &[u8]) -> Result<WireRecord> {
    let r = WireReader::new(buf, "ActionRequestGroundTargeted", ACTION_REQUEST_SIZE)?;
    Ok(WireRecord::ActionRequestGroundTargeted(
        GroundActionRequestRecord {
            u0: r.u8_at(0x00),
            action_type: ActionType::from(r.u8_at(0x01)),
            u1: r.u16_at(0x02),
            action_id: r.u32_at(0x04),
            sequence: r.u16_at(0x08),
            u2: r.u16_at(0x0A),
            u3: r.u32_at(0x0C),
            location: [r.f32_at(0x10), r.f32_at(0x14), r.f32_at(0x18)],
            u4: r.u32_at(0x1C),
        },
    ))
}
