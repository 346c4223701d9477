//! Shared payload builders for integration tests
#![allow(dead_code)]

use zone_net::protocol::layout::{
    action_effect_size, action_effect_targets_offset, ACTION_REQUEST_SIZE, ACTOR_CAST_SIZE,
    ACTOR_CONTROL_SELF_SIZE, ACTOR_CONTROL_SIZE, ENVIRONMENT_CONTROL_SIZE, PRESET_WAYMARK_SIZE,
    WAYMARK_SIZE,
};

pub const AE1: u16 = 0x03CA;
pub const AE8: u16 = 0x0339;
pub const AE16: u16 = 0x0173;
pub const AE24: u16 = 0x0395;
pub const AE32: u16 = 0x0089;
pub const ACTOR_CAST: u16 = 0x0196;
pub const ACTOR_CONTROL: u16 = 0x0278;
pub const ACTOR_CONTROL_SELF: u16 = 0x02B1;
pub const ENVIRONMENT_CONTROL: u16 = 0x02A4;
pub const WAYMARK: u16 = 0x0254;
pub const PRESET_WAYMARK: u16 = 0x02E9;
pub const ACTION_REQUEST: u16 = 0x02DC;
pub const ACTION_REQUEST_GT: u16 = 0x0278;

pub const SPELL: u8 = 1;
pub const ABILITY: u8 = 4;

/// Zeroed buffer written little-endian at absolute offsets
#[derive(Debug, Clone)]
pub struct Payload(Vec<u8>);

impl Payload {
    pub fn zeroed(len: usize) -> Self {
        Self(vec![0; len])
    }

    pub fn u8(mut self, at: usize, v: u8) -> Self {
        self.0[at] = v;
        self
    }

    pub fn u16(self, at: usize, v: u16) -> Self {
        self.bytes(at, &v.to_le_bytes())
    }

    pub fn u32(self, at: usize, v: u32) -> Self {
        self.bytes(at, &v.to_le_bytes())
    }

    pub fn i32(self, at: usize, v: i32) -> Self {
        self.bytes(at, &v.to_le_bytes())
    }

    pub fn u64(self, at: usize, v: u64) -> Self {
        self.bytes(at, &v.to_le_bytes())
    }

    pub fn f32(self, at: usize, v: f32) -> Self {
        self.bytes(at, &v.to_le_bytes())
    }

    pub fn bytes(mut self, at: usize, v: &[u8]) -> Self {
        self.0[at..at + v.len()].copy_from_slice(v);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.0
    }
}

/// Action-effect payload; `targets` fills slots in order, up to `capacity`
pub fn action_effect(
    capacity: usize,
    action_type: u8,
    action_id: u32,
    animation_id: u16,
    num_targets: u8,
    targets: &[u64],
) -> Payload {
    let base = action_effect_targets_offset(capacity);
    let mut p = Payload::zeroed(action_effect_size(capacity))
        .u64(0x00, 0x1000_0099)
        .u32(0x08, action_id)
        .u32(0x0C, 314)
        .f32(0x10, 0.6)
        .u16(0x18, 21)
        .u16(0x1A, 0x8000)
        .u16(0x1C, animation_id)
        .u8(0x1F, action_type)
        .u8(0x21, num_targets);
    for (slot, id) in targets.iter().take(capacity).enumerate() {
        p = p.u64(base + slot * 8, *id);
    }
    p
}

/// Offset of effect word `j` for target slot `slot`
pub fn effect_offset(slot: usize, j: usize) -> usize {
    0x2A + (slot * 8 + j) * 8
}

pub fn actor_cast(action_type: u8, action_id: u16, cast_time: f32, target: u32) -> Vec<u8> {
    Payload::zeroed(ACTOR_CAST_SIZE)
        .u16(0x00, action_id)
        .u8(0x02, action_type)
        .f32(0x08, cast_time)
        .u32(0x0C, target)
        .build()
}

pub fn actor_control(category: u16, params: [u32; 5]) -> Vec<u8> {
    let mut p = Payload::zeroed(ACTOR_CONTROL_SIZE).u16(0x00, category);
    for (i, v) in params.iter().enumerate() {
        p = p.u32(0x04 + i * 4, *v);
    }
    p.build()
}

pub fn actor_control_self(category: u16, params: [u32; 7]) -> Vec<u8> {
    let mut p = Payload::zeroed(ACTOR_CONTROL_SELF_SIZE).u16(0x00, category);
    for (i, v) in params.iter().enumerate() {
        p = p.u32(0x04 + i * 4, *v);
    }
    p.build()
}

pub fn environment_control(director_id: u32, state: u32, index: u8) -> Vec<u8> {
    Payload::zeroed(ENVIRONMENT_CONTROL_SIZE)
        .u32(0x00, director_id)
        .u32(0x04, state)
        .u8(0x08, index)
        .build()
}

pub fn waymark(index: u8, active: bool, position: [i32; 3]) -> Vec<u8> {
    Payload::zeroed(WAYMARK_SIZE)
        .u8(0x00, index)
        .u8(0x01, active as u8)
        .i32(0x04, position[0])
        .i32(0x08, position[1])
        .i32(0x0C, position[2])
        .build()
}

pub fn preset_waymark(mask: u8, positions: [[i32; 3]; 8]) -> Vec<u8> {
    let mut p = Payload::zeroed(PRESET_WAYMARK_SIZE).u8(0x00, mask);
    for (i, [x, y, z]) in positions.iter().enumerate() {
        p = p
            .i32(0x04 + i * 4, *x)
            .i32(0x24 + i * 4, *y)
            .i32(0x44 + i * 4, *z);
    }
    p.build()
}

pub fn action_request(action_type: u8, action_id: u32, sequence: u16, target: u64) -> Vec<u8> {
    Payload::zeroed(ACTION_REQUEST_SIZE)
        .u8(0x01, action_type)
        .u32(0x04, action_id)
        .u16(0x08, sequence)
        .u64(0x10, target)
        .build()
}

pub fn ground_action_request(
    action_type: u8,
    action_id: u32,
    sequence: u16,
    location: [f32; 3],
) -> Vec<u8> {
    Payload::zeroed(ACTION_REQUEST_SIZE)
        .u8(0x01, action_type)
        .u32(0x04, action_id)
        .u16(0x08, sequence)
        .f32(0x10, location[0])
        .f32(0x14, location[1])
        .f32(0x18, location[2])
        .build()
}

/// Prefix a payload with a server IPC header
pub fn server_segment(opcode: u16, epoch: u32, payload: &[u8]) -> Vec<u8> {
    let mut segment = Payload::zeroed(0x10)
        .u16(0x02, opcode)
        .u32(0x08, epoch)
        .build();
    segment.extend_from_slice(payload);
    segment
}

/// Client segment with the opcode up front and the payload at 0x20
pub fn client_segment(opcode: u16, payload: &[u8]) -> Vec<u8> {
    let mut segment = Payload::zeroed(0x20).u16(0x00, opcode).build();
    segment.extend_from_slice(payload);
    segment
}
