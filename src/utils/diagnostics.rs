//! Diagnostic dump formatter.
//!
//! Renders captured messages as human-readable lines when the per-direction
//! dump switches are on. Formatting only: nothing here feeds back into decoding.

use crate::core::ipc::RawMessage;
use crate::core::reader::peek_u64;
use crate::protocol::layout::{
    category, rotation_degrees, ActionEffectRecord, ActorCastRecord, ActorControlRecord,
    ActorControlSelfRecord, WireRecord, COORDINATE_SCALE,
};
use crate::protocol::message::{ActionId, ActionType, Waymark};
use crate::protocol::opcode::{Direction, MessageKind};

/// Every line for one message: a header, then record details when parsed
pub fn render(
    msg: &RawMessage<'_>,
    kind: Option<MessageKind>,
    record: Option<&WireRecord>,
    delta: i32,
) -> Vec<String> {
    let mut lines = vec![header_line(msg, kind)];
    if let Some(record) = record {
        lines.extend(record_lines(record, delta));
    }
    lines
}

pub fn header_line(msg: &RawMessage<'_>, kind: Option<MessageKind>) -> String {
    let name = match kind {
        Some(kind) => kind.name().to_string(),
        None => format!("0x{:04X}", msg.opcode),
    };
    match msg.direction {
        Direction::ServerToClient => {
            let epoch = msg
                .epoch
                .map(|epoch| format!(" (epoch={epoch})"))
                .unwrap_or_default();
            let body = match peek_u64(msg.payload) {
                Some(head) => format!("{head:016X}..."),
                None => format!("{} bytes", msg.payload.len()),
            };
            format!(
                "Server message {name} -> {:08X}{epoch}: {body}",
                msg.target_actor_id
            )
        }
        Direction::ClientToServer => format!("Client message {name}"),
    }
}

pub fn record_lines(record: &WireRecord, delta: i32) -> Vec<String> {
    match record {
        WireRecord::ActionEffect(rec) => action_effect_lines(rec, delta),
        WireRecord::ActorCast(rec) => vec![actor_cast_line(rec)],
        WireRecord::ActorControl(rec) => actor_control_lines(rec),
        WireRecord::ActorControlSelf(rec) => actor_control_self_lines(rec),
        WireRecord::EnvironmentControl(rec) => vec![format!(
            "- {:08X}.{:02X}: {:08X}, u={:02X} {:04X} {:08X}",
            rec.director_id, rec.index, rec.state, rec.u0, rec.u1, rec.u2
        )],
        WireRecord::Waymark(rec) => {
            let name = match Waymark::from_index(rec.index) {
                Some(w) => format!("{w:?}"),
                None => format!("#{}", rec.index),
            };
            vec![format!(
                "- {name}: {} at {}",
                rec.active,
                coordinates(rec.position)
            )]
        }
        WireRecord::PresetWaymark(rec) => Waymark::ALL
            .iter()
            .map(|w| {
                let i = w.index();
                format!(
                    "- {w:?}: {} at {}",
                    rec.mask & (1 << i) != 0,
                    coordinates([rec.x[i], rec.y[i], rec.z[i]])
                )
            })
            .collect(),
        WireRecord::ActionRequest(rec) => vec![format!(
            "- AID={}, target={:X}, seq={}, itemsrc={}:{}, u={:02X} {:04X} {:04X} {:08X} {:08X}",
            ActionId::new(rec.action_type, rec.action_id),
            rec.target_id,
            rec.sequence,
            rec.item_source_container,
            rec.item_source_slot,
            rec.u0,
            rec.u1,
            rec.u2,
            rec.u3,
            rec.u5
        )],
        WireRecord::ActionRequestGroundTargeted(rec) => vec![format!(
            "- AID={}, seq={}, loc={:.3} {:.3} {:.3}, u={:02X} {:04X} {:04X} {:08X} {:08X}",
            ActionId::new(rec.action_type, rec.action_id),
            rec.sequence,
            rec.location[0],
            rec.location[1],
            rec.location[2],
            rec.u0,
            rec.u1,
            rec.u2,
            rec.u3,
            rec.u4
        )],
    }
}

fn coordinates(raw: [i32; 3]) -> String {
    format!(
        "{:.3} {:.3} {:.3}",
        raw[0] as f32 / COORDINATE_SCALE,
        raw[1] as f32 / COORDINATE_SCALE,
        raw[2] as f32 / COORDINATE_SCALE
    )
}

fn action_effect_lines(rec: &ActionEffectRecord, delta: i32) -> Vec<String> {
    let h = &rec.header;
    let corrected = h.action_id.wrapping_sub(delta as u32);
    let mut lines = vec![format!(
        "- AID={} (real={}, anim={}), animTarget={:X}, animLock={:.2}, seq={}, cntr={}, rot={:.0}, var={}, flags={:08X} {:04X}, someTarget={:08X}, u={:02X}",
        ActionId::new(h.action_type, corrected),
        h.action_id,
        h.action_animation_id,
        h.animation_target_id,
        h.animation_lock,
        h.source_sequence,
        h.global_effect_counter,
        h.rotation_degrees(),
        h.variation,
        rec.effect_flags1,
        rec.effect_flags2,
        h.some_target_id,
        h.unknown20
    )];
    for target in &rec.targets {
        lines.push(format!(
            "-- target {} == {:X}",
            target.slot, target.target_id
        ));
        for (j, word) in target.effects.iter().enumerate() {
            if *word == 0 {
                continue;
            }
            lines.push(format!("--- effect {j} == {word:016X}"));
        }
    }
    lines
}

fn actor_cast_line(rec: &ActorCastRecord) -> String {
    format!(
        "- AID={}, target={:08X}, time={:.2}, rot={:.3}, x={}, y={}, z={}, u={:02X}, u1={}, u2={:08X}, u3={:04X}",
        ActionId::new(rec.action_type, rec.action_id as u32),
        rec.target_id,
        rec.cast_time,
        rotation_degrees(rec.rotation),
        rec.position[0],
        rec.position[1],
        rec.position[2],
        rec.unknown,
        ActionId::new(ActionType::Spell, rec.unknown1),
        rec.unknown2,
        rec.unknown3
    )
}

fn category_label(value: u16) -> String {
    category::name(value)
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

fn actor_control_lines(rec: &ActorControlRecord) -> Vec<String> {
    let p = rec.params;
    let mut lines = vec![format!(
        "- cat={}, params={:08X} {:08X} {:08X} {:08X} {:08X}, unk={:04X}",
        category_label(rec.category),
        p[0],
        p[1],
        p[2],
        p[3],
        p[4],
        rec.unk0
    )];
    match rec.category {
        category::CANCEL_CAST => lines.push(format!(
            "-- cancelled {}, interrupted={}",
            ActionId::new(ActionType::from(p[1] as u8), p[2]),
            p[3] == 1
        )),
        category::GAIN_EFFECT => lines.push(format!("-- gained status {}", p[0])),
        category::LOSE_EFFECT => lines.push(format!("-- lost status {}", p[0])),
        _ => {}
    }
    lines
}

fn actor_control_self_lines(rec: &ActorControlSelfRecord) -> Vec<String> {
    let p = rec.params;
    let mut lines = vec![format!(
        "- cat={}, params={:08X} {:08X} {:08X} {:08X} {:08X} {:08X} {:08X}, unk={:04X}",
        category_label(rec.category),
        p[0],
        p[1],
        p[2],
        p[3],
        p[4],
        p[5],
        p[6],
        rec.unk0
    )];
    if rec.category == category::COOLDOWN {
        lines.push(format!(
            "-- group={}, action={}, time={:.2}s",
            p[0],
            ActionId::new(ActionType::Spell, p[1]),
            p[2] as f32 / 100.0
        ));
    }
    lines
}
