//! End-to-end decoding through `NetworkService`: raw payload in, typed event out.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::*;
use std::sync::{Arc, Mutex};
use zone_net::config::DecoderConfig;
use zone_net::protocol::layout::category;
use zone_net::protocol::message::{ActionId, ActionType, Waymark};
use zone_net::service::events::Channel;
use zone_net::{HandleOutcome, NetworkService, RawMessage};

const ACTOR: u32 = 0x1000_0042;

fn service() -> NetworkService {
    NetworkService::new(DecoderConfig::default()).expect("default config is valid")
}

/// Collect everything published on `channel`
fn record<E: Clone + Send + Sync + 'static>(channel: &Channel<E>) -> Arc<Mutex<Vec<E>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    channel
        .subscribe(move |event: &E| {
            sink.lock().unwrap().push(event.clone());
            Ok(())
        })
        .unwrap();
    seen
}

fn server(service: &mut NetworkService, opcode: u16, payload: &[u8]) -> HandleOutcome {
    service
        .handle(RawMessage::server(opcode, payload, ACTOR))
        .unwrap()
}

#[test]
fn spell_effect_is_self_consistent() {
    let mut service = service();
    let effects = record(&service.events().action_effect);

    let payload = action_effect(1, SPELL, 60000, 59900, 1, &[0x4000_0001]).build();
    assert_eq!(server(&mut service, AE1, &payload), HandleOutcome::Published(1));

    let events = effects.lock().unwrap();
    assert_eq!(events[0].action, ActionId::new(ActionType::Spell, 59900));
    assert_eq!(events[0].caster_id, ACTOR as u64);
    assert_eq!(service.identifier_delta(), 100);
}

#[test]
fn delta_persists_across_message_kinds() {
    let mut service = service();
    let effects = record(&service.events().action_effect);
    let casts = record(&service.events().cast_start);
    let requests = record(&service.events().action_request);

    server(
        &mut service,
        AE1,
        &action_effect(1, SPELL, 60000, 59900, 0, &[]).build(),
    );
    server(
        &mut service,
        AE8,
        &action_effect(8, ABILITY, 59950, 1, 0, &[]).build(),
    );
    server(&mut service, ACTOR_CAST, &actor_cast(SPELL, 7400, 2.5, 0x4000_0007));
    service
        .handle(RawMessage::client(
            ACTION_REQUEST,
            &action_request(SPELL, 7500, 3, 0x4000_0007),
        ))
        .unwrap();

    assert_eq!(service.identifier_delta(), 100);
    assert_eq!(
        effects.lock().unwrap()[1].action,
        ActionId::new(ActionType::Ability, 59850)
    );
    let cast = casts.lock().unwrap()[0];
    assert_eq!(cast.action, ActionId::new(ActionType::Spell, 7300));
    assert_eq!(cast.cast_time, 2.5);
    assert_eq!(cast.target_id, 0x4000_0007);
    let request = requests.lock().unwrap()[0];
    assert_eq!(request.action.id, 7400);
    assert_eq!(request.target_id, 0x4000_0007);
    assert_eq!(request.location, None);
}

#[test]
fn every_capacity_clamps_and_indexes_by_raw_slot() {
    for (opcode, capacity) in [(AE1, 1), (AE8, 8), (AE16, 16), (AE24, 24), (AE32, 32)] {
        let mut service = service();
        let effects = record(&service.events().action_effect);

        let ids: Vec<u64> = (1..=capacity as u64).map(|i| 0x4000_0000 + i).collect();
        let last = capacity - 1;
        let payload = action_effect(capacity, ABILITY, 9, 0, u8::MAX, &ids)
            .u64(effect_offset(last, 7), 0xDEAD_BEEF)
            .build();
        server(&mut service, opcode, &payload);

        let events = effects.lock().unwrap();
        let event = &events[0];
        assert_eq!(event.max_targets, capacity as u32);
        assert_eq!(event.targets.len(), capacity, "capacity {capacity}");
        assert_eq!(event.targets[last].effects[7], 0xDEAD_BEEF);
    }
}

#[test]
fn zero_target_ids_are_skipped_without_shifting_effects() {
    let mut service = service();
    let effects = record(&service.events().action_effect);

    let payload = action_effect(8, ABILITY, 9, 0, 3, &[0x4000_0001, 0, 0x4000_0003])
        .u64(effect_offset(1, 0), 0x1111)
        .u64(effect_offset(2, 0), 0x2222)
        .build();
    server(&mut service, AE8, &payload);

    let events = effects.lock().unwrap();
    let targets = &events[0].targets;
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[1].target_id, 0x4000_0003);
    assert_eq!(targets[1].effects[0], 0x2222);
}

#[test]
fn declared_count_limits_targets() {
    let mut service = service();
    let effects = record(&service.events().action_effect);

    let payload = action_effect(8, ABILITY, 9, 0, 2, &[1, 2, 3, 4]).build();
    server(&mut service, AE8, &payload);
    assert_eq!(effects.lock().unwrap()[0].targets.len(), 2);
}

#[test]
fn waymark_indices_are_bounded() {
    let mut service = service();
    let marks = record(&service.events().waymark);

    assert_eq!(
        server(&mut service, WAYMARK, &waymark(7, true, [1000, 0, -2000])),
        HandleOutcome::Published(1)
    );
    assert_eq!(
        server(&mut service, WAYMARK, &waymark(8, true, [0, 0, 0])),
        HandleOutcome::Dropped
    );
    assert_eq!(
        server(&mut service, WAYMARK, &waymark(2, false, [5, 5, 5])),
        HandleOutcome::Published(1)
    );

    let marks = marks.lock().unwrap();
    assert_eq!(marks.len(), 2);
    assert_eq!(marks[0].waymark, Waymark::H);
    let pos = marks[0].position.unwrap();
    assert_eq!((pos.x, pos.y, pos.z), (1.0, 0.0, -2.0));
    assert_eq!(marks[1].waymark, Waymark::C);
    assert_eq!(marks[1].position, None);
}

#[test]
fn preset_bits_map_to_waymarks_lsb_first() {
    let mut service = service();
    let marks = record(&service.events().waymark);

    let mut positions = [[0i32; 3]; 8];
    positions[0] = [100, 200, 300];
    positions[5] = [-1500, 0, 2500];
    let outcome = server(
        &mut service,
        PRESET_WAYMARK,
        &preset_waymark(0b0010_0001, positions),
    );
    assert_eq!(outcome, HandleOutcome::Published(Waymark::COUNT));

    let marks = marks.lock().unwrap();
    let order: Vec<Waymark> = marks.iter().map(|m| m.waymark).collect();
    assert_eq!(order, Waymark::ALL.to_vec());
    for (i, mark) in marks.iter().enumerate() {
        assert_eq!(mark.position.is_some(), i == 0 || i == 5, "waymark {i}");
    }
    let f = marks[5].position.unwrap();
    assert_eq!((f.x, f.y, f.z), (-1.5, 0.0, 2.5));
}

#[test]
fn identical_messages_decode_identically() {
    let mut service = service();
    let effects = record(&service.events().action_effect);
    let payload = action_effect(8, SPELL, 5000, 4900, 2, &[7, 8]).build();

    server(&mut service, AE8, &payload);
    server(&mut service, AE8, &payload);

    let events = effects.lock().unwrap();
    assert_eq!(events[0], events[1]);
    assert_eq!(service.metrics().snapshot().delta_updates, 1);
}

#[test]
fn shared_opcode_is_routed_by_direction() {
    let mut service = service();
    let tethers = record(&service.events().tether);
    let ground = record(&service.events().action_request_ground_targeted);
    assert_eq!(ACTOR_CONTROL, ACTION_REQUEST_GT);

    server(
        &mut service,
        ACTOR_CONTROL,
        &actor_control(category::TETHER, [0, 11, 0x4000_0005, 0, 0]),
    );
    service
        .handle(RawMessage::client(
            ACTION_REQUEST_GT,
            &ground_action_request(SPELL, 3569, 9, [10.0, 0.5, -3.25]),
        ))
        .unwrap();

    let tether = tethers.lock().unwrap()[0];
    assert_eq!(tether.actor_id, ACTOR as u64);
    assert_eq!(tether.tether_id, 11);
    assert_eq!(tether.target_id, 0x4000_0005);

    let request = ground.lock().unwrap()[0];
    assert_eq!(request.target_id, 0);
    assert_eq!(request.sequence, 9);
    let loc = request.location.unwrap();
    assert_eq!((loc.x, loc.y, loc.z), (10.0, 0.5, -3.25));
}

#[test]
fn control_categories_reach_their_channels() {
    let mut service = service();
    let events = service.events();
    let cancels = record(&events.cancel_cast);
    let icons = record(&events.target_icon);
    let tether_cancels = record(&events.tether_cancel);
    let rejected = record(&events.action_rejected);
    let director = record(&events.director_update);
    let env = record(&events.environment_control);

    server(
        &mut service,
        ACTOR_CONTROL,
        &actor_control(category::CANCEL_CAST, [0, 1, 7777, 1, 0]),
    );
    server(
        &mut service,
        ACTOR_CONTROL,
        &actor_control(category::TARGET_ICON, [0x00AB, 0, 0, 0, 0]),
    );
    server(
        &mut service,
        ACTOR_CONTROL,
        &actor_control(category::TETHER_CANCEL, [0; 5]),
    );
    server(
        &mut service,
        ACTOR_CONTROL_SELF,
        &actor_control_self(category::ACTION_REJECTED, [0, 0, 3579, 0, 0, 42, 0]),
    );
    server(
        &mut service,
        ACTOR_CONTROL_SELF,
        &actor_control_self(category::DIRECTOR_UPDATE, [0x8003_0001, 0x4000_0001, 1, 2, 3, 4, 0]),
    );
    server(
        &mut service,
        ENVIRONMENT_CONTROL,
        &environment_control(0x8003_0001, 0x0002_0001, 3),
    );

    let cancel = cancels.lock().unwrap()[0];
    assert_eq!(cancel.action_id, 7777);
    assert!(cancel.interrupted);
    assert_eq!(icons.lock().unwrap()[0].icon_id, 0x00AB);
    assert_eq!(tether_cancels.lock().unwrap()[0].actor_id, ACTOR as u64);

    let rejected = rejected.lock().unwrap()[0];
    assert_eq!(rejected.action_id, 3579);
    assert_eq!(rejected.source_sequence, 42);

    let update = director.lock().unwrap()[0];
    assert_eq!(update.director_id, 0x8003_0001);
    assert_eq!(update.update_id, 0x4000_0001);
    assert_eq!(update.params, [1, 2, 3, 4]);

    let env = env.lock().unwrap()[0];
    assert_eq!(env.director_id, 0x8003_0001);
    assert_eq!(env.state, 0x0002_0001);
    assert_eq!(env.index, 3);
}

#[test]
fn dump_switches_do_not_change_decoding() {
    let config = DecoderConfig::default_with_overrides(|c| {
        c.diagnostics.dump_server_messages = true;
        c.diagnostics.dump_client_messages = true;
    });
    let mut service = NetworkService::new(config).unwrap();
    let effects = record(&service.events().action_effect);

    let payload = action_effect(16, SPELL, 1234, 1200, 1, &[5]).build();
    server(&mut service, AE16, &payload);
    server(&mut service, 0x7FFF, &[1, 2, 3]);

    assert_eq!(effects.lock().unwrap()[0].action.id, 1200);
}

#[test]
fn reload_keeps_delta_and_subscriptions() {
    let mut service = service();
    let effects = record(&service.events().action_effect);
    server(
        &mut service,
        AE1,
        &action_effect(1, SPELL, 600, 500, 0, &[]).build(),
    );

    let moved = DecoderConfig::default_with_overrides(|c| c.opcodes.server.action_effect1 = 0x0100);
    service.apply_config(moved).unwrap();
    assert_eq!(service.identifier_delta(), 100);

    let payload = action_effect(1, ABILITY, 700, 0, 0, &[]).build();
    assert_eq!(server(&mut service, AE1, &payload), HandleOutcome::Unrecognized);
    assert_eq!(server(&mut service, 0x0100, &payload), HandleOutcome::Published(1));
    assert_eq!(effects.lock().unwrap()[1].action.id, 600);
}
