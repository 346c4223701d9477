#![no_main]

use libfuzzer_sys::fuzz_target;
use zone_net::config::DecoderConfig;
use zone_net::{NetworkService, RawMessage};

fuzz_target!(|data: &[u8]| {
    // first three bytes pick direction and opcode, the rest is payload
    if data.len() < 3 {
        return;
    }
    let Ok(mut service) = NetworkService::new(DecoderConfig::default()) else {
        return;
    };
    let opcode = u16::from_le_bytes([data[1], data[2]]);
    let payload = &data[3..];
    let msg = if data[0] & 1 == 0 {
        RawMessage::server(opcode, payload, 0x1000_0001)
    } else {
        RawMessage::client(opcode, payload)
    };
    let _ = service.handle(msg);
});
