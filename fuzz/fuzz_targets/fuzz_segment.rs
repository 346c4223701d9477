#![no_main]

use libfuzzer_sys::fuzz_target;
use zone_net::config::DecoderConfig;
use zone_net::NetworkService;

fuzz_target!(|data: &[u8]| {
    // Fuzz IPC framing in both directions - test for panics on hostile segments
    let Ok(mut service) = NetworkService::new(DecoderConfig::default()) else {
        return;
    };
    let _ = service.handle_server_segment(data, 0x1000_0001);
    let _ = service.handle_client_segment(data);
});
