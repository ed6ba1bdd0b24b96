// Copyright 2026 BadCompany
// Licensed under the Apache License, Version 2.0

#![no_main]

use libfuzzer_sys::fuzz_target;
use openc2::encoder::{Encoder, JsonEncoder};
use openc2::profiles::slpf;
use openc2::registry::Registry;
use std::sync::OnceLock;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let registry = REGISTRY.get_or_init(|| {
        let mut registry = Registry::new();
        let _ = slpf::register(&mut registry);
        registry
    });

    // Whatever decodes must encode again and decode to the same message.
    let encoder = JsonEncoder::new();
    if let Ok(msg) = encoder.decode_message(data, registry) {
        let bytes = encoder.encode_message(&msg).expect("decoded message re-encodes");
        let again = encoder
            .decode_message(&bytes, registry)
            .expect("re-encoded message decodes");
        assert_eq!(msg, again);
    }
});
