// Copyright 2026 BadCompany
// Licensed under the Apache License, Version 2.0

#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use openc2::transport::Openc2Codec;
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    // Any byte sequence must yield a frame, a request for more input, or an error.
    let mut codec = Openc2Codec::with_max_size(64 * 1024);
    let mut buffer = BytesMut::from(data);
    while let Ok(Some(_)) = codec.decode(&mut buffer) {}
});
