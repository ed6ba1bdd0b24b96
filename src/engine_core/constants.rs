// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! OpenC2 Constants - Single source of truth for protocol and configuration values.
//!
//! This module centralizes status codes, wire keys, limits and environment
//! variable names.

/// OpenC2 Response status codes
pub mod status {
    pub const PROCESSING: u16 = 102;
    pub const OK: u16 = 200;
    pub const BAD_REQUEST: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const FORBIDDEN: u16 = 403;
    pub const NOT_FOUND: u16 = 404;
    pub const INTERNAL_ERROR: u16 = 500;
    pub const NOT_IMPLEMENTED: u16 = 501;
    pub const SERVICE_UNAVAILABLE: u16 = 503;
}

/// Message envelope values
pub mod message {
    /// Content type of every OpenC2 payload
    pub const CONTENT_TYPE: &str = "application/openc2";
    /// Language version implemented by this crate
    pub const VERSION_MAJOR: u32 = 1;
    pub const VERSION_MINOR: u32 = 0;
    /// Encoding name of the JSON encoder
    pub const ENCODING_JSON: &str = "json";
    /// Wire keys of the transfer envelope
    pub const KEY_HEADERS: &str = "headers";
    pub const KEY_BODY: &str = "body";
    pub const KEY_OPENC2: &str = "openc2";
    pub const KEY_REQUEST: &str = "request";
    pub const KEY_RESPONSE: &str = "response";
}

/// Type-level limits
pub mod limits {
    /// Shortest allowed namespace identifier
    pub const NSID_MIN_LEN: usize = 1;
    /// Longest allowed namespace identifier
    pub const NSID_MAX_LEN: usize = 16;
    /// Maximum element count of bounded arrays (Features, asset tuples, ...)
    pub const MAX_ARRAY_ITEMS: usize = 10;
    /// Maximum allowed framed message size (10 MB)
    pub const MAX_MESSAGE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
    /// Maximum header block size of a framed message
    pub const MAX_HEADER_BYTES: usize = 4096;
}

/// Separator between a namespace id and a profile-defined name
pub const NAMESPACE_SEPARATOR: char = ':';

/// Configuration Environment Variables
pub mod config {
    pub const ENV_LOG_LEVEL: &str = "OPENC2_LOG_LEVEL";
    pub const ENV_LOG_FORMAT: &str = "OPENC2_LOG_FORMAT";
    pub const ENV_ENCODING: &str = "OPENC2_ENCODING";
    pub const ENV_CONSUMER_ID: &str = "OPENC2_CONSUMER_ID";
    pub const ENV_MAX_MESSAGE_SIZE: &str = "OPENC2_MAX_MESSAGE_SIZE";

    pub const DEFAULT_CONSUMER_ID: &str = "openc2-consumer";
}
