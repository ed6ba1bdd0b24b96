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

//! Encoders bind the intermediate form to wire bytes.

use serde_json::Value;

use crate::engine_core::constants::message;
use crate::engine_core::errors::{Openc2Error, Result};
use crate::language::Message;
use crate::registry::Registry;
use crate::types::{Decode, Openc2Type};

pub trait Encoder: Send + Sync {
    /// Encoding name, as carried in `Message::encoding`.
    fn name(&self) -> &'static str;

    fn encode(&self, value: &Value) -> Result<Vec<u8>>;
    fn decode(&self, bytes: &[u8]) -> Result<Value>;

    /// Full media type, e.g. `application/openc2+json;version=1.0`.
    fn content_type(&self) -> String {
        format!(
            "{}+{};version={}.{}",
            message::CONTENT_TYPE,
            self.name(),
            message::VERSION_MAJOR,
            message::VERSION_MINOR
        )
    }

    fn encode_message(&self, msg: &Message) -> Result<Vec<u8>> {
        self.encode(&msg.encode()?)
    }

    fn decode_message(&self, bytes: &[u8], registry: &Registry) -> Result<Message> {
        let mut msg = Message::decode(&self.decode(bytes)?, registry)?;
        msg.encoding = self.name().to_string();
        Ok(msg)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder {
    pretty: bool,
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Encoder for JsonEncoder {
    fn name(&self) -> &'static str {
        message::ENCODING_JSON
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Look up an encoder by its configured name.
pub fn encoder_for(name: &str) -> Result<Box<dyn Encoder>> {
    match name.to_lowercase().as_str() {
        message::ENCODING_JSON => Ok(Box::new(JsonEncoder::new())),
        other => Err(Openc2Error::Configuration(format!(
            "unsupported encoding '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{Action, Command, Feature, Features};

    #[test]
    fn test_message_bytes_roundtrip() {
        let registry = Registry::new();
        let features = Features::new(vec![Feature::PAIRS]).unwrap();
        let cmd = Command::new(Action::QUERY, features, &registry).unwrap();
        let msg = Message::new(cmd);
        let encoder = JsonEncoder::new();
        let bytes = encoder.encode_message(&msg).unwrap();
        assert_eq!(encoder.decode_message(&bytes, &registry).unwrap(), msg);
    }

    #[test]
    fn test_malformed_bytes() {
        let encoder = JsonEncoder::new();
        assert!(matches!(encoder.decode(b"{nope"), Err(Openc2Error::Encoding(_))));
    }

    #[test]
    fn test_lookup() {
        assert_eq!(encoder_for("JSON").unwrap().name(), "json");
        assert_eq!(
            encoder_for("json").unwrap().content_type(),
            "application/openc2+json;version=1.0"
        );
        assert!(matches!(encoder_for("cbor"), Err(Openc2Error::Configuration(_))));
    }
}
