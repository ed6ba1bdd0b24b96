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

//! Byte sequences: base64 (`Binary`) and base16 (`Binaryx`) on the wire.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::engine_core::errors::{Openc2Error, Result};
use crate::registry::Registry;
use crate::types::traits::{expect_str, Decode, Openc2Type};

/// Arbitrary bytes, standard-alphabet base64 on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Binary(Vec<u8>);

impl Binary {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Openc2Type for Binary {
    fn encode(&self) -> Result<Value> {
        Ok(Value::String(STANDARD.encode(&self.0)))
    }
}

impl Decode for Binary {
    fn decode(value: &Value, _registry: &Registry) -> Result<Self> {
        STANDARD
            .decode(expect_str(value, "Binary")?)
            .map(Self)
            .map_err(|e| Openc2Error::type_error(format!("Binary is not valid base64: {}", e)))
    }
}

/// Arbitrary bytes, uppercase hex on the wire. Decoding accepts either case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Binaryx(Vec<u8>);

impl Binaryx {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Openc2Type for Binaryx {
    fn encode(&self) -> Result<Value> {
        Ok(Value::String(hex::encode_upper(&self.0)))
    }
}

impl Decode for Binaryx {
    fn decode(value: &Value, _registry: &Registry) -> Result<Self> {
        hex::decode(expect_str(value, "Binaryx")?)
            .map(Self)
            .map_err(|e| Openc2Error::type_error(format!("Binaryx is not valid hex: {}", e)))
    }
}
