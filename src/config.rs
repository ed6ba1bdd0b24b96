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

use crate::engine_core::constants::{config, limits, message};
use crate::engine_core::errors::Openc2Error;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse_safe(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub encoding: String,
    pub consumer_id: String,
    pub max_message_size: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, Openc2Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, Openc2Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let max_message_size = match lookup(config::ENV_MAX_MESSAGE_SIZE) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                Openc2Error::Configuration(format!(
                    "{} must be a byte count, got '{}'",
                    config::ENV_MAX_MESSAGE_SIZE,
                    raw
                ))
            })?,
            None => defaults.max_message_size,
        };
        if max_message_size == 0 {
            return Err(Openc2Error::Configuration(format!(
                "{} must be greater than zero",
                config::ENV_MAX_MESSAGE_SIZE
            )));
        }

        Ok(Self {
            log_level: lookup(config::ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_format: lookup(config::ENV_LOG_FORMAT)
                .map(|s| LogFormat::parse_safe(&s))
                .unwrap_or(defaults.log_format),
            encoding: lookup(config::ENV_ENCODING)
                .map(|s| s.trim().to_lowercase())
                .unwrap_or(defaults.encoding),
            consumer_id: lookup(config::ENV_CONSUMER_ID).unwrap_or(defaults.consumer_id),
            max_message_size,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            encoding: message::ENCODING_JSON.to_string(),
            consumer_id: config::DEFAULT_CONSUMER_ID.to_string(),
            max_message_size: limits::MAX_MESSAGE_SIZE_BYTES,
        }
    }
}
