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

//! Error taxonomy for the OpenC2 core.
//!
//! The core fails fast and precisely; turning these errors into protocol-level
//! error Responses is the job of the dispatch boundary (see `consumer`).

use thiserror::Error;

use crate::engine_core::constants::status;

/// Main error type for encoding, decoding and registration
#[derive(Error, Debug)]
pub enum Openc2Error {
    /// Unknown field, unregistered Choice tag or extension namespace (HTTP 400)
    #[error("Schema error: {0}")]
    Schema(String),

    /// Value outside its allowed range or shape (HTTP 400)
    #[error("Value error: {0}")]
    Value(String),

    /// Wrong concrete type or malformed scalar representation (HTTP 400)
    #[error("Type error: {0}")]
    Type(String),

    /// Duplicate or conflicting registration; a startup fault (HTTP 500)
    #[error("Registration error: {0}")]
    Registration(String),

    /// Profile-level validation of a well-formed command (HTTP 400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Action/target combination not supported by the actuator (HTTP 501)
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Wire encoding failure
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Framing or delivery failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration error (HTTP 500)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O Error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Openc2Error> = std::result::Result<T, E>;

impl Openc2Error {
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn value(msg: impl Into<String>) -> Self {
        Self::Value(msg.into())
    }

    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::Type(msg.into())
    }

    pub fn registration(msg: impl Into<String>) -> Self {
        Self::Registration(msg.into())
    }

    /// OpenC2 status code reported when this error reaches the dispatch boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Openc2Error::Schema(_)
            | Openc2Error::Value(_)
            | Openc2Error::Type(_)
            | Openc2Error::Validation(_)
            | Openc2Error::Encoding(_) => status::BAD_REQUEST,
            Openc2Error::NotImplemented(_) => status::NOT_IMPLEMENTED,
            Openc2Error::Registration(_)
            | Openc2Error::Transport(_)
            | Openc2Error::Configuration(_)
            | Openc2Error::Io(_) => status::INTERNAL_ERROR,
        }
    }

    /// Get user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            Openc2Error::Schema(reason) => format!("Malformed command: {}", reason),
            Openc2Error::Value(reason) => format!("Invalid value: {}", reason),
            Openc2Error::Type(reason) => format!("Invalid type: {}", reason),
            Openc2Error::Validation(reason) => format!("Validation failed: {}", reason),
            Openc2Error::NotImplemented(reason) => format!("Not implemented: {}", reason),
            Openc2Error::Encoding(_) => "Malformed message encoding".to_string(),
            Openc2Error::Registration(_) | Openc2Error::Configuration(_) => {
                "Internal error".to_string()
            }
            Openc2Error::Transport(_) | Openc2Error::Io(_) => "Internal system error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Openc2Error::schema("x").status_code(), 400);
        assert_eq!(Openc2Error::value("x").status_code(), 400);
        assert_eq!(Openc2Error::NotImplemented("x".into()).status_code(), 501);
        assert_eq!(Openc2Error::registration("x").status_code(), 500);
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = Openc2Error::Configuration("secret path /etc/x".into());
        assert_eq!(err.user_message(), "Internal error");
    }
}
