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

//! Scalar wrapper types.
//!
//! Newtypes giving OpenC2 semantics to host primitives: validated on
//! construction, transparent on the wire.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::engine_core::constants::limits;
use crate::engine_core::errors::{Openc2Error, Result};
use crate::registry::Registry;
use crate::types::traits::{expect_i64, expect_str, expect_u64, Decode, Openc2Type};

/// Non-negative duration in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Duration(u64);

impl Duration {
    pub fn new(millis: i64) -> Result<Self> {
        u64::try_from(millis)
            .map(Self)
            .map_err(|_| Openc2Error::value(format!("Duration must be >= 0, got {}", millis)))
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl Openc2Type for Duration {
    fn encode(&self) -> Result<Value> {
        Ok(Value::from(self.0))
    }
}

impl Decode for Duration {
    fn decode(value: &Value, _registry: &Registry) -> Result<Self> {
        Self::new(expect_i64(value, "Duration")?)
    }
}

/// Language version, `"major.minor"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = Openc2Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Openc2Error::value(format!("Version must be 'major.minor', got '{}'", s));
        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        // Canonical decimal only: "01" would not survive re-encoding.
        let digits = |part: &str| {
            !part.is_empty()
                && part.bytes().all(|b| b.is_ascii_digit())
                && (part == "0" || !part.starts_with('0'))
        };
        if !digits(major) || !digits(minor) {
            return Err(invalid());
        }
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl Openc2Type for Version {
    fn encode(&self) -> Result<Value> {
        Ok(Value::String(self.to_string()))
    }
}

impl Decode for Version {
    fn decode(value: &Value, _registry: &Registry) -> Result<Self> {
        expect_str(value, "Version")?.parse()
    }
}

/// Namespace identifier of a profile (1 to 16 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nsid(String);

impl Nsid {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let len = id.chars().count();
        if !(limits::NSID_MIN_LEN..=limits::NSID_MAX_LEN).contains(&len) {
            return Err(Openc2Error::value(format!(
                "Nsid must be {}-{} characters, got '{}' ({})",
                limits::NSID_MIN_LEN,
                limits::NSID_MAX_LEN,
                id,
                len
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nsid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Openc2Type for Nsid {
    fn encode(&self) -> Result<Value> {
        Ok(Value::String(self.0.clone()))
    }
}

impl Decode for Nsid {
    fn decode(value: &Value, _registry: &Registry) -> Result<Self> {
        Self::new(expect_str(value, "Nsid")?)
    }
}

/// Milliseconds since the Unix epoch (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateTime(u64);

impl DateTime {
    /// The current time, sampled once.
    pub fn now() -> Self {
        Self(crate::utils::time::now_millis())
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// RFC 7231 HTTP-date, e.g. `Tue, 14 Nov 2023 22:13:20 GMT`.
    pub fn httpdate(&self) -> Result<String> {
        let millis = i64::try_from(self.0)
            .map_err(|_| Openc2Error::value(format!("DateTime {} out of range", self.0)))?;
        let utc = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis)
            .ok_or_else(|| Openc2Error::value(format!("DateTime {} out of range", self.0)))?;
        Ok(utc.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
    }
}

impl Default for DateTime {
    fn default() -> Self {
        Self::now()
    }
}

impl Openc2Type for DateTime {
    fn encode(&self) -> Result<Value> {
        Ok(Value::from(self.0))
    }
}

impl Decode for DateTime {
    fn decode(value: &Value, _registry: &Registry) -> Result<Self> {
        expect_u64(value, "DateTime").map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_duration_bounds() {
        let registry = Registry::empty();
        let d = Duration::new(5000).unwrap();
        assert_eq!(d.encode().unwrap(), json!(5000));
        assert_eq!(Duration::decode(&json!(5000), &registry).unwrap().as_millis(), 5000);
        assert!(matches!(Duration::new(-1), Err(Openc2Error::Value(_))));
        assert!(matches!(
            Duration::decode(&json!(-1), &registry),
            Err(Openc2Error::Value(_))
        ));
    }

    #[test]
    fn test_version_parse_exact_shape() {
        assert_eq!("1.0".parse::<Version>().unwrap(), Version::new(1, 0));
        assert_eq!(Version::new(2, 13).to_string(), "2.13");
        for bad in ["1", "1.", ".1", "1.0.0", "a.b", "1.-1", "", "01.0", "1.00", "1.05"] {
            assert!(bad.parse::<Version>().is_err(), "{} should not parse", bad);
        }
        assert_eq!("10.0".parse::<Version>().unwrap(), Version::new(10, 0));
        assert_eq!("0.10".parse::<Version>().unwrap().to_string(), "0.10");
    }

    #[test]
    fn test_nsid_length() {
        assert!(Nsid::new("").is_err());
        assert!(Nsid::new("s").is_ok());
        assert!(Nsid::new("a".repeat(16)).is_ok());
        assert!(matches!(Nsid::new("a".repeat(17)), Err(Openc2Error::Value(_))));
    }

    #[test]
    fn test_datetime_httpdate() {
        let dt = DateTime::from_millis(1_700_000_000_000);
        assert_eq!(dt.httpdate().unwrap(), "Tue, 14 Nov 2023 22:13:20 GMT");
        assert_eq!(dt.encode().unwrap(), json!(1_700_000_000_000u64));
    }

    #[test]
    fn test_datetime_now_is_stamped_once() {
        let dt = DateTime::now();
        let copy = dt;
        assert_eq!(dt, copy);
        assert!(dt.as_millis() > 1_600_000_000_000);
    }
}
