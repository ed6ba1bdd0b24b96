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

//! Open-world enumerations.
//!
//! An enumeration is a fixed core table declared by its [`EnumKind`] plus the
//! extensions appended to the [`Registry`] at profile load time. Both tables
//! are consulted when decoding; a value carries its own name and id so
//! encoding never needs the registry.

use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::engine_core::errors::{Openc2Error, Result};
use crate::registry::Registry;
use crate::types::traits::{Decode, Openc2Type};

/// External representation of an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumEncoding {
    /// `Enumerated`: the item name travels on the wire
    Name,
    /// `EnumeratedID`: the integer id travels on the wire
    Id,
}

/// Declares one enumeration: its name, wire encoding and core items.
pub trait EnumKind: 'static {
    const NAME: &'static str;
    const ENCODING: EnumEncoding = EnumEncoding::Name;
    const CORE: &'static [(&'static str, i64)];

    fn core_by_name(name: &str) -> Option<i64> {
        Self::CORE.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    fn core_by_value(value: i64) -> Option<&'static str> {
        Self::CORE.iter().find(|(_, v)| *v == value).map(|(n, _)| *n)
    }
}

/// One item of the enumeration `K`.
pub struct Enumerated<K: EnumKind> {
    name: Cow<'static, str>,
    value: i64,
    _kind: PhantomData<fn() -> K>,
}

impl<K: EnumKind> Enumerated<K> {
    /// Declare a core item as a constant. Only for names listed in `K::CORE`.
    pub const fn from_static(name: &'static str, value: i64) -> Self {
        Self {
            name: Cow::Borrowed(name),
            value,
            _kind: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Resolve an item by name in the core table, then the registry extensions.
    pub fn from_name(name: &str, registry: &Registry) -> Result<Self> {
        if let Some(value) = K::core_by_name(name) {
            return Ok(Self::owned(name, value));
        }
        registry
            .enum_table::<K>()
            .and_then(|table| table.by_name(name))
            .map(|value| Self::owned(name, value))
            .ok_or_else(|| {
                Openc2Error::type_error(format!("'{}' is not a valid {}", name, K::NAME))
            })
    }

    /// Resolve an item by id in the core table, then the registry extensions.
    pub fn from_value(value: i64, registry: &Registry) -> Result<Self> {
        if let Some(name) = K::core_by_value(value) {
            return Ok(Self::from_static(name, value));
        }
        registry
            .enum_table::<K>()
            .and_then(|table| table.by_value(value))
            .map(|name| Self::owned(name, value))
            .ok_or_else(|| Openc2Error::type_error(format!("{} is not a valid {}", value, K::NAME)))
    }

    fn owned(name: &str, value: i64) -> Self {
        Self {
            name: Cow::Owned(name.to_string()),
            value,
            _kind: PhantomData,
        }
    }
}

impl<K: EnumKind> Clone for Enumerated<K> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            value: self.value,
            _kind: PhantomData,
        }
    }
}

impl<K: EnumKind> PartialEq for Enumerated<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.name == other.name
    }
}

impl<K: EnumKind> Eq for Enumerated<K> {}

impl<K: EnumKind> Hash for Enumerated<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.name.hash(state);
    }
}

impl<K: EnumKind> fmt::Debug for Enumerated<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}({})", K::NAME, self.name, self.value)
    }
}

impl<K: EnumKind> fmt::Display for Enumerated<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<K: EnumKind> Openc2Type for Enumerated<K> {
    fn encode(&self) -> Result<Value> {
        Ok(match K::ENCODING {
            EnumEncoding::Name => Value::String(self.name.to_string()),
            EnumEncoding::Id => Value::from(self.value),
        })
    }
}

impl<K: EnumKind> Decode for Enumerated<K> {
    fn decode(value: &Value, registry: &Registry) -> Result<Self> {
        match (K::ENCODING, value) {
            (EnumEncoding::Name, Value::String(name)) => Self::from_name(name, registry),
            (EnumEncoding::Id, Value::Number(n)) => match n.as_i64() {
                Some(id) => Self::from_value(id, registry),
                None => Err(Openc2Error::type_error(format!(
                    "{} is not a valid {}",
                    n,
                    K::NAME
                ))),
            },
            // Map keys always arrive as strings, also for id-encoded enumerations
            (EnumEncoding::Id, Value::String(s)) => match s.parse::<i64>() {
                Ok(id) => Self::from_value(id, registry),
                Err(_) => Self::from_name(s, registry),
            },
            _ => Err(Openc2Error::type_error(format!(
                "{} expects a {}, got {}",
                K::NAME,
                if K::ENCODING == EnumEncoding::Name {
                    "name"
                } else {
                    "numeric id"
                },
                value
            ))),
        }
    }
}

/// Append-only table of enumeration items added after startup.
#[derive(Debug, Clone, Default)]
pub struct EnumTable {
    entries: Vec<(String, i64)>,
}

impl EnumTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name = value`. Re-adding an identical pair is a no-op and returns
    /// `false`; reusing a name or an id with a different partner is an error.
    pub fn extend(&mut self, kind: &str, name: &str, value: i64) -> Result<bool> {
        if let Some((_, existing)) = self.entries.iter().find(|(n, _)| n == name) {
            if *existing == value {
                return Ok(false);
            }
            return Err(Openc2Error::registration(format!(
                "{} '{}' already has id {}, cannot redefine as {}",
                kind, name, existing, value
            )));
        }
        if let Some((other, _)) = self.entries.iter().find(|(_, v)| *v == value) {
            return Err(Openc2Error::registration(format!(
                "{} id {} already used by '{}'",
                kind, value, other
            )));
        }
        self.entries.push((name.to_string(), value));
        Ok(true)
    }

    pub fn by_name(&self, name: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn by_value(&self, value: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Color;
    impl EnumKind for Color {
        const NAME: &'static str = "Color";
        const CORE: &'static [(&'static str, i64)] = &[("red", 1), ("green", 2)];
    }

    #[derive(Debug)]
    struct Code;
    impl EnumKind for Code {
        const NAME: &'static str = "Code";
        const ENCODING: EnumEncoding = EnumEncoding::Id;
        const CORE: &'static [(&'static str, i64)] = &[("ok", 200), ("bad", 400)];
    }

    #[test]
    fn test_name_encoding() {
        let registry = Registry::empty();
        let red = Enumerated::<Color>::from_static("red", 1);
        assert_eq!(red.encode().unwrap(), json!("red"));
        let back = Enumerated::<Color>::decode(&json!("green"), &registry).unwrap();
        assert_eq!(back.value(), 2);
        assert!(matches!(
            Enumerated::<Color>::decode(&json!("blue"), &registry),
            Err(Openc2Error::Type(_))
        ));
        assert!(Enumerated::<Color>::decode(&json!(1), &registry).is_err());
    }

    #[test]
    fn test_id_encoding() {
        let registry = Registry::empty();
        let ok = Enumerated::<Code>::from_static("ok", 200);
        assert_eq!(ok.encode().unwrap(), json!(200));
        assert_eq!(
            Enumerated::<Code>::decode(&json!(400), &registry).unwrap().name(),
            "bad"
        );
        assert!(Enumerated::<Code>::decode(&json!(418), &registry).is_err());
    }

    #[test]
    fn test_extension_is_consulted() {
        let mut registry = Registry::empty();
        registry.extend_enum::<Color>("blue", 3).unwrap();
        let blue = Enumerated::<Color>::decode(&json!("blue"), &registry).unwrap();
        assert_eq!(blue.value(), 3);
        assert_eq!(blue.encode().unwrap(), json!("blue"));
    }

    #[test]
    fn test_table_idempotent_extend() {
        let mut table = EnumTable::new();
        assert!(table.extend("T", "a", 1).unwrap());
        assert!(!table.extend("T", "a", 1).unwrap());
        assert!(table.extend("T", "a", 2).is_err());
        assert!(table.extend("T", "b", 1).is_err());
        assert_eq!(table.len(), 1);
    }
}
