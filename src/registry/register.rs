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

//! Register: a bidirectional name <-> type table for one extensible axis.

use serde_json::Value;
use std::any::TypeId;
use std::fmt;

use crate::engine_core::constants::NAMESPACE_SEPARATOR;
use crate::engine_core::errors::{Openc2Error, Result};
use crate::registry::Registry;
use crate::types::{Decode, Openc2Type};

type DecodeFn = fn(&Value, &Registry) -> Result<Box<dyn Openc2Type>>;

fn decode_boxed<T: Openc2Type + Decode>(
    value: &Value,
    registry: &Registry,
) -> Result<Box<dyn Openc2Type>> {
    Ok(Box::new(T::decode(value, registry)?))
}

/// One registered type.
#[derive(Clone)]
pub struct RegisterEntry {
    name: String,
    identifier: i64,
    type_id: TypeId,
    type_name: &'static str,
    decode: DecodeFn,
}

impl RegisterEntry {
    pub(crate) fn of<T: Openc2Type + Decode>(name: impl Into<String>, identifier: i64) -> Self {
        Self {
            name: name.into(),
            identifier,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            decode: decode_boxed::<T>,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identifier(&self) -> i64 {
        self.identifier
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Decode `value` as the registered type.
    pub fn decode(&self, value: &Value, registry: &Registry) -> Result<Box<dyn Openc2Type>> {
        (self.decode)(value, registry)
    }
}

impl fmt::Debug for RegisterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterEntry")
            .field("name", &self.name)
            .field("identifier", &self.identifier)
            .field("type", &self.type_name)
            .finish()
    }
}

/// Effective registered name: `namespace:name` when a namespace is given.
pub fn qualified_name(name: &str, namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) => format!("{}{}{}", ns, NAMESPACE_SEPARATOR, name),
        None => name.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct Register {
    label: &'static str,
    entries: Vec<RegisterEntry>,
}

impl Register {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: Vec::new(),
        }
    }

    pub(crate) fn from_entries(label: &'static str, entries: Vec<RegisterEntry>) -> Self {
        Self { label, entries }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Register `T` under `name` (prefixed by `namespace` when given).
    ///
    /// Fails if `T` is already registered here under any name, or if the
    /// effective name is taken. Returns the effective name.
    pub fn add<T: Openc2Type + Decode>(
        &mut self,
        name: &str,
        identifier: i64,
        namespace: Option<&str>,
    ) -> Result<String> {
        let effective = qualified_name(name, namespace);
        self.ensure_vacant::<T>(&effective)?;
        self.entries
            .push(RegisterEntry::of::<T>(effective.clone(), identifier));
        Ok(effective)
    }

    /// Check that both `T` and `name` are still free.
    pub fn ensure_vacant<T: 'static>(&self, name: &str) -> Result<()> {
        if let Some(existing) = self.entries.iter().find(|e| e.is::<T>()) {
            return Err(Openc2Error::registration(format!(
                "{} already registered in {} as '{}'",
                std::any::type_name::<T>(),
                self.label,
                existing.name
            )));
        }
        if let Some(existing) = self.get(name) {
            return Err(Openc2Error::registration(format!(
                "name '{}' already registered in {} for {}",
                name, self.label, existing.type_name
            )));
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RegisterEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn name_of_type(&self, type_id: TypeId) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.type_id == type_id)
            .map(|e| e.name.as_str())
    }

    pub fn name_of<T: 'static>(&self) -> Option<&str> {
        self.name_of_type(TypeId::of::<T>())
    }

    /// Pick the single registered entry named by `keys`.
    ///
    /// Keys that name no entry are ignored; more than one match is an error.
    /// This is the variant-resolution step shared by Choice (one discriminator
    /// key) and extensible Maps (one namespace key among base fields).
    pub fn resolve<'a, I>(&self, keys: I) -> Result<Option<&RegisterEntry>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found: Option<&RegisterEntry> = None;
        for key in keys {
            if let Some(entry) = self.get(key) {
                if let Some(previous) = found {
                    return Err(Openc2Error::value(format!(
                        "ambiguous {}: both '{}' and '{}' present",
                        self.label, previous.name, entry.name
                    )));
                }
                found = Some(entry);
            }
        }
        Ok(found)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisterEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Duration, Nsid};

    #[test]
    fn test_add_and_lookup() {
        let mut reg = Register::new("Targets");
        let name = reg.add::<Duration>("wait", 1, None).unwrap();
        assert_eq!(name, "wait");
        let ns_name = reg.add::<Nsid>("label", 2, Some("x")).unwrap();
        assert_eq!(ns_name, "x:label");
        assert_eq!(reg.name_of::<Nsid>(), Some("x:label"));
        assert!(reg.get("x:label").unwrap().is::<Nsid>());
        assert!(reg.get("label").is_none());
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let mut reg = Register::new("Targets");
        reg.add::<Duration>("wait", 1, None).unwrap();
        let err = reg.add::<Duration>("other", 2, None).unwrap_err();
        assert!(matches!(err, Openc2Error::Registration(_)));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut reg = Register::new("Targets");
        reg.add::<Duration>("wait", 1, None).unwrap();
        assert!(reg.add::<Nsid>("wait", 2, None).is_err());
    }

    #[test]
    fn test_resolve() {
        let mut reg = Register::new("Ext");
        reg.add::<Duration>("a", 1, None).unwrap();
        reg.add::<Nsid>("b", 2, None).unwrap();
        assert!(reg.resolve(["zz"]).unwrap().is_none());
        assert_eq!(reg.resolve(["zz", "a"]).unwrap().unwrap().name(), "a");
        assert!(matches!(reg.resolve(["a", "b"]), Err(Openc2Error::Value(_))));
    }
}
