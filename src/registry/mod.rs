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

//! The registry context.
//!
//! A [`Registry`] owns every extensible axis of the language: the Target and
//! Profile registers, the Args/Results extension registers and the enumeration
//! extension tables. It is populated once (core vocabulary, then profiles) and
//! then frozen behind an `Arc` for request handling:
//!
//! ```ignore
//! let mut registry = Registry::new();
//! openc2::profiles::slpf::register(&mut registry)?;
//! let registry = registry.into_shared();
//! ```

pub mod register;

pub use register::{qualified_name, Register, RegisterEntry};

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::engine_core::errors::{Openc2Error, Result};
use crate::language::args::ArgsExtension;
use crate::language::results::ResultsExtension;
use crate::language::targets::{core_target_entries, TargetEnumKind};
use crate::types::{Decode, EnumKind, EnumTable, ExtensionPoint, MapSchema, Nsid, Openc2Type};

#[derive(Debug, Clone)]
pub struct Registry {
    targets: Register,
    profiles: Register,
    extended_arguments: Register,
    extended_results: Register,
    enums: HashMap<TypeId, EnumTable>,
}

impl Registry {
    /// A registry holding the core targets. Profiles are added on top.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.targets = Register::from_entries("Target", core_target_entries());
        registry
    }

    /// A registry with nothing registered, not even core targets.
    pub fn empty() -> Self {
        Self {
            targets: Register::new("Target"),
            profiles: Register::new("Actuator"),
            extended_arguments: Register::new("Args extension"),
            extended_results: Register::new("Results extension"),
            enums: HashMap::new(),
        }
    }

    /// Drop every registration, core targets included.
    pub fn clear(&mut self) {
        self.targets.clear();
        self.profiles.clear();
        self.extended_arguments.clear();
        self.extended_results.clear();
        self.enums.clear();
    }

    /// Return to the state of [`Registry::new`].
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn targets(&self) -> &Register {
        &self.targets
    }

    pub fn targets_mut(&mut self) -> &mut Register {
        &mut self.targets
    }

    pub fn profiles(&self) -> &Register {
        &self.profiles
    }

    pub fn profiles_mut(&mut self) -> &mut Register {
        &mut self.profiles
    }

    pub fn extended_arguments(&self) -> &Register {
        &self.extended_arguments
    }

    pub fn extended_arguments_mut(&mut self) -> &mut Register {
        &mut self.extended_arguments
    }

    pub fn extended_results(&self) -> &Register {
        &self.extended_results
    }

    pub fn extended_results_mut(&mut self) -> &mut Register {
        &mut self.extended_results
    }

    /// Register a Target type and make its effective name a `TargetEnum` item.
    ///
    /// Nothing is modified when either step would fail.
    pub fn add_target<T: Openc2Type + Decode>(
        &mut self,
        name: &str,
        identifier: i64,
        namespace: Option<&str>,
    ) -> Result<String> {
        let effective = qualified_name(name, namespace);
        self.targets.ensure_vacant::<T>(&effective)?;
        self.extend_enum::<TargetEnumKind>(&effective, identifier)?;
        let added = self.targets.add::<T>(name, identifier, namespace)?;
        info!(target_name = %added, id = identifier, "Registered target");
        Ok(added)
    }

    /// Register the actuator specifiers type of a profile under its nsid.
    pub fn add_profile<T: Openc2Type + Decode>(&mut self, nsid: &str, identifier: i64) -> Result<()> {
        Nsid::new(nsid)?;
        self.profiles.add::<T>(nsid, identifier, None)?;
        info!(nsid, id = identifier, "Registered actuator profile");
        Ok(())
    }

    /// Register `T` as the `nsid` extension of the extension point `P`.
    ///
    /// `T` must carry exactly the base fields of `P::Base` and nest its own
    /// fields under `nsid`. A namespace may extend each point only once.
    pub fn add_extension<P, T>(&mut self, nsid: &str) -> Result<()>
    where
        P: ExtensionPoint,
        T: MapSchema + Openc2Type + Decode,
    {
        Nsid::new(nsid)?;
        if T::BASE_FIELDS != <P::Base as MapSchema>::BASE_FIELDS {
            return Err(Openc2Error::registration(format!(
                "{} does not extend {}: base fields differ",
                T::TYPE_NAME,
                P::NAME
            )));
        }
        if T::NSID != Some(nsid) {
            return Err(Openc2Error::registration(format!(
                "{} nests its fields under {:?}, not '{}'",
                T::TYPE_NAME,
                T::NSID,
                nsid
            )));
        }
        if T::BASE_FIELDS.contains(&nsid) {
            return Err(Openc2Error::registration(format!(
                "namespace '{}' collides with a {} field",
                nsid,
                P::NAME
            )));
        }
        P::register_mut(self).add::<T>(nsid, 0, None)?;
        info!(nsid, point = P::NAME, "Registered extension");
        Ok(())
    }

    /// Append `name = value` to the enumeration `K`.
    ///
    /// Repeating an existing pair (core or extension) is a no-op returning
    /// `false`. A name or id already bound to a different partner is rejected.
    pub fn extend_enum<K: EnumKind>(&mut self, name: &str, value: i64) -> Result<bool> {
        match (K::core_by_name(name), K::core_by_value(value)) {
            (Some(v), _) if v == value => return Ok(false),
            (Some(v), _) => {
                return Err(Openc2Error::registration(format!(
                    "{} '{}' is a core item with id {}",
                    K::NAME,
                    name,
                    v
                )))
            }
            (None, Some(core)) => {
                return Err(Openc2Error::registration(format!(
                    "{} id {} is the core item '{}'",
                    K::NAME,
                    value,
                    core
                )))
            }
            (None, None) => {}
        }
        let added = self
            .enums
            .entry(TypeId::of::<K>())
            .or_default()
            .extend(K::NAME, name, value)?;
        if added {
            debug!(kind = K::NAME, name, value, "Extended enumeration");
        }
        Ok(added)
    }

    pub fn enum_table<K: EnumKind>(&self) -> Option<&EnumTable> {
        self.enums.get(&TypeId::of::<K>())
    }

    /// Freeze for concurrent read-only use.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

// Registration helpers scoped to one extension point
impl Registry {
    pub fn add_args_extension<T>(&mut self, nsid: &str) -> Result<()>
    where
        T: MapSchema + Openc2Type + Decode,
    {
        self.add_extension::<ArgsExtension, T>(nsid)
    }

    pub fn add_results_extension<T>(&mut self, nsid: &str) -> Result<()>
    where
        T: MapSchema + Openc2Type + Decode,
    {
        self.add_extension::<ResultsExtension, T>(nsid)
    }
}
