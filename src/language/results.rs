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

//! Response results and their profile extension point.

use serde_json::Number;

use crate::engine_core::errors::{Openc2Error, Result};
use crate::impl_map;
use crate::language::actions::Action;
use crate::language::targets::TargetEnum;
use crate::registry::{Register, Registry};
use crate::types::{
    ArrayOf, Extensible, ExtensionPoint, FieldReader, FieldWriter, MapOf, MapSchema, Nsid, Version,
};

/// Targets an actuator accepts for one action.
pub type ActionTargets = ArrayOf<TargetEnum>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Results {
    pub versions: Option<ArrayOf<Version>>,
    pub profiles: Option<ArrayOf<Nsid>>,
    pub pairs: Option<MapOf<Action, ActionTargets>>,
    pub rate_limit: Option<Number>,
}

impl Results {
    pub const FIELDS: &'static [&'static str] = &["versions", "profiles", "pairs", "rate_limit"];
}

impl MapSchema for Results {
    const TYPE_NAME: &'static str = "Results";
    const BASE_FIELDS: &'static [&'static str] = Results::FIELDS;

    fn write_fields(&self, out: &mut FieldWriter) -> Result<()> {
        out.field("versions", &self.versions)?;
        out.field("profiles", &self.profiles)?;
        out.field("pairs", &self.pairs)?;
        out.field("rate_limit", &self.rate_limit)
    }

    fn read_fields(fields: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            versions: fields.optional("versions")?,
            profiles: fields.optional("profiles")?,
            pairs: fields.optional("pairs")?,
            rate_limit: fields.optional("rate_limit")?,
        })
    }

    fn validate(&self) -> Result<()> {
        match &self.rate_limit {
            Some(limit) if limit.as_f64().is_some_and(|v| v < 0.0) => Err(Openc2Error::value(
                format!("rate_limit must not be negative, got {}", limit),
            )),
            _ => Ok(()),
        }
    }
}

impl_map!(Results);

#[derive(Debug)]
pub struct ResultsExtension;

impl ExtensionPoint for ResultsExtension {
    type Base = Results;
    const NAME: &'static str = "Results";

    fn register(registry: &Registry) -> &Register {
        registry.extended_results()
    }

    fn register_mut(registry: &mut Registry) -> &mut Register {
        registry.extended_results_mut()
    }
}

/// Results of a Response: the core [`Results`] or one profile's extension.
pub type ResultsMap = Extensible<ResultsExtension>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Decode, Openc2Type};
    use serde_json::json;

    #[test]
    fn test_pairs_roundtrip() {
        let registry = Registry::new();
        let wire = json!({
            "versions": ["1.0"],
            "profiles": ["slpf"],
            "pairs": {"query": ["features"], "deny": ["ipv4_net", "ipv4_connection"]}
        });
        let results = Results::decode(&wire, &registry).unwrap();
        let pairs = results.pairs.as_ref().unwrap();
        assert_eq!(pairs.get(&Action::DENY).map(ArrayOf::len), Some(2));
        assert_eq!(results.encode().unwrap(), wire);
    }

    #[test]
    fn test_rate_limit_keeps_wire_number() {
        let registry = Registry::empty();
        for wire in [json!({"rate_limit": 5}), json!({"rate_limit": 2.5})] {
            let results = Results::decode(&wire, &registry).unwrap();
            assert_eq!(results.encode().unwrap(), wire);
        }
        assert!(Results::decode(&json!({"rate_limit": "5"}), &registry).is_err());
    }

    #[test]
    fn test_negative_rate_limit() {
        let registry = Registry::empty();
        assert!(Results::decode(&json!({"rate_limit": -1.5}), &registry).is_err());
    }
}
