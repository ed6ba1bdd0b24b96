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

//! Features: what a `query` asks an actuator to report about itself.

use crate::engine_core::constants::limits::MAX_ARRAY_ITEMS;
use crate::types::{ArrayOf, EnumKind, Enumerated};

#[derive(Debug)]
pub struct FeatureKind;

impl EnumKind for FeatureKind {
    const NAME: &'static str = "Feature";
    const CORE: &'static [(&'static str, i64)] = &[
        ("versions", 1),
        ("profiles", 2),
        ("pairs", 3),
        ("rate_limit", 4),
    ];
}

pub type Feature = Enumerated<FeatureKind>;

impl Enumerated<FeatureKind> {
    pub const VERSIONS: Self = Self::from_static("versions", 1);
    pub const PROFILES: Self = Self::from_static("profiles", 2);
    pub const PAIRS: Self = Self::from_static("pairs", 3);
    pub const RATE_LIMIT: Self = Self::from_static("rate_limit", 4);
}

/// The `features` target: at most ten requested features.
pub type Features = ArrayOf<Feature, MAX_ARRAY_ITEMS>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_core::errors::Openc2Error;
    use crate::registry::Registry;
    use crate::types::{Decode, Openc2Type};
    use serde_json::json;

    #[test]
    fn test_features_bound() {
        assert!(Features::new(vec![Feature::VERSIONS; 10]).is_ok());
        assert!(matches!(
            Features::new(vec![Feature::VERSIONS; 11]),
            Err(Openc2Error::Value(_))
        ));
    }

    #[test]
    fn test_export_fields_extension() {
        let mut registry = Registry::empty();
        registry.extend_enum::<FeatureKind>("export_fields", 11).unwrap();
        let features = Features::decode(&json!(["versions", "export_fields"]), &registry).unwrap();
        assert_eq!(features.as_slice()[1].value(), 11);
        assert_eq!(features.encode().unwrap(), json!(["versions", "export_fields"]));
    }
}
