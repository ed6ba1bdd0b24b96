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

//! SLPF data shapes: rule numbers, argument and result extensions, specifiers.

use serde_json::Value;

use crate::engine_core::constants::limits::MAX_ARRAY_ITEMS;
use crate::engine_core::errors::Result;
use crate::language::{Args, Results};
use crate::registry::Registry;
use crate::types::traits::expect_u64;
use crate::types::{
    ArrayOf, Decode, EnumKind, Enumerated, FieldReader, FieldWriter, MapSchema, Openc2Type, Record,
};
use crate::{impl_map, impl_record};

use super::NSID;

/// Number of a rule installed by a packet filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub u64);

impl Openc2Type for RuleId {
    fn encode(&self) -> Result<Value> {
        Ok(Value::from(self.0))
    }
}

impl Decode for RuleId {
    fn decode(value: &Value, _registry: &Registry) -> Result<Self> {
        expect_u64(value, "RuleId").map(Self)
    }
}

#[derive(Debug)]
pub struct DropProcessKind;

impl EnumKind for DropProcessKind {
    const NAME: &'static str = "DropProcess";
    const CORE: &'static [(&'static str, i64)] = &[("none", 1), ("reset", 2), ("ignore", 3)];
}

/// What a `deny` does with the offending packet's sender.
pub type DropProcess = Enumerated<DropProcessKind>;

impl Enumerated<DropProcessKind> {
    pub const NONE: Self = Self::from_static("none", 1);
    pub const RESET: Self = Self::from_static("reset", 2);
    pub const IGNORE: Self = Self::from_static("ignore", 3);
}

#[derive(Debug)]
pub struct DirectionKind;

impl EnumKind for DirectionKind {
    const NAME: &'static str = "Direction";
    const CORE: &'static [(&'static str, i64)] = &[("both", 1), ("ingress", 2), ("egress", 3)];
}

pub type Direction = Enumerated<DirectionKind>;

impl Enumerated<DirectionKind> {
    pub const BOTH: Self = Self::from_static("both", 1);
    pub const INGRESS: Self = Self::from_static("ingress", 2);
    pub const EGRESS: Self = Self::from_static("egress", 3);
}

/// Core [`Args`] plus the SLPF argument fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlpfArgs {
    pub base: Args,
    pub drop_process: Option<DropProcess>,
    pub persistent: Option<bool>,
    pub direction: Option<Direction>,
    pub insert_rule: Option<RuleId>,
}

impl SlpfArgs {
    /// True when any SLPF-only field is set.
    pub fn has_extension_fields(&self) -> bool {
        self.drop_process.is_some()
            || self.persistent.is_some()
            || self.direction.is_some()
            || self.insert_rule.is_some()
    }
}

impl MapSchema for SlpfArgs {
    const TYPE_NAME: &'static str = "slpf:Args";
    const BASE_FIELDS: &'static [&'static str] = Args::FIELDS;
    const EXTENSION_FIELDS: &'static [&'static str] =
        &["drop_process", "persistent", "direction", "insert_rule"];
    const NSID: Option<&'static str> = Some(NSID);

    fn write_fields(&self, out: &mut FieldWriter) -> Result<()> {
        self.base.write_fields(out)?;
        out.field("drop_process", &self.drop_process)?;
        out.field("persistent", &self.persistent)?;
        out.field("direction", &self.direction)?;
        out.field("insert_rule", &self.insert_rule)
    }

    fn read_fields(fields: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            base: Args::read_fields(fields)?,
            drop_process: fields.optional("drop_process")?,
            persistent: fields.optional("persistent")?,
            direction: fields.optional("direction")?,
            insert_rule: fields.optional("insert_rule")?,
        })
    }
}

/// Core [`Results`] plus the rule number assigned by the filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlpfResults {
    pub base: Results,
    pub rule_number: Option<RuleId>,
}

impl MapSchema for SlpfResults {
    const TYPE_NAME: &'static str = "slpf:Results";
    const BASE_FIELDS: &'static [&'static str] = Results::FIELDS;
    const EXTENSION_FIELDS: &'static [&'static str] = &["rule_number"];
    const NSID: Option<&'static str> = Some(NSID);

    fn write_fields(&self, out: &mut FieldWriter) -> Result<()> {
        self.base.write_fields(out)?;
        out.field("rule_number", &self.rule_number)
    }

    fn read_fields(fields: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            base: Results::read_fields(fields)?,
            rule_number: fields.optional("rule_number")?,
        })
    }

    fn validate(&self) -> Result<()> {
        self.base.validate()
    }
}

impl_map!(SlpfArgs, SlpfResults);

/// Actuator specifiers: which packet filters a Command addresses.
///
/// An empty specifier set addresses every SLPF actuator of the consumer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Specifiers {
    pub hostname: Option<String>,
    pub named_group: Option<String>,
    pub asset_id: Option<String>,
    pub asset_tuple: Option<ArrayOf<String, MAX_ARRAY_ITEMS>>,
}

impl Record for Specifiers {
    const TYPE_NAME: &'static str = "slpf:Specifiers";
    const FIELDS: &'static [&'static str] = &["hostname", "named_group", "asset_id", "asset_tuple"];

    fn write_fields(&self, out: &mut FieldWriter) -> Result<()> {
        out.field("hostname", &self.hostname)?;
        out.field("named_group", &self.named_group)?;
        out.field("asset_id", &self.asset_id)?;
        out.field("asset_tuple", &self.asset_tuple)
    }

    fn read_fields(fields: &FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            hostname: fields.optional("hostname")?,
            named_group: fields.optional("named_group")?,
            asset_id: fields.optional("asset_id")?,
            asset_tuple: fields.optional("asset_tuple")?,
        })
    }
}

impl_record!(Specifiers);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_core::errors::Openc2Error;
    use serde_json::json;

    #[test]
    fn test_slpf_args_nesting() {
        let args = SlpfArgs {
            base: Args {
                start_time: Some(crate::types::DateTime::from_millis(1_700_000_000_000)),
                ..Default::default()
            },
            insert_rule: Some(RuleId(3)),
            ..Default::default()
        };
        assert!(args.has_extension_fields());
        assert_eq!(
            args.encode().unwrap(),
            json!({"start_time": 1_700_000_000_000u64, "slpf": {"insert_rule": 3}})
        );
    }

    #[test]
    fn test_asset_tuple_bound() {
        let registry = Registry::empty();
        let eleven: Vec<String> = (0..11).map(|i| i.to_string()).collect();
        assert!(matches!(
            Specifiers::decode(&json!({ "asset_tuple": eleven }), &registry),
            Err(Openc2Error::Value(_))
        ));
        let empty = Specifiers::decode(&json!({}), &registry).unwrap();
        assert_eq!(empty, Specifiers::default());
    }
}
