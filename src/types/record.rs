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

//! Records: ordered named fields with sparse encoding.
//!
//! A record declares its schema once (`FIELDS`) and moves its fields through a
//! [`FieldWriter`] / [`FieldReader`] pair. Absent (`None`) fields are left out
//! of the encoded object entirely; input keys outside the schema are rejected.

use serde_json::{Map, Value};

use crate::engine_core::errors::{Openc2Error, Result};
use crate::registry::Registry;
use crate::types::traits::{expect_object, Decode, Openc2Type};

/// Explicit field descriptor of a struct-like OpenC2 type.
pub trait Record: Sized {
    const TYPE_NAME: &'static str;
    /// Wire names of every field, in encoding order.
    const FIELDS: &'static [&'static str];

    fn write_fields(&self, out: &mut FieldWriter) -> Result<()>;
    fn read_fields(fields: &FieldReader<'_>) -> Result<Self>;

    /// Per-type invariant, checked after decode and before encode.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Wire name of a field: a trailing underscore (reserved-word dodge) is dropped.
pub fn wire_name(name: &str) -> &str {
    name.strip_suffix('_').unwrap_or(name)
}

/// Collects the encoded fields of one value.
#[derive(Debug, Default)]
pub struct FieldWriter {
    fields: Map<String, Value>,
}

impl FieldWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an optional field; `None` leaves no key behind.
    pub fn field<T: Openc2Type>(&mut self, name: &str, value: &Option<T>) -> Result<()> {
        match value {
            Some(v) => self.required(name, v),
            None => Ok(()),
        }
    }

    pub fn required<T: Openc2Type + ?Sized>(&mut self, name: &str, value: &T) -> Result<()> {
        self.fields
            .insert(wire_name(name).to_string(), value.encode()?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

/// Typed access to the fields of one decoded object.
pub struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    registry: &'a Registry,
    type_name: &'static str,
}

impl<'a> FieldReader<'a> {
    pub fn new(
        fields: &'a Map<String, Value>,
        registry: &'a Registry,
        type_name: &'static str,
    ) -> Self {
        Self {
            fields,
            registry,
            type_name,
        }
    }

    /// Missing keys are benign absence.
    pub fn optional<T: Decode>(&self, name: &str) -> Result<Option<T>> {
        self.fields
            .get(wire_name(name))
            .map(|v| T::decode(v, self.registry))
            .transpose()
    }

    pub fn required<T: Decode>(&self, name: &str) -> Result<T> {
        self.optional(name)?.ok_or_else(|| {
            Openc2Error::schema(format!(
                "{} is missing required field '{}'",
                self.type_name,
                wire_name(name)
            ))
        })
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }
}

pub fn encode_record<R: Record>(record: &R) -> Result<Value> {
    record.validate()?;
    let mut out = FieldWriter::new();
    record.write_fields(&mut out)?;
    Ok(Value::Object(out.into_map()))
}

pub fn decode_record<R: Record>(value: &Value, registry: &Registry) -> Result<R> {
    let fields = expect_object(value, R::TYPE_NAME)?;
    if let Some(unknown) = fields.keys().find(|k| !R::FIELDS.contains(&k.as_str())) {
        return Err(Openc2Error::schema(format!(
            "{} has no field '{}'",
            R::TYPE_NAME,
            unknown
        )));
    }
    let record = R::read_fields(&FieldReader::new(fields, registry, R::TYPE_NAME))?;
    record.validate()?;
    Ok(record)
}

/// Implement [`Openc2Type`] and [`Decode`] for types that implement [`Record`].
#[macro_export]
macro_rules! impl_record {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::types::Openc2Type for $ty {
                fn encode(&self) -> $crate::engine_core::errors::Result<$crate::types::Value> {
                    $crate::types::record::encode_record(self)
                }
            }

            impl $crate::types::Decode for $ty {
                fn decode(
                    value: &$crate::types::Value,
                    registry: &$crate::registry::Registry,
                ) -> $crate::engine_core::errors::Result<Self> {
                    $crate::types::record::decode_record(value, registry)
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Endpoint {
        host: Option<String>,
        port: Option<u64>,
        type_: Option<String>,
    }

    impl Record for Endpoint {
        const TYPE_NAME: &'static str = "Endpoint";
        const FIELDS: &'static [&'static str] = &["host", "port", "type"];

        fn write_fields(&self, out: &mut FieldWriter) -> Result<()> {
            out.field("host", &self.host)?;
            out.field("port", &self.port)?;
            out.field("type_", &self.type_)
        }

        fn read_fields(fields: &FieldReader<'_>) -> Result<Self> {
            Ok(Self {
                host: fields.optional("host")?,
                port: fields.optional("port")?,
                type_: fields.optional("type_")?,
            })
        }
    }

    crate::impl_record!(Endpoint);

    #[test]
    fn test_sparse_encoding() {
        let e = Endpoint {
            host: Some("fw1".into()),
            ..Default::default()
        };
        assert_eq!(e.encode().unwrap(), json!({"host": "fw1"}));
        assert_eq!(Endpoint::default().encode().unwrap(), json!({}));
    }

    #[test]
    fn test_trailing_underscore_stripped() {
        let registry = Registry::empty();
        let e = Endpoint {
            type_: Some("edge".into()),
            port: Some(443),
            ..Default::default()
        };
        let encoded = e.encode().unwrap();
        assert_eq!(encoded, json!({"port": 443, "type": "edge"}));
        assert_eq!(Endpoint::decode(&encoded, &registry).unwrap(), e);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let registry = Registry::empty();
        let err = Endpoint::decode(&json!({"unknown_field": 1}), &registry).unwrap_err();
        assert!(matches!(err, Openc2Error::Schema(_)));
        assert!(err.to_string().contains("unknown_field"));
    }
}
