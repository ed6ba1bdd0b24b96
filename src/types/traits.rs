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

//! Serialization capability traits.
//!
//! Every value that participates in an OpenC2 message implements
//! [`Openc2Type`] (value -> intermediate form) and [`Decode`]
//! (intermediate form -> value). The intermediate form is a
//! `serde_json::Value` tree.

use serde_json::{Map, Number, Value};
use std::any::Any;
use std::fmt::Debug;

use crate::engine_core::errors::{Openc2Error, Result};
use crate::registry::Registry;

/// Object-safe plumbing shared by all OpenC2 values.
///
/// Implemented automatically for every `Openc2Type` that is `Clone + PartialEq`.
pub trait DynValue: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn clone_box(&self) -> Box<dyn Openc2Type>;
    fn dyn_eq(&self, other: &dyn Openc2Type) -> bool;
    fn type_name(&self) -> &'static str;
}

impl<T> DynValue for T
where
    T: Openc2Type + Clone + PartialEq,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn Openc2Type> {
        Box::new(self.clone())
    }

    fn dyn_eq(&self, other: &dyn Openc2Type) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A value with an OpenC2 external representation.
pub trait Openc2Type: DynValue {
    /// Convert into the intermediate form.
    fn encode(&self) -> Result<Value>;
}

/// Reconstruction from the intermediate form.
///
/// The registry resolves Choice tags, enumeration extensions and
/// Map extension namespaces.
pub trait Decode: Sized {
    fn decode(value: &Value, registry: &Registry) -> Result<Self>;
}

impl Clone for Box<dyn Openc2Type> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl PartialEq for Box<dyn Openc2Type> {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other.as_ref())
    }
}

impl dyn Openc2Type {
    pub fn is<T: Openc2Type>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Openc2Type>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

// --- Host scalars ---

impl Openc2Type for String {
    fn encode(&self) -> Result<Value> {
        Ok(Value::String(self.clone()))
    }
}

impl Decode for String {
    fn decode(value: &Value, _registry: &Registry) -> Result<Self> {
        expect_str(value, "String").map(str::to_string)
    }
}

impl Openc2Type for bool {
    fn encode(&self) -> Result<Value> {
        Ok(Value::Bool(*self))
    }
}

impl Decode for bool {
    fn decode(value: &Value, _registry: &Registry) -> Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| Openc2Error::type_error(format!("expected boolean, got {}", value)))
    }
}

impl Openc2Type for i64 {
    fn encode(&self) -> Result<Value> {
        Ok(Value::from(*self))
    }
}

impl Decode for i64 {
    fn decode(value: &Value, _registry: &Registry) -> Result<Self> {
        expect_i64(value, "Integer")
    }
}

impl Openc2Type for u64 {
    fn encode(&self) -> Result<Value> {
        Ok(Value::from(*self))
    }
}

impl Decode for u64 {
    fn decode(value: &Value, _registry: &Registry) -> Result<Self> {
        expect_u64(value, "Integer")
    }
}

// Numbers keep their wire text, so `5` never comes back as `5.0`.
impl Openc2Type for Number {
    fn encode(&self) -> Result<Value> {
        Ok(Value::Number(self.clone()))
    }
}

impl Decode for Number {
    fn decode(value: &Value, _registry: &Registry) -> Result<Self> {
        match value {
            Value::Number(n) => Ok(n.clone()),
            other => Err(Openc2Error::type_error(format!("expected number, got {}", other))),
        }
    }
}

// Recursive types (a Process and its parent)
impl<T: Openc2Type + Clone + PartialEq> Openc2Type for Box<T> {
    fn encode(&self) -> Result<Value> {
        self.as_ref().encode()
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(value: &Value, registry: &Registry) -> Result<Self> {
        T::decode(value, registry).map(Box::new)
    }
}

// --- Shape helpers used by every decoder ---

pub(crate) fn expect_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Openc2Error::type_error(format!("{} expects an object, got {}", what, value)))
}

pub(crate) fn expect_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| Openc2Error::type_error(format!("{} expects an array, got {}", what, value)))
}

pub(crate) fn expect_str<'a>(value: &'a Value, what: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Openc2Error::type_error(format!("{} expects a string, got {}", what, value)))
}

pub(crate) fn expect_i64(value: &Value, what: &str) -> Result<i64> {
    value
        .as_i64()
        .ok_or_else(|| Openc2Error::type_error(format!("{} expects an integer, got {}", what, value)))
}

pub(crate) fn expect_u64(value: &Value, what: &str) -> Result<u64> {
    match value.as_u64() {
        Some(v) => Ok(v),
        None if value.as_i64().is_some() => Err(Openc2Error::value(format!(
            "{} must not be negative, got {}",
            what, value
        ))),
        None => Err(Openc2Error::type_error(format!(
            "{} expects an integer, got {}",
            what, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boxed_values_compare_by_content() {
        let a: Box<dyn Openc2Type> = Box::new("x".to_string());
        let b: Box<dyn Openc2Type> = Box::new("x".to_string());
        let c: Box<dyn Openc2Type> = Box::new(true);
        assert!(a == b);
        assert!(a != c);
        assert!(a.is::<String>());
        assert_eq!(a.downcast_ref::<String>().map(String::as_str), Some("x"));
    }

    #[test]
    fn test_scalar_shape_errors() {
        let registry = Registry::empty();
        assert!(matches!(
            String::decode(&json!(1), &registry),
            Err(Openc2Error::Type(_))
        ));
        assert!(matches!(
            u64::decode(&json!(-1), &registry),
            Err(Openc2Error::Value(_))
        ));
        assert!(f64::NAN.encode().is_err());
    }
}
