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

//! Choice: a tagged union over the types registered in one [`Register`].
//!
//! On the wire a Choice is a single-key object `{name: value}`.

use serde_json::{Map, Value};
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

use crate::engine_core::errors::{Openc2Error, Result};
use crate::registry::{Register, Registry};
use crate::types::traits::{expect_object, Decode, DynValue, Openc2Type};

/// Binds a Choice to the register that owns its variants.
pub trait ChoiceKind: 'static {
    const NAME: &'static str;

    fn register(registry: &Registry) -> &Register;
    fn register_mut(registry: &mut Registry) -> &mut Register;
}

pub struct Choice<K: ChoiceKind> {
    name: String,
    value: Box<dyn Openc2Type>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ChoiceKind> Choice<K> {
    /// Wrap a concrete value under its registered name.
    ///
    /// A value that already is a `Choice<K>` is kept as it is. Lookup is by
    /// type identity: an unregistered type is a schema error.
    pub fn new<T: Openc2Type>(value: T, registry: &Registry) -> Result<Self> {
        if let Some(existing) = (&value as &dyn Any).downcast_ref::<Self>() {
            return Ok(existing.clone());
        }
        let name = K::register(registry)
            .name_of_type(TypeId::of::<T>())
            .ok_or_else(|| {
                Openc2Error::schema(format!(
                    "{} is not a registered {}",
                    std::any::type_name::<T>(),
                    K::NAME
                ))
            })?;
        Ok(Self {
            name: name.to_string(),
            value: Box::new(value),
            _kind: PhantomData,
        })
    }

    /// Registered name of the held variant.
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// The held variant.
    pub fn get_obj(&self) -> &dyn Openc2Type {
        self.value.as_ref()
    }

    pub fn downcast_ref<T: Openc2Type>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn is<T: Openc2Type>(&self) -> bool {
        self.value.is::<T>()
    }
}

impl<K: ChoiceKind> Clone for Choice<K> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            value: self.value.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: ChoiceKind> PartialEq for Choice<K> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value.dyn_eq(other.value.as_ref())
    }
}

impl<K: ChoiceKind> fmt::Debug for Choice<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(K::NAME)
            .field("name", &self.name)
            .field("value", &self.value)
            .finish()
    }
}

impl<K: ChoiceKind> Openc2Type for Choice<K> {
    fn encode(&self) -> Result<Value> {
        let mut out = Map::with_capacity(1);
        out.insert(self.name.clone(), self.value.encode()?);
        Ok(Value::Object(out))
    }
}

impl<K: ChoiceKind> Decode for Choice<K> {
    fn decode(value: &Value, registry: &Registry) -> Result<Self> {
        let obj = expect_object(value, K::NAME)?;
        if obj.len() != 1 {
            return Err(Openc2Error::value(format!(
                "{} must have exactly one key, got {}",
                K::NAME,
                obj.len()
            )));
        }
        let entry = K::register(registry)
            .resolve(obj.keys().map(String::as_str))?
            .ok_or_else(|| {
                Openc2Error::schema(format!(
                    "unknown {} '{}'",
                    K::NAME,
                    obj.keys().next().map(String::as_str).unwrap_or_default()
                ))
            })?;
        let inner = obj
            .get(entry.name())
            .ok_or_else(|| Openc2Error::schema(format!("missing {} value", K::NAME)))?;
        Ok(Self {
            name: entry.name().to_string(),
            value: entry.decode(inner, registry)?,
            _kind: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Shapes;
    impl ChoiceKind for Shapes {
        const NAME: &'static str = "Shape";
        fn register(registry: &Registry) -> &Register {
            registry.targets()
        }
        fn register_mut(registry: &mut Registry) -> &mut Register {
            registry.targets_mut()
        }
    }

    fn registry() -> Registry {
        let mut registry = Registry::empty();
        Shapes::register_mut(&mut registry)
            .add::<String>("label", 1, None)
            .unwrap();
        registry
    }

    #[test]
    fn test_roundtrip() {
        let registry = registry();
        let c = Choice::<Shapes>::new("x".to_string(), &registry).unwrap();
        assert_eq!(c.get_name(), "label");
        let encoded = c.encode().unwrap();
        assert_eq!(encoded, json!({"label": "x"}));
        assert_eq!(Choice::<Shapes>::decode(&encoded, &registry).unwrap(), c);
    }

    #[test]
    fn test_rewrap_keeps_choice() {
        let registry = registry();
        let c = Choice::<Shapes>::new("x".to_string(), &registry).unwrap();
        let again = Choice::<Shapes>::new(c.clone(), &registry).unwrap();
        assert_eq!(again, c);
    }

    #[test]
    fn test_equality_compares_payload() {
        let registry = registry();
        let a = Choice::<Shapes>::new("x".to_string(), &registry).unwrap();
        let b = Choice::<Shapes>::new("x".to_string(), &registry).unwrap();
        let c = Choice::<Shapes>::new("y".to_string(), &registry).unwrap();
        assert!(a == b);
        assert!(a != c);
        assert_eq!(a.downcast_ref::<String>(), b.downcast_ref::<String>());
    }

    #[test]
    fn test_single_key_invariant() {
        let registry = registry();
        assert!(matches!(
            Choice::<Shapes>::decode(&json!({}), &registry),
            Err(Openc2Error::Value(_))
        ));
        assert!(matches!(
            Choice::<Shapes>::decode(&json!({"label": "a", "other": "b"}), &registry),
            Err(Openc2Error::Value(_))
        ));
        assert!(matches!(
            Choice::<Shapes>::decode(&json!({"circle": 1}), &registry),
            Err(Openc2Error::Schema(_))
        ));
    }

    #[test]
    fn test_unregistered_type_rejected() {
        let registry = registry();
        assert!(matches!(
            Choice::<Shapes>::new(true, &registry),
            Err(Openc2Error::Schema(_))
        ));
    }
}
