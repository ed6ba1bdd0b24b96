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

//! Maps: named-field dictionaries with profile extension support.
//!
//! A base Map (no namespace) encodes all of its fields at the top level. An
//! extension Map carries the base fields plus its own; the base fields stay at
//! the top level while the extra ones travel nested under the extension's
//! namespace id:
//!
//! ```text
//! {"start_time": 1700000000000, "slpf": {"insert_rule": 3}}
//! ```
//!
//! [`Extensible`] is the polymorphic holder used wherever "the base Map or any
//! registered extension of it" is accepted. Decoding it partitions the input
//! keys into base fields and registered namespaces and builds the variant the
//! partition selects.

use serde_json::{Map, Number, Value};
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

use crate::engine_core::errors::{Openc2Error, Result};
use crate::registry::{Register, Registry};
use crate::types::record::{FieldReader, FieldWriter};
use crate::types::traits::{expect_object, Decode, DynValue, Openc2Type};

/// Field-level schema of a Map type.
pub trait MapSchema: Sized {
    const TYPE_NAME: &'static str;
    /// Fields of the base Map, emitted at the top level.
    const BASE_FIELDS: &'static [&'static str];
    /// Fields added on top of the base; empty for a base Map.
    const EXTENSION_FIELDS: &'static [&'static str] = &[];
    /// Namespace id the extension fields are nested under.
    const NSID: Option<&'static str> = None;

    fn write_fields(&self, out: &mut FieldWriter) -> Result<()>;
    fn read_fields(fields: &FieldReader<'_>) -> Result<Self>;

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

pub fn encode_map<M: MapSchema>(map: &M) -> Result<Value> {
    map.validate()?;
    let mut out = FieldWriter::new();
    map.write_fields(&mut out)?;

    let mut top = Map::new();
    let mut nested = Map::new();
    for (key, value) in out.into_map() {
        if M::BASE_FIELDS.contains(&key.as_str()) {
            top.insert(key, value);
        } else if M::EXTENSION_FIELDS.contains(&key.as_str()) {
            nested.insert(key, value);
        } else {
            return Err(Openc2Error::value(format!(
                "{} has no field '{}'",
                M::TYPE_NAME,
                key
            )));
        }
    }
    if !nested.is_empty() {
        let nsid = M::NSID.ok_or_else(|| {
            Openc2Error::value(format!("{} declares extension fields without a namespace", M::TYPE_NAME))
        })?;
        top.insert(nsid.to_string(), Value::Object(nested));
    }
    Ok(Value::Object(top))
}

pub fn decode_map<M: MapSchema>(value: &Value, registry: &Registry) -> Result<M> {
    let obj = expect_object(value, M::TYPE_NAME)?;
    let mut flat = Map::new();
    for (key, field) in obj {
        if M::BASE_FIELDS.contains(&key.as_str()) {
            flat.insert(key.clone(), field.clone());
        } else if M::NSID == Some(key.as_str()) {
            for (inner_key, inner) in expect_object(field, key)? {
                if !M::EXTENSION_FIELDS.contains(&inner_key.as_str()) {
                    return Err(Openc2Error::schema(format!(
                        "{} has no field '{}:{}'",
                        M::TYPE_NAME,
                        key,
                        inner_key
                    )));
                }
                flat.insert(inner_key.clone(), inner.clone());
            }
        } else {
            return Err(Openc2Error::schema(format!(
                "{} has no field '{}'",
                M::TYPE_NAME,
                key
            )));
        }
    }
    let map = M::read_fields(&FieldReader::new(&flat, registry, M::TYPE_NAME))?;
    map.validate()?;
    Ok(map)
}

/// Implement [`Openc2Type`] and [`Decode`] for types that implement [`MapSchema`].
#[macro_export]
macro_rules! impl_map {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::types::Openc2Type for $ty {
                fn encode(&self) -> $crate::engine_core::errors::Result<$crate::types::Value> {
                    $crate::types::map::encode_map(self)
                }
            }

            impl $crate::types::Decode for $ty {
                fn decode(
                    value: &$crate::types::Value,
                    registry: &$crate::registry::Registry,
                ) -> $crate::engine_core::errors::Result<Self> {
                    $crate::types::map::decode_map(value, registry)
                }
            }
        )+
    };
}

/// A base Map together with the register of its extensions.
pub trait ExtensionPoint: 'static {
    type Base: MapSchema + Openc2Type + Decode;
    const NAME: &'static str;

    fn register(registry: &Registry) -> &Register;
    fn register_mut(registry: &mut Registry) -> &mut Register;
}

/// The base Map of `P` or exactly one registered extension of it.
pub struct Extensible<P: ExtensionPoint> {
    nsid: Option<String>,
    value: Box<dyn Openc2Type>,
    _point: PhantomData<fn() -> P>,
}

impl<P: ExtensionPoint> Extensible<P> {
    pub fn base(value: P::Base) -> Self {
        Self {
            nsid: None,
            value: Box::new(value),
            _point: PhantomData,
        }
    }

    /// Wrap the base Map or a registered extension of it.
    pub fn new<T: Openc2Type>(value: T, registry: &Registry) -> Result<Self> {
        let any = &value as &dyn Any;
        if let Some(existing) = any.downcast_ref::<Self>() {
            return Ok(existing.clone());
        }
        if TypeId::of::<T>() == TypeId::of::<P::Base>() {
            return Ok(Self {
                nsid: None,
                value: Box::new(value),
                _point: PhantomData,
            });
        }
        let nsid = P::register(registry)
            .name_of_type(TypeId::of::<T>())
            .ok_or_else(|| {
                Openc2Error::schema(format!(
                    "{} is not a registered {} extension",
                    std::any::type_name::<T>(),
                    P::NAME
                ))
            })?;
        Ok(Self {
            nsid: Some(nsid.to_string()),
            value: Box::new(value),
            _point: PhantomData,
        })
    }

    /// Namespace of the extension held, `None` for the base Map.
    pub fn nsid(&self) -> Option<&str> {
        self.nsid.as_deref()
    }

    pub fn get_obj(&self) -> &dyn Openc2Type {
        self.value.as_ref()
    }

    pub fn downcast_ref<T: Openc2Type>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn is<T: Openc2Type>(&self) -> bool {
        self.value.is::<T>()
    }

    /// The base Map fields of the held variant.
    pub fn to_base(&self, registry: &Registry) -> Result<P::Base> {
        let encoded = self.value.encode()?;
        let base: Map<String, Value> = expect_object(&encoded, P::NAME)?
            .iter()
            .filter(|(k, _)| P::Base::BASE_FIELDS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        P::Base::decode(&Value::Object(base), registry)
    }
}

impl<P: ExtensionPoint> Clone for Extensible<P> {
    fn clone(&self) -> Self {
        Self {
            nsid: self.nsid.clone(),
            value: self.value.clone(),
            _point: PhantomData,
        }
    }
}

impl<P: ExtensionPoint> PartialEq for Extensible<P> {
    fn eq(&self, other: &Self) -> bool {
        self.nsid == other.nsid && self.value.dyn_eq(other.value.as_ref())
    }
}

impl<P: ExtensionPoint> fmt::Debug for Extensible<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(P::NAME)
            .field("nsid", &self.nsid)
            .field("value", &self.value)
            .finish()
    }
}

impl<P: ExtensionPoint> Openc2Type for Extensible<P> {
    fn encode(&self) -> Result<Value> {
        self.value.encode()
    }
}

impl<P: ExtensionPoint> Decode for Extensible<P> {
    fn decode(value: &Value, registry: &Registry) -> Result<Self> {
        let obj = expect_object(value, P::NAME)?;
        let candidates = obj
            .keys()
            .map(String::as_str)
            .filter(|k| !P::Base::BASE_FIELDS.contains(k));
        match P::register(registry).resolve(candidates)? {
            Some(entry) => Ok(Self {
                nsid: Some(entry.name().to_string()),
                value: entry.decode(value, registry)?,
                _point: PhantomData,
            }),
            None => P::Base::decode(value, registry).map(Self::base),
        }
    }
}

/// Homogeneous dictionary `K -> V`. Insertion order is kept but not significant.
#[derive(Debug, Clone)]
pub struct MapOf<K, V> {
    entries: Vec<(K, V)>,
}

impl<K: PartialEq, V: PartialEq> PartialEq for MapOf<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: PartialEq, V> MapOf<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace; returns the previous value of `key`.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: PartialEq, V> Default for MapOf<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq, V> FromIterator<(K, V)> for MapOf<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K, V> Openc2Type for MapOf<K, V>
where
    K: Openc2Type + Clone + PartialEq,
    V: Openc2Type + Clone + PartialEq,
{
    fn encode(&self) -> Result<Value> {
        let mut out = Map::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            let key = match key.encode()? {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(Openc2Error::type_error(format!(
                        "MapOf key must encode to a string or number, got {}",
                        other
                    )))
                }
            };
            out.insert(key, value.encode()?);
        }
        Ok(Value::Object(out))
    }
}

impl<K, V> Decode for MapOf<K, V>
where
    K: Decode + PartialEq,
    V: Decode,
{
    fn decode(value: &Value, registry: &Registry) -> Result<Self> {
        let obj = expect_object(value, "MapOf")?;
        let mut entries = Vec::with_capacity(obj.len());
        for (key, inner) in obj {
            entries.push((decode_key(key, registry)?, V::decode(inner, registry)?));
        }
        Ok(Self { entries })
    }
}

// Numeric keys travel as their decimal text.
fn decode_key<K: Decode>(key: &str, registry: &Registry) -> Result<K> {
    match K::decode(&Value::String(key.to_string()), registry) {
        Err(Openc2Error::Type(reason)) => match key.parse::<Number>() {
            Ok(number) => K::decode(&Value::Number(number), registry),
            Err(_) => Err(Openc2Error::Type(reason)),
        },
        decoded => decoded,
    }
}
