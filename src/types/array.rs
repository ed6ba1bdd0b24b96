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

//! Ordered sequences. Position is part of the representation.

use serde_json::Value;

use crate::engine_core::errors::{Openc2Error, Result};
use crate::registry::Registry;
use crate::types::traits::{expect_array, Decode, Openc2Type};

/// Homogeneous sequence of `T` holding at most `MAX` elements.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayOf<T, const MAX: usize = { usize::MAX }> {
    items: Vec<T>,
}

impl<T, const MAX: usize> ArrayOf<T, MAX> {
    pub fn new(items: Vec<T>) -> Result<Self> {
        check_bound(items.len(), MAX)?;
        Ok(Self { items })
    }

    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) -> Result<()> {
        check_bound(self.items.len() + 1, MAX)?;
        self.items.push(item);
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T, const MAX: usize> Default for ArrayOf<T, MAX> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, T, const MAX: usize> IntoIterator for &'a ArrayOf<T, MAX> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

fn check_bound(len: usize, max: usize) -> Result<()> {
    if len > max {
        return Err(Openc2Error::value(format!(
            "array holds {} elements, at most {} allowed",
            len, max
        )));
    }
    Ok(())
}

impl<T, const MAX: usize> Openc2Type for ArrayOf<T, MAX>
where
    T: Openc2Type + Clone + PartialEq,
{
    fn encode(&self) -> Result<Value> {
        check_bound(self.items.len(), MAX)?;
        self.items
            .iter()
            .map(Openc2Type::encode)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

impl<T: Decode, const MAX: usize> Decode for ArrayOf<T, MAX> {
    fn decode(value: &Value, registry: &Registry) -> Result<Self> {
        let raw = expect_array(value, "ArrayOf")?;
        check_bound(raw.len(), MAX)?;
        let mut items = Vec::with_capacity(raw.len());
        for element in raw {
            items.push(T::decode(element, registry)?);
        }
        Ok(Self { items })
    }
}

/// Heterogeneous sequence kept in intermediate form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array(Vec<Value>);

impl Array {
    pub fn new(items: Vec<Value>) -> Self {
        Self(items)
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }
}

impl Openc2Type for Array {
    fn encode(&self) -> Result<Value> {
        Ok(Value::Array(self.0.clone()))
    }
}

impl Decode for Array {
    fn decode(value: &Value, _registry: &Registry) -> Result<Self> {
        expect_array(value, "Array").map(|items| Self(items.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type Small = ArrayOf<u64, 3>;

    #[test]
    fn test_order_preserved() {
        let registry = Registry::empty();
        let a = ArrayOf::<String>::new(vec!["b".into(), "a".into(), "c".into()]).unwrap();
        let encoded = a.encode().unwrap();
        assert_eq!(encoded, json!(["b", "a", "c"]));
        assert_eq!(ArrayOf::<String>::decode(&encoded, &registry).unwrap(), a);
    }

    #[test]
    fn test_bound() {
        let registry = Registry::empty();
        assert!(Small::new(vec![1, 2, 3]).is_ok());
        assert!(matches!(Small::new(vec![1, 2, 3, 4]), Err(Openc2Error::Value(_))));
        assert!(Small::decode(&json!([1, 2, 3, 4]), &registry).is_err());
        let mut s = Small::new(vec![1, 2, 3]).unwrap();
        assert!(s.push(4).is_err());
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_duplicates_allowed() {
        let a = Small::new(vec![7, 7]).unwrap();
        assert_eq!(a.encode().unwrap(), json!([7, 7]));
    }
}
