//! Per-variant serializers.
//!
//! Each serializer wraps one value for the duration of a conversion and
//! re-validates that the value matches the variant it claims, failing
//! [`Error::TypeAssertion`] otherwise. The check guards direct construction
//! outside the registry's dispatch. Container serializers also hold the
//! registry handle they recurse through.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::host::HostValue;
use crate::value::{DynamicValue, ValueKind};

use super::registry::SerializerRegistry;

fn assertion(expected: ValueKind, value: &DynamicValue) -> Error {
    Error::TypeAssertion {
        expected,
        actual: value.kind(),
    }
}

/// Serializes `null` to [`HostValue::Null`].
pub struct NullSerializer<'a> {
    value: &'a DynamicValue,
}

impl<'a> NullSerializer<'a> {
    pub fn new(value: &'a DynamicValue) -> Self {
        Self { value }
    }

    pub fn serialize(&self) -> Result<HostValue> {
        match self.value {
            DynamicValue::Null => Ok(HostValue::Null),
            other => Err(assertion(ValueKind::Null, other)),
        }
    }
}

/// Serializes a boolean.
pub struct BoolSerializer<'a> {
    value: &'a DynamicValue,
}

impl<'a> BoolSerializer<'a> {
    pub fn new(value: &'a DynamicValue) -> Self {
        Self { value }
    }

    pub fn serialize(&self) -> Result<HostValue> {
        match self.value {
            DynamicValue::Bool(b) => Ok(HostValue::Bool(*b)),
            other => Err(assertion(ValueKind::Bool, other)),
        }
    }
}

/// Serializes an integer. The inner 64-bit value is carried as `i64`
/// unchanged; narrower inner integers were already widened by the runtime.
pub struct IntSerializer<'a> {
    value: &'a DynamicValue,
}

impl<'a> IntSerializer<'a> {
    pub fn new(value: &'a DynamicValue) -> Self {
        Self { value }
    }

    pub fn serialize(&self) -> Result<HostValue> {
        match self.value {
            DynamicValue::Int(i) => Ok(HostValue::Int(*i)),
            other => Err(assertion(ValueKind::Int, other)),
        }
    }
}

/// Serializes a float. The host width is fixed at 64 bits, so the inner
/// double crosses without narrowing.
pub struct FloatSerializer<'a> {
    value: &'a DynamicValue,
}

impl<'a> FloatSerializer<'a> {
    pub fn new(value: &'a DynamicValue) -> Self {
        Self { value }
    }

    pub fn serialize(&self) -> Result<HostValue> {
        match self.value {
            DynamicValue::Float(f) => Ok(HostValue::Float(*f)),
            other => Err(assertion(ValueKind::Float, other)),
        }
    }
}

/// Serializes a string verbatim; both sides agree on UTF-8.
pub struct StrSerializer<'a> {
    value: &'a DynamicValue,
}

impl<'a> StrSerializer<'a> {
    pub fn new(value: &'a DynamicValue) -> Self {
        Self { value }
    }

    pub fn serialize(&self) -> Result<HostValue> {
        match self.value {
            DynamicValue::Str(s) => Ok(HostValue::Str(s.clone())),
            other => Err(assertion(ValueKind::Str, other)),
        }
    }
}

/// Serializes a list, preserving length and order. Elements recurse through
/// the registry.
pub struct ListSerializer<'a> {
    value: &'a DynamicValue,
    registry: &'a dyn SerializerRegistry,
}

impl<'a> ListSerializer<'a> {
    pub fn new(value: &'a DynamicValue, registry: &'a dyn SerializerRegistry) -> Self {
        Self { value, registry }
    }

    pub fn serialize(&self) -> Result<HostValue> {
        let DynamicValue::List(items) = self.value else {
            return Err(assertion(ValueKind::List, self.value));
        };

        let serialized = items
            .iter()
            .map(|item| self.registry.serialize(item))
            .collect::<Result<Vec<_>>>()?;

        Ok(HostValue::List(serialized))
    }
}

/// Serializes a dict. Key and value are serialized independently through the
/// registry; when two distinct dynamic keys serialize to equal host keys, the
/// later entry wins.
pub struct DictSerializer<'a> {
    value: &'a DynamicValue,
    registry: &'a dyn SerializerRegistry,
}

impl<'a> DictSerializer<'a> {
    pub fn new(value: &'a DynamicValue, registry: &'a dyn SerializerRegistry) -> Self {
        Self { value, registry }
    }

    pub fn serialize(&self) -> Result<HostValue> {
        let DynamicValue::Dict(entries) = self.value else {
            return Err(assertion(ValueKind::Dict, self.value));
        };

        let mut map = BTreeMap::new();
        for (key, value) in entries {
            let key = self.registry.serialize(key)?;
            let value = self.registry.serialize(value)?;
            map.insert(key, value);
        }

        Ok(HostValue::Map(map))
    }
}

/// Serializes a set. Duplicates after serialization collapse, as expected
/// for a set.
pub struct SetSerializer<'a> {
    value: &'a DynamicValue,
    registry: &'a dyn SerializerRegistry,
}

impl<'a> SetSerializer<'a> {
    pub fn new(value: &'a DynamicValue, registry: &'a dyn SerializerRegistry) -> Self {
        Self { value, registry }
    }

    pub fn serialize(&self) -> Result<HostValue> {
        let DynamicValue::Set(items) = self.value else {
            return Err(assertion(ValueKind::Set, self.value));
        };

        let mut set = BTreeSet::new();
        for item in items {
            set.insert(self.registry.serialize(item)?);
        }

        Ok(HostValue::Set(set))
    }
}
