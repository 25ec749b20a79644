//! Serializer dispatch.

use crate::error::{Error, Result};
use crate::host::HostValue;
use crate::value::{DynamicValue, ValueKind};

use super::serializers::{
    BoolSerializer, DictSerializer, FloatSerializer, IntSerializer, ListSerializer,
    NullSerializer, SetSerializer, StrSerializer,
};

/// Capability that converts dynamic values into host values.
///
/// Implementations must hold no per-call mutable state; one registry instance
/// is shared read-only across all calls of an engine. Container serializers
/// recurse through the registry they were constructed with, so replacing the
/// registry changes how nested values convert as well.
pub trait SerializerRegistry: Send + Sync {
    /// Convert one dynamic value, recursing into containers.
    fn serialize(&self, value: &DynamicValue) -> Result<HostValue>;
}

/// The built-in 8-variant mapping.
///
/// | inner | host |
/// |---|---|
/// | null | `HostValue::Null` |
/// | bool | `bool` |
/// | int | `i64`, widened, never truncated |
/// | float | `f64` (the documented fixed width) |
/// | str | `String`, verbatim UTF-8 |
/// | list | `Vec`, order and length preserved |
/// | dict | `BTreeMap`; colliding serialized keys resolve last-write-wins |
/// | set | `BTreeSet`; duplicates after serialization collapse |
///
/// Opaque values fail [`Error::SerializationUnsupported`] naming the concrete
/// inner-runtime type; they are never silently converted to null.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRegistry;

impl SerializerRegistry for DefaultRegistry {
    fn serialize(&self, value: &DynamicValue) -> Result<HostValue> {
        match value.kind() {
            ValueKind::Null => NullSerializer::new(value).serialize(),
            ValueKind::Bool => BoolSerializer::new(value).serialize(),
            ValueKind::Int => IntSerializer::new(value).serialize(),
            ValueKind::Float => FloatSerializer::new(value).serialize(),
            ValueKind::Str => StrSerializer::new(value).serialize(),
            ValueKind::List => ListSerializer::new(value, self).serialize(),
            ValueKind::Dict => DictSerializer::new(value, self).serialize(),
            ValueKind::Set => SetSerializer::new(value, self).serialize(),
            ValueKind::Opaque => {
                let type_name = match value {
                    DynamicValue::Opaque(opaque) => opaque.type_name().to_string(),
                    _ => unreachable!("kind() said Opaque"),
                };
                tracing::warn!("no serializer for inner type '{type_name}'");
                Err(Error::SerializationUnsupported { type_name })
            }
        }
    }
}
