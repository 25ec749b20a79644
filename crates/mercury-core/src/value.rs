//! Dynamic values produced by the inner runtime.
//!
//! `DynamicValue` is a faithful tagged transcript of whatever the executed
//! script produced, before any host conversion. Container variants keep the
//! inner runtime's element order; collision and duplicate handling happen
//! later, during serialization.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A value produced by an executed script, prior to host conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    /// Absence of a value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value, 64-bit.
    Int(i64),
    /// Floating value, IEEE 754 double.
    Float(f64),
    /// Text value, UTF-8.
    Str(String),
    /// Ordered sequence of values.
    List(Vec<DynamicValue>),
    /// Key/value pairs in the inner runtime's iteration order.
    Dict(Vec<(DynamicValue, DynamicValue)>),
    /// Distinct values in the inner runtime's iteration order.
    Set(Vec<DynamicValue>),
    /// An inner-runtime value with no host equivalent.
    Opaque(OpaqueValue),
}

impl DynamicValue {
    /// The variant tag, used for serializer dispatch and error messages.
    pub fn kind(&self) -> ValueKind {
        match self {
            DynamicValue::Null => ValueKind::Null,
            DynamicValue::Bool(_) => ValueKind::Bool,
            DynamicValue::Int(_) => ValueKind::Int,
            DynamicValue::Float(_) => ValueKind::Float,
            DynamicValue::Str(_) => ValueKind::Str,
            DynamicValue::List(_) => ValueKind::List,
            DynamicValue::Dict(_) => ValueKind::Dict,
            DynamicValue::Set(_) => ValueKind::Set,
            DynamicValue::Opaque(_) => ValueKind::Opaque,
        }
    }
}

/// Variant tags for [`DynamicValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
    Dict,
    Set,
    Opaque,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
            ValueKind::List => "list",
            ValueKind::Dict => "dict",
            ValueKind::Set => "set",
            ValueKind::Opaque => "opaque",
        };
        write!(f, "{name}")
    }
}

/// An unconvertible inner-runtime value.
///
/// Carries the concrete inner type name for error reporting, and optionally
/// the runtime's own handle so a custom [`SerializerRegistry`] can still reach
/// the underlying object.
///
/// [`SerializerRegistry`]: crate::serialize::SerializerRegistry
#[derive(Clone)]
pub struct OpaqueValue {
    type_name: String,
    payload: Option<Arc<dyn Any + Send + Sync>>,
}

impl OpaqueValue {
    /// Opaque marker with just the inner type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            payload: None,
        }
    }

    /// Opaque value that keeps the runtime's own handle attached.
    pub fn with_payload(
        type_name: impl Into<String>,
        payload: impl Any + Send + Sync,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            payload: Some(Arc::new(payload)),
        }
    }

    /// The concrete inner-runtime type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Borrow the attached handle, if one was kept and matches `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref().and_then(|p| p.downcast_ref())
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueValue")
            .field("type_name", &self.type_name)
            .field("payload", &self.payload.is_some())
            .finish()
    }
}

// Identity comparison: two opaque values are equal only when they share the
// same attached handle (or both have none and the same type name).
impl PartialEq for OpaqueValue {
    fn eq(&self, other: &Self) -> bool {
        if self.type_name != other.type_name {
            return false;
        }
        match (&self.payload, &other.payload) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl From<bool> for DynamicValue {
    fn from(v: bool) -> Self {
        DynamicValue::Bool(v)
    }
}

impl From<i64> for DynamicValue {
    fn from(v: i64) -> Self {
        DynamicValue::Int(v)
    }
}

impl From<f64> for DynamicValue {
    fn from(v: f64) -> Self {
        DynamicValue::Float(v)
    }
}

impl From<&str> for DynamicValue {
    fn from(v: &str) -> Self {
        DynamicValue::Str(v.to_string())
    }
}

impl From<String> for DynamicValue {
    fn from(v: String) -> Self {
        DynamicValue::Str(v)
    }
}
