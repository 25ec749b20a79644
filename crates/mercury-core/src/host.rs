//! Host-side values produced by serialization.
//!
//! `HostValue` is the Rust equivalent of a script's dynamic result. Unlike
//! [`DynamicValue`](crate::value::DynamicValue), it is fully ordered and
//! hashable so serialized values can key maps and populate sets at any
//! nesting depth.
//!
//! Float contract: floating results are carried as `f64` end to end; the
//! inner runtime's double is never narrowed.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

/// A script result converted to its host representation.
#[derive(Debug, Clone)]
pub enum HostValue {
    Null,
    Bool(bool),
    /// 64-bit integer; inner integers are widened, never truncated.
    Int(i64),
    /// 64-bit float; the documented fixed width for floating results.
    Float(f64),
    Str(String),
    List(Vec<HostValue>),
    Map(BTreeMap<HostValue, HostValue>),
    Set(BTreeSet<HostValue>),
}

impl HostValue {
    /// Short type name for diagnostics and `TypeMismatch` messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Null => "null",
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "i64",
            HostValue::Float(_) => "f64",
            HostValue::Str(_) => "String",
            HostValue::List(_) => "Vec",
            HostValue::Map(_) => "BTreeMap",
            HostValue::Set(_) => "BTreeSet",
        }
    }

    /// Lossy export to JSON: sets become arrays, non-string map keys are
    /// rendered through their `Display` form.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            HostValue::Null => Value::Null,
            HostValue::Bool(b) => Value::Bool(*b),
            HostValue::Int(i) => Value::Number((*i).into()),
            HostValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            HostValue::Str(s) => Value::String(s.clone()),
            HostValue::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            HostValue::Set(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            HostValue::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json()))
                    .collect(),
            ),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            HostValue::Null => 0,
            HostValue::Bool(_) => 1,
            HostValue::Int(_) => 2,
            HostValue::Float(_) => 3,
            HostValue::Str(_) => 4,
            HostValue::List(_) => 5,
            HostValue::Map(_) => 6,
            HostValue::Set(_) => 7,
        }
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Null => write!(f, "null"),
            HostValue::Bool(b) => write!(f, "{b}"),
            HostValue::Int(i) => write!(f, "{i}"),
            HostValue::Float(x) => write!(f, "{x}"),
            HostValue::Str(s) => write!(f, "{s}"),
            HostValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            HostValue::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            HostValue::Set(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

// Total order over all variants: rank first, then contents. Floats compare
// via `total_cmp` so NaN does not break map keying.
impl Ord for HostValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (HostValue::Null, HostValue::Null) => Ordering::Equal,
            (HostValue::Bool(a), HostValue::Bool(b)) => a.cmp(b),
            (HostValue::Int(a), HostValue::Int(b)) => a.cmp(b),
            (HostValue::Float(a), HostValue::Float(b)) => a.total_cmp(b),
            (HostValue::Str(a), HostValue::Str(b)) => a.cmp(b),
            (HostValue::List(a), HostValue::List(b)) => a.cmp(b),
            (HostValue::Map(a), HostValue::Map(b)) => a.cmp(b),
            (HostValue::Set(a), HostValue::Set(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl PartialOrd for HostValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HostValue {}

impl Hash for HostValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            HostValue::Null => {}
            HostValue::Bool(b) => b.hash(state),
            HostValue::Int(i) => i.hash(state),
            HostValue::Float(f) => f.to_bits().hash(state),
            HostValue::Str(s) => s.hash(state),
            HostValue::List(items) => items.hash(state),
            HostValue::Map(entries) => {
                for (k, v) in entries {
                    k.hash(state);
                    v.hash(state);
                }
            }
            HostValue::Set(items) => {
                for item in items {
                    item.hash(state);
                }
            }
        }
    }
}

/// Typed extraction from a [`HostValue`].
///
/// Used by `ScriptEngine::evaluate_as` to check a serialized result against
/// the caller-requested type. A value that cannot be assigned fails
/// [`Error::TypeMismatch`]; numeric extraction never truncates.
pub trait FromHost: Sized {
    /// Name of the expected host type, used in mismatch messages.
    fn expected() -> &'static str;

    /// Convert, failing `TypeMismatch` when the value is not assignable.
    fn from_host(value: HostValue) -> Result<Self>;
}

fn mismatch<T: FromHost>(value: &HostValue) -> Error {
    Error::TypeMismatch {
        expected: T::expected(),
        actual: format!("{} ({value})", value.type_name()),
    }
}

impl FromHost for HostValue {
    fn expected() -> &'static str {
        "HostValue"
    }

    fn from_host(value: HostValue) -> Result<Self> {
        Ok(value)
    }
}

impl FromHost for bool {
    fn expected() -> &'static str {
        "bool"
    }

    fn from_host(value: HostValue) -> Result<Self> {
        match value {
            HostValue::Bool(b) => Ok(b),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromHost for i64 {
    fn expected() -> &'static str {
        "i64"
    }

    fn from_host(value: HostValue) -> Result<Self> {
        match value {
            HostValue::Int(i) => Ok(i),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromHost for i32 {
    fn expected() -> &'static str {
        "i32"
    }

    fn from_host(value: HostValue) -> Result<Self> {
        match value {
            HostValue::Int(i) => {
                i32::try_from(i).map_err(|_| mismatch::<Self>(&HostValue::Int(i)))
            }
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromHost for f64 {
    fn expected() -> &'static str {
        "f64"
    }

    fn from_host(value: HostValue) -> Result<Self> {
        match value {
            HostValue::Float(f) => Ok(f),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromHost for String {
    fn expected() -> &'static str {
        "String"
    }

    fn from_host(value: HostValue) -> Result<Self> {
        match value {
            HostValue::Str(s) => Ok(s),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromHost for Vec<HostValue> {
    fn expected() -> &'static str {
        "Vec<HostValue>"
    }

    fn from_host(value: HostValue) -> Result<Self> {
        match value {
            HostValue::List(items) => Ok(items),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromHost for BTreeMap<HostValue, HostValue> {
    fn expected() -> &'static str {
        "BTreeMap<HostValue, HostValue>"
    }

    fn from_host(value: HostValue) -> Result<Self> {
        match value {
            HostValue::Map(entries) => Ok(entries),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromHost for BTreeSet<HostValue> {
    fn expected() -> &'static str {
        "BTreeSet<HostValue>"
    }

    fn from_host(value: HostValue) -> Result<Self> {
        match value {
            HostValue::Set(items) => Ok(items),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}
