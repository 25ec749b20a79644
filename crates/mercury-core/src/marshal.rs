//! Host-argument marshalling.
//!
//! Converts an ordered, heterogeneous sequence of host values into the
//! positional argument vector a script sees. Slot 0 is reserved for the
//! engine identity token; caller arguments occupy slots 1..N, converted 1:1
//! in order with no renaming and no content validation. Scripts read their
//! own arguments starting at slot 1.

use crate::error::{Error, Result};
use crate::value::DynamicValue;

/// A host value destined for a script's argument vector.
///
/// Captures the host value as given; conversion into the inner
/// representation happens at marshal time so that an unrepresentable value
/// fails the call with [`Error::ArgumentConversion`] instead of panicking at
/// the call site.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptArg {
    Null,
    Bool(bool),
    Int(i64),
    /// Unsigned host integer; range-checked against `i64` at marshal time.
    UInt(u64),
    Float(f64),
    Str(String),
    List(Vec<ScriptArg>),
    Map(Vec<(ScriptArg, ScriptArg)>),
    Set(Vec<ScriptArg>),
}

impl ScriptArg {
    fn into_dynamic(self, position: usize) -> Result<DynamicValue> {
        let converted = match self {
            ScriptArg::Null => DynamicValue::Null,
            ScriptArg::Bool(b) => DynamicValue::Bool(b),
            ScriptArg::Int(i) => DynamicValue::Int(i),
            ScriptArg::UInt(u) => {
                let i = i64::try_from(u).map_err(|_| Error::ArgumentConversion {
                    position,
                    message: format!("unsigned value {u} exceeds the inner 64-bit integer range"),
                })?;
                DynamicValue::Int(i)
            }
            ScriptArg::Float(f) => DynamicValue::Float(f),
            ScriptArg::Str(s) => DynamicValue::Str(s),
            ScriptArg::List(items) => DynamicValue::List(
                items
                    .into_iter()
                    .map(|item| item.into_dynamic(position))
                    .collect::<Result<_>>()?,
            ),
            ScriptArg::Map(entries) => DynamicValue::Dict(
                entries
                    .into_iter()
                    .map(|(k, v)| Ok((k.into_dynamic(position)?, v.into_dynamic(position)?)))
                    .collect::<Result<_>>()?,
            ),
            ScriptArg::Set(items) => DynamicValue::Set(
                items
                    .into_iter()
                    .map(|item| item.into_dynamic(position))
                    .collect::<Result<_>>()?,
            ),
        };

        Ok(converted)
    }
}

macro_rules! arg_from {
    ($variant:ident: $($ty:ty),+) => {
        $(impl From<$ty> for ScriptArg {
            fn from(v: $ty) -> Self {
                ScriptArg::$variant(v.into())
            }
        })+
    };
}

arg_from!(Bool: bool);
arg_from!(Int: i8, i16, i32, i64, u8, u16, u32);
arg_from!(UInt: u64);
arg_from!(Float: f32, f64);
arg_from!(Str: &str, String);

impl From<usize> for ScriptArg {
    fn from(v: usize) -> Self {
        ScriptArg::UInt(v as u64)
    }
}

impl<T: Into<ScriptArg>> From<Option<T>> for ScriptArg {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ScriptArg::Null)
    }
}

impl<T: Into<ScriptArg>> From<Vec<T>> for ScriptArg {
    fn from(v: Vec<T>) -> Self {
        ScriptArg::List(v.into_iter().map(Into::into).collect())
    }
}

/// Build a heterogeneous argument list.
///
/// ```
/// use mercury_core::args;
///
/// let arguments = args![10, "label", 2.5];
/// assert_eq!(arguments.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => { Vec::<$crate::marshal::ScriptArg>::new() };
    ($($arg:expr),+ $(,)?) => {
        vec![$($crate::marshal::ScriptArg::from($arg)),+]
    };
}

/// The positional argument vector handed to the inner runtime.
///
/// Slot 0 always holds the engine identity token.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentVector(Vec<DynamicValue>);

impl ArgumentVector {
    /// The reserved slot-0 engine identity token.
    pub fn token(&self) -> &DynamicValue {
        &self.0[0]
    }

    /// Caller arguments, i.e. slots 1..N.
    pub fn args(&self) -> &[DynamicValue] {
        &self.0[1..]
    }

    /// The full vector as a script's argv sees it.
    pub fn as_slice(&self) -> &[DynamicValue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Convert host arguments into the positional vector for one call.
///
/// Position numbering in conversion errors matches the caller's view: the
/// first caller argument is position 1.
pub fn marshal(token: &str, args: Vec<ScriptArg>) -> Result<ArgumentVector> {
    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push(DynamicValue::Str(token.to_string()));

    for (index, arg) in args.into_iter().enumerate() {
        argv.push(arg.into_dynamic(index + 1)?);
    }

    Ok(ArgumentVector(argv))
}
