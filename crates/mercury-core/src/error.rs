//! Error types for mercury-core.

use thiserror::Error;

use crate::value::ValueKind;

/// Result type for mercury-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compiling, executing, or evaluating scripts.
///
/// Every failure an engine call can produce is exactly one of these variants.
/// The engine never retries on its own: script execution is assumed to carry
/// side effects that must not be silently repeated.
#[derive(Debug, Error)]
pub enum Error {
    /// The script reference was null, blank, or could not be read.
    #[error("script not found: {reference}")]
    ScriptNotFound {
        reference: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The inner runtime rejected the script text.
    #[error("compile error: {0}")]
    Compile(String),

    /// A host argument has no representable inner-language equivalent.
    #[error("argument conversion failed at position {position}: {message}")]
    ArgumentConversion { position: usize, message: String },

    /// The inner run faulted. Carries the inner fault description; no partial
    /// result is returned.
    #[error("script execution failed: {0}")]
    Execution(String),

    /// The script completed without binding the agreed result name.
    #[error("result binding '{0}' not found after script execution")]
    ResultNotFound(String),

    /// The value (or one of its nested elements) has no host equivalent.
    #[error("serialization not supported for type '{type_name}'")]
    SerializationUnsupported { type_name: String },

    /// A serializer was handed a value of a different variant than it claims.
    #[error("cannot serialize {actual} value as {expected}")]
    TypeAssertion {
        expected: ValueKind,
        actual: ValueKind,
    },

    /// A serialized result cannot be assigned to the caller-requested type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },
}

impl Error {
    /// Script-not-found without an underlying I/O cause.
    pub fn script_not_found(reference: impl Into<String>) -> Self {
        Error::ScriptNotFound {
            reference: reference.into(),
            source: None,
        }
    }

    /// Script-not-found wrapping the I/O error that made the source unreadable.
    pub fn script_unreadable(reference: impl Into<String>, source: std::io::Error) -> Self {
        Error::ScriptNotFound {
            reference: reference.into(),
            source: Some(source),
        }
    }
}
