//! Core engine for the Mercury embedded-script bridge.
//!
//! This crate provides:
//! - The dynamic value model produced by an embedded interpreter
//! - The serializer registry converting dynamic values to host values
//! - Argument marshalling into positional script arguments
//! - The per-call execution session and its isolation contract
//! - The `ScriptEngine` compile/execute/evaluate facade
//!
//! The interpreter itself is an external collaborator behind the
//! [`ScriptRuntime`] trait; this crate never looks past its `compile`, `run`,
//! and binding-lookup operations.

pub mod engine;
pub mod error;
pub mod host;
pub mod marshal;
pub mod runtime;
pub mod serialize;
mod session;
pub mod source;
pub mod value;

pub use engine::{DEFAULT_RESULT_BINDING, EngineConfig, ScriptEngine, ScriptRef};
pub use error::{Error, Result};
pub use host::{FromHost, HostValue};
pub use marshal::{ArgumentVector, ScriptArg};
pub use runtime::{Bindings, CompiledUnit, ScriptRuntime};
pub use serialize::{DefaultRegistry, SerializerRegistry};
pub use source::ScriptSource;
pub use value::{DynamicValue, OpaqueValue, ValueKind};
