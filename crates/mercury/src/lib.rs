//! Mercury: embed a foreign scripting interpreter inside a Rust host.
//!
//! Mercury bridges a host program and an embedded interpreter: it compiles
//! scripts, passes positional arguments into them, runs them in isolated
//! per-call sessions, and converts the script-declared `result` binding into
//! an equivalent Rust value, including nested collections.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mercury::prelude::*;
//!
//! // `runtime` is your interpreter behind the ScriptRuntime trait.
//! let engine = ScriptEngine::new(Arc::new(runtime));
//! let unit = engine.compile_text("result = arg(1, 5) * arg(2, 5)")?;
//!
//! let product: i64 = engine.evaluate_as(&unit, args![10, 10])?;
//! assert_eq!(product, 100);
//! # Ok::<(), mercury::Error>(())
//! ```
//!
//! # Script contract
//!
//! - Effectful code belongs behind the language's entry-point guard so a
//!   script can be imported without side effects.
//! - Arguments arrive positionally; slot 0 is a reserved engine identity
//!   token, so scripts read their own arguments starting at slot 1.
//! - For evaluate-style calls the script must bind its value to the agreed
//!   name (default `"result"`) before completing; a missing binding fails
//!   with [`Error::ResultNotFound`], a script bug rather than a bridge defect.
//!
//! # Stability
//!
//! This crate is the stable user-facing API. Engine internals live in
//! `mercury-core`, which may change without notice.

pub use mercury_core::{
    ArgumentVector, Bindings, CompiledUnit, DEFAULT_RESULT_BINDING, DefaultRegistry, DynamicValue,
    EngineConfig, Error, FromHost, HostValue, OpaqueValue, Result, ScriptArg, ScriptEngine,
    ScriptRef, ScriptRuntime, ScriptSource, SerializerRegistry, ValueKind, args,
};

pub mod prelude {
    //! Common imports for embedding hosts.
    //!
    //! ```rust,ignore
    //! use mercury::prelude::*;
    //! ```

    pub use mercury_core::args;
    pub use mercury_core::{
        CompiledUnit, EngineConfig, Error, FromHost, HostValue, Result, ScriptArg, ScriptEngine,
        ScriptRuntime, ScriptSource,
    };
}
