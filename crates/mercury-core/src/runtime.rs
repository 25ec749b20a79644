//! The seam between the engine and the inner-language runtime.
//!
//! The interpreter is a black box behind [`ScriptRuntime`]: it can compile
//! text, run a compiled unit against an argument vector, and report the
//! bindings the run produced. The engine never inspects it beyond that.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::marshal::ArgumentVector;
use crate::value::DynamicValue;

/// Black-box interface to the embedded interpreter.
///
/// Implementations must be safe to share across threads; if the underlying
/// interpreter is not reentrant, the implementation must create an
/// independent interpreter instance per `run` call rather than serializing
/// callers through shared mutable state.
pub trait ScriptRuntime: Send + Sync {
    /// Compile raw script text. Unparsable content fails [`Error::Compile`].
    ///
    /// [`Error::Compile`]: crate::error::Error::Compile
    fn compile(&self, source: &str) -> Result<CompiledUnit>;

    /// Run a compiled unit with the given argument vector, returning the
    /// named bindings the run produced. Any inner fault, including the
    /// script's own runtime errors, fails [`Error::Execution`].
    ///
    /// [`Error::Execution`]: crate::error::Error::Execution
    fn run(&self, unit: &CompiledUnit, argv: &ArgumentVector) -> Result<Bindings>;
}

/// An immutable, reusable compiled script.
///
/// The payload is the runtime's own code representation, type-erased so the
/// engine can hold it without knowing the runtime. Cloning is cheap and the
/// unit may be executed many times, from any thread.
#[derive(Clone)]
pub struct CompiledUnit {
    code: Arc<dyn Any + Send + Sync>,
    label: Option<String>,
}

impl CompiledUnit {
    /// Wrap a runtime's compiled code object.
    pub fn new<T: Any + Send + Sync>(code: T) -> Self {
        Self {
            code: Arc::new(code),
            label: None,
        }
    }

    /// Attach a diagnostic label (typically the source path).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The diagnostic label, if one was attached.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Borrow the runtime's code object. Returns `None` when the unit was
    /// produced by a different runtime.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.code.downcast_ref()
    }
}

impl fmt::Debug for CompiledUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledUnit")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// The named values a script run left behind.
#[derive(Debug, Default)]
pub struct Bindings {
    values: FxHashMap<String, DynamicValue>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a binding, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: DynamicValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&DynamicValue> {
        self.values.get(name)
    }

    /// Remove and return a binding; used for result extraction.
    pub fn take(&mut self, name: &str) -> Option<DynamicValue> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, DynamicValue)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (String, DynamicValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
