//! The script engine facade.
//!
//! `ScriptEngine` composes the runtime seam, argument marshalling, the
//! per-call execution session, and the serializer registry behind the
//! compile/execute/evaluate surface. The engine itself is stateless and
//! reentrant: apart from its injected read-only collaborators it holds
//! nothing, and no call mutates state outside its own session.

use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::host::{FromHost, HostValue};
use crate::marshal::ScriptArg;
use crate::runtime::{CompiledUnit, ScriptRuntime};
use crate::serialize::{DefaultRegistry, SerializerRegistry};
use crate::session::ExecutionSession;
use crate::source::ScriptSource;

/// Default name of the binding a script must set for evaluate-style calls.
pub const DEFAULT_RESULT_BINDING: &str = "result";

/// Construction-time configuration.
#[derive(Default)]
pub struct EngineConfig {
    /// Replaces the built-in 8-variant serializer mapping. Once configured,
    /// the engine uses this registry exclusively for its lifetime.
    pub serializer_registry: Option<Arc<dyn SerializerRegistry>>,
    /// Overrides the well-known result binding name.
    pub result_binding: Option<String>,
}

/// A script reference accepted by execute/evaluate: either an unresolved
/// source or an already-compiled unit.
pub enum ScriptRef {
    Source(ScriptSource),
    Unit(CompiledUnit),
}

impl From<ScriptSource> for ScriptRef {
    fn from(source: ScriptSource) -> Self {
        ScriptRef::Source(source)
    }
}

impl From<CompiledUnit> for ScriptRef {
    fn from(unit: CompiledUnit) -> Self {
        ScriptRef::Unit(unit)
    }
}

impl From<&CompiledUnit> for ScriptRef {
    fn from(unit: &CompiledUnit) -> Self {
        ScriptRef::Unit(unit.clone())
    }
}

/// Compile, execute, and evaluate scripts against an embedded runtime.
///
/// Calls block the calling thread for the duration of the inner run; the
/// engine adds no worker pool and cannot preempt a non-terminating script.
/// Concurrent calls from multiple threads are safe: compiled units are
/// immutable and freely shared, and every call gets an independent execution
/// session, so concurrent calls never observe each other's arguments or
/// bindings.
pub struct ScriptEngine {
    runtime: Arc<dyn ScriptRuntime>,
    registry: Arc<dyn SerializerRegistry>,
    result_binding: String,
    /// Identity token carried in argv slot 0 of every call.
    token: String,
}

impl ScriptEngine {
    /// Engine with the default serializer registry and result binding.
    pub fn new(runtime: Arc<dyn ScriptRuntime>) -> Self {
        Self::with_config(runtime, EngineConfig::default())
    }

    /// Engine with explicit configuration.
    pub fn with_config(runtime: Arc<dyn ScriptRuntime>, config: EngineConfig) -> Self {
        let registry = config
            .serializer_registry
            .unwrap_or_else(|| Arc::new(DefaultRegistry));
        let result_binding = config
            .result_binding
            .unwrap_or_else(|| DEFAULT_RESULT_BINDING.to_string());

        Self {
            runtime,
            registry,
            result_binding,
            token: format!("mercury/{}", Uuid::new_v4()),
        }
    }

    /// The identity token scripts see in argv slot 0.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Compile a script source into a reusable unit.
    pub fn compile(&self, source: ScriptSource) -> Result<CompiledUnit> {
        let label = source.label();
        let text = source.resolve()?;
        tracing::debug!("compiling script {label}");
        Ok(self.runtime.compile(&text)?.with_label(label))
    }

    /// Compile in-memory script text.
    pub fn compile_text(&self, text: &str) -> Result<CompiledUnit> {
        self.compile(ScriptSource::Text(text.to_string()))
    }

    /// Compile a batch of sources, keyed by each source's identity: its path
    /// or URL, or a position-stamped label for inline and reader sources,
    /// which have no location of their own.
    ///
    /// The batch is fail-fast: the first source that fails to resolve or
    /// compile aborts the whole batch and no partial map is returned. A
    /// duplicate identity aborts the batch the same way; entries are never
    /// silently overwritten.
    pub fn compile_all(
        &self,
        sources: impl IntoIterator<Item = ScriptSource>,
    ) -> Result<BTreeMap<String, CompiledUnit>> {
        let mut units = BTreeMap::new();
        for (index, source) in sources.into_iter().enumerate() {
            let identity = match &source {
                ScriptSource::Text(_) => format!("(inline#{index})"),
                ScriptSource::Reader(_) => format!("(reader#{index})"),
                _ => source.label(),
            };
            if units.contains_key(&identity) {
                return Err(Error::Compile(format!(
                    "duplicate script identity '{identity}' in batch"
                )));
            }
            let unit = self.compile(source)?;
            units.insert(identity, unit);
        }
        Ok(units)
    }

    /// Run a script for its side effects only.
    pub fn execute(&self, script: impl Into<ScriptRef>, args: Vec<ScriptArg>) -> Result<()> {
        let unit = self.resolve_ref(script.into())?;
        let mut session = ExecutionSession::new();
        session.bind(&self.token, args)?;
        session.run(self.runtime.as_ref(), &unit)?;
        Ok(())
    }

    /// Run a script and serialize its result binding into a host value.
    pub fn evaluate(
        &self,
        script: impl Into<ScriptRef>,
        args: Vec<ScriptArg>,
    ) -> Result<HostValue> {
        let unit = self.resolve_ref(script.into())?;
        let mut session = ExecutionSession::new();
        session.bind(&self.token, args)?;
        session.run(self.runtime.as_ref(), &unit)?;
        let result = session.extract(&self.result_binding)?;
        tracing::debug!(
            "serializing {} result from {}",
            result.kind(),
            unit.label().unwrap_or("(unlabeled)")
        );
        self.registry.serialize(&result)
    }

    /// Run a script and extract its result as `T`, failing `TypeMismatch`
    /// when the serialized value is not assignable.
    pub fn evaluate_as<T: FromHost>(
        &self,
        script: impl Into<ScriptRef>,
        args: Vec<ScriptArg>,
    ) -> Result<T> {
        T::from_host(self.evaluate(script, args)?)
    }

    fn resolve_ref(&self, script: ScriptRef) -> Result<CompiledUnit> {
        match script {
            ScriptRef::Unit(unit) => Ok(unit),
            ScriptRef::Source(source) => self.compile(source),
        }
    }
}
