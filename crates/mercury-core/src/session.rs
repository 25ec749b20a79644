//! Per-call execution sessions.
//!
//! An `ExecutionSession` binds one argument vector to one run of one
//! compiled unit. It is created inside an engine call, driven through
//! `Created → Bound → Ran → {ResultExtracted | Failed}`, and dropped when
//! the call returns. It is never exposed, persisted, or reused: sharing a
//! session across calls would leak arguments and bindings between unrelated
//! callers, which is exactly the defect this type exists to prevent.

use crate::error::{Error, Result};
use crate::marshal::{self, ArgumentVector, ScriptArg};
use crate::runtime::{Bindings, CompiledUnit, ScriptRuntime};
use crate::value::DynamicValue;

/// Lifecycle states of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Created,
    Bound,
    Ran,
}

/// One-shot run context: one argument vector, one run, one result lookup.
#[derive(Debug)]
pub(crate) struct ExecutionSession {
    state: SessionState,
    argv: Option<ArgumentVector>,
    bindings: Option<Bindings>,
}

impl ExecutionSession {
    pub(crate) fn new() -> Self {
        Self {
            state: SessionState::Created,
            argv: None,
            bindings: None,
        }
    }

    /// `Created → Bound`: marshal host arguments into the argument vector.
    pub(crate) fn bind(&mut self, token: &str, args: Vec<ScriptArg>) -> Result<()> {
        self.expect_state(SessionState::Created)?;

        self.argv = Some(marshal::marshal(token, args)?);
        self.state = SessionState::Bound;
        Ok(())
    }

    /// `Bound → Ran`: execute the unit against this session's arguments.
    pub(crate) fn run(&mut self, runtime: &dyn ScriptRuntime, unit: &CompiledUnit) -> Result<()> {
        self.expect_state(SessionState::Bound)?;

        let argv = self.argv.as_ref().expect("bound session has argv");
        self.bindings = Some(runtime.run(unit, argv)?);
        self.state = SessionState::Ran;
        Ok(())
    }

    /// `Ran → ResultExtracted`: remove and return the named result binding.
    pub(crate) fn extract(&mut self, name: &str) -> Result<DynamicValue> {
        self.expect_state(SessionState::Ran)?;

        self.bindings
            .as_mut()
            .expect("ran session has bindings")
            .take(name)
            .ok_or_else(|| Error::ResultNotFound(name.to_string()))
    }

    fn expect_state(&self, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::Execution(format!(
                "session used out of order: in state {:?}, expected {expected:?}",
                self.state
            )))
        }
    }
}
