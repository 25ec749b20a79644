//! Shared test support: a stub inner-language runtime.
//!
//! The stub interprets a deliberately tiny line language, enough to exercise
//! the bridge contract from the outside:
//!
//! ```text
//! # comment
//! result = arg(1, 5) * arg(2, 5)
//! greeting = 'hello'
//! emit arg(1)
//! fail 'boom'
//! ```
//!
//! `arg(n)` reads argv slot `n` (slot 0 is the engine token); the two-form
//! `arg(n, default)` falls back when the slot is absent. `emit` appends the
//! evaluated value to a shared effects log so side-effect-only execution can
//! be observed. `fail` raises a runtime error.

use std::sync::{Arc, Mutex};

use mercury_core::{
    ArgumentVector, Bindings, CompiledUnit, DynamicValue, Error, Result, ScriptRuntime,
};

#[derive(Debug, Clone)]
enum Expr {
    Int(i64),
    Float(f64),
    Str(String),
    Arg(usize, Option<Box<Expr>>),
    Mul(Box<Expr>, Box<Expr>),
    List(Vec<Expr>),
}

#[derive(Debug, Clone)]
enum Stmt {
    Assign(String, Expr),
    Emit(Expr),
    Fail(String),
}

#[derive(Debug)]
struct StubProgram {
    stmts: Vec<Stmt>,
}

/// Stub interpreter behind the `ScriptRuntime` seam.
#[derive(Default)]
pub struct StubRuntime {
    effects: Arc<Mutex<Vec<DynamicValue>>>,
}

impl StubRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values emitted by executed scripts, in emission order.
    pub fn effects(&self) -> Vec<DynamicValue> {
        self.effects.lock().unwrap().clone()
    }
}

impl ScriptRuntime for StubRuntime {
    fn compile(&self, source: &str) -> Result<CompiledUnit> {
        let mut stmts = Vec::new();
        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            stmts.push(parse_stmt(line)?);
        }
        Ok(CompiledUnit::new(StubProgram { stmts }))
    }

    fn run(&self, unit: &CompiledUnit, argv: &ArgumentVector) -> Result<Bindings> {
        let program = unit
            .downcast_ref::<StubProgram>()
            .ok_or_else(|| Error::Execution("unit was compiled by a different runtime".into()))?;

        let mut bindings = Bindings::new();
        for stmt in &program.stmts {
            match stmt {
                Stmt::Assign(name, expr) => {
                    let value = eval(expr, argv)?;
                    bindings.insert(name.clone(), value);
                }
                Stmt::Emit(expr) => {
                    let value = eval(expr, argv)?;
                    self.effects.lock().unwrap().push(value);
                }
                Stmt::Fail(message) => {
                    return Err(Error::Execution(message.clone()));
                }
            }
        }
        Ok(bindings)
    }
}

/// A runtime that must never be reached; proves boundary checks fire first.
pub struct UnreachableRuntime;

impl ScriptRuntime for UnreachableRuntime {
    fn compile(&self, _source: &str) -> Result<CompiledUnit> {
        panic!("runtime was invoked for an invalid source");
    }

    fn run(&self, _unit: &CompiledUnit, _argv: &ArgumentVector) -> Result<Bindings> {
        panic!("runtime was invoked for an invalid source");
    }
}

fn parse_stmt(line: &str) -> Result<Stmt> {
    if let Some(rest) = line.strip_prefix("fail ") {
        let Expr::Str(message) = parse_expr(rest.trim())? else {
            return Err(Error::Compile(format!("fail expects a string: {line}")));
        };
        return Ok(Stmt::Fail(message));
    }
    if let Some(rest) = line.strip_prefix("emit ") {
        return Ok(Stmt::Emit(parse_expr(rest.trim())?));
    }
    let Some((name, expr)) = line.split_once('=') else {
        return Err(Error::Compile(format!("expected assignment: {line}")));
    };
    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::Compile(format!("bad binding name: {line}")));
    }
    Ok(Stmt::Assign(name.to_string(), parse_expr(expr.trim())?))
}

fn parse_expr(text: &str) -> Result<Expr> {
    let factors = split_top_level(text, '*');
    let mut parsed = factors
        .into_iter()
        .map(|f| parse_atom(f.trim()))
        .collect::<Result<Vec<_>>>()?;
    let mut expr = parsed.remove(0);
    for rhs in parsed {
        expr = Expr::Mul(Box::new(expr), Box::new(rhs));
    }
    Ok(expr)
}

fn parse_atom(text: &str) -> Result<Expr> {
    if let Some(inner) = text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
        return Ok(Expr::Str(inner.to_string()));
    }
    if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        let items = if inner.trim().is_empty() {
            Vec::new()
        } else {
            split_top_level(inner, ',')
                .into_iter()
                .map(|item| parse_expr(item.trim()))
                .collect::<Result<Vec<_>>>()?
        };
        return Ok(Expr::List(items));
    }
    if let Some(inner) = text.strip_prefix("arg(").and_then(|t| t.strip_suffix(')')) {
        let parts = split_top_level(inner, ',');
        let index: usize = parts[0]
            .trim()
            .parse()
            .map_err(|_| Error::Compile(format!("bad arg index: {text}")))?;
        let default = match parts.len() {
            1 => None,
            2 => Some(Box::new(parse_expr(parts[1].trim())?)),
            _ => return Err(Error::Compile(format!("bad arg form: {text}"))),
        };
        return Ok(Expr::Arg(index, default));
    }
    if let Ok(i) = text.parse::<i64>() {
        return Ok(Expr::Int(i));
    }
    if let Ok(f) = text.parse::<f64>() {
        return Ok(Expr::Float(f));
    }
    Err(Error::Compile(format!("unparsable expression: {text}")))
}

/// Split on `sep`, ignoring separators nested in quotes, parens, or brackets.
fn split_top_level(text: &str, sep: char) -> Vec<String> {
    let mut parts = vec![String::new()];
    let mut depth = 0usize;
    let mut quoted = false;
    for c in text.chars() {
        match c {
            '\'' => quoted = !quoted,
            '(' | '[' if !quoted => depth += 1,
            ')' | ']' if !quoted => depth = depth.saturating_sub(1),
            _ => {}
        }
        if c == sep && depth == 0 && !quoted {
            parts.push(String::new());
        } else {
            parts.last_mut().unwrap().push(c);
        }
    }
    parts
}

fn eval(expr: &Expr, argv: &ArgumentVector) -> Result<DynamicValue> {
    match expr {
        Expr::Int(i) => Ok(DynamicValue::Int(*i)),
        Expr::Float(f) => Ok(DynamicValue::Float(*f)),
        Expr::Str(s) => Ok(DynamicValue::Str(s.clone())),
        Expr::List(items) => Ok(DynamicValue::List(
            items
                .iter()
                .map(|item| eval(item, argv))
                .collect::<Result<_>>()?,
        )),
        Expr::Arg(index, default) => match argv.as_slice().get(*index) {
            Some(value) => Ok(value.clone()),
            None => match default {
                Some(default) => eval(default, argv),
                None => Err(Error::Execution(format!("missing argument {index}"))),
            },
        },
        Expr::Mul(lhs, rhs) => {
            let lhs = eval(lhs, argv)?;
            let rhs = eval(rhs, argv)?;
            match (lhs, rhs) {
                (DynamicValue::Int(a), DynamicValue::Int(b)) => Ok(DynamicValue::Int(a * b)),
                (DynamicValue::Float(a), DynamicValue::Float(b)) => Ok(DynamicValue::Float(a * b)),
                (DynamicValue::Int(a), DynamicValue::Float(b)) => {
                    Ok(DynamicValue::Float(a as f64 * b))
                }
                (DynamicValue::Float(a), DynamicValue::Int(b)) => {
                    Ok(DynamicValue::Float(a * b as f64))
                }
                (a, b) => Err(Error::Execution(format!(
                    "cannot multiply {} by {}",
                    a.kind(),
                    b.kind()
                ))),
            }
        }
    }
}
