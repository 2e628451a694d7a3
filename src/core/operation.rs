use crate::utils::error::{EventedError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

type BinaryFn = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// Built-in arithmetic.
pub mod calculator {
    pub fn add(a: f64, b: f64) -> f64 {
        a + b
    }

    pub fn subtract(a: f64, b: f64) -> f64 {
        a - b
    }

    pub fn multiply(a: f64, b: f64) -> f64 {
        a * b
    }

    /// NaN when `b` is zero.
    pub fn divide(a: f64, b: f64) -> f64 {
        if b != 0.0 {
            a / b
        } else {
            f64::NAN
        }
    }
}

/// A named, non-empty sequence of binary functions.
///
/// Invoking it calls every function with the same operands, in order, and
/// returns the last result.
#[derive(Clone)]
pub struct Operation {
    name: String,
    first: BinaryFn,
    rest: Vec<BinaryFn>,
}

impl Operation {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            first: Arc::new(f),
            rest: Vec::new(),
        }
    }

    /// Appends `next`'s functions after this operation's.
    pub fn then(mut self, next: Operation) -> Self {
        self.name = format!("{} + {}", self.name, next.name);
        self.rest.push(next.first);
        self.rest.extend(next.rest);
        self
    }

    pub fn compose<I>(first: Operation, rest: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        rest.into_iter().fold(first, Operation::then)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of composed functions.
    pub fn step_count(&self) -> usize {
        1 + self.rest.len()
    }

    pub fn invoke(&self, a: f64, b: f64) -> f64 {
        self.rest
            .iter()
            .fold((self.first)(a, b), |_, f| f(a, b))
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("steps", &self.step_count())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Add,
        OperationKind::Subtract,
        OperationKind::Multiply,
        OperationKind::Divide,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Subtract => "subtract",
            OperationKind::Multiply => "multiply",
            OperationKind::Divide => "divide",
        }
    }

    pub fn operation(self) -> Operation {
        let f: fn(f64, f64) -> f64 = match self {
            OperationKind::Add => calculator::add,
            OperationKind::Subtract => calculator::subtract,
            OperationKind::Multiply => calculator::multiply,
            OperationKind::Divide => calculator::divide,
        };
        Operation::new(self.as_str(), f)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = EventedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "add" | "+" => Ok(OperationKind::Add),
            "subtract" | "sub" | "-" => Ok(OperationKind::Subtract),
            "multiply" | "mul" | "*" => Ok(OperationKind::Multiply),
            "divide" | "div" | "/" => Ok(OperationKind::Divide),
            _ => Err(EventedError::UnknownOperation {
                name: s.to_string(),
            }),
        }
    }
}

/// Composes the named built-ins in order; `None` when `kinds` is empty.
pub fn compose_kinds(kinds: &[OperationKind]) -> Option<Operation> {
    let (first, rest) = kinds.split_first()?;
    Some(Operation::compose(
        first.operation(),
        rest.iter().map(|kind| kind.operation()),
    ))
}

/// Applies operations and writes `Result: <value>` lines.
pub struct OperationDispatcher<W: Write> {
    out: W,
}

impl<W: Write> OperationDispatcher<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn apply(&mut self, a: f64, b: f64, operation: &Operation) -> Result<f64> {
        let result = operation.invoke(a, b);
        tracing::debug!("{}({}, {}) = {}", operation.name(), a, b, result);
        writeln!(self.out, "Result: {}", result)?;
        Ok(result)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
