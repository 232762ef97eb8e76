use std::fmt;

use thiserror::Error;

/// Operations a behavior table may refuse for a concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Less,
    Add,
    Sub,
    Mul,
    Div,
}

impl Operation {
    /// Returns the label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Operation::Less => "compare",
            Operation::Add => "add",
            Operation::Sub => "subtract",
            Operation::Mul => "multiply",
            Operation::Div => "divide",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failures reported by the containers.
///
/// Mixing two containers of different dynamic types is not an error: ordering
/// yields `false` and arithmetic yields an empty box.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypelessError {
    /// Ordering or arithmetic requested on a type that has no native support.
    #[error("attempt to {op} values of non-arithmetic type {type_name}")]
    Unsupported {
        op: Operation,
        type_name: &'static str,
    },
    /// A typed array operation named the wrong element type.
    #[error("element type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// Element index outside the live range of an array.
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

pub type Result<T, E = TypelessError> = std::result::Result<T, E>;
