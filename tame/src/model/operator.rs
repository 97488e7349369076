#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumIter, IntoEnumIterator};

use crate::types::Capabilities;

/// Number of operands an [`Operator`] takes.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Arity {
    Unary,
    Binary,
    Ternary,
}

impl Arity {
    pub fn count(&self) -> usize {
        match self {
            Arity::Unary => 1,
            Arity::Binary => 2,
            Arity::Ternary => 3,
        }
    }
}

/// Closed set of symbolic operators.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operator {
    /// Addition
    Add,
    /// Subtraction
    Sub,
    /// Multiplication
    Mul,
    /// Division
    Div,
    /// Remainder
    Rem,
    /// Arithmetic negation
    Neg,
    /// Logical negation
    Not,
    /// Logical and
    And,
    /// Logical or
    Or,
    /// Equal
    Eq,
    /// Not equal
    Ne,
    /// Less than
    Lt,
    /// Less than or equal
    Le,
    /// Greater than
    Gt,
    /// Greater than or equal
    Ge,
    /// Element of a sequence at a natural-number position
    Index,
    /// Named member
    Access,
    /// Contiguous sub-range of a sequence
    Slice,
    /// Conditional selection
    Cond,
}

impl Operator {
    /// Creates an [`Operator`] from its string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        Operator::iter().find(|op| op.to_str() == s)
    }

    /// Returns the string representation of the [`Operator`].
    pub fn to_str(&self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Mul => "mul",
            Operator::Div => "div",
            Operator::Rem => "rem",
            Operator::Neg => "neg",
            Operator::Not => "not",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::Index => "index",
            Operator::Access => "access",
            Operator::Slice => "slice",
            Operator::Cond => "cond",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Operator::Neg | Operator::Not => Arity::Unary,
            Operator::Slice | Operator::Cond => Arity::Ternary,
            _ => Arity::Binary,
        }
    }

    /// Conventional infix/prefix symbol, for operators that have one.
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            Operator::Add => Some("+"),
            Operator::Sub | Operator::Neg => Some("-"),
            Operator::Mul => Some("*"),
            Operator::Div => Some("/"),
            Operator::Rem => Some("%"),
            Operator::Not => Some("!"),
            Operator::And => Some("&&"),
            Operator::Or => Some("||"),
            Operator::Eq => Some("=="),
            Operator::Ne => Some("!="),
            Operator::Lt => Some("<"),
            Operator::Le => Some("<="),
            Operator::Gt => Some(">"),
            Operator::Ge => Some(">="),
            Operator::Access => Some("."),
            Operator::Index | Operator::Slice | Operator::Cond => None,
        }
    }

    /// Capability the first operand's type is expected to declare.
    pub fn capability(&self) -> Capabilities {
        match self {
            Operator::Add
            | Operator::Sub
            | Operator::Mul
            | Operator::Div
            | Operator::Rem
            | Operator::Neg => Capabilities::ARITHMETIC,
            Operator::Not | Operator::And | Operator::Or | Operator::Cond => Capabilities::LOGIC,
            Operator::Eq
            | Operator::Ne
            | Operator::Lt
            | Operator::Le
            | Operator::Gt
            | Operator::Ge => Capabilities::COMPARE,
            Operator::Index => Capabilities::INDEX,
            Operator::Access => Capabilities::ACCESS,
            Operator::Slice => Capabilities::SLICE,
        }
    }

    /// Returns true for the ordering and equality comparisons.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Eq | Operator::Ne | Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Position of an operand inside an application, used in diagnostics.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OperandSide {
    Left,
    Right,
    Third,
}

impl OperandSide {
    pub fn from_position(position: usize) -> Self {
        match position {
            0 => OperandSide::Left,
            1 => OperandSide::Right,
            _ => OperandSide::Third,
        }
    }
}

impl std::fmt::Display for OperandSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OperandSide::Left => "left",
            OperandSide::Right => "right",
            OperandSide::Third => "third",
        })
    }
}
