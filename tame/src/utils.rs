use strum::{EnumIs, EnumTryAs};
use thiserror::Error;

use crate::{
    model::operator::{OperandSide, Operator},
    types::TypeRef,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs, Error)]
pub enum Error {
    /// A structure was given a bit size that is not a positive multiple of 8.
    #[error("Invalid structure size: expected a positive multiple of 8 bits, got {size}.")]
    InvalidStructureSize { size: u64 },

    /// A sequence structure was given an empty length, or one whose total size
    /// overflows.
    #[error("Invalid sequence length {length}: a sequence must hold at least one element and its size in bits must fit in 64 bits.")]
    InvalidSequenceLength { length: u64 },

    /// Neither subsumption nor a common ancestor could be established between two types.
    #[error("The relation between type `{ty}` and type `{other}` is unknown: {reason}.")]
    TypeRelationUnknown {
        ty: String,
        other: String,
        reason: &'static str,
    },

    /// An operation with the same signature was already registered.
    #[error(
        "Operation `{signature}` is already registered. Use `OperationRegistry::ensure` to retrieve existing operations."
    )]
    DuplicateOperationRegistration { signature: String },

    /// The backend does not provide a handler for the given operator.
    #[error("Operator `{operator}` is not implemented in backend `{backend}`.")]
    UnsupportedOperator { operator: Operator, backend: String },

    /// The backend cannot render the given node.
    #[error("Backend `{backend}` cannot render node {node}.")]
    UnsupportedNode { node: String, backend: String },

    /// An operand does not satisfy the requirements of its operator.
    #[error("Invalid {side} operand for operator `{operator}`: {reason}.")]
    InvalidOperand {
        operator: Operator,
        side: OperandSide,
        reason: String,
    },

    /// The type reference does not belong to the registry.
    #[error("Type `{ty}` is not registered.")]
    UnknownType { ty: TypeRef },

    /// A named argument does not match any parameter slot.
    #[error("Type `{ty}` has no parameter named `{parameter}`.")]
    UnknownParameter { ty: String, parameter: String },

    /// More positional arguments than parameter slots.
    #[error("Type `{ty}` takes {expected} parameters, but {found} positional arguments were given.")]
    TooManyArguments {
        ty: String,
        expected: usize,
        found: usize,
    },

    /// An application was built with the wrong number of operands.
    #[error("Operator `{operator}` expects {expected} operands, got {found}.")]
    ArityMismatch {
        operator: Operator,
        expected: usize,
        found: usize,
    },
}

pub type TameResult<T> = Result<T, Error>;
