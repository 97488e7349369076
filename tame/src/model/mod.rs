//! Expression model: physical layout, values, operators, applications and
//! the operation registry.

pub mod application;
pub mod operation;
pub mod operator;
pub mod structure;
pub mod value;

pub use application::Application;
pub use operation::{Operation, OperationName, OperationRegistry, Signature};
pub use operator::{Arity, OperandSide, Operator};
pub use structure::Structure;
pub use value::{Constant, Expr, Literal, Symbol, Value};
