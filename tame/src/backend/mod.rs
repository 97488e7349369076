//! Backend dispatch contract.
//!
//! A [`Backend`] turns an expression tree into a lazy stream of [`Atom`]s. The
//! trait routes every node to a handler: [`Backend::value`],
//! [`Backend::literal`], [`Backend::symbol`] or, for applications, one handler
//! per [`Operator`]. Every handler fails by default, so a backend only
//! overrides what it supports and reports the rest as
//! [`Error::UnsupportedOperator`] or [`Error::UnsupportedNode`].
//!
//! ```
//! use tame::backend::{Atom, Atoms, Backend};
//! use tame::model::{Application, Constant, Expr, Literal, Structure};
//! use tame::types::{TypeDecl, TypeRegistry};
//! use tame::TameResult;
//!
//! struct Lisp;
//!
//! impl Backend for Lisp {
//!     fn name(&self) -> &str {
//!         "lisp"
//!     }
//!
//!     fn literal<'a>(&'a self, literal: &'a Literal) -> TameResult<Atoms<'a>> {
//!         Ok(Box::new(std::iter::once(Atom::from(literal.payload.to_string()))))
//!     }
//!
//!     fn add<'a>(&'a self, left: &'a Expr, right: &'a Expr) -> TameResult<Atoms<'a>> {
//!         let atoms = std::iter::once(Atom::from("(+ "))
//!             .chain(self.on(left)?)
//!             .chain(std::iter::once(Atom::from(" ")))
//!             .chain(self.on(right)?)
//!             .chain(std::iter::once(Atom::from(")")));
//!         Ok(Box::new(atoms))
//!     }
//! }
//!
//! let types = TypeRegistry::new();
//! let natural = types.create_type(TypeDecl::new("NaturalNumber")).unwrap();
//! let one = Literal::new(natural, Structure::B32, Constant::Natural(1));
//!
//! let sum = Expr::from(Application::add(one.clone(), one.clone()));
//! assert_eq!(Lisp.render(&sum).unwrap().into_string(), "(+ 1 1)");
//!
//! let product = Expr::from(Application::mul(one.clone(), one));
//! assert!(Lisp.render(&product).unwrap_err().is_unsupported_operator());
//! ```
pub mod output;

pub use output::{Atom, Atoms, Control, Output};

use crate::{
    model::{
        application::Application,
        operator::{OperandSide, Operator},
        value::{Expr, Literal, Symbol, Value},
    },
    types::{Capabilities, TypeRegistry},
    utils::Error,
    TameResult,
};

macro_rules! define_default_handlers {
    ($($name:ident => $variant:ident($($operand:ident),+)),* $(,)?) => {
        $(
            #[doc = concat!("Handler for [`Operator::", stringify!($variant), "`]. Unsupported unless overridden.")]
            #[allow(unused_variables)]
            fn $name<'a>(&'a self, $($operand: &'a Expr),+) -> TameResult<Atoms<'a>> {
                Err(self.unsupported_operator(Operator::$variant))
            }
        )*
    };
}

pub trait Backend {
    /// Name reported in diagnostics.
    fn name(&self) -> &str;

    fn unsupported_operator(&self, operator: Operator) -> Error {
        Error::UnsupportedOperator {
            operator,
            backend: self.name().to_string(),
        }
    }

    /// Route `expr` to the matching handler.
    fn on<'a>(&'a self, expr: &'a Expr) -> TameResult<Atoms<'a>> {
        match expr {
            Expr::Value(value) => self.value(value),
            Expr::Literal(literal) => self.literal(literal),
            Expr::Symbol(symbol) => self.symbol(symbol),
            Expr::Application(application) => self.application(application),
        }
    }

    /// Render `expr` into an [`Output`].
    fn render<'a>(&'a self, expr: &'a Expr) -> TameResult<Output<'a>> {
        Ok(Output::new(self.on(expr)?))
    }

    /// Handler for payload-less values.
    fn value<'a>(&'a self, value: &'a Value) -> TameResult<Atoms<'a>> {
        Err(Error::UnsupportedNode {
            node: format!("value of type {} ({})", value.ty, value.structure),
            backend: self.name().to_string(),
        })
    }

    /// Handler for literals; defaults to [`Self::value`].
    fn literal<'a>(&'a self, literal: &'a Literal) -> TameResult<Atoms<'a>> {
        self.value(&literal.value)
    }

    fn symbol<'a>(&'a self, symbol: &'a Symbol) -> TameResult<Atoms<'a>> {
        Err(Error::UnsupportedNode {
            node: format!("symbol `{}`", symbol.name),
            backend: self.name().to_string(),
        })
    }

    /// Dispatch an application to its operator handler.
    fn application<'a>(&'a self, application: &'a Application) -> TameResult<Atoms<'a>> {
        match application.operator() {
            Operator::Add => {
                let [left, right] = application.operands_array::<2>()?;
                self.add(left, right)
            }
            Operator::Sub => {
                let [left, right] = application.operands_array::<2>()?;
                self.sub(left, right)
            }
            Operator::Mul => {
                let [left, right] = application.operands_array::<2>()?;
                self.mul(left, right)
            }
            Operator::Div => {
                let [left, right] = application.operands_array::<2>()?;
                self.div(left, right)
            }
            Operator::Rem => {
                let [left, right] = application.operands_array::<2>()?;
                self.rem(left, right)
            }
            Operator::Neg => {
                let [operand] = application.operands_array::<1>()?;
                self.neg(operand)
            }
            Operator::Not => {
                let [operand] = application.operands_array::<1>()?;
                self.not(operand)
            }
            Operator::And => {
                let [left, right] = application.operands_array::<2>()?;
                self.and(left, right)
            }
            Operator::Or => {
                let [left, right] = application.operands_array::<2>()?;
                self.or(left, right)
            }
            Operator::Eq => {
                let [left, right] = application.operands_array::<2>()?;
                self.eq(left, right)
            }
            Operator::Ne => {
                let [left, right] = application.operands_array::<2>()?;
                self.ne(left, right)
            }
            Operator::Lt => {
                let [left, right] = application.operands_array::<2>()?;
                self.lt(left, right)
            }
            Operator::Le => {
                let [left, right] = application.operands_array::<2>()?;
                self.le(left, right)
            }
            Operator::Gt => {
                let [left, right] = application.operands_array::<2>()?;
                self.gt(left, right)
            }
            Operator::Ge => {
                let [left, right] = application.operands_array::<2>()?;
                self.ge(left, right)
            }
            Operator::Index => {
                let [sequence, index] = application.operands_array::<2>()?;
                self.index(sequence, index)
            }
            Operator::Access => {
                let [target, member] = application.operands_array::<2>()?;
                self.access(target, member)
            }
            Operator::Slice => {
                let [sequence, start, end] = application.operands_array::<3>()?;
                self.slice(sequence, start, end)
            }
            Operator::Cond => {
                let [condition, then, otherwise] = application.operands_array::<3>()?;
                self.cond(condition, then, otherwise)
            }
        }
    }

    define_default_handlers! {
        add => Add(left, right),
        sub => Sub(left, right),
        mul => Mul(left, right),
        div => Div(left, right),
        rem => Rem(left, right),
        neg => Neg(operand),
        not => Not(operand),
        and => And(left, right),
        or => Or(left, right),
        eq => Eq(left, right),
        ne => Ne(left, right),
        lt => Lt(left, right),
        le => Le(left, right),
        gt => Gt(left, right),
        ge => Ge(left, right),
        index => Index(sequence, index),
        access => Access(target, member),
        slice => Slice(sequence, start, end),
        cond => Cond(condition, then, otherwise),
    }
}

/// Check the operands of an index operation.
///
/// The sequence operand must have a sequence structure and the index operand's
/// type must support [`Capabilities::NATURAL`]. Applications have neither a
/// known structure nor a known type here and are rejected.
pub fn validate_index(types: &TypeRegistry, sequence: &Expr, index: &Expr) -> TameResult<()> {
    let invalid = |side: OperandSide, reason: String| Error::InvalidOperand {
        operator: Operator::Index,
        side,
        reason,
    };

    let sequence = sequence.as_value().ok_or_else(|| {
        invalid(
            OperandSide::Left,
            format!("the structure of a nested {} is unknown", sequence.kind()),
        )
    })?;
    if !sequence.structure.is_sequence() {
        return Err(invalid(
            OperandSide::Left,
            format!("expected a sequence structure, got {}", sequence.structure),
        ));
    }

    let index_value = index.as_value().ok_or_else(|| {
        invalid(
            OperandSide::Right,
            format!("the type of a nested {} is unknown", index.kind()),
        )
    })?;
    if !types.supports(index_value.ty, Capabilities::NATURAL) {
        return Err(invalid(
            OperandSide::Right,
            format!(
                "type {} does not support natural-number indexing",
                types.fmt(index_value.ty)
            ),
        ));
    }

    Ok(())
}
