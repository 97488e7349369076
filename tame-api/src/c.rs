//! C text backend.
//!
//! Renders literals, symbols and operator applications as C expression text.
//! Nested applications are parenthesized and wrapped in
//! [`Control::Start`]/[`Control::End`] so a structured renderer can re-indent
//! them. [`CBackend::statement`] and [`CBackend::declare`] terminate their
//! output with `;` and an end-of-line token.
use std::{iter::once, sync::Arc};

use either::Either;
use log::trace;
use strum::{Display, EnumIter, IntoEnumIterator};
use tame::{
    Error, TameResult,
    backend::{Atom, Atoms, Backend, Control, Output, validate_index},
    model::{Constant, Expr, Literal, Operator, Symbol, Value},
    types::{Capabilities, TypeRef, TypeRegistry},
};

/// Scalar C types the backend can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum CType {
    #[strum(serialize = "bool")]
    Bool,
    #[strum(serialize = "uint8_t")]
    U8,
    #[strum(serialize = "uint16_t")]
    U16,
    #[strum(serialize = "uint32_t")]
    U32,
    #[strum(serialize = "uint64_t")]
    U64,
    #[strum(serialize = "int8_t")]
    I8,
    #[strum(serialize = "int16_t")]
    I16,
    #[strum(serialize = "int32_t")]
    I32,
    #[strum(serialize = "int64_t")]
    I64,
    #[strum(serialize = "float")]
    F32,
    #[strum(serialize = "double")]
    F64,
}

impl CType {
    pub fn bits(&self) -> u64 {
        match self {
            CType::Bool | CType::U8 | CType::I8 => 8,
            CType::U16 | CType::I16 => 16,
            CType::U32 | CType::I32 | CType::F32 => 32,
            CType::U64 | CType::I64 | CType::F64 => 64,
        }
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(self, CType::U8 | CType::U16 | CType::U32 | CType::U64)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, CType::F32 | CType::F64)
    }

    /// C type of `bits` bits for a type declaring `capabilities`.
    pub fn select(capabilities: Capabilities, bits: u64) -> Option<Self> {
        CType::iter().find(|candidate| {
            candidate.bits() == bits
                && if capabilities.contains(Capabilities::DECIMAL) {
                    candidate.is_float()
                } else if capabilities.contains(Capabilities::NATURAL) {
                    candidate.is_unsigned()
                } else if capabilities.contains(Capabilities::ARITHMETIC) {
                    !candidate.is_unsigned() && !candidate.is_float() && *candidate != CType::Bool
                } else {
                    capabilities.contains(Capabilities::LOGIC) && *candidate == CType::Bool
                }
        })
    }
}

fn text(fragment: impl Into<Atom>) -> std::iter::Once<Atom> {
    once(fragment.into())
}

/// C spelling of a constant. Non-finite decimals use the `<math.h>` macros.
fn constant(value: &Constant) -> String {
    match value {
        Constant::Decimal(value) if value.is_nan() => "NAN".to_string(),
        Constant::Decimal(value) if value.is_infinite() => {
            if value.is_sign_negative() { "-INFINITY" } else { "INFINITY" }.to_string()
        }
        Constant::Sequence(items) => {
            let items: Vec<String> = items.iter().map(constant).collect();
            format!("{{{}}}", items.join(", "))
        }
        other => other.to_string(),
    }
}

/// Backend rendering expressions as C source text.
pub struct CBackend {
    types: Arc<TypeRegistry>,
}

impl CBackend {
    pub fn new(types: Arc<TypeRegistry>) -> Self {
        Self { types }
    }

    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    fn unsupported(&self, node: String) -> Error {
        Error::UnsupportedNode {
            node,
            backend: self.name().to_string(),
        }
    }

    /// C type of a scalar value, or of the items of a sequence value.
    ///
    /// Sequence items take the type bound to the first parameter of the value's
    /// type, e.g. `T` for `Array[T=NaturalNumber]`.
    pub fn c_type(&self, value: &Value) -> TameResult<CType> {
        let (ty, bits) = match value.structure.item_size() {
            Some(item_size) => (self.item_type(value.ty)?, item_size),
            None => (value.ty, value.size()),
        };

        let capabilities = self
            .types
            .get(ty)
            .map(|ty| ty.capabilities())
            .ok_or(Error::UnknownType { ty })?;

        CType::select(capabilities, bits).ok_or_else(|| {
            self.unsupported(format!("{}-bit value of type {}", bits, self.types.fmt(ty)))
        })
    }

    fn item_type(&self, sequence: TypeRef) -> TameResult<TypeRef> {
        self.types
            .get(sequence)
            .and_then(|ty| ty.parameters().next().map(|(_, item)| item))
            .ok_or_else(|| {
                self.unsupported(format!("sequence of type {} without item type", self.types.fmt(sequence)))
            })
    }

    /// Operand text, parenthesized when the operand is itself an application.
    fn operand<'a>(&'a self, expr: &'a Expr) -> TameResult<Atoms<'a>> {
        let atoms = self.on(expr)?;
        let wrapped = if expr.is_application() {
            Either::Left(
                text("(")
                    .chain(text(Control::Start))
                    .chain(atoms)
                    .chain(text(Control::End))
                    .chain(text(")")),
            )
        } else {
            Either::Right(atoms)
        };
        Ok(Box::new(wrapped))
    }

    fn infix<'a>(&'a self, operator: Operator, left: &'a Expr, right: &'a Expr) -> TameResult<Atoms<'a>> {
        let symbol = operator
            .symbol()
            .ok_or_else(|| self.unsupported_operator(operator))?;
        trace!("Rendering infix `{}`", symbol);

        Ok(Box::new(
            self.operand(left)?
                .chain(text(format!(" {} ", symbol)))
                .chain(self.operand(right)?),
        ))
    }

    fn prefix<'a>(&'a self, operator: Operator, operand: &'a Expr) -> TameResult<Atoms<'a>> {
        let symbol = operator
            .symbol()
            .ok_or_else(|| self.unsupported_operator(operator))?;
        Ok(Box::new(text(symbol).chain(self.operand(operand)?)))
    }

    /// `expr;` followed by an end of line.
    pub fn statement<'a>(&'a self, expr: &'a Expr) -> TameResult<Output<'a>> {
        Ok(Output::new(Box::new(
            self.on(expr)?.chain(text(";")).chain(text(Control::Eol)),
        )))
    }

    /// Declaration of `symbol` initialised with `init`, e.g.
    /// `uint32_t xs[10] = {0, ...};`.
    pub fn declare<'a>(&'a self, symbol: &'a Symbol, init: &'a Expr) -> TameResult<Output<'a>> {
        let c_type = self.c_type(&symbol.value)?;
        let dimension = match symbol.value.structure.length() {
            Some(length) => format!("[{}]", length),
            None => String::new(),
        };

        Ok(Output::new(Box::new(
            text(format!("{} {}{} = ", c_type, symbol.name, dimension))
                .chain(self.on(init)?)
                .chain(text(";"))
                .chain(text(Control::Eol)),
        )))
    }
}

impl Backend for CBackend {
    fn name(&self) -> &str {
        "c"
    }

    fn literal<'a>(&'a self, literal: &'a Literal) -> TameResult<Atoms<'a>> {
        Ok(Box::new(text(constant(&literal.payload))))
    }

    fn symbol<'a>(&'a self, symbol: &'a Symbol) -> TameResult<Atoms<'a>> {
        Ok(Box::new(text(symbol.name.clone())))
    }

    fn add<'a>(&'a self, left: &'a Expr, right: &'a Expr) -> TameResult<Atoms<'a>> {
        self.infix(Operator::Add, left, right)
    }

    fn sub<'a>(&'a self, left: &'a Expr, right: &'a Expr) -> TameResult<Atoms<'a>> {
        self.infix(Operator::Sub, left, right)
    }

    fn mul<'a>(&'a self, left: &'a Expr, right: &'a Expr) -> TameResult<Atoms<'a>> {
        self.infix(Operator::Mul, left, right)
    }

    fn div<'a>(&'a self, left: &'a Expr, right: &'a Expr) -> TameResult<Atoms<'a>> {
        self.infix(Operator::Div, left, right)
    }

    fn rem<'a>(&'a self, left: &'a Expr, right: &'a Expr) -> TameResult<Atoms<'a>> {
        self.infix(Operator::Rem, left, right)
    }

    fn neg<'a>(&'a self, operand: &'a Expr) -> TameResult<Atoms<'a>> {
        self.prefix(Operator::Neg, operand)
    }

    fn not<'a>(&'a self, operand: &'a Expr) -> TameResult<Atoms<'a>> {
        self.prefix(Operator::Not, operand)
    }

    fn and<'a>(&'a self, left: &'a Expr, right: &'a Expr) -> TameResult<Atoms<'a>> {
        self.infix(Operator::And, left, right)
    }

    fn or<'a>(&'a self, left: &'a Expr, right: &'a Expr) -> TameResult<Atoms<'a>> {
        self.infix(Operator::Or, left, right)
    }

    fn eq<'a>(&'a self, left: &'a Expr, right: &'a Expr) -> TameResult<Atoms<'a>> {
        self.infix(Operator::Eq, left, right)
    }

    fn ne<'a>(&'a self, left: &'a Expr, right: &'a Expr) -> TameResult<Atoms<'a>> {
        self.infix(Operator::Ne, left, right)
    }

    fn lt<'a>(&'a self, left: &'a Expr, right: &'a Expr) -> TameResult<Atoms<'a>> {
        self.infix(Operator::Lt, left, right)
    }

    fn le<'a>(&'a self, left: &'a Expr, right: &'a Expr) -> TameResult<Atoms<'a>> {
        self.infix(Operator::Le, left, right)
    }

    fn gt<'a>(&'a self, left: &'a Expr, right: &'a Expr) -> TameResult<Atoms<'a>> {
        self.infix(Operator::Gt, left, right)
    }

    fn ge<'a>(&'a self, left: &'a Expr, right: &'a Expr) -> TameResult<Atoms<'a>> {
        self.infix(Operator::Ge, left, right)
    }

    fn index<'a>(&'a self, sequence: &'a Expr, index: &'a Expr) -> TameResult<Atoms<'a>> {
        validate_index(&self.types, sequence, index)?;
        Ok(Box::new(
            self.operand(sequence)?
                .chain(text("["))
                .chain(self.on(index)?)
                .chain(text("]")),
        ))
    }

    fn cond<'a>(&'a self, condition: &'a Expr, then: &'a Expr, otherwise: &'a Expr) -> TameResult<Atoms<'a>> {
        Ok(Box::new(
            self.operand(condition)?
                .chain(text(" ? "))
                .chain(self.operand(then)?)
                .chain(text(" : "))
                .chain(self.operand(otherwise)?),
        ))
    }
}
