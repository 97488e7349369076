//! Values, literals, symbols and the [`Expr`] tree node.
use std::ops::Deref;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumIs, EnumTryAs};

use super::{application::Application, structure::Structure};
use crate::types::TypeRef;

/// A typed value with a known physical layout.
///
/// Values hold a non-owning [`TypeRef`]; constructing one never touches the
/// registry.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Value {
    pub ty: TypeRef,
    pub structure: Structure,
}

impl Value {
    pub fn new(ty: TypeRef, structure: Structure) -> Self {
        Self { ty, structure }
    }

    /// Size in bits, as given by the structure.
    #[inline]
    pub fn size(&self) -> u64 {
        self.structure.size()
    }
}

/// Concrete payload carried by a [`Literal`].
#[derive(Debug, Clone, PartialEq, EnumIs, EnumTryAs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constant {
    Natural(u64),
    Integer(i64),
    Decimal(f64),
    Bool(bool),
    Sequence(Vec<Constant>),
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Natural(value) => write!(f, "{}", value),
            Constant::Integer(value) => write!(f, "{}", value),
            Constant::Decimal(value) => write!(f, "{:?}", value),
            Constant::Bool(value) => write!(f, "{}", value),
            Constant::Sequence(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// A [`Value`] carrying a concrete payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal<V = Constant> {
    pub value: Value,
    pub payload: V,
}

impl<V> Literal<V> {
    pub fn new(ty: TypeRef, structure: Structure, payload: V) -> Self {
        Self {
            value: Value::new(ty, structure),
            payload,
        }
    }
}

impl<V> Deref for Literal<V> {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.value
    }
}

/// A named reference to a value, e.g. a variable in generated code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub name: String,
    pub value: Value,
}

impl Symbol {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Node of an expression tree.
#[derive(Debug, Clone, PartialEq, EnumIs, EnumTryAs)]
pub enum Expr {
    Value(Value),
    Literal(Literal),
    Symbol(Symbol),
    Application(Application),
}

impl Expr {
    /// The underlying value, for every node except applications, which stay
    /// untyped until resolved.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Expr::Value(value) => Some(value),
            Expr::Literal(literal) => Some(&literal.value),
            Expr::Symbol(symbol) => Some(&symbol.value),
            Expr::Application(_) => None,
        }
    }

    /// Short description used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Value(_) => "value",
            Expr::Literal(_) => "literal",
            Expr::Symbol(_) => "symbol",
            Expr::Application(_) => "application",
        }
    }
}

macro_rules! define_expr_from {
    ($typ:ty, $variant:ident) => {
        impl From<$typ> for Expr {
            fn from(node: $typ) -> Self {
                Expr::$variant(node)
            }
        }
    };
}

define_expr_from!(Value, Value);
define_expr_from!(Literal, Literal);
define_expr_from!(Symbol, Symbol);
define_expr_from!(Application, Application);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TypeDecl, TypeRegistry};

    #[test]
    fn literal_derefs_to_value() {
        let types = TypeRegistry::new();
        let natural = types.create_type(TypeDecl::new("NaturalNumber")).unwrap();
        let literal = Literal::new(natural, Structure::B32, Constant::Natural(10));
        assert_eq!(literal.size(), 32);
        assert_eq!(literal.ty, natural);

        let expr = Expr::from(literal.clone());
        assert_eq!(expr.as_value(), Some(&literal.value));
        assert!(expr.is_literal());
    }

    #[test]
    fn constants_render_as_source_text() {
        assert_eq!(Constant::Natural(10).to_string(), "10");
        assert_eq!(Constant::Integer(-3).to_string(), "-3");
        assert_eq!(Constant::Decimal(2.0).to_string(), "2.0");
        assert_eq!(
            Constant::Sequence(vec![Constant::Natural(1), Constant::Natural(2)]).to_string(),
            "{1, 2}"
        );
    }
}
