use super::{operator::Operator, value::Expr};
use crate::{utils::Error, TameResult};

/// An operator applied to ordered operands.
///
/// Applications are purely syntactic: they carry no type until resolved
/// against an [`OperationRegistry`](super::operation::OperationRegistry).
/// The operand count always matches the operator's arity.
///
/// ```
/// use tame::model::{application::Application, operator::Operator};
/// use tame::model::{structure::Structure, value::{Constant, Literal}};
/// use tame::types::{TypeDecl, TypeRegistry};
///
/// let types = TypeRegistry::new();
/// let natural = types.create_type(TypeDecl::new("NaturalNumber")).unwrap();
/// let a = Literal::new(natural, Structure::B32, Constant::Natural(10));
/// let b = Literal::new(natural, Structure::B32, Constant::Natural(20));
///
/// let sum = Application::add(a, b);
/// assert_eq!(sum.operator(), Operator::Add);
/// assert_eq!(sum.arity(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    operator: Operator,
    operands: Vec<Expr>,
}

impl Application {
    /// Creates an application, failing with [`Error::ArityMismatch`] if the
    /// operand count does not match the operator.
    pub fn new(operator: Operator, operands: impl IntoIterator<Item = Expr>) -> TameResult<Self> {
        let operands: Vec<Expr> = operands.into_iter().collect();
        let expected = operator.arity().count();
        if operands.len() != expected {
            return Err(Error::ArityMismatch {
                operator,
                expected,
                found: operands.len(),
            });
        }
        Ok(Self { operator, operands })
    }

    #[inline]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operands(&self) -> &[Expr] {
        &self.operands
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.operands.len()
    }

    /// Operands as a fixed-size array.
    ///
    /// Fails with [`Error::ArityMismatch`] if `N` differs from the operand count.
    pub fn operands_array<const N: usize>(&self) -> TameResult<&[Expr; N]> {
        self.operands
            .as_slice()
            .try_into()
            .map_err(|_| Error::ArityMismatch {
                operator: self.operator,
                expected: N,
                found: self.operands.len(),
            })
    }
}

macro_rules! define_unary_builder {
    ($name:ident, $variant:ident) => {
        #[doc = concat!("Builds a `", stringify!($name), "` application.")]
        pub fn $name(operand: impl Into<Expr>) -> Self {
            Self {
                operator: Operator::$variant,
                operands: vec![operand.into()],
            }
        }
    };
}

macro_rules! define_binary_builder {
    ($name:ident, $variant:ident) => {
        #[doc = concat!("Builds a `", stringify!($name), "` application.")]
        pub fn $name(left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
            Self {
                operator: Operator::$variant,
                operands: vec![left.into(), right.into()],
            }
        }
    };
}

impl Application {
    define_unary_builder!(neg, Neg);
    define_unary_builder!(not, Not);

    define_binary_builder!(add, Add);
    define_binary_builder!(sub, Sub);
    define_binary_builder!(mul, Mul);
    define_binary_builder!(div, Div);
    define_binary_builder!(rem, Rem);
    define_binary_builder!(and, And);
    define_binary_builder!(or, Or);
    define_binary_builder!(eq, Eq);
    define_binary_builder!(ne, Ne);
    define_binary_builder!(lt, Lt);
    define_binary_builder!(le, Le);
    define_binary_builder!(gt, Gt);
    define_binary_builder!(ge, Ge);
    define_binary_builder!(index, Index);
    define_binary_builder!(access, Access);

    /// Builds a `slice` application over `[start, end)`.
    pub fn slice(
        sequence: impl Into<Expr>,
        start: impl Into<Expr>,
        end: impl Into<Expr>,
    ) -> Self {
        Self {
            operator: Operator::Slice,
            operands: vec![sequence.into(), start.into(), end.into()],
        }
    }

    /// Builds a `cond` application selecting `then` or `otherwise`.
    pub fn cond(
        condition: impl Into<Expr>,
        then: impl Into<Expr>,
        otherwise: impl Into<Expr>,
    ) -> Self {
        Self {
            operator: Operator::Cond,
            operands: vec![condition.into(), then.into(), otherwise.into()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{structure::Structure, value::Value},
        types::{TypeDecl, TypeRegistry},
    };

    #[test]
    fn new_checks_arity() {
        let types = TypeRegistry::new();
        let number = types.create_type(TypeDecl::new("Number")).unwrap();
        let value = Expr::from(Value::new(number, Structure::B32));

        assert_eq!(
            Application::new(Operator::Add, [value.clone()]),
            Err(Error::ArityMismatch {
                operator: Operator::Add,
                expected: 2,
                found: 1
            })
        );
        let neg = Application::new(Operator::Neg, [value.clone()]).unwrap();
        assert_eq!(neg, Application::neg(value.clone()));
        assert!(neg.operands_array::<2>().is_err());
        assert!(neg.operands_array::<1>().is_ok());
    }

    #[test]
    fn builders_nest() {
        let types = TypeRegistry::new();
        let number = types.create_type(TypeDecl::new("Number")).unwrap();
        let value = Value::new(number, Structure::B32);

        let nested = Application::mul(Application::add(value, value), value);
        let [left, right] = nested.operands_array::<2>().unwrap();
        assert!(left.is_application());
        assert!(right.is_value());
        assert_eq!(Application::cond(value, value, value).arity(), 3);
    }
}
