//! Registered, memoized operations.
//!
//! An [`Operation`] ties an operator (or a custom name) applied to specific
//! operand types to a result type. Operations are created once per
//! [`Signature`] and shared through [`Arc`]s; going through
//! [`OperationRegistry::ensure`] is the idempotent way to obtain one.
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, trace};
use parking_lot::RwLock;
use smallvec::SmallVec;

use super::{application::Application, operator::Operator, value::Expr};
use crate::{
    types::{TypeRef, TypeRegistry},
    utils::Error,
    TameResult,
};

/// Name part of an operation signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationName {
    Operator(Operator),
    /// User-defined operation, rendered with a leading `:`.
    Custom(String),
}

impl From<Operator> for OperationName {
    fn from(operator: Operator) -> Self {
        OperationName::Operator(operator)
    }
}

impl std::fmt::Display for OperationName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationName::Operator(operator) => write!(f, "{}", operator),
            OperationName::Custom(name) => write!(f, ":{}", name),
        }
    }
}

/// Canonical key of an operation: its name and ordered operand types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub name: OperationName,
    pub operands: SmallVec<[TypeRef; 3]>,
}

impl Signature {
    pub fn new(name: impl Into<OperationName>, operands: impl IntoIterator<Item = TypeRef>) -> Self {
        Self {
            name: name.into(),
            operands: operands.into_iter().collect(),
        }
    }

    fn binary(name: OperationName, left: TypeRef, right: Option<TypeRef>) -> Self {
        Self::new(name, std::iter::once(left).chain(right))
    }

    /// Format the signature with type keys taken from `registry`.
    pub fn fmt<'a>(&'a self, registry: &'a TypeRegistry) -> impl std::fmt::Display + 'a {
        struct Fmt<'a> {
            signature: &'a Signature,
            registry: &'a TypeRegistry,
        }

        impl std::fmt::Display for Fmt<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}(", self.signature.name)?;
                for (i, operand) in self.signature.operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", self.registry.fmt(*operand))?;
                }
                write!(f, ")")
            }
        }

        Fmt {
            signature: self,
            registry,
        }
    }
}

/// A registered operation and its result type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    signature: Signature,
    ty: TypeRef,
}

impl Operation {
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn name(&self) -> &OperationName {
        &self.signature.name
    }

    pub fn operands(&self) -> &[TypeRef] {
        &self.signature.operands
    }

    /// Result type.
    #[inline]
    pub fn ty(&self) -> TypeRef {
        self.ty
    }
}

/// Registry of [`Operation`]s keyed by [`Signature`].
///
/// Result types are inferred as the intersection of the operand types (the
/// operand type itself for unary operations) unless given explicitly through
/// [`Self::declare`].
pub struct OperationRegistry {
    types: Arc<TypeRegistry>,
    operations: RwLock<IndexMap<Signature, Arc<Operation>>>,
}

impl OperationRegistry {
    pub fn new(types: Arc<TypeRegistry>) -> Self {
        Self {
            types,
            operations: Default::default(),
        }
    }

    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.operations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, signature: &Signature) -> Option<Arc<Operation>> {
        self.operations.read().get(signature).cloned()
    }

    fn check_arity(signature: &Signature) -> TameResult<()> {
        match &signature.name {
            OperationName::Operator(operator) if operator.arity().count() != signature.operands.len() => {
                Err(Error::ArityMismatch {
                    operator: *operator,
                    expected: operator.arity().count(),
                    found: signature.operands.len(),
                })
            }
            _ => Ok(()),
        }
    }

    fn infer(&self, signature: &Signature) -> TameResult<TypeRef> {
        let mut operands = signature.operands.iter().copied();
        let first = operands.next().ok_or_else(|| Error::TypeRelationUnknown {
            ty: signature.name.to_string(),
            other: String::new(),
            reason: "an operation without operands has no inferable type",
        })?;
        operands.try_fold(first, |ty, other| self.types.try_intersect(ty, other))
    }

    fn describe(&self, signature: &Signature) -> String {
        signature.fmt(&self.types).to_string()
    }

    /// Return the operation registered under `signature`, registering it first
    /// if needed.
    pub fn ensure_signature(&self, signature: Signature) -> TameResult<Arc<Operation>> {
        Self::check_arity(&signature)?;

        let mut operations = self.operations.upgradable_read();
        if let Some(operation) = operations.get(&signature) {
            trace!("Operation {} already registered", self.describe(&signature));
            return Ok(operation.clone());
        }

        let ty = self.infer(&signature)?;
        operations.with_upgraded(|operations| {
            debug!(
                "Registering operation {} -> {}",
                self.describe(&signature),
                self.types.fmt(ty)
            );
            let operation = Arc::new(Operation { signature, ty });
            operations.insert(operation.signature.clone(), operation.clone());
            Ok(operation)
        })
    }

    /// Idempotently obtain the operation `operator(left[, right])`.
    ///
    /// The result type is `intersect(left, right)`, or `left` when there is no
    /// right operand. Fails with [`Error::TypeRelationUnknown`] if the operand
    /// types have no common ancestor.
    pub fn ensure(&self, operator: Operator, left: TypeRef, right: Option<TypeRef>) -> TameResult<Arc<Operation>> {
        self.ensure_signature(Signature::binary(operator.into(), left, right))
    }

    /// Same as [`Self::ensure`] for a user-defined operation name.
    pub fn ensure_custom(
        &self,
        name: impl Into<String>,
        left: TypeRef,
        right: Option<TypeRef>,
    ) -> TameResult<Arc<Operation>> {
        self.ensure_signature(Signature::binary(OperationName::Custom(name.into()), left, right))
    }

    /// Register a new operation with an inferred result type.
    ///
    /// Fails with [`Error::DuplicateOperationRegistration`] if the signature
    /// already exists.
    pub fn register(
        &self,
        name: impl Into<OperationName>,
        left: TypeRef,
        right: Option<TypeRef>,
    ) -> TameResult<Arc<Operation>> {
        let signature = Signature::binary(name.into(), left, right);
        Self::check_arity(&signature)?;
        let ty = self.infer(&signature)?;
        self.insert_new(signature, ty)
    }

    /// Register a new operation with an explicit result type.
    ///
    /// Used for operations whose result is not the intersection of their
    /// operands, e.g. indexing an array yields its item type.
    pub fn declare(
        &self,
        name: impl Into<OperationName>,
        operands: impl IntoIterator<Item = TypeRef>,
        result: TypeRef,
    ) -> TameResult<Arc<Operation>> {
        let signature = Signature::new(name, operands);
        Self::check_arity(&signature)?;
        self.insert_new(signature, result)
    }

    fn insert_new(&self, signature: Signature, ty: TypeRef) -> TameResult<Arc<Operation>> {
        let mut operations = self.operations.write();
        if operations.contains_key(&signature) {
            return Err(Error::DuplicateOperationRegistration {
                signature: self.describe(&signature),
            });
        }

        debug!(
            "Registering operation {} -> {}",
            self.describe(&signature),
            self.types.fmt(ty)
        );
        let operation = Arc::new(Operation { signature, ty });
        operations.insert(operation.signature.clone(), operation.clone());
        Ok(operation)
    }

    /// Type of an expression node. Applications are resolved recursively.
    pub fn type_of(&self, expr: &Expr) -> TameResult<TypeRef> {
        match expr {
            Expr::Application(application) => Ok(self.resolve(application)?.ty),
            _ => expr
                .as_value()
                .map(|value| value.ty)
                .ok_or_else(|| Error::UnsupportedNode {
                    node: expr.kind().to_string(),
                    backend: "operation registry".to_string(),
                }),
        }
    }

    /// Map an application to its operation, typing operands recursively.
    ///
    /// Operations declared beforehand are returned as is; otherwise the
    /// operation is ensured with an inferred result type.
    pub fn resolve(&self, application: &Application) -> TameResult<Arc<Operation>> {
        let operands = application
            .operands()
            .iter()
            .map(|operand| self.type_of(operand))
            .collect::<TameResult<SmallVec<[TypeRef; 3]>>>()?;

        self.ensure_signature(Signature {
            name: application.operator().into(),
            operands,
        })
    }
}
