//! Builtin types and literal constructors.
//!
//! The prelude registers the numeric hierarchy
//!
//! ```text
//! NaturalNumber << Number
//! DecimalNumber << Number
//! ```
//!
//! and the generic sequence type `Array[T]`, then offers shorthands to build
//! literals of those types.
use std::sync::Arc;

use log::debug;
use tame::{
    Error, TameResult,
    model::{Constant, Literal, Structure},
    types::{Capabilities, TypeDecl, TypeRef, TypeRegistry},
};

/// Name of the item slot of [`Prelude::array`].
pub const ARRAY_ITEM: &str = "T";

/// Largest item count accepted by [`Prelude::literal_array`].
pub const MAX_LITERAL_LENGTH: u64 = 1 << 16;

/// Handles to the builtin types of a [`TypeRegistry`].
#[derive(Clone)]
pub struct Prelude {
    types: Arc<TypeRegistry>,
    number: TypeRef,
    natural: TypeRef,
    decimal: TypeRef,
    array: TypeRef,
}

impl Prelude {
    /// Register the builtins in a fresh registry.
    pub fn new() -> TameResult<Self> {
        Self::with_registry(Arc::new(TypeRegistry::new()))
    }

    /// Register the builtins in `types`.
    pub fn with_registry(types: Arc<TypeRegistry>) -> TameResult<Self> {
        let number = types.create_type(TypeDecl::new("Number").capabilities(Capabilities::NUMERIC))?;
        let natural = types.create_type(
            TypeDecl::new("NaturalNumber")
                .capabilities(Capabilities::NUMERIC)
                .capabilities(Capabilities::NATURAL),
        )?;
        let decimal = types.create_type(
            TypeDecl::new("DecimalNumber")
                .capabilities(Capabilities::NUMERIC)
                .capabilities(Capabilities::DECIMAL),
        )?;
        types.link_supertype(natural, number)?;
        types.link_supertype(decimal, number)?;

        let array = types.create_type(
            TypeDecl::new("Array")
                .generic(ARRAY_ITEM)
                .capabilities(Capabilities::SEQUENCE),
        )?;

        debug!("Prelude registered ({} types)", types.len());
        Ok(Self {
            types,
            number,
            natural,
            decimal,
            array,
        })
    }

    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    pub fn number(&self) -> TypeRef {
        self.number
    }

    pub fn natural(&self) -> TypeRef {
        self.natural
    }

    pub fn decimal(&self) -> TypeRef {
        self.decimal
    }

    /// The generic `Array[T]` type.
    pub fn array(&self) -> TypeRef {
        self.array
    }

    /// `Array[T=item]`.
    pub fn array_of(&self, item: TypeRef) -> TameResult<TypeRef> {
        self.types.apply(self.array, [], [(ARRAY_ITEM, item)])
    }

    /// 32-bit natural-number literal.
    pub fn int(&self, value: u64) -> Literal {
        Literal::new(self.natural, Structure::B32, Constant::Natural(value))
    }

    /// 64-bit decimal literal.
    pub fn float(&self, value: f64) -> Literal {
        Literal::new(self.decimal, Structure::B64, Constant::Decimal(value))
    }

    /// Array literal holding `count` copies of `item`.
    ///
    /// Fails with [`Error::InvalidSequenceLength`] when `count` is zero or
    /// above [`MAX_LITERAL_LENGTH`].
    ///
    /// ```
    /// use tame_api::Prelude;
    ///
    /// let prelude = Prelude::new().unwrap();
    /// let zeros = prelude.literal_array(&prelude.int(0), 10).unwrap();
    /// assert_eq!(zeros.size(), 320);
    /// assert_eq!(
    ///     prelude.types().qualified_name(zeros.ty).as_deref(),
    ///     Some("Array")
    /// );
    /// ```
    pub fn literal_array(&self, item: &Literal, count: u64) -> TameResult<Literal> {
        if count > MAX_LITERAL_LENGTH {
            return Err(Error::InvalidSequenceLength { length: count });
        }
        let ty = self.array_of(item.ty)?;
        let structure = Structure::sequence_of(item.structure, count)?;
        let items = (0..count).map(|_| item.payload.clone()).collect();
        Ok(Literal::new(ty, structure, Constant::Sequence(items)))
    }
}
