//! Physical layout of values.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::EnumIs;

use crate::{utils::Error, TameResult};

/// Bit layout of a [`Value`](super::value::Value).
///
/// Sizes are expressed in bits and always a positive multiple of 8.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, EnumIs)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Structure {
    /// A single value of `size` bits.
    Scalar { size: u64 },

    /// `length` consecutive items of `item_size` bits each.
    Sequence { item_size: u64, length: u64 },
}

impl Structure {
    pub const B8: Self = Self::Scalar { size: 8 };
    pub const B16: Self = Self::Scalar { size: 16 };
    pub const B32: Self = Self::Scalar { size: 32 };
    pub const B64: Self = Self::Scalar { size: 64 };
    pub const B128: Self = Self::Scalar { size: 128 };

    /// Creates a scalar structure, failing with [`Error::InvalidStructureSize`]
    /// unless `size` is a positive multiple of 8.
    pub fn new(size: u64) -> TameResult<Self> {
        check_size(size)?;
        Ok(Self::Scalar { size })
    }

    /// Creates a sequence structure. The total size must fit in a `u64`.
    ///
    /// ```
    /// use tame::model::structure::Structure;
    ///
    /// let array = Structure::sequence(32, 10).unwrap();
    /// assert_eq!(array.size(), 320);
    /// assert!(Structure::sequence(32, 0).is_err());
    /// ```
    pub fn sequence(item_size: u64, length: u64) -> TameResult<Self> {
        check_size(item_size)?;
        if length == 0 || item_size.checked_mul(length).is_none() {
            return Err(Error::InvalidSequenceLength { length });
        }
        Ok(Self::Sequence { item_size, length })
    }

    /// Creates a sequence of `length` items laid out as `item`.
    pub fn sequence_of(item: Structure, length: u64) -> TameResult<Self> {
        Self::sequence(item.size(), length)
    }

    /// Total size in bits.
    pub fn size(&self) -> u64 {
        match self {
            Self::Scalar { size } => *size,
            Self::Sequence { item_size, length } => item_size * length,
        }
    }

    /// Item size in bits, for sequences.
    pub fn item_size(&self) -> Option<u64> {
        match self {
            Self::Sequence { item_size, .. } => Some(*item_size),
            Self::Scalar { .. } => None,
        }
    }

    /// Item count, for sequences.
    pub fn length(&self) -> Option<u64> {
        match self {
            Self::Sequence { length, .. } => Some(*length),
            Self::Scalar { .. } => None,
        }
    }
}

fn check_size(size: u64) -> TameResult<()> {
    if size == 0 || size % 8 != 0 {
        Err(Error::InvalidStructureSize { size })
    } else {
        Ok(())
    }
}

impl std::fmt::Display for Structure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar { size } => write!(f, "b{}", size),
            Self::Sequence { item_size, length } => write!(f, "[b{}; {}]", item_size, length),
        }
    }
}
