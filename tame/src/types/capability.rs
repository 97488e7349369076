use bitflags::bitflags;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Operability flags describing which symbolic operations a type supports.
    ///
    /// A type's capability set is the union of every flag it was declared with;
    /// derived types inherit the set of the generic type they were derived from.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Capabilities: u32 {
        /// Supports arithmetic (`add`, `sub`, `mul`, `div`, `rem`, `neg`).
        const ARITHMETIC = 1 << 0;

        /// Supports ordering and equality comparisons.
        const COMPARE = 1 << 1;

        /// Supports boolean logic (`and`, `or`, `not`) and can be used as a condition.
        const LOGIC = 1 << 2;

        /// Can be indexed by a natural number.
        const INDEX = 1 << 3;

        /// Exposes named members.
        const ACCESS = 1 << 4;

        /// Supports taking a contiguous sub-range.
        const SLICE = 1 << 5;

        /// Can be invoked.
        const INVOKE = 1 << 6;

        /// Values are natural numbers; required of index operands.
        const NATURAL = 1 << 7;

        /// Values are decimal numbers.
        const DECIMAL = 1 << 8;

        /// Shorthand for number-like types.
        const NUMERIC = Self::ARITHMETIC.bits() | Self::COMPARE.bits();

        /// Shorthand for sequence-like containers.
        const SEQUENCE = Self::INDEX.bits() | Self::SLICE.bits();
    }
}
