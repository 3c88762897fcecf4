//! Structural type flags.
//!
//! `TypeFlags` summarize what a [`DataType`](crate::DataType) contains so the
//! solver can skip substitution and occurs-check traversals for types that
//! hold no variables.

use bitflags::bitflags;

bitflags! {
    /// Properties of a type, OR-ed together from all of its components.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TypeFlags: u8 {
        /// Contains a user-facing type variable.
        const HAS_TYPE_VAR = 1 << 0;
        /// Contains a solver meta variable.
        const HAS_META_VAR = 1 << 1;
        /// Contains the error sentinel.
        const HAS_ERROR = 1 << 2;
        /// Contains the `Any` existential.
        const HAS_ANY = 1 << 3;
    }
}

impl TypeFlags {
    /// Flags that mark a type as not yet fully inferred.
    pub const HAS_VAR: Self =
        Self::from_bits_truncate(Self::HAS_TYPE_VAR.bits() | Self::HAS_META_VAR.bits());

    /// Whether any variable (type or meta) occurs in the type.
    #[inline]
    pub fn has_var(self) -> bool {
        self.intersects(Self::HAS_VAR)
    }
}
