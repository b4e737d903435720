//! Fixed-width behaviour-type bitmask.
//!
//! Relationship classification (friendly / avoid / neutral) between behaviour
//! types is a membership test against a `u32` bitmask — O(1), no allocation,
//! no hashing.  This caps the framework at 32 distinct behaviour types; if
//! more are ever needed the representation generalizes to a wider fixed-size
//! bitset, never a dynamic collection.

use crate::TypeId;

/// A set of behaviour types, one bit per [`TypeId`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeMask(pub u32);

impl TypeMask {
    /// The empty set.
    pub const NONE: TypeMask = TypeMask(0);
    /// Every representable type.
    pub const ALL: TypeMask = TypeMask(u32::MAX);
    /// Maximum number of distinct behaviour types (bitmask width).
    pub const MAX_TYPES: usize = 32;

    /// Mask containing exactly one type.
    ///
    /// # Panics
    /// Panics in debug mode if `ty.index() >= MAX_TYPES`.
    #[inline]
    pub fn only(ty: TypeId) -> TypeMask {
        debug_assert!(ty.index() < Self::MAX_TYPES);
        TypeMask(1 << ty.0)
    }

    /// Build a mask from an iterator of types.
    pub fn from_types<I: IntoIterator<Item = TypeId>>(types: I) -> TypeMask {
        types.into_iter().fold(TypeMask::NONE, |m, t| m.with(t))
    }

    /// `self` with `ty`'s bit set.
    #[inline]
    pub fn with(self, ty: TypeId) -> TypeMask {
        TypeMask(self.0 | (1 << ty.0))
    }

    /// Membership test.
    #[inline]
    pub fn contains(self, ty: TypeId) -> bool {
        self.0 & (1 << ty.0) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Set union.
    #[inline]
    pub fn union(self, other: TypeMask) -> TypeMask {
        TypeMask(self.0 | other.0)
    }

    /// Set intersection.
    #[inline]
    pub fn intersect(self, other: TypeMask) -> TypeMask {
        TypeMask(self.0 & other.0)
    }
}

impl std::fmt::Display for TypeMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeMask({:#034b})", self.0)
    }
}
