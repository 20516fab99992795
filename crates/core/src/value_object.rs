//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two packs holding the
/// same item with the same size are the same pack, wherever they came from. The
/// `Eq + Hash` bounds let value objects key hash maps and sets directly.
pub trait ValueObject: Clone + Eq + core::hash::Hash + core::fmt::Debug {}
