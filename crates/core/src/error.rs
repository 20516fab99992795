//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Covers deterministic inventory failures (lookups, set membership, validation).
/// Storage failures live in `packforge-infra`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Lookup of an unknown item identifier.
    #[error("item was not found: {0}")]
    ItemNotFound(String),

    /// Sort requested for an item the map does not index.
    #[error("indexed item was not found: {0}")]
    IndexedItemNotFound(String),

    /// A structurally-equal pack is already in the set.
    #[error("pack already exists in this set (size {size})")]
    PackAlreadyExists { size: u64 },

    /// The pack to remove is not in the set.
    #[error("pack was not found in this set (size {size})")]
    PackNotFound { size: u64 },

    /// Submitted data failed validation (e.g. duplicate pack in a replacement list).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn item_not_found(item_id: impl Into<String>) -> Self {
        Self::ItemNotFound(item_id.into())
    }

    pub fn indexed_item_not_found(item_id: impl Into<String>) -> Self {
        Self::IndexedItemNotFound(item_id.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether the error reports a missing item (either lookup flavour).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ItemNotFound(_) | Self::IndexedItemNotFound(_))
    }
}
