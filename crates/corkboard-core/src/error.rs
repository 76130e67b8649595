//! Error types surfaced at the board store boundary.

use crate::storage::StorageError;
use thiserror::Error;

/// What kind of entity an id referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Board,
    Item,
    Proposal,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Board => f.write_str("board"),
            EntityKind::Item => f.write_str("item"),
            EntityKind::Proposal => f.write_str("proposal"),
        }
    }
}

/// Errors produced by board and item operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// An id was not present in the store.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
    /// Input was rejected (e.g. an empty board name).
    #[error("Validation error: {0}")]
    Validation(String),
    /// An argument could not be interpreted (e.g. an unknown item type).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The persistence gateway failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// An external collaborator failed or returned something unusable.
    #[error("Upstream service error: {0}")]
    Upstream(String),
    /// A mutation was attempted before the initial load completed.
    #[error("Board store has not been loaded yet")]
    NotLoaded,
}

impl BoardError {
    pub(crate) fn board_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: EntityKind::Board,
            id: id.to_string(),
        }
    }

    pub(crate) fn item_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: EntityKind::Item,
            id: id.to_string(),
        }
    }
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = BoardError::board_not_found("abc");
        assert_eq!(err.to_string(), "board not found: abc");
    }

    #[test]
    fn test_storage_error_converts() {
        let err: BoardError = StorageError::QuotaExceeded { needed: 10, capacity: 4 }.into();
        assert!(matches!(err, BoardError::Storage(StorageError::QuotaExceeded { .. })));
    }
}
