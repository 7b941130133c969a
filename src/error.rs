//! Error taxonomy for board engine operations.
//!
//! Not-found and cross-workspace errors are terminal and reported to the
//! caller as-is. `ConflictRetryExhausted` comes out of the write-retry
//! loop in [`crate::db::Database`] and is safe to retry as a whole user
//! gesture. `InvariantViolation` is a last-resort assertion: it fires only
//! if a reorder leaves a sibling scope non-dense, rolling back the
//! transaction instead of persisting a corrupt ordering.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Checklist not found: {0}")]
    ChecklistNotFound(String),

    #[error("Checklist item not found: {0}")]
    ChecklistItemNotFound(String),

    #[error("Card {card_id} cannot move to list {dest_list_id} in another workspace")]
    CrossWorkspaceMove {
        card_id: String,
        dest_list_id: String,
    },

    #[error("Write conflict on {scope} not resolved after {attempts} attempts")]
    ConflictRetryExhausted { scope: String, attempts: u32 },

    #[error("Ordering invariant violated in {scope}: {detail}")]
    InvariantViolation { scope: String, detail: String },

    #[error(transparent)]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Migration(#[from] refinery::Error),
}

impl Error {
    /// Stable error code for the CRUD layer wrapping this engine.
    pub fn code(&self) -> &'static str {
        match self {
            Error::WorkspaceNotFound(_) => "WORKSPACE_NOT_FOUND",
            Error::BoardNotFound(_) => "BOARD_NOT_FOUND",
            Error::ListNotFound(_) => "LIST_NOT_FOUND",
            Error::CardNotFound(_) => "CARD_NOT_FOUND",
            Error::ChecklistNotFound(_) => "CHECKLIST_NOT_FOUND",
            Error::ChecklistItemNotFound(_) => "CHECKLIST_ITEM_NOT_FOUND",
            Error::CrossWorkspaceMove { .. } => "CROSS_WORKSPACE_MOVE",
            Error::ConflictRetryExhausted { .. } => "CONFLICT_RETRY_EXHAUSTED",
            Error::InvariantViolation { .. } => "INVARIANT_VIOLATION",
            Error::Database(_) => "DATABASE_ERROR",
            Error::Migration(_) => "DATABASE_ERROR",
        }
    }

    /// True for any of the not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::WorkspaceNotFound(_)
                | Error::BoardNotFound(_)
                | Error::ListNotFound(_)
                | Error::CardNotFound(_)
                | Error::ChecklistNotFound(_)
                | Error::ChecklistItemNotFound(_)
        )
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
