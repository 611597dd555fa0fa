use thiserror::Error;

/// Rejected form input. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,
    #[error("Content is required")]
    EmptyContent,
    #[error("Title must be at most {max} characters (got {len})")]
    TitleTooLong { len: usize, max: usize },
}

/// Failures of the key-value storage backing the snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded ({needed} bytes needed, {limit} allowed)")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("storage unavailable: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Note {0} not found")]
    NotFound(String),

    /// The in-memory collection already holds the change; only the write failed.
    #[error("Could not save notes: {0}")]
    Persist(#[source] StorageError),

    #[error("Saved notes were unreadable and have been reset: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Could not read saved notes: {0}")]
    Load(#[source] StorageError),
}

impl StoreError {
    /// True when the failure happened after the in-memory state changed.
    pub fn is_unsaved_change(&self) -> bool {
        matches!(self, StoreError::Persist(_))
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
