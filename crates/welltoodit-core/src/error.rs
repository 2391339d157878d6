use crate::storage::StorageError;
use thiserror::Error;

/// User-facing failures of notepad operations.
#[derive(Debug, Error)]
pub enum NoteError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Nothing to download! Your notepad is empty.")]
    EmptyDocument,
}

/// Convenience type alias for Results with NoteError
pub type Result<T> = std::result::Result<T, NoteError>;
