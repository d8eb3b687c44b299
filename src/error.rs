use thiserror::Error;

use crate::mark::MarkId;

/// Errors surfaced by the drawing-history engine and export.
///
/// Empty undo, empty redo, extending or committing with nothing in progress
/// are not errors; those calls are no-ops that return `false`.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// `begin_mark` was called while another mark is still in progress.
    /// Gestures do not nest and the earlier mark is left untouched.
    #[error("Cannot begin a mark while mark {in_progress} is still in progress")]
    InvalidState { in_progress: MarkId },

    /// Tool parameters that cannot produce a drawable mark
    #[error("Invalid tool parameters: {0}")]
    InvalidParameters(String),

    #[error("Failed to encode export: {0}")]
    Export(#[from] image::ImageError),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for canvas operations
pub type CanvasResult<T> = Result<T, CanvasError>;
