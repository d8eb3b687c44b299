use crate::mark::{MarkId, MarkKind};

/// Notifications emitted by the history engine after each mutating call
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    MarkBegun {
        id: MarkId,
        kind: MarkKind,
    },
    MarkExtended {
        id: MarkId,
        /// Point count after the extension
        points: usize,
    },
    MarkCommitted {
        id: MarkId,
        /// Undone marks dropped because of this commit
        discarded_redo: usize,
    },
    Undone {
        id: MarkId,
    },
    Redone {
        id: MarkId,
    },
    Cleared {
        committed: usize,
        redo: usize,
        cancelled: Option<MarkId>,
    },
    PreviewChanged {
        visible: bool,
    },
}

impl CanvasEvent {
    /// True for events that change what undo/redo would do
    pub fn changes_history(&self) -> bool {
        matches!(
            self,
            CanvasEvent::MarkCommitted { .. }
                | CanvasEvent::Undone { .. }
                | CanvasEvent::Redone { .. }
                | CanvasEvent::Cleared { .. }
        )
    }
}
