use log::{debug, info};

use crate::error::{CanvasError, CanvasResult};
use crate::event::{CanvasEvent, EventBus, EventHandler};
use crate::mark::{factory, Mark, MarkId, Point};
use crate::tool::ToolParams;

/// Owns everything drawn on one canvas: the committed marks in paint order,
/// the marks removed by undo, the mark being drawn, and the preview hint.
///
/// Every mutating call returns `true` when the canvas needs to be redrawn,
/// raises the redraw flag and emits a [`CanvasEvent`]. The engine never
/// renders on its own; callers render when they choose to.
#[derive(Debug, Default)]
pub struct HistoryEngine {
    /// Committed marks; later entries paint over earlier ones
    committed: Vec<Mark>,
    /// Undone marks; the most recently undone is last
    redo_stack: Vec<Mark>,
    in_progress: Option<Mark>,
    preview: Option<Mark>,
    needs_redraw: bool,
    event_bus: EventBus,
}

impl HistoryEngine {
    /// Creates an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler to the engine's change notifications
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.event_bus.subscribe(handler);
    }

    fn changed(&mut self, event: CanvasEvent) {
        self.needs_redraw = true;
        self.event_bus.emit(event);
    }

    /// Starts a new mark at `anchor` with a copy of `tool`'s parameters.
    ///
    /// # Errors
    ///
    /// `CanvasError::InvalidState` if a mark is already in progress; that
    /// mark is kept as is. `CanvasError::InvalidParameters` if the tool
    /// cannot produce a drawable mark.
    pub fn begin_mark(&mut self, anchor: Point, tool: &ToolParams) -> CanvasResult<MarkId> {
        if let Some(current) = &self.in_progress {
            return Err(CanvasError::InvalidState {
                in_progress: current.id(),
            });
        }

        let mark = factory::from_tool(anchor, tool)?;
        let id = mark.id();
        let kind = mark.kind();
        debug!("Began {:?} {} at {:?}", kind, id, anchor);
        self.in_progress = Some(mark);
        self.changed(CanvasEvent::MarkBegun { id, kind });
        Ok(id)
    }

    /// Appends `point` to the stroke in progress.
    /// No-op when idle or when a sticker is in progress.
    pub fn extend_mark(&mut self, point: Point) -> bool {
        let Some(Mark::Stroke(stroke)) = &mut self.in_progress else {
            return false;
        };
        stroke.add_point(point);
        let id = stroke.id();
        let points = stroke.points().len();
        self.changed(CanvasEvent::MarkExtended { id, points });
        true
    }

    /// Makes the mark in progress permanent and drops the redo path.
    /// No-op when nothing is in progress.
    pub fn commit_mark(&mut self) -> bool {
        let Some(mark) = self.in_progress.take() else {
            return false;
        };

        let id = mark.id();
        let discarded_redo = self.redo_stack.len();
        self.committed.push(mark);
        self.redo_stack.clear();
        info!(
            "✅ Committed {} ({} in history, {} redo entries dropped)",
            id,
            self.committed.len(),
            discarded_redo
        );
        self.changed(CanvasEvent::MarkCommitted { id, discarded_redo });
        true
    }

    /// Moves the newest committed mark onto the redo buffer
    pub fn undo(&mut self) -> bool {
        let Some(mark) = self.committed.pop() else {
            return false;
        };

        let id = mark.id();
        self.redo_stack.push(mark);
        info!("↩️ Undid {}", id);
        self.changed(CanvasEvent::Undone { id });
        true
    }

    /// Moves the most recently undone mark back onto the history
    pub fn redo(&mut self) -> bool {
        let Some(mark) = self.redo_stack.pop() else {
            return false;
        };

        let id = mark.id();
        self.committed.push(mark);
        info!("↪️ Redid {}", id);
        self.changed(CanvasEvent::Redone { id });
        true
    }

    /// Empties the history and the redo buffer and cancels any mark in progress.
    /// The preview is untouched.
    pub fn clear(&mut self) -> bool {
        let cancelled = self.in_progress.take().map(|mark| mark.id());
        let committed = self.committed.len();
        let redo = self.redo_stack.len();
        if committed == 0 && redo == 0 && cancelled.is_none() {
            return false;
        }

        self.committed.clear();
        self.redo_stack.clear();
        info!("🧹 Cleared canvas ({} marks, {} redo entries)", committed, redo);
        self.changed(CanvasEvent::Cleared {
            committed,
            redo,
            cancelled,
        });
        true
    }

    /// Replaces the transient preview. The preview is never part of the history.
    pub fn set_preview(&mut self, preview: Option<Mark>) -> bool {
        if self.preview.is_none() && preview.is_none() {
            return false;
        }

        let visible = preview.is_some();
        self.preview = preview;
        self.changed(CanvasEvent::PreviewChanged { visible });
        true
    }

    /// Committed marks in paint order
    pub fn committed(&self) -> &[Mark] {
        &self.committed
    }

    /// Undone marks, most recently undone first
    pub fn redo_buffer(&self) -> impl Iterator<Item = &Mark> + '_ {
        self.redo_stack.iter().rev()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn in_progress(&self) -> Option<&Mark> {
        self.in_progress.as_ref()
    }

    pub fn preview(&self) -> Option<&Mark> {
        self.preview.as_ref()
    }

    /// Returns true if there are marks that can be undone
    pub fn can_undo(&self) -> bool {
        !self.committed.is_empty()
    }

    /// Returns true if there are marks that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// True while a gesture is building a mark
    pub fn is_marking(&self) -> bool {
        self.in_progress.is_some()
    }

    /// True if anything changed since the flag was last taken
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Reads and lowers the redraw flag
    pub fn take_needs_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{MarkerParams, StickerParams};
    use egui::{pos2, Color32};

    fn marker() -> ToolParams {
        ToolParams::Marker(MarkerParams {
            thickness: 2.0,
            color: Color32::BLACK,
        })
    }

    fn sticker() -> ToolParams {
        ToolParams::Sticker(StickerParams {
            glyph: "★".to_owned(),
            size: 28.0,
            rotation: 90.0,
        })
    }

    fn commit_stroke(engine: &mut HistoryEngine, points: &[Point]) -> MarkId {
        let id = engine.begin_mark(points[0], &marker()).unwrap();
        for point in &points[1..] {
            engine.extend_mark(*point);
        }
        assert!(engine.commit_mark());
        id
    }

    #[test]
    fn test_begin_while_in_progress_fails() {
        let mut engine = HistoryEngine::new();
        let first = engine.begin_mark(pos2(1.0, 1.0), &marker()).unwrap();

        let result = engine.begin_mark(pos2(2.0, 2.0), &sticker());
        assert!(matches!(result, Err(CanvasError::InvalidState { in_progress }) if in_progress == first));
        // The earlier mark survives
        assert_eq!(engine.in_progress().map(Mark::id), Some(first));
    }

    #[test]
    fn test_invalid_params_leave_engine_idle() {
        let mut engine = HistoryEngine::new();
        let bad = ToolParams::Marker(MarkerParams {
            thickness: 0.0,
            color: Color32::BLACK,
        });
        assert!(matches!(
            engine.begin_mark(pos2(1.0, 1.0), &bad),
            Err(CanvasError::InvalidParameters(_))
        ));
        assert!(!engine.is_marking());
        assert!(!engine.needs_redraw());
    }

    #[test]
    fn test_in_progress_is_not_committed() {
        let mut engine = HistoryEngine::new();
        engine.begin_mark(pos2(1.0, 1.0), &marker()).unwrap();
        engine.extend_mark(pos2(2.0, 2.0));
        assert!(engine.committed().is_empty());
        assert_eq!(engine.redo_len(), 0);
        assert!(!engine.can_undo());
    }

    #[test]
    fn test_stickers_do_not_extend() {
        let mut engine = HistoryEngine::new();
        engine.begin_mark(pos2(50.0, 50.0), &sticker()).unwrap();
        assert!(!engine.extend_mark(pos2(60.0, 60.0)));
        assert!(engine.commit_mark());
        let placed = engine.committed()[0].as_sticker().unwrap();
        assert_eq!(placed.anchor(), pos2(50.0, 50.0));
    }

    #[test]
    fn test_idle_no_ops() {
        let mut engine = HistoryEngine::new();
        assert!(!engine.extend_mark(pos2(1.0, 1.0)));
        assert!(!engine.commit_mark());
        assert!(!engine.undo());
        assert!(!engine.redo());
        assert!(!engine.clear());
        assert!(!engine.set_preview(None));
        assert!(!engine.take_needs_redraw());
    }

    #[test]
    fn test_commit_clears_redo() {
        let mut engine = HistoryEngine::new();
        commit_stroke(&mut engine, &[pos2(0.0, 0.0), pos2(1.0, 1.0)]);
        commit_stroke(&mut engine, &[pos2(2.0, 2.0), pos2(3.0, 3.0)]);
        engine.undo();
        engine.undo();
        assert_eq!(engine.redo_len(), 2);

        commit_stroke(&mut engine, &[pos2(4.0, 4.0)]);
        assert_eq!(engine.redo_len(), 0);
        assert_eq!(engine.committed().len(), 1);
        assert!(!engine.redo());
    }

    #[test]
    fn test_redo_buffer_order() {
        let mut engine = HistoryEngine::new();
        let a = commit_stroke(&mut engine, &[pos2(0.0, 0.0), pos2(1.0, 1.0)]);
        let b = commit_stroke(&mut engine, &[pos2(2.0, 2.0), pos2(3.0, 3.0)]);
        engine.undo();
        engine.undo();
        let order: Vec<MarkId> = engine.redo_buffer().map(Mark::id).collect();
        assert_eq!(order, vec![a, b]);

        engine.redo();
        assert_eq!(engine.committed()[0].id(), a);
    }

    #[test]
    fn test_clear_cancels_in_progress() {
        let mut engine = HistoryEngine::new();
        commit_stroke(&mut engine, &[pos2(0.0, 0.0), pos2(1.0, 1.0)]);
        commit_stroke(&mut engine, &[pos2(2.0, 2.0), pos2(3.0, 3.0)]);
        engine.undo();
        engine.begin_mark(pos2(5.0, 5.0), &marker()).unwrap();

        assert!(engine.clear());
        assert!(engine.committed().is_empty());
        assert_eq!(engine.redo_len(), 0);
        assert!(!engine.is_marking());
        // A fresh gesture may start right away
        assert!(engine.begin_mark(pos2(6.0, 6.0), &marker()).is_ok());
    }

    #[test]
    fn test_redraw_flag() {
        let mut engine = HistoryEngine::new();
        engine.begin_mark(pos2(0.0, 0.0), &marker()).unwrap();
        assert!(engine.needs_redraw());
        assert!(engine.take_needs_redraw());
        assert!(!engine.needs_redraw());

        engine.commit_mark();
        assert!(engine.take_needs_redraw());
        engine.undo();
        engine.undo();
        assert!(engine.take_needs_redraw());
        assert!(!engine.undo());
        assert!(!engine.take_needs_redraw());
    }

    #[test]
    fn test_preview_is_independent_of_history() {
        let mut engine = HistoryEngine::new();
        let preview = factory::from_tool(pos2(3.0, 3.0), &sticker()).unwrap();
        assert!(engine.set_preview(Some(preview.clone())));
        assert_eq!(engine.preview(), Some(&preview));
        assert!(engine.committed().is_empty());
        assert!(!engine.undo());

        commit_stroke(&mut engine, &[pos2(0.0, 0.0), pos2(1.0, 1.0)]);
        engine.clear();
        assert_eq!(engine.preview(), Some(&preview));
        assert!(engine.set_preview(None));
        assert!(engine.preview().is_none());
    }
}
