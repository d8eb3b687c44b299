use log::debug;

use crate::error::CanvasResult;
use crate::history::HistoryEngine;
use crate::tool::ToolBox;

use super::InputEvent;

/// Applies one input event to the engine.
///
/// Returns whether the canvas needs a redraw. A press while another mark is
/// still in progress is an error and leaves the engine untouched.
pub fn route_event(event: &InputEvent, engine: &mut HistoryEngine, tools: &ToolBox) -> CanvasResult<bool> {
    let redraw = match event {
        InputEvent::PointerDown { position } => {
            engine.begin_mark(*position, &tools.params())?;
            engine.set_preview(Some(tools.preview_at(*position)));
            true
        }
        InputEvent::PointerMove { position } => {
            let extended = engine.is_marking() && engine.extend_mark(*position);
            let previewed = engine.set_preview(Some(tools.preview_at(*position)));
            extended || previewed
        }
        InputEvent::PointerUp { .. } => engine.commit_mark(),
        InputEvent::PointerLeave | InputEvent::ToolChanged => engine.set_preview(None),
        InputEvent::Undo => engine.undo(),
        InputEvent::Redo => engine.redo(),
        InputEvent::Clear => engine.clear(),
    };

    if redraw {
        debug!("Routed {:?}", event);
    }
    Ok(redraw)
}
