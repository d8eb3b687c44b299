//! The drawing-history engine.
//!
//! Marks move through three places: the in-progress slot while a gesture
//! builds them, the committed sequence once the gesture ends, and the redo
//! buffer after an undo. A mark is only ever in one of them. Undo and redo
//! are linear: committing a new mark drops everything on the redo buffer.

mod engine;
mod render;

pub use engine::HistoryEngine;
