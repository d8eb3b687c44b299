#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod components;
pub mod error;
pub mod event;
pub mod export;
pub mod glyph;
pub mod history;
pub mod input;
pub mod mark;
pub mod panels;
pub mod settings;
pub mod surface;
pub mod tool;

pub use app::PaintApp;
pub use error::{CanvasError, CanvasResult};
pub use history::HistoryEngine;
pub use input::{InputEvent, InputHandler};
pub use mark::{factory, Mark, MarkId, MarkKind, Point};
pub use settings::CanvasSettings;
pub use surface::Surface;
pub use tool::{ActiveTool, MarkerParams, StickerParams, ToolBox, ToolParams};
