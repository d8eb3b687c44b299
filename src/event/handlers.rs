use log::debug;

use crate::event::{CanvasEvent, EventHandler};

/// Logs every canvas event at debug level
#[derive(Debug, Default)]
pub struct LoggingHandler;

impl EventHandler for LoggingHandler {
    fn handle_event(&mut self, event: &CanvasEvent) {
        debug!("🎨 {:?}", event);
    }
}
