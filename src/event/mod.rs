mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::CanvasEvent;
pub use handlers::LoggingHandler;

/// Receives canvas events. Handlers run synchronously on the caller's thread.
pub trait EventHandler {
    fn handle_event(&mut self, event: &CanvasEvent);
}
