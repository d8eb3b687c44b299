use std::cell::RefCell;

use crate::event::{CanvasEvent, EventHandler};

/// A simple event bus for broadcasting canvas events to registered handlers
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    /// Emit an event to all registered handlers, in subscription order.
    ///
    /// The handler list is taken out for the duration of the dispatch, so a
    /// handler may subscribe others; they start receiving from the next event.
    /// Events emitted from inside a handler reach nobody.
    pub fn emit(&self, event: CanvasEvent) {
        let mut dispatching = std::mem::take(&mut *self.handlers.borrow_mut());
        for handler in &mut dispatching {
            handler.handle_event(&event);
        }

        let mut handlers = self.handlers.borrow_mut();
        let subscribed_meanwhile = std::mem::replace(&mut *handlers, dispatching);
        handlers.extend(subscribed_meanwhile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counter(Rc<Cell<usize>>);

    impl EventHandler for Counter {
        fn handle_event(&mut self, _event: &CanvasEvent) {
            self.0.set(self.0.get() + 1);
        }
    }

    /// Subscribes a counter the first time it sees an event
    struct Recruiter {
        bus: Rc<EventBus>,
        recruited: Rc<Cell<usize>>,
        done: bool,
    }

    impl EventHandler for Recruiter {
        fn handle_event(&mut self, _event: &CanvasEvent) {
            if !self.done {
                self.done = true;
                self.bus.subscribe(Box::new(Counter(Rc::clone(&self.recruited))));
            }
        }
    }

    #[test]
    fn test_subscribe_from_inside_a_handler() {
        let bus = Rc::new(EventBus::new());
        let recruited = Rc::new(Cell::new(0));
        bus.subscribe(Box::new(Recruiter {
            bus: Rc::clone(&bus),
            recruited: Rc::clone(&recruited),
            done: false,
        }));

        bus.emit(CanvasEvent::PreviewChanged { visible: true });
        assert_eq!(recruited.get(), 0);

        bus.emit(CanvasEvent::PreviewChanged { visible: false });
        assert_eq!(recruited.get(), 1);
    }
}
