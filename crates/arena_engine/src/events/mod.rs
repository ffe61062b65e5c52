//! Deferred event handling
//!
//! Two pieces decouple collision detection from its consequences:
//! - [`DestructionQueue`]: records appended during collision resolution
//!   and drained at a bounded rate, so a mass kill spreads its cost over
//!   several frames.
//! - [`EventBus`]: an explicit, owned observer list. Every handler sees
//!   every event, in subscription order.

use std::collections::vec_deque::Drain;
use std::collections::VecDeque;

/// FIFO of pending records with a per-call drain cap
#[derive(Debug, Clone)]
pub struct DestructionQueue<T> {
    pending: VecDeque<T>,
}

impl<T> DestructionQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// Append a record
    pub fn push(&mut self, record: T) {
        self.pending.push_back(record);
    }

    /// Remove and yield at most `cap` of the oldest records
    ///
    /// Records beyond the cap stay queued, in order, for the next call.
    pub fn drain_bounded(&mut self, cap: usize) -> Drain<'_, T> {
        let count = cap.min(self.pending.len());
        self.pending.drain(..count)
    }

    /// Number of records waiting
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no record is waiting
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop all pending records (scene teardown)
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<T> Default for DestructionQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Event handler trait
/// Returns true if the handler acted on the event
/// The return value is reported back to the dispatcher; it never hides
/// the event from later handlers
pub trait EventHandler<T> {
    /// Handle an event, return true if handled
    fn on_event(&mut self, event: &T) -> bool;
}

impl<T, F: FnMut(&T) -> bool> EventHandler<T> for F {
    fn on_event(&mut self, event: &T) -> bool {
        self(event)
    }
}

/// Owned observer list for one event type
pub struct EventBus<T> {
    handlers: Vec<Box<dyn EventHandler<T>>>,
}

impl<T> EventBus<T> {
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Add a handler after all existing ones
    pub fn subscribe(&mut self, handler: Box<dyn EventHandler<T>>) {
        self.handlers.push(handler);
    }

    /// Forward `event` to every handler in subscription order
    ///
    /// Returns whether any handler reported it as handled.
    pub fn dispatch(&mut self, event: &T) -> bool {
        let mut handled = false;
        for handler in &mut self.handlers {
            handled |= handler.on_event(event);
        }
        handled
    }

    /// Number of subscribed handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Remove all handlers
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_drain_is_bounded() {
        let mut queue = DestructionQueue::new();
        for i in 0..1000 {
            queue.push(i);
        }

        let drained: Vec<i32> = queue.drain_bounded(10).collect();
        assert_eq!(drained, (0..10).collect::<Vec<_>>());
        assert_eq!(queue.len(), 990);

        let next: Vec<i32> = queue.drain_bounded(10).collect();
        assert_eq!(next, (10..20).collect::<Vec<_>>());
        assert_eq!(queue.len(), 980);
    }

    #[test]
    fn test_drain_short_queue() {
        let mut queue = DestructionQueue::new();
        queue.push("a");
        queue.push("b");
        assert_eq!(queue.drain_bounded(10).count(), 2);
        assert!(queue.is_empty());
        assert_eq!(queue.drain_bounded(10).count(), 0);
    }

    #[test]
    fn test_dispatch_reaches_all_handlers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["first", "second"] {
            let seen = Rc::clone(&seen);
            bus.subscribe(Box::new(move |event: &u32| {
                seen.borrow_mut().push((tag, *event));
                false
            }));
        }

        assert!(!bus.dispatch(&7));
        assert_eq!(*seen.borrow(), vec![("first", 7), ("second", 7)]);
        assert_eq!(bus.handler_count(), 2);
    }

    #[test]
    fn test_handled_event_still_reaches_later_handlers() {
        let reached = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(|_: &u32| true));
        let counter = Rc::clone(&reached);
        bus.subscribe(Box::new(move |_: &u32| {
            *counter.borrow_mut() += 1;
            false
        }));

        assert!(bus.dispatch(&1));
        assert!(bus.dispatch(&2));
        assert_eq!(*reached.borrow(), 2);
    }
}
