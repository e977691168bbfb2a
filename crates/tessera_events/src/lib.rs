//! # TESSERA Events
//!
//! A typed, synchronous multicast event bus.
//!
//! Every handler is registered for exactly one event type. Emitting an
//! event invokes each handler connected to that type, in registration
//! order, passing the event by shared reference. Handlers for unrelated
//! event types are never invoked.
//!
//! ```text
//! connect::<Damage>(h1) ─┐
//! connect::<Damage>(h2) ─┼──> emit(&Damage { .. }) ──> h1, h2
//! connect::<Spawned>(h3)─┘                             (h3 untouched)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tessera_events::EventBus;
//!
//! struct Damage(u32);
//!
//! let total = Rc::new(Cell::new(0));
//! let mut bus = EventBus::new();
//!
//! let sink = Rc::clone(&total);
//! let id = bus.connect(move |event: &Damage| sink.set(sink.get() + event.0));
//!
//! bus.emit(&Damage(7));
//! assert_eq!(total.get(), 7);
//!
//! bus.disconnect(id);
//! bus.emit(&Damage(7));
//! assert_eq!(total.get(), 7);
//! ```

#![deny(unsafe_code)]

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Identifier of one connected handler.
///
/// Ids are unique for the lifetime of the bus that issued them and are never
/// reused, even after the handler is disconnected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    /// Returns the raw numeric value of this id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler#{}", self.0)
    }
}

type ErasedHandler = Box<dyn Fn(&dyn Any)>;

struct Listener {
    id: HandlerId,
    handler: ErasedHandler,
}

/// Synchronous multicast event bus keyed by event type.
///
/// The bus is single-threaded: handlers are plain `Fn` closures and are
/// invoked on the emitting thread before [`EventBus::emit`] returns.
#[derive(Default)]
pub struct EventBus {
    /// Listeners per event type, in registration order.
    listeners: HashMap<TypeId, Vec<Listener>>,
    /// Next handler id to hand out.
    next_id: u64,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects `handler` to events of type `E`.
    ///
    /// Returns the id needed to disconnect this handler later.
    pub fn connect<E, F>(&mut self, handler: F) -> HandlerId
    where
        E: 'static,
        F: Fn(&E) + 'static,
    {
        let id = HandlerId(self.next_id);
        self.next_id += 1;

        let erased: ErasedHandler = Box::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });

        self.listeners
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Listener { id, handler: erased });

        tracing::trace!(%id, event = std::any::type_name::<E>(), "event handler connected");
        id
    }

    /// Invokes every handler connected to `E`, in registration order.
    pub fn emit<E: 'static>(&self, event: &E) {
        let Some(listeners) = self.listeners.get(&TypeId::of::<E>()) else {
            return;
        };

        for listener in listeners {
            (listener.handler)(event);
        }
    }

    /// Disconnects a single handler.
    ///
    /// Returns `true` if a handler with this id was connected.
    pub fn disconnect(&mut self, id: HandlerId) -> bool {
        let mut found = false;

        self.listeners.retain(|_, listeners| {
            let before = listeners.len();
            listeners.retain(|listener| listener.id != id);
            found |= listeners.len() != before;
            !listeners.is_empty()
        });

        found
    }

    /// Disconnects every handler connected to `E`.
    pub fn clear<E: 'static>(&mut self) {
        self.listeners.remove(&TypeId::of::<E>());
    }

    /// Disconnects every handler of every event type.
    pub fn clear_all(&mut self) {
        self.listeners.clear();
    }

    /// Returns the number of handlers connected to `E`.
    #[must_use]
    pub fn handler_count<E: 'static>(&self) -> usize {
        self.listeners
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    /// Returns `true` if no handler is connected at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("event_types", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct MyEvent {
        value: i32,
    }

    struct OtherEvent {
        letter: char,
    }

    struct UnusedEvent;

    #[test]
    fn test_emit_reaches_only_matching_handlers() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let log = Rc::clone(&calls);
        bus.connect(move |event: &MyEvent| log.borrow_mut().push(format!("my:{}", event.value)));
        let log = Rc::clone(&calls);
        bus.connect(move |event: &OtherEvent| log.borrow_mut().push(format!("other:{}", event.letter)));

        bus.emit(&MyEvent { value: 10 });
        assert_eq!(*calls.borrow(), vec!["my:10".to_string()]);

        calls.borrow_mut().clear();
        bus.emit(&UnusedEvent);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        for tag in 0..3 {
            let order = Rc::clone(&order);
            bus.connect(move |_: &OtherEvent| order.borrow_mut().push(tag));
        }

        bus.emit(&OtherEvent { letter: 'A' });
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_disconnect_single_handler() {
        let count = Rc::new(Cell::new(0));
        let mut bus = EventBus::new();

        let c = Rc::clone(&count);
        let first = bus.connect(move |_: &MyEvent| c.set(c.get() + 1));
        let c = Rc::clone(&count);
        bus.connect(move |_: &MyEvent| c.set(c.get() + 10));

        assert!(bus.disconnect(first));
        assert!(!bus.disconnect(first));

        bus.emit(&MyEvent { value: 0 });
        assert_eq!(count.get(), 10);
        assert_eq!(bus.handler_count::<MyEvent>(), 1);
    }

    #[test]
    fn test_clear_by_type() {
        let count = Rc::new(Cell::new(0));
        let mut bus = EventBus::new();

        let c = Rc::clone(&count);
        bus.connect(move |_: &MyEvent| c.set(c.get() + 1));
        let c = Rc::clone(&count);
        bus.connect(move |_: &OtherEvent| c.set(c.get() + 100));

        bus.clear::<OtherEvent>();
        bus.emit(&OtherEvent { letter: 'B' });
        bus.emit(&MyEvent { value: 1 });

        assert_eq!(count.get(), 1);
        assert_eq!(bus.handler_count::<OtherEvent>(), 0);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut bus = EventBus::new();
        let a = bus.connect(|_: &MyEvent| {});
        bus.clear_all();
        let b = bus.connect(|_: &MyEvent| {});
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }
}
