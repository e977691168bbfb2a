//! # Event Bus Scenarios
//!
//! Several producers and consumers sharing one bus, the way game systems
//! use it.
//!
//! Run with: cargo test --package tessera_events --test bus_scenarios

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tessera_events::EventBus;

#[derive(Debug, Clone, PartialEq)]
struct Damage {
    target: u32,
    amount: i32,
}

#[derive(Debug, Clone, PartialEq)]
struct Spawned {
    name: &'static str,
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn health_tracker_and_audit_log_share_a_bus() {
    let mut bus = EventBus::new();
    let health = Rc::new(RefCell::new(vec![100_i32, 100, 100]));
    let audit = Rc::new(RefCell::new(Vec::new()));

    let hp = Rc::clone(&health);
    bus.connect(move |hit: &Damage| {
        if let Some(slot) = hp.borrow_mut().get_mut(hit.target as usize) {
            *slot -= hit.amount;
        }
    });

    let damage_log = Rc::clone(&audit);
    bus.connect(move |hit: &Damage| {
        damage_log
            .borrow_mut()
            .push(format!("hit {} for {}", hit.target, hit.amount));
    });

    let spawn_log = Rc::clone(&audit);
    bus.connect(move |event: &Spawned| spawn_log.borrow_mut().push(format!("spawned {}", event.name)));

    bus.emit(&Spawned { name: "orc" });
    bus.emit(&Damage { target: 1, amount: 30 });
    bus.emit(&Damage { target: 1, amount: 5 });
    bus.emit(&Damage { target: 7, amount: 99 });

    assert_eq!(*health.borrow(), [100, 65, 100]);
    assert_eq!(
        *audit.borrow(),
        [
            "spawned orc",
            "hit 1 for 30",
            "hit 1 for 5",
            "hit 7 for 99",
        ]
    );
}

#[test]
fn unsubscribed_consumer_stops_hearing() {
    let mut bus = EventBus::new();
    let early = Rc::new(Cell::new(0));
    let late = Rc::new(Cell::new(0));

    let sink = Rc::clone(&early);
    let early_id = bus.connect(move |_: &Spawned| sink.set(sink.get() + 1));
    let sink = Rc::clone(&late);
    let late_id = bus.connect(move |_: &Spawned| sink.set(sink.get() + 1));

    bus.emit(&Spawned { name: "a" });
    assert!(bus.disconnect(early_id));
    bus.emit(&Spawned { name: "b" });

    assert_eq!((early.get(), late.get()), (1, 2));
    assert!(!bus.disconnect(early_id));
    assert!(bus.disconnect(late_id));
    assert!(bus.is_empty());
}

#[test]
fn emitting_without_listeners_is_a_no_op() {
    let mut bus = EventBus::new();
    bus.emit(&Damage { target: 0, amount: 1 });

    let count = Rc::new(Cell::new(0));
    let sink = Rc::clone(&count);
    bus.connect(move |_: &Spawned| sink.set(sink.get() + 1));
    bus.emit(&Damage { target: 0, amount: 1 });

    assert_eq!(count.get(), 0);
    assert_eq!(bus.handler_count::<Damage>(), 0);
    assert_eq!(bus.handler_count::<Spawned>(), 1);
}
