//! # Systems
//!
//! A system is a unit of behavior that processes every entity whose
//! component mask passes its filter. Systems implement only the hooks they
//! need; every hook defaults to a no-op.
//!
//! ## Attachment state machine
//!
//! For every (system, entity) pair the world tracks one of three states:
//!
//! ```text
//!                attach                enable
//!   NotAttached ───────> Disabled ─────────────> Enabled
//!        ▲                  │    <─────────────     │
//!        │     detach       │        disable        │
//!        └──────────────────┴───────────────────────┘
//!                 (Enabled fires on_entity_disabled first)
//! ```
//!
//! Each transition fires its hook exactly once. Hooks receive a
//! [`SystemContext`] giving access to the world, the system's enabled
//! entities, and the event bus.

use std::any::{type_name, Any};
use std::collections::HashMap;

use tessera_events::HandlerId;

use crate::ecs::entity::{Entity, EntityId};
use crate::ecs::filter::FilterBuilder;
use crate::ecs::world::World;

/// Upcast to [`Any`], implemented for every `'static` type.
pub trait AsAny: Any {
    /// Borrows `self` as [`Any`].
    fn as_any(&self) -> &dyn Any;
    /// Mutably borrows `self` as [`Any`].
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior run by the world over matching entities.
///
/// # Example
///
/// ```rust
/// use tessera_core::{Component, FilterBuilder, System, SystemContext, World};
///
/// struct Counter(u32);
/// impl Component for Counter {}
///
/// struct Tick;
///
/// impl System for Tick {
///     fn configure(&mut self, filter: &mut FilterBuilder<'_>) {
///         filter.require::<Counter>();
///     }
///
///     fn on_update(&mut self, ctx: &mut SystemContext<'_>, _dt: f32) {
///         ctx.for_each(|world, entity| {
///             if let Ok(counter) = world.component_mut::<Counter>(entity) {
///                 counter.0 += 1;
///             }
///         });
///     }
/// }
///
/// let mut world = World::new();
/// world.add_system(0, Tick).unwrap();
/// let entity = world.create_entity();
/// world.add_component(entity, Counter(0)).unwrap();
///
/// world.update(0.016);
/// assert_eq!(world.component::<Counter>(entity).unwrap().0, 1);
/// ```
#[allow(unused_variables)]
pub trait System: AsAny {
    /// Name used in logs.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }

    /// Declares the component filter. Called once when the system is added.
    fn configure(&mut self, filter: &mut FilterBuilder<'_>) {}

    /// Called at the start of the first update after the system was added.
    fn on_start(&mut self, ctx: &mut SystemContext<'_>) {}

    /// Called when the system is removed, if it was started.
    fn on_shutdown(&mut self, ctx: &mut SystemContext<'_>) {}

    /// Called every update, before queued entity actions are applied.
    fn on_pre_update(&mut self, ctx: &mut SystemContext<'_>, dt: f32) {}

    /// Called every update, after queued entity actions are applied.
    fn on_update(&mut self, ctx: &mut SystemContext<'_>, dt: f32) {}

    /// Called every update, after every system ran `on_update`.
    fn on_post_update(&mut self, ctx: &mut SystemContext<'_>, dt: f32) {}

    /// An entity started matching the filter. It is disabled until
    /// `on_entity_enabled` fires.
    fn on_entity_attached(&mut self, ctx: &mut SystemContext<'_>, entity: Entity) {}

    /// An entity stopped matching the filter or was removed.
    fn on_entity_detached(&mut self, ctx: &mut SystemContext<'_>, entity: Entity) {}

    /// An attached entity was enabled.
    fn on_entity_enabled(&mut self, ctx: &mut SystemContext<'_>, entity: Entity) {}

    /// An attached entity was disabled.
    fn on_entity_disabled(&mut self, ctx: &mut SystemContext<'_>, entity: Entity) {}
}

/// Membership of one entity in one system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EntityStatus {
    /// The entity does not match, or was never offered.
    #[default]
    NotAttached,
    /// Attached and receiving updates.
    Enabled,
    /// Attached but skipped by updates.
    Disabled,
}

/// Per-system bookkeeping owned by the world next to the system instance.
#[derive(Debug, Default)]
pub(crate) struct SystemState {
    /// Enabled entities in the order they were enabled.
    pub(crate) enabled: Vec<Entity>,
    /// Attached but disabled entities.
    pub(crate) disabled: Vec<Entity>,
    /// Status of every attached entity.
    pub(crate) status: HashMap<EntityId, EntityStatus>,
    /// Event handlers connected through this system.
    pub(crate) subscriptions: Vec<HandlerId>,
    /// Whether `on_start` has fired.
    pub(crate) started: bool,
}

impl SystemState {
    pub(crate) fn status(&self, entity: Entity) -> EntityStatus {
        self.status.get(&entity.id()).copied().unwrap_or_default()
    }
}

fn remove_from(list: &mut Vec<Entity>, entity: Entity) {
    if let Some(index) = list.iter().position(|e| *e == entity) {
        list.remove(index);
    }
}

/// Handle a system's hooks use to reach the world.
///
/// Membership changes requested here (enable, disable, remove, component
/// changes) are queued and applied on the next update, so the enabled set
/// seen through this context never changes while a hook runs.
pub struct SystemContext<'a> {
    world: &'a mut World,
    state: &'a mut SystemState,
}

impl<'a> SystemContext<'a> {
    pub(crate) fn new(world: &'a mut World, state: &'a mut SystemState) -> Self {
        Self { world, state }
    }

    /// The world running this system.
    #[must_use]
    pub fn world(&self) -> &World {
        &*self.world
    }

    /// Mutable access to the world running this system.
    pub fn world_mut(&mut self) -> &mut World {
        &mut *self.world
    }

    /// Copy of the enabled entity list.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        self.state.enabled.clone()
    }

    /// Number of enabled entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.state.enabled.len()
    }

    /// Membership of `entity` in this system.
    #[must_use]
    pub fn status(&self, entity: Entity) -> EntityStatus {
        self.state.status(entity)
    }

    /// Runs `f` for every enabled entity, in enable order.
    pub fn for_each<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut World, Entity),
    {
        for &entity in &self.state.enabled {
            f(&mut *self.world, entity);
        }
    }

    /// Emits `event` on the world's event bus.
    pub fn emit<E: 'static>(&self, event: &E) {
        self.world.events().emit(event);
    }

    /// Connects `handler` to events of type `E`.
    ///
    /// The handler is disconnected automatically when this system is
    /// removed from the world.
    pub fn connect<E, F>(&mut self, handler: F) -> HandlerId
    where
        E: 'static,
        F: Fn(&E) + 'static,
    {
        let id = self.world.events_mut().connect(handler);
        self.state.subscriptions.push(id);
        id
    }

    /// Disconnects a handler previously connected through this system.
    ///
    /// Returns `false` if the handler was not connected by this system.
    pub fn disconnect(&mut self, id: HandlerId) -> bool {
        let Some(index) = self.state.subscriptions.iter().position(|s| *s == id) else {
            return false;
        };
        self.state.subscriptions.swap_remove(index);
        self.world.events_mut().disconnect(id)
    }

    /// Disconnects every handler connected through this system.
    pub fn disconnect_all(&mut self) {
        for id in self.state.subscriptions.drain(..) {
            self.world.events_mut().disconnect(id);
        }
    }
}

/// A system instance paired with its bookkeeping.
pub(crate) struct SystemSlot {
    pub(crate) system: Box<dyn System>,
    pub(crate) state: SystemState,
}

impl SystemSlot {
    pub(crate) fn new(system: Box<dyn System>) -> Self {
        Self {
            system,
            state: SystemState::default(),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.system.name()
    }

    /// Runs one hook with a fresh context.
    pub(crate) fn fire<F>(&mut self, world: &mut World, hook: F)
    where
        F: FnOnce(&mut dyn System, &mut SystemContext<'_>),
    {
        let mut ctx = SystemContext::new(world, &mut self.state);
        hook(self.system.as_mut(), &mut ctx);
    }

    /// NotAttached -> Disabled.
    pub(crate) fn attach(&mut self, world: &mut World, entity: Entity) {
        if self.state.status(entity) != EntityStatus::NotAttached {
            return;
        }
        self.state.disabled.push(entity);
        self.state.status.insert(entity.id(), EntityStatus::Disabled);
        self.fire(world, |system, ctx| system.on_entity_attached(ctx, entity));
    }

    /// Disabled -> Enabled.
    pub(crate) fn enable(&mut self, world: &mut World, entity: Entity) {
        if self.state.status(entity) != EntityStatus::Disabled {
            return;
        }
        remove_from(&mut self.state.disabled, entity);
        self.state.enabled.push(entity);
        self.state.status.insert(entity.id(), EntityStatus::Enabled);
        self.fire(world, |system, ctx| system.on_entity_enabled(ctx, entity));
    }

    /// Enabled -> Disabled.
    pub(crate) fn disable(&mut self, world: &mut World, entity: Entity) {
        if self.state.status(entity) != EntityStatus::Enabled {
            return;
        }
        remove_from(&mut self.state.enabled, entity);
        self.state.disabled.push(entity);
        self.state.status.insert(entity.id(), EntityStatus::Disabled);
        self.fire(world, |system, ctx| system.on_entity_disabled(ctx, entity));
    }

    /// Enabled or Disabled -> NotAttached.
    pub(crate) fn detach(&mut self, world: &mut World, entity: Entity) {
        self.disable(world, entity);
        if self.state.status(entity) != EntityStatus::Disabled {
            return;
        }
        remove_from(&mut self.state.disabled, entity);
        self.state.status.remove(&entity.id());
        self.fire(world, |system, ctx| system.on_entity_detached(ctx, entity));
    }

    /// Detaches every attached entity, enabled ones first.
    pub(crate) fn detach_all(&mut self, world: &mut World) {
        let attached: Vec<Entity> = self
            .state
            .enabled
            .iter()
            .chain(&self.state.disabled)
            .copied()
            .collect();

        for entity in attached {
            self.detach(world, entity);
        }
    }

    pub(crate) fn downcast_ref<T: System>(&self) -> Option<&T> {
        self.system.as_ref().as_any().downcast_ref::<T>()
    }

    pub(crate) fn downcast_mut<T: System>(&mut self) -> Option<&mut T> {
        self.system.as_mut().as_any_mut().downcast_mut::<T>()
    }
}

impl std::fmt::Debug for SystemSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemSlot")
            .field("name", &self.name())
            .field("enabled", &self.state.enabled.len())
            .field("disabled", &self.state.disabled.len())
            .field("started", &self.state.started)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        log: Log,
    }

    impl System for Recorder {
        fn on_entity_attached(&mut self, _ctx: &mut SystemContext<'_>, entity: Entity) {
            self.log.borrow_mut().push(format!("attached {}", entity.id()));
        }

        fn on_entity_detached(&mut self, _ctx: &mut SystemContext<'_>, entity: Entity) {
            self.log.borrow_mut().push(format!("detached {}", entity.id()));
        }

        fn on_entity_enabled(&mut self, _ctx: &mut SystemContext<'_>, entity: Entity) {
            self.log.borrow_mut().push(format!("enabled {}", entity.id()));
        }

        fn on_entity_disabled(&mut self, _ctx: &mut SystemContext<'_>, entity: Entity) {
            self.log.borrow_mut().push(format!("disabled {}", entity.id()));
        }
    }

    fn setup() -> (World, SystemSlot, Log, Entity) {
        let mut world = World::new();
        let entity = world.create_entity();
        let log = Log::default();
        let slot = SystemSlot::new(Box::new(Recorder { log: Rc::clone(&log) }));
        (world, slot, log, entity)
    }

    #[test]
    fn test_transitions_fire_once() {
        let (mut world, mut slot, log, entity) = setup();

        slot.attach(&mut world, entity);
        slot.attach(&mut world, entity);
        assert_eq!(slot.state.status(entity), EntityStatus::Disabled);

        slot.enable(&mut world, entity);
        slot.enable(&mut world, entity);
        assert_eq!(slot.state.status(entity), EntityStatus::Enabled);
        assert_eq!(slot.state.enabled, vec![entity]);

        slot.disable(&mut world, entity);
        slot.disable(&mut world, entity);
        assert!(slot.state.enabled.is_empty());

        assert_eq!(
            *log.borrow(),
            vec!["attached 0", "enabled 0", "disabled 0"]
        );
    }

    #[test]
    fn test_detach_enabled_disables_first() {
        let (mut world, mut slot, log, entity) = setup();

        slot.attach(&mut world, entity);
        slot.enable(&mut world, entity);
        log.borrow_mut().clear();

        slot.detach(&mut world, entity);
        assert_eq!(*log.borrow(), vec!["disabled 0", "detached 0"]);
        assert_eq!(slot.state.status(entity), EntityStatus::NotAttached);
        assert!(slot.state.enabled.is_empty());
        assert!(slot.state.disabled.is_empty());

        slot.detach(&mut world, entity);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_enable_requires_attachment() {
        let (mut world, mut slot, log, entity) = setup();
        slot.enable(&mut world, entity);
        assert_eq!(slot.state.status(entity), EntityStatus::NotAttached);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_detach_all() {
        let (mut world, mut slot, log, first) = setup();
        let second = world.create_entity();

        slot.attach(&mut world, first);
        slot.enable(&mut world, first);
        slot.attach(&mut world, second);
        log.borrow_mut().clear();

        slot.detach_all(&mut world);
        assert_eq!(
            *log.borrow(),
            vec!["disabled 0", "detached 0", "detached 1"]
        );
        assert!(slot.state.status.is_empty());
    }

    #[test]
    fn test_downcast() {
        let (_world, mut slot, _log, _entity) = setup();
        assert!(slot.downcast_ref::<Recorder>().is_some());
        assert!(slot.downcast_mut::<Recorder>().is_some());
        assert!(slot.name().ends_with("Recorder"));
    }
}
