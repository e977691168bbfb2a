//! # ECS World
//!
//! The world owns every entity row, every component, every system and the
//! event bus. It is the only place entities and systems come from.
//!
//! ## Deferred membership
//!
//! Operations that can change which systems an entity belongs to (enable,
//! disable, remove, adding or removing components) never touch system
//! state directly. They validate the entity and queue an action. Each
//! [`World::update`] drains the queue once:
//!
//! ```text
//!   update(dt)
//!     1. on_start        for systems added since the last update
//!     2. on_pre_update   for every system
//!     3. apply queued actions   (attach / enable / disable / detach hooks)
//!     4. on_update       for every system
//!     5. on_post_update  for every system
//! ```
//!
//! The queue is swapped out before the drain, so actions raised by hooks
//! during step 3 (or any later step) are applied on the next update.
//!
//! A drain started from inside a hook cannot move entities in the system
//! whose hook is running. Actions that would are put back on the queue,
//! together with every later action for the same entity.

use std::collections::HashMap;

use tessera_events::EventBus;

use crate::config::WorldConfig;
use crate::ecs::component::Component;
use crate::ecs::entity::{Entity, EntityId, WorldId};
use crate::ecs::filter::{ComponentFilter, ComponentMask, FilterBuilder};
use crate::ecs::registry::{SystemEntry, SystemRegistry};
use crate::ecs::system::{System, SystemContext, SystemSlot};
use crate::ecs::type_registry::{TypeRegistry, TypeSlot};
use crate::ecs::storage::ComponentStore;
use crate::error::{EcsError, EcsResult};
use crate::memory::EntityPool;
use crate::sync::DoubleBuffer;

/// World-owned attributes of one entity id.
#[derive(Debug, Default)]
struct EntityRecord {
    /// Set between creation and the drain that applies its removal.
    valid: bool,
    /// Global enabled flag.
    enabled: bool,
    name: Option<String>,
    /// Attachment flag per system type slot.
    systems: Vec<bool>,
}

impl EntityRecord {
    fn attached(&self, system: TypeSlot) -> bool {
        self.systems.get(system).copied().unwrap_or(false)
    }

    fn set_attached(&mut self, system: TypeSlot, attached: bool) {
        if self.systems.len() <= system {
            if !attached {
                return;
            }
            self.systems.resize(system + 1, false);
        }
        self.systems[system] = attached;
    }
}

/// Kind of deferred entity mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ActionKind {
    /// Attach to every matching system and enable there.
    Enable,
    /// Disable in every system the entity is attached to.
    Disable,
    /// Re-evaluate membership after a component change.
    Refresh,
    /// Detach everywhere and release the id.
    Remove,
}

/// One queued entity mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EntityAction {
    /// Target entity.
    pub(crate) id: EntityId,
    /// What to do with it.
    pub(crate) kind: ActionKind,
}

/// Outcome of matching one entity against one system's filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AttachStatus {
    /// Newly attached.
    Attached,
    /// Matched and was already attached; nothing fired.
    AlreadyAttached,
    /// Stopped matching and was detached.
    Detached,
    /// Neither matches nor was attached.
    NotAttached,
}

/// Counters reported by [`World::apply_actions`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionStats {
    /// Actions applied.
    pub applied: usize,
    /// Actions dropped because their entity was invalid.
    pub failed: usize,
    /// Actions put back on the queue because they touch a system whose
    /// hook is running.
    pub deferred: usize,
}

/// Container of all entities, components and systems.
///
/// # Example
///
/// ```rust
/// use tessera_core::World;
///
/// let mut world = World::new();
/// let player = world.create_named_entity("player").unwrap();
///
/// world.update(0.016);
/// assert!(world.is_entity_enabled(player));
/// assert_eq!(world.get_entity_by_name("player"), Some(player));
/// ```
pub struct World {
    id: WorldId,
    records: Vec<EntityRecord>,
    names: HashMap<String, EntityId>,
    components: ComponentStore,
    system_types: TypeRegistry<dyn System>,
    systems: SystemRegistry,
    pool: EntityPool,
    actions: DoubleBuffer<EntityAction>,
    events: EventBus,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: WorldId::next(),
            records: Vec::new(),
            names: HashMap::new(),
            components: ComponentStore::new(),
            system_types: TypeRegistry::new(),
            systems: SystemRegistry::new(),
            pool: EntityPool::new(),
            actions: DoubleBuffer::new(),
            events: EventBus::new(),
        }
    }

    /// Creates an empty world with room for `config.initial_capacity`
    /// entities before any reallocation.
    #[must_use]
    pub fn with_config(config: &WorldConfig) -> Self {
        let mut world = Self::new();
        world.records.reserve(config.initial_capacity);
        world.components.reserve(config.initial_capacity);
        tracing::debug!("World {} created with capacity {}", world.id.raw(), config.initial_capacity);
        world
    }

    /// This world's identity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> WorldId {
        self.id
    }

    /// The event bus shared by this world's systems.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Mutable access to the event bus.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    // =========================================================================
    // Entities
    // =========================================================================

    #[inline]
    fn handle(&self, id: EntityId) -> Entity {
        Entity::new(id, self.id)
    }

    #[inline]
    fn is_id_valid(&self, id: EntityId) -> bool {
        self.records.get(id.index()).is_some_and(|r| r.valid)
    }

    /// Resolves a handle to a live row of this world.
    fn check(&self, entity: Entity, origin: &'static str) -> EcsResult<EntityId> {
        match entity.world_id() {
            None => Err(EcsError::NotAttachedToWorld { origin }),
            Some(world) if world == self.id && self.is_id_valid(entity.id()) => Ok(entity.id()),
            Some(_) => Err(EcsError::InvalidEntity {
                entity: entity.id(),
                origin,
            }),
        }
    }

    fn extend(&mut self, rows: usize) {
        if rows > self.records.len() {
            self.records.resize_with(rows, EntityRecord::default);
            self.components.resize(rows);
        }
    }

    /// Creates an entity. It joins matching systems on the next update.
    pub fn create_entity(&mut self) -> Entity {
        let id = self.pool.create();
        self.extend(id.index() + 1);

        let record = &mut self.records[id.index()];
        *record = EntityRecord {
            valid: true,
            enabled: true,
            ..EntityRecord::default()
        };

        self.actions.push(EntityAction {
            id,
            kind: ActionKind::Enable,
        });
        tracing::trace!("Entity {} created", id);
        self.handle(id)
    }

    /// Creates an entity bound to a unique name.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::DuplicateName`] if a live entity already has
    /// this name.
    pub fn create_named_entity(&mut self, name: impl Into<String>) -> EcsResult<Entity> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(EcsError::DuplicateName {
                name,
                origin: "World::create_named_entity",
            });
        }

        let entity = self.create_entity();
        self.names.insert(name.clone(), entity.id());
        self.records[entity.id().index()].name = Some(name);
        Ok(entity)
    }

    /// Handle for `id`, if that id is live.
    #[must_use]
    pub fn get_entity(&self, id: EntityId) -> Option<Entity> {
        self.is_id_valid(id).then(|| self.handle(id))
    }

    /// Handle of the entity bound to `name`.
    #[must_use]
    pub fn get_entity_by_name(&self, name: &str) -> Option<Entity> {
        self.names.get(name).and_then(|id| self.get_entity(*id))
    }

    /// Name of `entity`, if it has one.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached or the entity is invalid.
    pub fn entity_name(&self, entity: Entity) -> EcsResult<Option<&str>> {
        let id = self.check(entity, "World::entity_name")?;
        Ok(self.records[id.index()].name.as_deref())
    }

    /// Queues `entity` to be enabled.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached or the entity is invalid.
    pub fn enable_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.queue(entity, ActionKind::Enable, "World::enable_entity")
    }

    /// Queues `entity` to be disabled.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached or the entity is invalid.
    pub fn disable_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.queue(entity, ActionKind::Disable, "World::disable_entity")
    }

    /// Queues `entity` for removal.
    ///
    /// The entity stays valid until the next update applies the removal.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached or the entity is invalid.
    pub fn remove_entity(&mut self, entity: Entity) -> EcsResult<()> {
        self.queue(entity, ActionKind::Remove, "World::remove_entity")
    }

    fn queue(&mut self, entity: Entity, kind: ActionKind, origin: &'static str) -> EcsResult<()> {
        let id = self.check(entity, origin)?;
        self.actions.push(EntityAction { id, kind });
        Ok(())
    }

    /// Queues every live entity for removal.
    pub fn remove_all_entities(&mut self) {
        for (index, record) in self.records.iter().enumerate() {
            if record.valid {
                // Row count never exceeds the pool's u32 id space.
                let id = EntityId::new(u32::try_from(index).unwrap_or(u32::MAX));
                self.actions.push(EntityAction {
                    id,
                    kind: ActionKind::Remove,
                });
            }
        }
    }

    /// Returns `true` if `entity` belongs to this world and is live.
    #[must_use]
    pub fn is_entity_valid(&self, entity: Entity) -> bool {
        self.check(entity, "World::is_entity_valid").is_ok()
    }

    /// Returns `true` if `entity` is live and enabled.
    #[must_use]
    pub fn is_entity_enabled(&self, entity: Entity) -> bool {
        self.check(entity, "World::is_entity_enabled")
            .is_ok_and(|id| self.records[id.index()].enabled)
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.records.iter().filter(|r| r.valid).count()
    }

    /// Number of actions waiting for the next drain.
    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.actions.len()
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Attaches `component` to `entity`, replacing any previous `T`.
    ///
    /// System membership is re-evaluated on the next update.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached, the entity is invalid, or `T` has
    /// no room in a component mask.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<&mut T> {
        let id = self.check(entity, "World::add_component")?;
        let stored = self.components.add(id, component)?;
        self.actions.push(EntityAction {
            id,
            kind: ActionKind::Refresh,
        });
        Ok(stored)
    }

    /// Borrows the `T` of `entity`.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached, the entity is invalid, or it holds
    /// no `T`.
    pub fn component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        let id = self.check(entity, "World::component")?;
        self.components.get(id)
    }

    /// Mutably borrows the `T` of `entity`.
    ///
    /// # Errors
    ///
    /// Same as [`World::component`].
    pub fn component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        let id = self.check(entity, "World::component_mut")?;
        self.components.get_mut(id)
    }

    /// Returns `true` if `entity` is live and holds a `T`.
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.check(entity, "World::has_component")
            .is_ok_and(|id| self.components.has::<T>(id))
    }

    /// Detaches the `T` of `entity`.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached, the entity is invalid, or it holds
    /// no `T`.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> EcsResult<()> {
        let id = self.check(entity, "World::remove_component")?;
        self.components.remove::<T>(id)?;
        self.actions.push(EntityAction {
            id,
            kind: ActionKind::Refresh,
        });
        Ok(())
    }

    /// Detaches every component of `entity`.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached or the entity is invalid.
    pub fn remove_all_components(&mut self, entity: Entity) -> EcsResult<()> {
        let id = self.check(entity, "World::remove_all_components")?;
        self.components.remove_all(id);
        self.actions.push(EntityAction {
            id,
            kind: ActionKind::Refresh,
        });
        Ok(())
    }

    /// The component slots `entity` currently holds.
    ///
    /// # Errors
    ///
    /// Fails if the handle is detached or the entity is invalid.
    pub fn component_mask(&self, entity: Entity) -> EcsResult<ComponentMask> {
        let id = self.check(entity, "World::component_mask")?;
        Ok(self.components.mask(id))
    }

    // =========================================================================
    // Systems
    // =========================================================================

    /// Registers `system` with the given priority and returns it.
    ///
    /// Higher priorities run first; equal priorities run in the order they
    /// were added. Adding a type that is already registered replaces the
    /// previous instance, which is shut down and detached from everything.
    /// Existing entities are offered to the new system on the next update.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentLimitExceeded`] if the filter names a
    /// component type with no room in a mask.
    pub fn add_system<T: System>(&mut self, priority: i32, mut system: T) -> EcsResult<&mut T> {
        let mut filter = ComponentFilter::new();
        let mut builder = FilterBuilder::new(&mut filter, self.components.types());
        system.configure(&mut builder);
        builder.finish()?;

        let sid = self.system_types.id_of::<T>();
        if let Some(previous) = self.systems.remove(sid) {
            tracing::debug!("System {} replaced", previous.name);
            self.unlink(previous);
        }

        let slot = SystemSlot::new(Box::new(system));
        let name = slot.name();
        self.systems.insert(SystemEntry {
            type_slot: sid,
            name,
            priority,
            filter,
            slot: Some(slot),
        });
        tracing::debug!("System {} added with priority {}", name, priority);

        for (index, record) in self.records.iter().enumerate() {
            if record.valid {
                let id = EntityId::new(u32::try_from(index).unwrap_or(u32::MAX));
                self.actions.push(EntityAction {
                    id,
                    kind: ActionKind::Refresh,
                });
            }
        }

        self.systems.get_mut::<T>(sid).ok_or(EcsError::InvalidSystem {
            system: name,
            origin: "World::add_system",
        })
    }

    fn invalid_system<T: System>(origin: &'static str) -> EcsError {
        EcsError::InvalidSystem {
            system: std::any::type_name::<T>(),
            origin,
        }
    }

    /// Borrows the registered `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidSystem`] if `T` is not registered, or if
    /// it is the system whose hook is currently running.
    pub fn get_system<T: System>(&self) -> EcsResult<&T> {
        self.system_types
            .get::<T>()
            .and_then(|sid| self.systems.get::<T>(sid))
            .ok_or_else(|| Self::invalid_system::<T>("World::get_system"))
    }

    /// Mutably borrows the registered `T`.
    ///
    /// # Errors
    ///
    /// Same as [`World::get_system`].
    pub fn get_system_mut<T: System>(&mut self) -> EcsResult<&mut T> {
        let sid = self
            .system_types
            .get::<T>()
            .ok_or_else(|| Self::invalid_system::<T>("World::get_system_mut"))?;
        self.systems
            .get_mut::<T>(sid)
            .ok_or_else(|| Self::invalid_system::<T>("World::get_system_mut"))
    }

    /// Returns `true` if `T` is registered.
    #[must_use]
    pub fn has_system<T: System>(&self) -> bool {
        self.system_types
            .get::<T>()
            .is_some_and(|sid| self.systems.contains(sid))
    }

    /// Unregisters `T`.
    ///
    /// A started system receives `on_shutdown`, then every attached entity
    /// is detached from it and its event handlers are disconnected.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidSystem`] if `T` is not registered.
    pub fn remove_system<T: System>(&mut self) -> EcsResult<()> {
        let entry = self
            .system_types
            .get::<T>()
            .and_then(|sid| self.systems.remove(sid))
            .ok_or_else(|| Self::invalid_system::<T>("World::remove_system"))?;
        self.unlink(entry);
        Ok(())
    }

    /// Unregisters every system, in run order.
    pub fn remove_all_systems(&mut self) {
        for entry in self.systems.drain() {
            self.unlink(entry);
        }
    }

    /// Number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Forgets an unlinked entry's attachments and retires its instance.
    ///
    /// A checked-out instance is retired when its hook returns.
    fn unlink(&mut self, entry: SystemEntry) {
        for record in &mut self.records {
            record.set_attached(entry.type_slot, false);
        }
        if let Some(slot) = entry.slot {
            self.retire(slot);
        }
    }

    fn retire(&mut self, mut slot: SystemSlot) {
        if slot.state.started {
            slot.fire(self, |system, ctx| system.on_shutdown(ctx));
        }
        slot.detach_all(self);
        for id in slot.state.subscriptions.drain(..) {
            self.events.disconnect(id);
        }
        tracing::debug!("System {} removed", slot.name());
    }

    /// Runs `f` with the instance of `sid` lent out of the registry.
    ///
    /// Returns `None` if the system is gone or already lent out.
    fn with_slot<R, F>(&mut self, sid: TypeSlot, f: F) -> Option<R>
    where
        F: FnOnce(&mut SystemSlot, &mut World) -> R,
    {
        let mut slot = self.systems.checkout(sid)?;
        let out = f(&mut slot, self);
        if let Some(orphan) = self.systems.checkin(sid, slot) {
            self.retire(orphan);
        }
        Some(out)
    }

    // =========================================================================
    // Update loop
    // =========================================================================

    /// Advances the world by one tick of `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.start_pending();
        self.run_stage(|system, ctx| system.on_pre_update(ctx, dt));
        self.apply_actions();
        self.run_stage(|system, ctx| system.on_update(ctx, dt));
        self.run_stage(|system, ctx| system.on_post_update(ctx, dt));
    }

    /// Fires `on_start` on every system that has not started yet.
    fn start_pending(&mut self) {
        for sid in self.systems.ordered_ids() {
            self.with_slot(sid, |slot, world| {
                if !slot.state.started {
                    slot.state.started = true;
                    tracing::debug!("System {} started", slot.name());
                    slot.fire(world, |system, ctx| system.on_start(ctx));
                }
            });
        }
    }

    /// Runs one per-tick hook on every started system, in priority order.
    fn run_stage<F>(&mut self, stage: F)
    where
        F: Fn(&mut dyn System, &mut SystemContext<'_>),
    {
        for sid in self.systems.ordered_ids() {
            self.with_slot(sid, |slot, world| {
                if slot.state.started {
                    slot.fire(world, &stage);
                }
            });
        }
    }

    /// Applies every queued action now.
    ///
    /// [`World::update`] calls this once per tick. Systems that have not
    /// started yet receive `on_start` before any entity reaches them.
    /// Actions queued while the drain runs wait for the next call. An action
    /// whose entity became invalid is logged and dropped; the drain
    /// continues with the next one.
    ///
    /// Called from inside a hook, actions that would attach, enable,
    /// disable or detach an entity in the system whose hook is running stay
    /// queued, along with every later action for that entity.
    pub fn apply_actions(&mut self) -> ActionStats {
        self.start_pending();

        let pending = self.actions.take();
        let mut held: Vec<EntityId> = Vec::new();
        let mut stats = ActionStats::default();

        for action in &pending {
            if held.contains(&action.id) || self.touches_lent_system(action.id) {
                held.push(action.id);
                self.actions.push(*action);
                stats.deferred += 1;
                continue;
            }

            match self.execute_action(*action) {
                Ok(()) => stats.applied += 1,
                Err(err) => {
                    stats.failed += 1;
                    tracing::error!("Dropped {:?} action for entity {}: {}", action.kind, action.id, err);
                }
            }
        }

        self.actions.recycle(pending);
        if stats.deferred > 0 {
            tracing::trace!("Deferred {} actions touching a running system", stats.deferred);
        }
        stats
    }

    /// Returns `true` if live entity `id` is attached to, or matches, a
    /// system that is checked out.
    fn touches_lent_system(&self, id: EntityId) -> bool {
        if !self.is_id_valid(id) {
            return false;
        }
        let mask = self.components.mask(id);
        self.systems
            .lent_ids()
            .into_iter()
            .any(|sid| self.is_attached(id, sid) || self.systems.filter(sid).is_some_and(|f| f.check(mask)))
    }

    fn execute_action(&mut self, action: EntityAction) -> EcsResult<()> {
        if !self.is_id_valid(action.id) {
            return Err(EcsError::InvalidEntity {
                entity: action.id,
                origin: "World::execute_action",
            });
        }

        match action.kind {
            ActionKind::Enable => self.action_enable(action.id),
            ActionKind::Disable => self.action_disable(action.id),
            ActionKind::Refresh => self.action_refresh(action.id),
            ActionKind::Remove => self.action_remove(action.id),
        }
        Ok(())
    }

    fn is_attached(&self, id: EntityId, sid: TypeSlot) -> bool {
        self.records
            .get(id.index())
            .is_some_and(|r| r.valid && r.attached(sid))
    }

    fn set_attached(&mut self, id: EntityId, sid: TypeSlot, attached: bool) {
        if let Some(record) = self.records.get_mut(id.index()) {
            record.set_attached(sid, attached);
        }
    }

    fn action_enable(&mut self, id: EntityId) {
        if let Some(record) = self.records.get_mut(id.index()) {
            record.enabled = true;
        }

        let entity = self.handle(id);
        for sid in self.systems.ordered_ids() {
            if !self.is_id_valid(id) {
                break;
            }
            let status = self.try_attach(sid, id);
            if matches!(status, AttachStatus::Attached | AttachStatus::AlreadyAttached) {
                self.with_slot(sid, |slot, world| slot.enable(world, entity));
            }
        }
    }

    fn action_disable(&mut self, id: EntityId) {
        if let Some(record) = self.records.get_mut(id.index()) {
            record.enabled = false;
        }

        let entity = self.handle(id);
        for sid in self.systems.ordered_ids() {
            if self.is_attached(id, sid) {
                self.with_slot(sid, |slot, world| slot.disable(world, entity));
            }
        }
    }

    fn action_refresh(&mut self, id: EntityId) {
        let entity = self.handle(id);
        for sid in self.systems.ordered_ids() {
            if !self.is_id_valid(id) {
                break;
            }
            let status = self.try_attach(sid, id);
            let enabled = self.records.get(id.index()).is_some_and(|r| r.enabled);
            if enabled && status == AttachStatus::Attached {
                self.with_slot(sid, |slot, world| slot.enable(world, entity));
            }
        }
    }

    fn action_remove(&mut self, id: EntityId) {
        let entity = self.handle(id);
        for sid in self.systems.ordered_ids() {
            if self.is_attached(id, sid)
                && self.with_slot(sid, |slot, world| slot.detach(world, entity)).is_some()
            {
                self.set_attached(id, sid, false);
            }
        }

        let Some(record) = self.records.get_mut(id.index()) else {
            return;
        };
        if !record.valid {
            return;
        }
        record.valid = false;
        record.enabled = false;
        record.systems.clear();
        if let Some(name) = record.name.take() {
            self.names.remove(&name);
        }

        self.components.remove_all(id);
        self.pool.store(id);
        tracing::trace!("Entity {} removed", id);
    }

    /// Matches entity `id` against system `sid` and attaches or detaches
    /// it as needed. Fires at most one hook.
    ///
    /// The attachment record only changes when the system is reachable; a
    /// checked-out system keeps its previous state.
    pub(crate) fn try_attach(&mut self, sid: TypeSlot, id: EntityId) -> AttachStatus {
        let Some(filter) = self.systems.filter(sid) else {
            return AttachStatus::NotAttached;
        };
        let entity = self.handle(id);
        let matches = filter.check(self.components.mask(id));

        match (matches, self.is_attached(id, sid)) {
            (true, false) => {
                if self.with_slot(sid, |slot, world| slot.attach(world, entity)).is_none() {
                    return AttachStatus::NotAttached;
                }
                self.set_attached(id, sid, true);
                AttachStatus::Attached
            }
            (true, true) => AttachStatus::AlreadyAttached,
            (false, true) => {
                if self.with_slot(sid, |slot, world| slot.detach(world, entity)).is_none() {
                    return AttachStatus::AlreadyAttached;
                }
                self.set_attached(id, sid, false);
                AttachStatus::Detached
            }
            (false, false) => AttachStatus::NotAttached,
        }
    }

    /// Removes every system, entity, queued action, name, event handler
    /// and component, and restarts entity ids at 0.
    pub fn clear(&mut self) {
        self.remove_all_systems();

        self.records.clear();
        self.actions.clear();
        self.names.clear();
        self.events.clear_all();
        self.components.clear();
        self.pool.reset();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("id", &self.id)
            .field("entities", &self.entity_count())
            .field("systems", &self.systems.len())
            .field("pending_actions", &self.actions.len())
            .finish_non_exhaustive()
    }
}
