//! # TESSERA Core Engine
//!
//! Entity Component System runtime for real-time simulation loops:
//! - Entities composed at runtime from plain data components
//! - Systems selected purely by which component types an entity carries
//! - Entity mutations made during callbacks are deferred to the next tick
//!
//! ## Architecture Rules
//!
//! 1. **One owner** - the [`World`] owns entities, components and systems
//! 2. **Deferred membership** - enable, disable, remove and component
//!    changes are queued and applied once per update
//! 3. **Stable references** - a component never moves until it is removed
//!    or replaced
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::{Component, FilterBuilder, System, SystemContext, World};
//!
//! struct Velocity(f32);
//! impl Component for Velocity {}
//!
//! struct Position(f32);
//! impl Component for Position {}
//!
//! struct Movement;
//!
//! impl System for Movement {
//!     fn configure(&mut self, filter: &mut FilterBuilder<'_>) {
//!         filter.require::<Position>().require::<Velocity>();
//!     }
//!
//!     fn on_update(&mut self, ctx: &mut SystemContext<'_>, dt: f32) {
//!         ctx.for_each(|world, entity| {
//!             let speed = world.component::<Velocity>(entity).map(|v| v.0).unwrap_or(0.0);
//!             if let Ok(position) = world.component_mut::<Position>(entity) {
//!                 position.0 += speed * dt;
//!             }
//!         });
//!     }
//! }
//!
//! let mut world = World::new();
//! world.add_system(0, Movement)?;
//!
//! let ball = world.create_entity();
//! world.add_component(ball, Position(0.0))?;
//! world.add_component(ball, Velocity(2.0))?;
//!
//! world.update(0.5);
//! assert_eq!(world.component::<Position>(ball)?.0, 1.0);
//! # Ok::<(), tessera_core::EcsError>(())
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod logging;
pub mod memory;
pub mod sync;

pub use config::WorldConfig;
pub use ecs::{
    ActionStats, AsAny, Component, ComponentFilter, ComponentMask, ComponentStore, Entity,
    EntityId, EntityStatus, FilterBuilder, System, SystemContext, TypeRegistry, TypeSlot, World,
    WorldId, MAX_COMPONENTS,
};
pub use error::{EcsError, EcsResult};
pub use logging::LogConfig;
pub use memory::EntityPool;
pub use sync::DoubleBuffer;
pub use tessera_events::{EventBus, HandlerId};
