//! # Components
//!
//! Components are plain data attached to entities. They carry no behavior;
//! systems read and write them.

use std::any::Any;

/// Marker trait for ECS components.
///
/// Any `'static` type can become a component. Each component type receives
/// a slot from the world's component registry the first time it is used,
/// and an entity holds at most one instance per slot.
///
/// # Example
///
/// ```rust
/// use tessera_core::Component;
///
/// #[derive(Debug, Default)]
/// struct Health {
///     current: u32,
///     max: u32,
/// }
///
/// impl Component for Health {}
/// ```
pub trait Component: Any {}
