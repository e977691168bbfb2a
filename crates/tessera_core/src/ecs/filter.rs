//! # Component Masks and Membership Filters
//!
//! Every entity carries a [`ComponentMask`]: bit `n` is set when the entity
//! holds the component type with slot `n`. Every system owns a
//! [`ComponentFilter`] that decides which masks it wants.
//!
//! ```text
//!   entity mask   0b0010_1011
//!   required      0b0000_1001   all present?     yes
//!   excluded      0b0100_0000   any present?     no
//!                                                -> match
//! ```

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

use crate::ecs::component::Component;
use crate::ecs::type_registry::{TypeRegistry, TypeSlot};
use crate::error::{EcsError, EcsResult};

type MaskWord = u64;

/// Number of distinct component types a world can track.
pub const MAX_COMPONENTS: usize = MaskWord::BITS as usize;

/// Fixed-width set of component slots.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ComponentMask(MaskWord);

impl ComponentMask {
    /// The mask with no slot set.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The mask with every slot set.
    #[inline]
    #[must_use]
    pub const fn all() -> Self {
        Self(MaskWord::MAX)
    }

    /// Builds a mask from its raw bits.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bits of the mask.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Sets `slot`. Returns `false` if the slot does not fit in the mask.
    #[inline]
    pub fn insert(&mut self, slot: TypeSlot) -> bool {
        if slot >= MAX_COMPONENTS {
            return false;
        }
        self.0 |= 1 << slot;
        true
    }

    /// Clears `slot`. Out-of-range slots are ignored.
    #[inline]
    pub fn remove(&mut self, slot: TypeSlot) {
        if slot < MAX_COMPONENTS {
            self.0 &= !(1 << slot);
        }
    }

    /// Returns `true` if `slot` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, slot: TypeSlot) -> bool {
        slot < MAX_COMPONENTS && self.0 & (1 << slot) != 0
    }

    /// Returns `true` if no slot is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the two masks share at least one slot.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Number of slots set.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl BitAnd for ComponentMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for ComponentMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl Not for ComponentMask {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl fmt::Debug for ComponentMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentMask({:#b})", self.0)
    }
}

/// Required/excluded slot pair deciding system membership.
///
/// The two masks are independent: a slot may be required and excluded at
/// once, in which case no entity ever matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComponentFilter {
    required: ComponentMask,
    excluded: ComponentMask,
}

impl ComponentFilter {
    /// A filter that matches every entity.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            required: ComponentMask::empty(),
            excluded: ComponentMask::empty(),
        }
    }

    /// Marks `slot` as required. Returns `false` if the slot is out of range.
    pub fn require(&mut self, slot: TypeSlot) -> bool {
        self.required.insert(slot)
    }

    /// Marks `slot` as excluded. Returns `false` if the slot is out of range.
    pub fn exclude(&mut self, slot: TypeSlot) -> bool {
        self.excluded.insert(slot)
    }

    /// Removes `slot` from both lists.
    pub fn ignore(&mut self, slot: TypeSlot) {
        self.required.remove(slot);
        self.excluded.remove(slot);
    }

    /// Clears the required list and excludes every slot.
    ///
    /// Afterwards only the empty mask matches.
    pub fn exclude_all(&mut self) {
        self.required = ComponentMask::empty();
        self.excluded = ComponentMask::all();
    }

    /// Excludes every slot that is not required.
    ///
    /// Afterwards only a mask equal to the required set matches.
    pub fn exclude_not_required(&mut self) {
        self.excluded = !self.required;
    }

    /// Tests an entity's component mask against this filter.
    #[inline]
    #[must_use]
    pub fn check(&self, mask: ComponentMask) -> bool {
        if self.excluded.intersects(mask) {
            return false;
        }
        mask & self.required == self.required
    }

    /// The required slots.
    #[must_use]
    pub const fn required(&self) -> ComponentMask {
        self.required
    }

    /// The excluded slots.
    #[must_use]
    pub const fn excluded(&self) -> ComponentMask {
        self.excluded
    }
}

/// Typed front-end over a [`ComponentFilter`], handed to
/// [`System::configure`](crate::ecs::System::configure).
///
/// Component types are resolved to slots through the world's component
/// registry. The first slot that does not fit in a mask is remembered and
/// reported by [`FilterBuilder::finish`].
pub struct FilterBuilder<'a> {
    filter: &'a mut ComponentFilter,
    types: &'a TypeRegistry<dyn Component>,
    error: Option<EcsError>,
}

impl<'a> FilterBuilder<'a> {
    pub(crate) fn new(
        filter: &'a mut ComponentFilter,
        types: &'a TypeRegistry<dyn Component>,
    ) -> Self {
        Self {
            filter,
            types,
            error: None,
        }
    }

    fn slot_of<T: Component>(&mut self) -> Option<TypeSlot> {
        let slot = self.types.id_of::<T>();
        if slot < MAX_COMPONENTS {
            return Some(slot);
        }
        if self.error.is_none() {
            self.error = Some(EcsError::ComponentLimitExceeded {
                component: std::any::type_name::<T>(),
                slot,
                max: MAX_COMPONENTS,
                origin: "FilterBuilder",
            });
        }
        None
    }

    /// Requires component `T`.
    pub fn require<T: Component>(&mut self) -> &mut Self {
        if let Some(slot) = self.slot_of::<T>() {
            self.filter.require(slot);
        }
        self
    }

    /// Excludes component `T`.
    pub fn exclude<T: Component>(&mut self) -> &mut Self {
        if let Some(slot) = self.slot_of::<T>() {
            self.filter.exclude(slot);
        }
        self
    }

    /// Removes component `T` from both lists.
    pub fn ignore<T: Component>(&mut self) -> &mut Self {
        if let Some(slot) = self.slot_of::<T>() {
            self.filter.ignore(slot);
        }
        self
    }

    /// See [`ComponentFilter::exclude_all`].
    pub fn exclude_all(&mut self) -> &mut Self {
        self.filter.exclude_all();
        self
    }

    /// See [`ComponentFilter::exclude_not_required`].
    pub fn exclude_not_required(&mut self) -> &mut Self {
        self.filter.exclude_not_required();
        self
    }

    /// Returns the first slot overflow met while building, if any.
    pub(crate) fn finish(self) -> EcsResult<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
