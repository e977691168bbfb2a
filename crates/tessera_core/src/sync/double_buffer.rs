//! # Double-Buffered Queue
//!
//! Two vectors that trade places: producers push into the incoming one
//! while a consumer drains the other.
//!
//! ```text
//!   push ──> [ incoming ]        take()        [ spare ] <── push
//!                 │          ───────────>
//!                 ▼
//!            consumer drains,
//!            then recycle()s it as the new spare
//! ```
//!
//! Items pushed while a drain is running land in the fresh queue and are
//! seen by the next `take`, never by the drain already in progress.

/// Swap-on-take queue for deferred work.
#[derive(Debug)]
pub struct DoubleBuffer<T> {
    /// Queue currently receiving pushes.
    incoming: Vec<T>,
    /// Drained allocation kept for the next swap.
    spare: Vec<T>,
}

impl<T> DoubleBuffer<T> {
    /// Creates an empty double buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            incoming: Vec::new(),
            spare: Vec::new(),
        }
    }

    /// Appends an item to the incoming queue.
    #[inline]
    pub fn push(&mut self, item: T) {
        self.incoming.push(item);
    }

    /// Swaps the queues and returns everything pushed so far.
    ///
    /// Hand the vector back with [`DoubleBuffer::recycle`] once drained to
    /// keep its allocation.
    #[must_use]
    pub fn take(&mut self) -> Vec<T> {
        std::mem::swap(&mut self.incoming, &mut self.spare);
        std::mem::take(&mut self.spare)
    }

    /// Returns a drained vector so its capacity is reused.
    pub fn recycle(&mut self, mut buffer: Vec<T>) {
        buffer.clear();
        if buffer.capacity() > self.spare.capacity() {
            self.spare = buffer;
        }
    }

    /// Number of items waiting in the incoming queue.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.incoming.len()
    }

    /// Returns `true` if nothing is waiting.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incoming.is_empty()
    }

    /// Drops every pending item.
    pub fn clear(&mut self) {
        self.incoming.clear();
    }
}

impl<T> Default for DoubleBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}
