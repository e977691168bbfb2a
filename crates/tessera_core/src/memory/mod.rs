//! # Memory Management
//!
//! Id recycling for entity rows.

mod pool;

pub use pool::EntityPool;
