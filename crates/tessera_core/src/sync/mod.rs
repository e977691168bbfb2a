//! # Deferred Work
//!
//! Queues that let callbacks schedule mutations while the structure they
//! would mutate is being walked.

mod double_buffer;

pub use double_buffer::DoubleBuffer;
