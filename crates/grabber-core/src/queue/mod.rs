//! Queue module: the prioritized, FIFO target queue the worker drains.

mod memory;

pub use memory::TargetQueue;
