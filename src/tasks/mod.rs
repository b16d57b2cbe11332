//! Background Tasks Module
//!
//! Periodic maintenance running alongside the sync core.
//!
//! # Tasks
//! - TTL sweep: purges expired entries from every cache domain

mod sweep;

pub use sweep::spawn_sweep_task;
