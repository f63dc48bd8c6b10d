//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Sweep: Deletes expired cache documents at a configured interval

mod sweep;

pub use sweep::spawn_sweep_task;
