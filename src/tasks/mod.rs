//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod clock_tick;

// Re-export main functions
pub use clock_tick::clock_tick_task;
