//! Utility Module
//!
//! - [`Timer`]: session clock for time-driven brush uniforms

pub mod time;

pub use time::Timer;
