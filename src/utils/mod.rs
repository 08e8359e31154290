//! Utility helpers

pub mod logger;
mod timer;

pub use logger::{init_logger, LogLevel};
pub use timer::Timer;
