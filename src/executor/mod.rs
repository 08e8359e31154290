//! Scenario execution engine
//!
//! Scenarios run strictly one after another; each transport call completes
//! before the next begins.

mod runner;

pub use runner::ScenarioRunner;
