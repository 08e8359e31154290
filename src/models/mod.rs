//! Data models for payment gateway integration testing
//!
//! This module contains all data structures used throughout the application.

mod check;
mod entity;
pub mod payload;
mod scenario;
mod summary;

pub use check::{CheckRecord, CheckStatus};
pub use entity::{order_status, Offer, OfferStatus, Order, Trader};
pub use scenario::{
    CatalogCase, CatalogEntity, LifecycleCase, OfferCase, OrderCase, Scenario, Selection, SortKey,
    TraderCase,
};
pub use summary::{RunSummary, ScenarioResult, ScenarioStatus};
