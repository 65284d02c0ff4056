//! Household tax and cash-flow engine.
//!
//! [`models`] holds scenario inputs, rate tables and derived results,
//! [`calculations`] the tax engine, expense categorizer and household
//! calculator, and [`store`] the collection of named scenarios.

pub mod calculations;
pub mod models;
pub mod store;

pub use calculations::{HouseholdCalculator, TaxEngine, TaxError};
pub use models::*;
pub use store::{ScenarioChange, ScenarioStorage, ScenarioStore, StoreError, StoreSnapshot};
