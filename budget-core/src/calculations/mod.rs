//! Tax and cash-flow calculations.
//!
//! Every calculator borrows its rate tables and works on a snapshot of
//! inputs; nothing here mutates a scenario or performs I/O.

pub mod categorizer;
pub mod common;
pub mod fica;
pub mod household;
pub mod tax_engine;

pub use fica::PayrollTaxCalculator;
pub use household::HouseholdCalculator;
pub use tax_engine::{DEFAULT_STATE_RATE, TaxEngine, TaxError, bracket_marginal_rate, bracket_tax};
