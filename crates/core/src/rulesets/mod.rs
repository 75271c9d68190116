//! Ruleset reconciliation domain

pub mod driver;
pub mod plan;
pub mod ports;
pub mod translate;

pub use driver::ReconciliationDriver;
pub use plan::{reconcile, Action};
pub use ports::*;
pub use translate::{ruleset_from_attributes, rule_from_attributes};
