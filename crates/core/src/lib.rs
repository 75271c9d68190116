//! # Rulegate Core
//!
//! Pure reconciliation logic - no HTTP or configuration code.
//!
//! This crate contains:
//! - Port interfaces for the remote ruleset API and expression validator
//! - The strict translation boundary from attribute bags to typed rulesets
//! - Planning of create/update/delete actions from desired vs observed state
//! - The validation-gated reconciliation driver
//!
//! ## Architecture Principles
//! - Only depends on `rulegate-domain`
//! - All remote access goes through the traits in [`rulesets::ports`]

pub mod rulesets;

pub use rulesets::{
    reconcile, rule_from_attributes, ruleset_from_attributes, Action, ExpressionValidator,
    ReconciliationDriver, RulesetApi,
};
