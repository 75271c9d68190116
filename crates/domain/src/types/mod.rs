//! Domain types and models

pub mod ruleset;
pub mod validation;

pub use ruleset::{Logging, ManagedRuleset, Rule, Ruleset, RulesetKind, ZoneId};
pub use validation::ValidationOutcome;
