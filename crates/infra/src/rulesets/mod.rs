//! Remote ruleset resource

mod payload;
pub mod reconciler;

pub use reconciler::RulesetReconciler;
