//! Port interfaces for ruleset reconciliation

use rulegate_domain::{Result, Ruleset, ValidationError, ZoneId};

/// Remote CRUD surface for zone rulesets.
///
/// Every call is a single blocking remote operation. Errors are returned
/// verbatim; implementations do not retry.
pub trait RulesetApi: Send + Sync {
    /// Create the ruleset and return the identifier assigned remotely.
    fn create(&self, zone: &ZoneId, desired: &Ruleset) -> Result<String>;

    /// Fetch the ruleset and normalize it into the desired-state shape.
    fn read(&self, zone: &ZoneId, id: &str) -> Result<Ruleset>;

    /// Replace the whole ruleset, resending every rule.
    fn update(&self, zone: &ZoneId, id: &str, desired: &Ruleset) -> Result<()>;

    /// Delete the ruleset.
    fn delete(&self, zone: &ZoneId, id: &str) -> Result<()>;
}

/// Remote check of a single rule expression.
pub trait ExpressionValidator: Send + Sync {
    /// Ask the remote system whether `expression` is valid.
    ///
    /// Rejections and transport failures are distinct variants of
    /// [`ValidationError`].
    fn validate(&self, expression: &str) -> std::result::Result<(), ValidationError>;
}
