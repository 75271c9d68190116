//! Ruleset domain types
//!
//! A ruleset is an ordered collection of rules evaluated together at one
//! phase of the remote request pipeline. Rule order is evaluation order and
//! is preserved everywhere a ruleset is copied, compared, or serialized.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::impl_domain_enum_conversions;

/// Kind of ruleset. Only zone-scoped rulesets are managed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulesetKind {
    #[default]
    Zone,
}

impl_domain_enum_conversions!(RulesetKind {
    Zone => "zone",
});

/// Optional per-rule logging override.
///
/// `None` on a rule means "use the remote default", which is not the same
/// as `Some(Logging { enabled: false })`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logging {
    pub enabled: bool,
}

/// A single rule. Rules have no identity of their own; they only exist as
/// entries of a [`Ruleset`]'s rule sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Expression in the remote system's rule language.
    pub expression: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub action_parameters: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Logging>,
}

fn default_enabled() -> bool {
    true
}

impl Rule {
    /// Enabled rule with no description, parameters, or logging override.
    pub fn new(expression: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            action: action.into(),
            description: None,
            enabled: true,
            action_parameters: BTreeMap::new(),
            logging: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.action_parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging = Some(Logging { enabled });
        self
    }
}

/// A ruleset as desired locally or as observed remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    /// Identifier assigned by the remote system; `None` until the first
    /// successful create and again after delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Evaluation point, passed through to the remote system untouched.
    pub phase: String,
    #[serde(default)]
    pub kind: RulesetKind,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Ruleset {
    pub fn new(name: impl Into<String>, phase: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self { id: None, name: name.into(), phase: phase.into(), kind: RulesetKind::Zone, rules }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Identifier, if the ruleset exists remotely.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Compare everything except the remote identifier.
    pub fn same_content(&self, other: &Self) -> bool {
        self.name == other.name
            && self.phase == other.phase
            && self.kind == other.kind
            && self.rules == other.rules
    }
}

/// Zone identifier scoping every ruleset call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ZoneId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ZoneId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Resource-level state of one ruleset: the zone it lives in and its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedRuleset {
    pub zone_id: ZoneId,
    #[serde(flatten)]
    pub ruleset: Ruleset,
}

impl ManagedRuleset {
    pub fn new(zone_id: impl Into<ZoneId>, ruleset: Ruleset) -> Self {
        Self { zone_id: zone_id.into(), ruleset }
    }

    pub fn id(&self) -> Option<&str> {
        self.ruleset.id()
    }
}
