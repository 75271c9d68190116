//! Wire shapes of the ruleset endpoints
//!
//! Outbound payloads borrow from the domain types. Inbound records are
//! lenient about fields the remote adds (versions, timestamps, rule ids) and
//! are normalized back into the domain shape by [`RulesetRecord::into_ruleset`].

use std::collections::BTreeMap;
use std::str::FromStr;

use rulegate_domain::{Logging, Rule, Ruleset, RulesetKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(crate) struct RulesetPayload<'a> {
    name: &'a str,
    phase: &'a str,
    kind: RulesetKind,
    rules: Vec<RulePayload<'a>>,
}

#[derive(Debug, Serialize)]
struct RulePayload<'a> {
    expression: &'a str,
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    enabled: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    action_parameters: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logging: Option<Logging>,
}

impl<'a> From<&'a Ruleset> for RulesetPayload<'a> {
    fn from(ruleset: &'a Ruleset) -> Self {
        Self {
            name: &ruleset.name,
            phase: &ruleset.phase,
            kind: RulesetKind::Zone,
            rules: ruleset.rules.iter().map(RulePayload::from).collect(),
        }
    }
}

impl<'a> From<&'a Rule> for RulePayload<'a> {
    fn from(rule: &'a Rule) -> Self {
        Self {
            expression: &rule.expression,
            action: &rule.action,
            description: rule.description.as_deref(),
            enabled: rule.enabled,
            action_parameters: &rule.action_parameters,
            logging: rule.logging,
        }
    }
}

/// Body of a successful create; only the identifier matters, and it must
/// be present.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedRecord {
    pub(crate) id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RulesetRecord {
    #[serde(default)]
    id: Option<String>,
    name: String,
    phase: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    rules: Option<Vec<RuleRecord>>,
}

#[derive(Debug, Deserialize)]
struct RuleRecord {
    expression: String,
    action: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    action_parameters: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    logging: Option<Logging>,
}

impl RulesetRecord {
    /// Normalize into the domain shape.
    ///
    /// Empty descriptions become `None`, an absent logging block stays
    /// absent, and non-string parameter values are kept as compact JSON.
    ///
    /// # Errors
    /// Returns a message when the remote reports a kind other than `zone`.
    pub(crate) fn into_ruleset(self) -> Result<Ruleset, String> {
        let kind = match self.kind.as_deref() {
            None | Some("") => RulesetKind::Zone,
            Some(kind) => RulesetKind::from_str(kind)?,
        };

        Ok(Ruleset {
            id: self.id.filter(|id| !id.is_empty()),
            name: self.name,
            phase: self.phase,
            kind,
            rules: self.rules.unwrap_or_default().into_iter().map(RuleRecord::into_rule).collect(),
        })
    }
}

impl RuleRecord {
    fn into_rule(self) -> Rule {
        let action_parameters = self
            .action_parameters
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::Null => None,
                Value::String(text) => Some((key, text)),
                other => Some((key, other.to_string())),
            })
            .collect();

        Rule {
            expression: self.expression,
            action: self.action,
            description: self.description.filter(|d| !d.is_empty()),
            enabled: self.enabled.unwrap_or(true),
            action_parameters,
            logging: self.logging,
        }
    }
}
