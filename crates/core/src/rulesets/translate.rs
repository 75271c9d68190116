//! Translation boundary from untyped attribute bags to typed rulesets
//!
//! Host orchestration layers hand over desired state as string-keyed maps
//! with heterogeneous values. Everything is checked here, before any network
//! call: unknown keys, wrong value types, and missing required fields are
//! rejected instead of coerced.

use std::collections::BTreeMap;

use rulegate_domain::{
    Logging, ManagedRuleset, Result, Rule, RulegateError, Ruleset, RulesetKind, ZoneId,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRuleset {
    zone_id: String,
    #[serde(default)]
    id: Option<String>,
    name: String,
    phase: String,
    #[serde(default)]
    kind: Option<RulesetKind>,
    rules: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    expression: String,
    action: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    action_parameters: Option<BTreeMap<String, String>>,
    #[serde(default)]
    logging: Option<RawLogging>,
}

/// Logging is accepted either as an object or as the legacy list shape
/// holding at most one object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLogging {
    Block(RawLoggingBlock),
    List(Vec<RawLoggingBlock>),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLoggingBlock {
    enabled: bool,
}

/// Build a [`ManagedRuleset`] from a desired-state attribute bag.
///
/// Expected keys: `zone_id`, `name`, `phase`, `rules`, and optionally `id`
/// and `kind` (which must be `"zone"`).
///
/// # Errors
/// Returns [`RulegateError::Translation`] naming the offending field or rule
/// position.
pub fn ruleset_from_attributes(attributes: &Value) -> Result<ManagedRuleset> {
    let raw: RawRuleset = decode(attributes, "ruleset")?;

    require_non_empty(&raw.zone_id, "ruleset", "zone_id")?;
    require_non_empty(&raw.name, "ruleset", "name")?;
    require_non_empty(&raw.phase, "ruleset", "phase")?;

    let rules = raw
        .rules
        .iter()
        .enumerate()
        .map(|(index, value)| rule_from_attributes(index, value))
        .collect::<Result<Vec<_>>>()?;

    let ruleset = Ruleset {
        id: raw.id.filter(|id| !id.is_empty()),
        name: raw.name,
        phase: raw.phase,
        kind: raw.kind.unwrap_or_default(),
        rules,
    };

    Ok(ManagedRuleset { zone_id: ZoneId::new(raw.zone_id), ruleset })
}

/// Build a single [`Rule`] from its attribute map; `index` is only used to
/// label errors.
pub fn rule_from_attributes(index: usize, attributes: &Value) -> Result<Rule> {
    let context = format!("rules[{index}]");
    let raw: RawRule = decode(attributes, &context)?;

    require_non_empty(&raw.expression, &context, "expression")?;
    require_non_empty(&raw.action, &context, "action")?;

    let logging = match raw.logging {
        None => None,
        Some(RawLogging::Block(block)) => Some(Logging { enabled: block.enabled }),
        Some(RawLogging::List(blocks)) => match blocks.as_slice() {
            [] => None,
            [block] => Some(Logging { enabled: block.enabled }),
            _ => {
                return Err(RulegateError::Translation(format!(
                    "{context}: logging accepts at most one block, got {}",
                    blocks.len()
                )))
            }
        },
    };

    Ok(Rule {
        expression: raw.expression,
        action: raw.action,
        description: raw.description.filter(|d| !d.is_empty()),
        enabled: raw.enabled.unwrap_or(true),
        action_parameters: raw.action_parameters.unwrap_or_default(),
        logging,
    })
}

fn decode<T: DeserializeOwned>(value: &Value, context: &str) -> Result<T> {
    T::deserialize(value).map_err(|e| RulegateError::Translation(format!("{context}: {e}")))
}

fn require_non_empty(value: &str, context: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RulegateError::Translation(format!("{context}: `{field}` must not be empty")));
    }
    Ok(())
}
