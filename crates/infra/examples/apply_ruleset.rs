//! Example: Applying a desired ruleset to a zone
//!
//! Loads provider settings (from `.env`, the environment, or a config file),
//! validates every rule expression remotely, and creates or updates the
//! ruleset.
//!
//! # Setup
//!
//! 1. Provide credentials, e.g. in `.env`: ```bash CF_API_TOKENS=token-a,token-b
//!    CF_ACCOUNT_ID=your-account-id ```
//!
//! 2. Run this example: ```bash cargo run --example apply_ruleset -- <zone-id>
//!    [desired.json] [existing-ruleset-id] ```

use anyhow::{bail, Context};
use rulegate_core::ruleset_from_attributes;
use rulegate_domain::ManagedRuleset;
use rulegate_infra::{config, init_tracing, Client, LogFormat};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let format = std::env::var("RULEGATE_LOG_FORMAT")
        .ok()
        .map(|value| value.parse::<LogFormat>())
        .transpose()?
        .unwrap_or_default();
    init_tracing(format)?;

    let mut args = std::env::args().skip(1);
    let Some(zone_id) = args.next() else {
        bail!("usage: apply_ruleset <zone-id> [desired.json] [existing-ruleset-id]");
    };

    let desired = match args.next() {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read desired state from {path}"))?;
            let mut attributes: serde_json::Value = serde_json::from_str(&raw)?;
            let Some(object) = attributes.as_object_mut() else {
                bail!("desired state in {path} must be a JSON object");
            };
            object.insert("zone_id".into(), json!(zone_id));
            ruleset_from_attributes(&attributes)?
        }
        None => ruleset_from_attributes(&json!({
            "zone_id": zone_id,
            "name": "block-bad-bots",
            "phase": "http_request_firewall_custom",
            "rules": [
                { "expression": "cf.client.bot_score lt 30", "action": "block", "enabled": true }
            ]
        }))?,
    };

    let settings = config::load().context("failed to load provider configuration")?;
    let client = Client::from_config(&settings)?;
    let driver = client.driver();

    println!("Rulegate apply example");
    println!("======================\n");
    println!("Account:     {}", client.account_id());
    println!("Credentials: {} in rotation\n", client.pool_size());

    let observed = match args.next() {
        Some(id) => {
            let known =
                ManagedRuleset::new(desired.zone_id.clone(), desired.ruleset.clone().with_id(id));
            Some(driver.read(&known)?)
        }
        None => None,
    };

    match driver.apply(Some(&desired), observed.as_ref()) {
        Ok(Some(state)) => {
            println!("✓ Ruleset {} applied to zone {}", state.id().unwrap_or("?"), state.zone_id);
            for (index, rule) in state.ruleset.rules.iter().enumerate() {
                println!("  [{index}] {} -> {}", rule.expression, rule.action);
            }
        }
        Ok(None) => println!("Nothing to apply"),
        Err(err) if err.is_validation() => {
            println!("✗ Expression rejected: {err}");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
