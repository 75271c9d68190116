//! HTTP implementation of the ruleset lifecycle port

use std::sync::Arc;

use reqwest::Method;
use rulegate_core::RulesetApi;
use rulegate_domain::{Result, RulegateError, Ruleset, TransportError, ZoneId};
use tracing::{info, instrument};

use super::payload::{CreatedRecord, RulesetPayload, RulesetRecord};
use crate::http::ApiClient;

const ZONES: &str = "zones";
const RULESETS: &str = "rulesets";

/// Ruleset CRUD against `/zones/{zone}/rulesets[/{id}]`.
///
/// Every call is a single request. Remote errors are returned as they are;
/// there is no retry and no backoff.
#[derive(Clone)]
pub struct RulesetReconciler {
    client: Arc<ApiClient>,
}

impl RulesetReconciler {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl RulesetApi for RulesetReconciler {
    #[instrument(skip_all, fields(zone = %zone_id, name = %desired.name))]
    fn create(&self, zone_id: &ZoneId, desired: &Ruleset) -> Result<String> {
        let segments = [ZONES, zone_id.as_str(), RULESETS];
        let created: CreatedRecord =
            self.client.post(&segments, &RulesetPayload::from(desired))?;
        if created.id.trim().is_empty() {
            return Err(RulegateError::Transport(TransportError::Decode {
                url: self.client.endpoint(&segments).to_string(),
                message: "create response carries an empty ruleset identifier".into(),
            }));
        }
        info!(id = %created.id, rules = desired.rules.len(), "ruleset created");
        Ok(created.id)
    }

    #[instrument(skip_all, fields(zone = %zone_id, id = %id))]
    fn read(&self, zone_id: &ZoneId, id: &str) -> Result<Ruleset> {
        let segments = [ZONES, zone_id.as_str(), RULESETS, id];
        let record: RulesetRecord = self.client.get(&segments)?;
        record.into_ruleset().map_err(|message| {
            RulegateError::Transport(TransportError::Decode {
                url: self.client.endpoint(&segments).to_string(),
                message,
            })
        })
    }

    #[instrument(skip_all, fields(zone = %zone_id, id = %id))]
    fn update(&self, zone_id: &ZoneId, id: &str, desired: &Ruleset) -> Result<()> {
        let segments = [ZONES, zone_id.as_str(), RULESETS, id];
        self.client.send_json(Method::PUT, &segments, Some(&RulesetPayload::from(desired)))?;
        info!(rules = desired.rules.len(), "ruleset replaced");
        Ok(())
    }

    #[instrument(skip_all, fields(zone = %zone_id, id = %id))]
    fn delete(&self, zone_id: &ZoneId, id: &str) -> Result<()> {
        self.client.delete(&[ZONES, zone_id.as_str(), RULESETS, id])?;
        info!(zone = %zone_id, id = %id, "ruleset deleted");
        Ok(())
    }
}
