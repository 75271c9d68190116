//! Validation-gated reconciliation driver
//!
//! Every create or update first validates each rule expression remotely, in
//! rule order. The first rejection aborts the operation before any write is
//! issued, so a ruleset with N rules costs N validation calls plus one write
//! on the happy path and between 1 and N validation calls on failure.

use std::sync::Arc;

use rulegate_domain::{ManagedRuleset, Result, RulegateError, Ruleset, ValidationError};
use tracing::{debug, info, instrument, warn};

use super::plan::{reconcile, Action};
use super::ports::{ExpressionValidator, RulesetApi};

/// Orchestrates ruleset lifecycle calls behind a per-rule validation gate.
#[derive(Clone)]
pub struct ReconciliationDriver {
    api: Arc<dyn RulesetApi>,
    validator: Arc<dyn ExpressionValidator>,
}

impl ReconciliationDriver {
    /// Create a new driver
    pub fn new(api: Arc<dyn RulesetApi>, validator: Arc<dyn ExpressionValidator>) -> Self {
        Self { api, validator }
    }

    /// Validate every rule expression in index order, stopping at the first
    /// failure.
    ///
    /// # Errors
    /// - [`RulegateError::Validation`] carrying the failing rule index when the
    ///   remote rejects an expression
    /// - [`RulegateError::Transport`] when the validator cannot be reached
    pub fn validate_rules(&self, ruleset: &Ruleset) -> Result<()> {
        for (index, rule) in ruleset.rules.iter().enumerate() {
            match self.validator.validate(&rule.expression) {
                Ok(()) => debug!(index, "rule expression accepted"),
                Err(ValidationError::Transport(err)) => {
                    warn!(index, error = %err, "expression validator unreachable");
                    return Err(RulegateError::Transport(err));
                }
                Err(source) => {
                    warn!(index, error = %source, "rule expression rejected");
                    return Err(RulegateError::Validation { index, source });
                }
            }
        }
        Ok(())
    }

    /// Validate, then create the ruleset and record the remote identifier on
    /// `state`.
    ///
    /// On any failure `state` is left without an identifier.
    #[instrument(skip(self, state), fields(zone = %state.zone_id, name = %state.ruleset.name))]
    pub fn create(&self, state: &mut ManagedRuleset) -> Result<String> {
        self.validate_rules(&state.ruleset)?;
        self.create_validated(state)
    }

    /// Fetch the remote ruleset for `state`'s identifier.
    #[instrument(skip(self, state), fields(zone = %state.zone_id))]
    pub fn read(&self, state: &ManagedRuleset) -> Result<ManagedRuleset> {
        let id = require_id(state, "read")?;
        let mut ruleset = self.api.read(&state.zone_id, id)?;
        if ruleset.id().is_none() {
            ruleset.id = Some(id.to_string());
        }
        Ok(ManagedRuleset { zone_id: state.zone_id.clone(), ruleset })
    }

    /// Validate, then replace the remote ruleset with `state`.
    #[instrument(skip(self, state), fields(zone = %state.zone_id))]
    pub fn update(&self, state: &ManagedRuleset) -> Result<()> {
        let id = require_id(state, "update")?;
        self.validate_rules(&state.ruleset)?;
        self.api.update(&state.zone_id, id, &state.ruleset)?;
        info!(id, rules = state.ruleset.rules.len(), "ruleset updated");
        Ok(())
    }

    /// Delete the remote ruleset and clear the identifier on `state`.
    #[instrument(skip(self, state), fields(zone = %state.zone_id))]
    pub fn delete(&self, state: &mut ManagedRuleset) -> Result<()> {
        let id = require_id(state, "delete")?.to_string();
        self.api.delete(&state.zone_id, &id)?;
        state.ruleset.id = None;
        info!(id = %id, "ruleset deleted");
        Ok(())
    }

    /// Move `observed` towards `desired` and return the new observed state.
    ///
    /// Every rule write in the plan is validated before the first remote
    /// mutation, so a rejected expression never leaves a half-applied plan.
    /// After a create the ruleset is read back to refresh local state; if
    /// that read fails the created state, identifier included, is returned
    /// as is. Returns `None` once the ruleset no longer exists remotely.
    ///
    /// # Errors
    /// A failure after an earlier step already changed the remote ruleset is
    /// wrapped in [`RulegateError::Interrupted`] carrying the state left
    /// behind.
    pub fn apply(
        &self,
        desired: Option<&ManagedRuleset>,
        observed: Option<&ManagedRuleset>,
    ) -> Result<Option<ManagedRuleset>> {
        let actions = reconcile(desired, observed);
        if actions.is_empty() {
            debug!("ruleset already matches desired state");
            return Ok(observed.cloned());
        }

        for action in actions.iter().filter(|a| a.writes_rules()) {
            match action {
                Action::Create(state) | Action::Update { desired: state, .. } => {
                    self.validate_rules(&state.ruleset)?;
                }
                Action::Delete { .. } => {}
            }
        }

        let mut current = observed.cloned();
        let mut changed = false;
        for action in actions {
            current = match self.execute(action) {
                Ok(next) => next,
                Err(source) if changed => {
                    warn!(error = %source, "apply interrupted after a remote change");
                    return Err(RulegateError::Interrupted {
                        observed: current.map(Box::new),
                        source: Box::new(source),
                    });
                }
                Err(source) => return Err(source),
            };
            changed = true;
        }
        Ok(current)
    }

    fn execute(&self, action: Action) -> Result<Option<ManagedRuleset>> {
        match action {
            Action::Create(mut state) => {
                self.create_validated(&mut state)?;
                match self.read(&state) {
                    Ok(refreshed) => Ok(Some(refreshed)),
                    Err(err) => {
                        warn!(id = ?state.id(), error = %err, "read-back after create failed");
                        Ok(Some(state))
                    }
                }
            }
            Action::Update { id, desired } => {
                self.api.update(&desired.zone_id, &id, &desired.ruleset)?;
                info!(id = %id, rules = desired.ruleset.rules.len(), "ruleset updated");
                Ok(Some(desired))
            }
            Action::Delete { zone_id, id } => {
                self.api.delete(&zone_id, &id)?;
                info!(zone = %zone_id, id = %id, "ruleset deleted");
                Ok(None)
            }
        }
    }

    fn create_validated(&self, state: &mut ManagedRuleset) -> Result<String> {
        state.ruleset.id = None;
        let id = self.api.create(&state.zone_id, &state.ruleset)?;
        if id.is_empty() {
            return Err(RulegateError::InvalidState(
                "create succeeded but the remote returned an empty identifier".into(),
            ));
        }
        state.ruleset.id = Some(id.clone());
        info!(id = %id, rules = state.ruleset.rules.len(), "ruleset created");
        Ok(id)
    }
}

fn require_id<'a>(state: &'a ManagedRuleset, operation: &str) -> Result<&'a str> {
    state.id().ok_or_else(|| {
        RulegateError::InvalidState(format!("cannot {operation} a ruleset that has no identifier"))
    })
}
