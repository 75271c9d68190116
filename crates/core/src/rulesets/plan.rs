//! Planning remote actions from desired and observed state

use rulegate_domain::{ManagedRuleset, ZoneId};

/// One remote call needed to move observed state towards desired state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create the desired ruleset; the remote assigns its identifier.
    Create(ManagedRuleset),
    /// Replace the whole ruleset identified by `id`.
    Update { id: String, desired: ManagedRuleset },
    /// Delete the ruleset identified by `id` in `zone_id`.
    Delete { zone_id: ZoneId, id: String },
}

impl Action {
    /// `true` for actions that write desired rules and must be
    /// validation-gated.
    pub fn writes_rules(&self) -> bool {
        matches!(self, Self::Create(_) | Self::Update { .. })
    }
}

/// Plan the remote calls that turn `observed` into `desired`.
///
/// - nothing observed (or observed without an identifier): create
/// - nothing desired: delete
/// - zone changed: delete in the old zone, then create in the new one
/// - name, phase, kind, or any rule differs: full-resource update
/// - otherwise: no action
///
/// Applying the same desired state twice therefore plans nothing the second
/// time.
pub fn reconcile(
    desired: Option<&ManagedRuleset>,
    observed: Option<&ManagedRuleset>,
) -> Vec<Action> {
    let observed = observed.and_then(|o| o.id().map(|id| (o, id.to_string())));

    match (desired, observed) {
        (None, None) => Vec::new(),
        (Some(desired), None) => vec![Action::Create(without_id(desired))],
        (None, Some((observed, id))) => {
            vec![Action::Delete { zone_id: observed.zone_id.clone(), id }]
        }
        (Some(desired), Some((observed, id))) => {
            if desired.zone_id != observed.zone_id {
                vec![
                    Action::Delete { zone_id: observed.zone_id.clone(), id },
                    Action::Create(without_id(desired)),
                ]
            } else if desired.ruleset.same_content(&observed.ruleset) {
                Vec::new()
            } else {
                let mut desired = desired.clone();
                desired.ruleset.id = Some(id.clone());
                vec![Action::Update { id, desired }]
            }
        }
    }
}

fn without_id(desired: &ManagedRuleset) -> ManagedRuleset {
    let mut desired = desired.clone();
    desired.ruleset.id = None;
    desired
}

#[cfg(test)]
mod tests {
    use rulegate_domain::{Rule, Ruleset};

    use super::*;

    fn managed(zone: &str, id: Option<&str>, rules: Vec<Rule>) -> ManagedRuleset {
        let mut ruleset = Ruleset::new("block-bad-bots", "http_request_firewall_custom", rules);
        ruleset.id = id.map(str::to_string);
        ManagedRuleset::new(zone, ruleset)
    }

    fn bot_rule() -> Rule {
        Rule::new("cf.client.bot_score lt 30", "block")
    }

    #[test]
    fn nothing_to_do_when_both_absent() {
        assert!(reconcile(None, None).is_empty());
    }

    #[test]
    fn creates_when_nothing_observed() {
        let desired = managed("z1", None, vec![bot_rule()]);
        let actions = reconcile(Some(&desired), None);
        assert_eq!(actions, vec![Action::Create(desired)]);
        assert!(actions[0].writes_rules());
    }

    #[test]
    fn observed_without_identifier_counts_as_absent() {
        let desired = managed("z1", None, vec![bot_rule()]);
        let observed = managed("z1", Some(""), vec![bot_rule()]);
        assert_eq!(reconcile(Some(&desired), Some(&observed)), vec![Action::Create(desired)]);
    }

    #[test]
    fn deletes_when_nothing_desired() {
        let observed = managed("z1", Some("abc123"), vec![bot_rule()]);
        assert_eq!(
            reconcile(None, Some(&observed)),
            vec![Action::Delete { zone_id: ZoneId::new("z1"), id: "abc123".into() }]
        );
    }

    #[test]
    fn updates_whole_ruleset_when_rules_change() {
        let observed = managed("z1", Some("abc123"), vec![bot_rule()]);
        let desired = managed("z1", None, vec![bot_rule(), Rule::new("true", "log")]);

        let actions = reconcile(Some(&desired), Some(&observed));
        match actions.as_slice() {
            [Action::Update { id, desired: planned }] => {
                assert_eq!(id, "abc123");
                assert_eq!(planned.id(), Some("abc123"));
                assert_eq!(planned.ruleset.rules.len(), 2);
            }
            other => panic!("expected single update, got {other:?}"),
        }
    }

    #[test]
    fn reordering_rules_is_an_update() {
        let a = Rule::new("a", "block");
        let b = Rule::new("b", "block");
        let observed = managed("z1", Some("abc123"), vec![a.clone(), b.clone()]);
        let desired = managed("z1", None, vec![b, a]);
        assert_eq!(reconcile(Some(&desired), Some(&observed)).len(), 1);
    }

    #[test]
    fn identical_state_plans_nothing() {
        let observed = managed("z1", Some("abc123"), vec![bot_rule()]);
        let desired = managed("z1", None, vec![bot_rule()]);
        assert!(reconcile(Some(&desired), Some(&observed)).is_empty());
    }

    #[test]
    fn zone_change_replaces_ruleset() {
        let observed = managed("z1", Some("abc123"), vec![bot_rule()]);
        let desired = managed("z2", Some("abc123"), vec![bot_rule()]);

        let actions = reconcile(Some(&desired), Some(&observed));
        assert_eq!(
            actions,
            vec![
                Action::Delete { zone_id: ZoneId::new("z1"), id: "abc123".into() },
                Action::Create(managed("z2", None, vec![bot_rule()])),
            ]
        );
    }
}
