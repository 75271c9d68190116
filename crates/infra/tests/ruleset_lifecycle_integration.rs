//! Integration tests for the validation-gated ruleset lifecycle
//!
//! Drives `ReconciliationDriver` over real HTTP against a mock of the remote
//! management API.

mod support;

use std::sync::{Arc, Mutex};

use rulegate_core::{ruleset_from_attributes, RulesetApi};
use rulegate_domain::{ManagedRuleset, Rule, Ruleset, ZoneId};
use serde_json::{json, Value};
use support::{
    envelope, expression_of, validation, MockApi, RULESETS_PATH, VALIDATE_PATH, ZONE_ID,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, Request, ResponseTemplate};

const RULESET_PATH: &str = "/client/v4/zones/zone-1/rulesets/abc123";

/// Mount create/read/update/delete handlers backed by one stored body, so a
/// read returns exactly what the last write sent.
fn mount_stateful_ruleset(api: &MockApi) -> Arc<Mutex<Option<Value>>> {
    let stored: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));

    let on_create = Arc::clone(&stored);
    api.mount(Mock::given(method("POST")).and(path(RULESETS_PATH)).respond_with(
        move |req: &Request| {
            let mut body: Value = req.body_json().expect("create body is JSON");
            body["id"] = json!("abc123");
            body["version"] = json!("1");
            *on_create.lock().unwrap() = Some(body.clone());
            ResponseTemplate::new(200).set_body_json(envelope(body))
        },
    ));

    let on_read = Arc::clone(&stored);
    api.mount(Mock::given(method("GET")).and(path(RULESET_PATH)).respond_with(
        move |_: &Request| match on_read.lock().unwrap().clone() {
            Some(body) => ResponseTemplate::new(200).set_body_json(envelope(body)),
            None => ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "errors": [{ "code": 10006, "message": "ruleset not found" }]
            })),
        },
    ));

    let on_update = Arc::clone(&stored);
    api.mount(Mock::given(method("PUT")).and(path(RULESET_PATH)).respond_with(
        move |req: &Request| {
            let mut body: Value = req.body_json().expect("update body is JSON");
            body["id"] = json!("abc123");
            *on_update.lock().unwrap() = Some(body.clone());
            ResponseTemplate::new(200).set_body_json(envelope(body))
        },
    ));

    let on_delete = Arc::clone(&stored);
    api.mount(Mock::given(method("DELETE")).and(path(RULESET_PATH)).respond_with(
        move |_: &Request| {
            *on_delete.lock().unwrap() = None;
            ResponseTemplate::new(204)
        },
    ));

    stored
}

fn block_bad_bots() -> ManagedRuleset {
    ruleset_from_attributes(&json!({
        "zone_id": ZONE_ID,
        "name": "block-bad-bots",
        "phase": "http_request_firewall_custom",
        "rules": [
            { "expression": "cf.client.bot_score lt 30", "action": "block", "enabled": true }
        ]
    }))
    .expect("desired state translates")
}

#[test]
fn create_read_delete_round_trip() {
    let api = MockApi::start();
    api.accept_all_expressions();
    let stored = mount_stateful_ruleset(&api);
    let driver = api.client(&["t1", "t2"]).driver();

    let mut state = block_bad_bots();
    let id = driver.create(&mut state).expect("create succeeds");

    // One validation call, carrying the rule's expression, before the write.
    let validations = api.requests_to("POST", VALIDATE_PATH);
    assert_eq!(validations.len(), 1);
    assert_eq!(expression_of(&validations[0]), "cf.client.bot_score lt 30");

    let creates = api.requests_to("POST", RULESETS_PATH);
    assert_eq!(creates.len(), 1);
    let sent: Value = creates[0].body_json().unwrap();
    assert_eq!(
        sent,
        json!({
            "name": "block-bad-bots",
            "phase": "http_request_firewall_custom",
            "kind": "zone",
            "rules": [
                { "expression": "cf.client.bot_score lt 30", "action": "block", "enabled": true }
            ]
        })
    );
    assert_eq!(id, "abc123");
    assert_eq!(state.id(), Some("abc123"));

    let observed = driver.read(&state).expect("read succeeds");
    assert_eq!(observed.id(), Some("abc123"));
    assert_eq!(observed.ruleset.rules, state.ruleset.rules);
    assert_eq!(observed.ruleset.rules[0].logging, None);

    driver.delete(&mut state).expect("delete succeeds");
    assert_eq!(state.id(), None);
    assert!(stored.lock().unwrap().is_none());
    assert_eq!(api.requests_to("DELETE", RULESET_PATH).len(), 1);
}

#[test]
fn rejected_rule_stops_validation_and_blocks_the_write() {
    let api = MockApi::start();
    api.mount(Mock::given(method("POST")).and(path(VALIDATE_PATH)).respond_with(
        |req: &Request| {
            let verdict = if expression_of(req) == "rule-2" {
                validation(false, &["Filter parsing error: unknown identifier", "at 1:1"])
            } else {
                validation(true, &[])
            };
            ResponseTemplate::new(200).set_body_json(verdict)
        },
    ));
    mount_stateful_ruleset(&api);
    let driver = api.client(&["t1"]).driver();

    let rules = (0..4).map(|i| Rule::new(format!("rule-{i}"), "block")).collect();
    let mut state =
        ManagedRuleset::new(ZONE_ID, Ruleset::new("n", "http_request_firewall_custom", rules));

    let err = driver.create(&mut state).unwrap_err();

    let validated: Vec<String> =
        api.requests_to("POST", VALIDATE_PATH).iter().map(expression_of).collect();
    assert_eq!(validated, vec!["rule-0", "rule-1", "rule-2"]);
    assert!(api.requests_to("POST", RULESETS_PATH).is_empty());
    assert!(err.is_validation());
    assert_eq!(err.failed_rule_index(), Some(2));
    assert!(err.to_string().contains("unknown identifier"));
    assert_eq!(state.id(), None);
}

#[test]
fn round_trip_preserves_every_rule_field() {
    let api = MockApi::start();
    api.accept_all_expressions();
    mount_stateful_ruleset(&api);
    let driver = api.client(&["t1"]).driver();

    let desired = ManagedRuleset::new(
        ZONE_ID,
        Ruleset::new(
            "mixed",
            "http_request_firewall_custom",
            vec![
                Rule::new("http.host eq \"a\"", "skip")
                    .with_description("allow a")
                    .with_parameter("ruleset", "current")
                    .with_logging(false),
                Rule::new("http.host eq \"b\"", "block").with_enabled(false),
                Rule::new("true", "log").with_logging(true),
            ],
        ),
    );

    let observed = driver.apply(Some(&desired), None).expect("apply succeeds").unwrap();

    assert_eq!(observed.id(), Some("abc123"));
    assert_eq!(observed.ruleset.rules, desired.ruleset.rules);
    assert_eq!(api.requests_to("GET", RULESET_PATH).len(), 1);
}

#[test]
fn repeated_update_leaves_the_same_remote_state() {
    let api = MockApi::start();
    api.accept_all_expressions();
    let stored = mount_stateful_ruleset(&api);
    let client = api.client(&["t1", "t2", "t3"]);
    let driver = client.driver();

    let mut state = block_bad_bots();
    driver.create(&mut state).unwrap();
    state.ruleset.rules.push(Rule::new("http.request.uri.path eq \"/admin\"", "block"));

    driver.update(&state).unwrap();
    let first = stored.lock().unwrap().clone();
    driver.update(&state).unwrap();
    let second = stored.lock().unwrap().clone();

    assert_eq!(first, second);
    let remote = client.rulesets().read(&ZoneId::new(ZONE_ID), "abc123").unwrap();
    assert_eq!(remote.rules.len(), 2);
    assert_eq!(remote.id(), Some("abc123"));
    assert_eq!(api.requests_to("PUT", RULESET_PATH).len(), 2);
}

#[test]
fn remote_errors_surface_as_transport_errors() {
    let api = MockApi::start();
    api.accept_all_expressions();
    api.mount(Mock::given(method("POST")).and(path(RULESETS_PATH)).respond_with(
        ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "errors": [{ "code": 20217, "message": "'zone' is not a valid value for kind" }]
        })),
    ));
    let driver = api.client(&["t1"]).driver();

    let mut state = block_bad_bots();
    let err = driver.create(&mut state).unwrap_err();

    assert!(err.is_transport());
    assert!(!err.is_validation());
    assert!(err.to_string().contains("not a valid value for kind"));
    assert_eq!(state.id(), None);
}

#[test]
fn create_answer_without_identifier_is_a_transport_error() {
    let api = MockApi::start();
    api.accept_all_expressions();
    api.mount(Mock::given(method("POST")).and(path(RULESETS_PATH)).respond_with(
        ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "errors": [], "messages": [], "result": null
        })),
    ));
    let driver = api.client(&["t1"]).driver();

    let mut state = block_bad_bots();
    let err = driver.create(&mut state).unwrap_err();

    assert!(err.is_transport());
    assert_eq!(state.id(), None);
}
