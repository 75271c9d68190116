//! Shared fixtures for infrastructure integration tests.
#![allow(dead_code)]

use rulegate_domain::ProviderConfig;
use rulegate_infra::Client;
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const ACCOUNT_ID: &str = "acc-1";
pub const ZONE_ID: &str = "zone-1";
pub const VALIDATE_PATH: &str = "/client/v4/accounts/acc-1/ruleset-expression/validate";
pub const RULESETS_PATH: &str = "/client/v4/zones/zone-1/rulesets";

/// Mock of the remote management API.
///
/// The server runs on its own runtime so the blocking client can be driven
/// from the test thread.
pub struct MockApi {
    pub server: MockServer,
    rt: Runtime,
}

impl MockApi {
    pub fn start() -> Self {
        let rt = Runtime::new().expect("tokio runtime should start");
        let server = rt.block_on(MockServer::start());
        Self { server, rt }
    }

    pub fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    pub fn base_url(&self) -> String {
        format!("{}/client/v4", self.server.uri())
    }

    pub fn config(&self, tokens: &[&str]) -> ProviderConfig {
        ProviderConfig::new(tokens.iter().map(|t| t.to_string()).collect(), ACCOUNT_ID)
            .with_base_url(self.base_url())
            .with_timeout_secs(5)
    }

    pub fn client(&self, tokens: &[&str]) -> Client {
        Client::from_config(&self.config(tokens)).expect("client should configure")
    }

    pub fn requests(&self) -> Vec<Request> {
        self.rt.block_on(self.server.received_requests()).expect("request recording is enabled")
    }

    /// Recorded requests matching `verb` and `url_path`.
    pub fn requests_to(&self, verb: &str, url_path: &str) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.method.as_str() == verb && r.url.path() == url_path)
            .collect()
    }

    /// Accept every expression.
    pub fn accept_all_expressions(&self) {
        self.mount(
            Mock::given(method("POST"))
                .and(path(VALIDATE_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_json(validation(true, &[]))),
        );
    }
}

/// Body of the validation endpoint.
pub fn validation(success: bool, messages: &[&str]) -> Value {
    let errors: Vec<Value> = messages.iter().map(|m| json!({ "message": m })).collect();
    json!({ "success": success, "errors": errors, "messages": [], "result": null })
}

/// Wrap `result` in the remote API's standard envelope.
pub fn envelope(result: Value) -> Value {
    json!({ "success": true, "errors": [], "messages": [], "result": result })
}

pub fn authorization(request: &Request) -> String {
    request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn expression_of(request: &Request) -> String {
    let body: Value = request.body_json().expect("validation body is JSON");
    body["expression"].as_str().unwrap_or_default().to_string()
}
