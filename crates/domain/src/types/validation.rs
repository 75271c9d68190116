//! Expression validation results

use serde::{Deserialize, Serialize};

/// Pass/fail verdict for one expression plus every diagnostic the remote
/// validator reported, in the order it reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub success: bool,
    #[serde(default)]
    pub messages: Vec<String>,
}

impl ValidationOutcome {
    pub fn accepted() -> Self {
        Self { success: true, messages: Vec::new() }
    }

    pub fn rejected(messages: Vec<String>) -> Self {
        Self { success: false, messages }
    }

    /// The message surfaced on the common error path.
    pub fn first_message(&self) -> Option<&str> {
        self.messages.first().map(String::as_str)
    }
}
