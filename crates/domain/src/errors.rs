//! Error types used throughout the application

use thiserror::Error;

use crate::types::{ManagedRuleset, ValidationOutcome};

/// Main error type for Rulegate
#[derive(Error, Debug)]
pub enum RulegateError {
    /// No usable credentials or account context. Fatal at setup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Desired-state input is missing a required field or is malformed.
    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A rule expression was rejected before any remote write was issued.
    #[error("Validation error: rule {index}: {source}")]
    Validation {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// Operation requested on a resource in the wrong lifecycle state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A multi-step apply failed after an earlier step had already changed
    /// the remote ruleset. `observed` is the remote state as of that step
    /// (`None` once the old ruleset was deleted).
    #[error("{source} (remote state changed before the failure)")]
    Interrupted {
        observed: Option<Box<ManagedRuleset>>,
        #[source]
        source: Box<RulegateError>,
    },
}

impl RulegateError {
    /// `true` when the remote system rejected a rule expression.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Interrupted { source, .. } => source.is_validation(),
            other => matches!(other, Self::Validation { .. }),
        }
    }

    /// `true` when the remote system could not be reached or answered
    /// with something other than a usable response.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Interrupted { source, .. } => source.is_transport(),
            other => matches!(other, Self::Transport(_)),
        }
    }

    /// Index of the rule that failed validation, if any.
    pub fn failed_rule_index(&self) -> Option<usize> {
        match self {
            Self::Validation { index, .. } => Some(*index),
            Self::Interrupted { source, .. } => source.failed_rule_index(),
            _ => None,
        }
    }

    /// Remote state left behind by an interrupted apply.
    ///
    /// `None` when the error did not interrupt a partly executed plan;
    /// `Some(None)` when the ruleset no longer exists remotely.
    pub fn interrupted_state(&self) -> Option<Option<&ManagedRuleset>> {
        match self {
            Self::Interrupted { observed, .. } => Some(observed.as_deref()),
            _ => None,
        }
    }
}

/// Failures of an outbound HTTP exchange.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("{method} {url} failed: {message}")]
    Request { method: String, url: String, message: String },

    /// The remote answered with a non-2xx status.
    #[error("{method} {url} returned status {status}: {message}")]
    Status { method: String, url: String, status: u16, message: String },

    /// The response body could not be decoded.
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl TransportError {
    /// HTTP status code for [`TransportError::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Outcome of asking the remote system to validate one expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The remote rejected the expression. Only the first message is
    /// displayed; every reported message stays in `outcome`.
    #[error("expression rejected: {message}")]
    Rejected { message: String, outcome: ValidationOutcome },

    /// The remote reported `success=false` without any error message.
    #[error("expression rejected without a reported reason")]
    Unspecified { outcome: ValidationOutcome },

    /// The validation endpoint could not be consulted.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ValidationError {
    /// `true` for a remote rejection, `false` for a transport failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Transport(_))
    }
}

/// Result type alias for Rulegate operations
pub type Result<T> = std::result::Result<T, RulegateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_transport_messages_are_distinguishable() {
        let rejected = RulegateError::Validation {
            index: 2,
            source: ValidationError::Rejected {
                message: "unknown field".into(),
                outcome: ValidationOutcome::rejected(vec!["unknown field".into()]),
            },
        };
        let unreachable = RulegateError::Transport(TransportError::Request {
            method: "POST".into(),
            url: "https://api.example.test/validate".into(),
            message: "connection refused".into(),
        });

        assert_eq!(
            rejected.to_string(),
            "Validation error: rule 2: expression rejected: unknown field"
        );
        assert!(unreachable.to_string().starts_with("Transport error: "));
        assert!(rejected.is_validation() && !rejected.is_transport());
        assert!(unreachable.is_transport() && !unreachable.is_validation());
        assert_eq!(rejected.failed_rule_index(), Some(2));
        assert_eq!(unreachable.failed_rule_index(), None);
    }

    #[test]
    fn transport_inside_validation_is_not_a_rejection() {
        let err = ValidationError::from(TransportError::Decode {
            url: "u".into(),
            message: "eof".into(),
        });
        assert!(!err.is_rejection());
        assert!(ValidationError::Unspecified { outcome: ValidationOutcome::rejected(vec![]) }
            .is_rejection());
    }

    #[test]
    fn interrupted_apply_keeps_category_and_state() {
        let err = RulegateError::Interrupted {
            observed: None,
            source: Box::new(RulegateError::Transport(TransportError::Request {
                method: "POST".into(),
                url: "u".into(),
                message: "timeout".into(),
            })),
        };

        assert!(err.is_transport());
        assert!(!err.is_validation());
        assert_eq!(err.interrupted_state(), Some(None));
        assert!(err.to_string().starts_with("Transport error: "));
        assert_eq!(RulegateError::Config("x".into()).interrupted_state(), None);
    }

    #[test]
    fn status_code_is_exposed() {
        let err = TransportError::Status {
            method: "GET".into(),
            url: "u".into(),
            status: 404,
            message: "not found".into(),
        };
        assert_eq!(err.status(), Some(404));
    }
}
