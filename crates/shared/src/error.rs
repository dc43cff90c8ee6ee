use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used for every non-success status; the response itself is not
/// introspected further.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong.";

/// Raised at setup time, before any event wiring happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("a valid non-empty selector is required")]
    EmptySelector,
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("failed to build http client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    Status { status: u16 },
    Redirect { location: Option<String> },
    Transport,
    MalformedBody,
}

/// Why a submission ended in the transport-failure branch. Handed to the
/// error hook, or shown through the notifier when no hook is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct FailureReason {
    pub kind: FailureKind,
    pub message: String,
}

impl FailureReason {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self::new(FailureKind::Status { status }, GENERIC_FAILURE_MESSAGE)
    }

    /// Redirects are reported, never followed. The message stays generic;
    /// the target is kept on the kind for hooks that care.
    pub fn redirect(location: Option<String>) -> Self {
        Self::new(FailureKind::Redirect { location }, GENERIC_FAILURE_MESSAGE)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transport, message)
    }

    pub fn malformed_body(message: impl Into<String>) -> Self {
        Self::new(FailureKind::MalformedBody, message)
    }

    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            FailureKind::Status { status } => Some(status),
            _ => None,
        }
    }
}
