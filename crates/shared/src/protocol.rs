use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{FormFields, Method};

pub const JSON_MEDIA_TYPE: &str = "application/json";
pub const HTML_MEDIA_TYPE: &str = "text/html";
/// Marks an HTML body as a fragment for in-page insertion, not a full page.
pub const PARTIAL_VIEW_HEADER: &str = "X-Partial-View";
pub const PARTIAL_VIEW_MARKER: &str = "true";

/// Everything needed to issue the single request of one submission.
///
/// `before_send` receives this mutably and may rewrite any field. `headers`
/// and `timeout` exist for callers; the controller itself never sets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: Method,
    pub body: FormFields,
    pub follow_redirects: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl RequestDescriptor {
    pub fn new(url: impl Into<String>, method: Method, body: FormFields) -> Self {
        Self {
            url: url.into(),
            method,
            body,
            follow_redirects: false,
            headers: Vec::new(),
            timeout: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Payload-free tag of a submission outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Json,
    Markup,
    Unrecognized,
    TransportFailure,
    ValidationFailure,
    CancelledByHook,
}

impl OutcomeKind {
    /// Whether this outcome counts as a success for the reset policy.
    /// Validation failures and cancellations never reach the reset step.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Json | Self::Markup | Self::Unrecognized)
    }
}
