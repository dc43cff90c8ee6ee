use serde_json::Value;
use shared::{
    error::FailureReason,
    protocol::{
        OutcomeKind, HTML_MEDIA_TYPE, JSON_MEDIA_TYPE, PARTIAL_VIEW_HEADER, PARTIAL_VIEW_MARKER,
    },
};

use crate::transport::{ResponseHeaders, TransportResponse};

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Json(Value),
    Markup(String),
    Unrecognized,
    TransportFailure(FailureReason),
    ValidationFailure,
    CancelledByHook,
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Json(_) => OutcomeKind::Json,
            Self::Markup(_) => OutcomeKind::Markup,
            Self::Unrecognized => OutcomeKind::Unrecognized,
            Self::TransportFailure(_) => OutcomeKind::TransportFailure,
            Self::ValidationFailure => OutcomeKind::ValidationFailure,
            Self::CancelledByHook => OutcomeKind::CancelledByHook,
        }
    }
}

pub async fn classify(response: TransportResponse) -> Outcome {
    if !response.is_success() {
        let reason = if response.is_redirect() {
            FailureReason::redirect(response.headers().get("location").map(str::to_string))
        } else {
            FailureReason::status(response.status())
        };
        return Outcome::TransportFailure(reason);
    }

    let content_type = response
        .headers()
        .content_type()
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.contains(JSON_MEDIA_TYPE) {
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => return Outcome::TransportFailure(err.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(payload) => Outcome::Json(payload),
            Err(err) => Outcome::TransportFailure(FailureReason::malformed_body(format!(
                "invalid JSON response: {err}"
            ))),
        }
    } else if content_type.contains(HTML_MEDIA_TYPE) && is_partial_view(response.headers()) {
        match response.text().await {
            Ok(html) => Outcome::Markup(html),
            Err(err) => Outcome::TransportFailure(err.into()),
        }
    } else {
        Outcome::Unrecognized
    }
}

fn is_partial_view(headers: &ResponseHeaders) -> bool {
    headers
        .get(PARTIAL_VIEW_HEADER)
        .is_some_and(|value| value.trim() == PARTIAL_VIEW_MARKER)
}

#[cfg(test)]
#[path = "tests/classifier_tests.rs"]
mod tests;
