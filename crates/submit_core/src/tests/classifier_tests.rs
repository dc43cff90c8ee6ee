use super::*;
use serde_json::json;
use shared::error::{FailureKind, GENERIC_FAILURE_MESSAGE};

fn response(status: u16, headers: &[(&str, &str)], body: &str) -> TransportResponse {
    TransportResponse::new(
        status,
        ResponseHeaders::new(
            headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ),
        body.as_bytes().to_vec(),
    )
}

#[tokio::test]
async fn json_content_type_yields_parsed_payload() {
    let outcome = classify(response(
        200,
        &[("Content-Type", "application/json; charset=utf-8")],
        r#"{"ok":true}"#,
    ))
    .await;
    assert_eq!(outcome, Outcome::Json(json!({"ok": true})));
}

#[tokio::test]
async fn malformed_json_is_a_transport_failure() {
    let outcome = classify(response(200, &[("content-type", "application/json")], "{oops")).await;
    match outcome {
        Outcome::TransportFailure(reason) => assert_eq!(reason.kind, FailureKind::MalformedBody),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn html_with_partial_view_marker_yields_markup() {
    let outcome = classify(response(
        201,
        &[("Content-Type", "text/html"), ("X-Partial-View", "true")],
        "<li>saved</li>",
    ))
    .await;
    assert_eq!(outcome, Outcome::Markup("<li>saved</li>".into()));
}

#[tokio::test]
async fn html_without_marker_is_unrecognized() {
    for headers in [
        vec![("Content-Type", "text/html")],
        vec![("Content-Type", "text/html"), ("X-Partial-View", "false")],
        vec![("Content-Type", "text/html"), ("X-Partial-View", "TRUE")],
        vec![("Content-Type", "text/html"), ("X-Partial-View", "True")],
    ] {
        let outcome = classify(response(200, &headers, "<html></html>")).await;
        assert_eq!(outcome, Outcome::Unrecognized);
    }
}

#[tokio::test]
async fn marker_tolerates_surrounding_whitespace_only() {
    let outcome = classify(response(
        200,
        &[("Content-Type", "text/html"), ("X-Partial-View", " true ")],
        "<p/>",
    ))
    .await;
    assert_eq!(outcome, Outcome::Markup("<p/>".into()));
}

#[test]
fn success_kinds_drive_the_reset_policy() {
    for kind in [OutcomeKind::Json, OutcomeKind::Markup, OutcomeKind::Unrecognized] {
        assert!(kind.is_success(), "{kind:?}");
    }
    for kind in [
        OutcomeKind::TransportFailure,
        OutcomeKind::ValidationFailure,
        OutcomeKind::CancelledByHook,
    ] {
        assert!(!kind.is_success(), "{kind:?}");
    }
}

#[tokio::test]
async fn marker_without_html_content_type_is_unrecognized() {
    let outcome = classify(response(
        200,
        &[("Content-Type", "text/plain"), ("X-Partial-View", "true")],
        "plain",
    ))
    .await;
    assert_eq!(outcome, Outcome::Unrecognized);
}

#[tokio::test]
async fn missing_content_type_is_unrecognized() {
    let outcome = classify(response(204, &[], "")).await;
    assert_eq!(outcome, Outcome::Unrecognized);
}

#[tokio::test]
async fn error_status_skips_body_and_uses_generic_reason() {
    let outcome = classify(response(
        500,
        &[("Content-Type", "application/json")],
        r#"{"detail":"boom"}"#,
    ))
    .await;
    match outcome {
        Outcome::TransportFailure(reason) => {
            assert_eq!(reason.status_code(), Some(500));
            assert_eq!(reason.message, GENERIC_FAILURE_MESSAGE);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn redirect_is_surfaced_with_its_location() {
    let outcome = classify(response(302, &[("Location", "/login")], "")).await;
    match outcome {
        Outcome::TransportFailure(reason) => assert_eq!(
            reason.kind,
            FailureKind::Redirect {
                location: Some("/login".into())
            }
        ),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn outcome_kinds_split_success_from_failure() {
    assert!(Outcome::Unrecognized.kind().is_success());
    assert!(Outcome::Markup(String::new()).kind().is_success());
    assert!(!Outcome::CancelledByHook.kind().is_success());
    assert!(!Outcome::TransportFailure(FailureReason::status(404))
        .kind()
        .is_success());
}
