//! Tests for the domain error payload.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no"), ErrorCode::Unauthorized)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[test]
fn serialises_camel_case_and_skips_empty_fields() {
    let value = serde_json::to_value(Error::not_found("missing")).expect("serialise");
    assert_eq!(value, json!({ "code": "not_found", "message": "missing" }));
}

#[test]
fn serialises_trace_id_and_details() {
    let error = Error::invalid_request("bad")
        .with_trace_id("abc")
        .with_details(json!({ "field": "body" }));
    let value = serde_json::to_value(&error).expect("serialise");
    assert_eq!(value["traceId"], "abc");
    assert_eq!(value["details"]["field"], "body");
}

#[test]
fn deserialises_snake_case_trace_alias() {
    let error: Error = serde_json::from_value(json!({
        "code": "unauthorized",
        "message": "invalid token",
        "trace_id": "abc",
    }))
    .expect("deserialise");
    assert_eq!(error.trace_id(), Some("abc"));
}

#[tokio::test]
async fn captures_trace_id_in_scope() {
    let trace_id = TraceId::generate();
    let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(trace_id.to_string().as_str()));
}
