//! Display and stringify output

use std::collections::HashMap;

use insta::assert_snapshot;
use serde::Serialize;
use vessel::prelude::*;
use vessel::{ErrorKind, Json, PanicError, UNSERIALIZABLE, WrapperError, stringify};

use crate::common::later;

#[derive(Serialize)]
struct Endpoint {
    host: &'static str,
    port: u16,
}

#[test]
fn settled_containers() {
    assert_snapshot!(present(5).to_string(), @"Present { 5 }");
    assert_snapshot!(absent::<i32>().to_string(), @"Absent");
    assert_snapshot!(success::<_, String>("ready").to_string(), @"Success { ready }");
    assert_snapshot!(failure::<i32, _>("disk full").to_string(), @"Failure { disk full }");
    assert_snapshot!(present(present("nested")).to_string(), @"Present { Present { nested } }");
}

#[test]
fn structured_payloads_render_as_json() {
    let endpoint = present(Json(Endpoint { host: "localhost", port: 8080 }));
    assert_snapshot!(endpoint.to_string(), @r#"Present { {"host":"localhost","port":8080} }"#);
}

#[test]
fn unserializable_payloads_use_the_sentinel() {
    let mut by_pair = HashMap::new();
    by_pair.insert((1, 2), "pair");

    assert_eq!(stringify(&by_pair), UNSERIALIZABLE);
    assert_snapshot!(present(Json(by_pair)).to_string(), @"Present { [unserializable] }");
}

#[test]
fn unexpected_failures_render_their_chain() {
    let inner = WrapperError::caused_by(ErrorKind::PredicateException, PanicError::new("boom"));
    let outer = WrapperError::caused_by(ErrorKind::PendingRejection, inner);
    let outcome: Outcome<i32, String> = Outcome::unexpected(outer);

    assert_snapshot!(
        outcome.to_string(),
        @"Failure { pending future rejected: callback panicked: boom }"
    );
}

#[tokio::test]
async fn pending_containers_render_a_placeholder_until_resolved() {
    let optional = PendingOptional::from_value_future(later(1));
    let outcome = PendingOutcome::<i32, String>::from_result_future(later(Err("timeout".to_string())));

    assert_snapshot!(optional.to_string(), @"PendingOptional { <pending> }");
    assert_snapshot!(outcome.to_string(), @"PendingOutcome { <pending> }");

    let _ = (&optional).await;
    let _ = (&outcome).await;

    assert_snapshot!(optional.to_string(), @"PendingOptional { Present { 1 } }");
    assert_snapshot!(outcome.to_string(), @"PendingOutcome { Failure { timeout } }");
}

#[test]
fn error_kinds_serialize_kebab_case() {
    let kinds = [
        ErrorKind::ValueAccessedOnAbsent,
        ErrorKind::UnwrapCalledOnFailure,
        ErrorKind::FromOptionalConversion,
    ];
    assert_snapshot!(
        serde_json::to_string(&kinds).unwrap(),
        @r#"["value-accessed-on-absent","unwrap-called-on-failure","from-optional-conversion"]"#
    );
}
