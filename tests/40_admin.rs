mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use common::*;
use cooklyst_api_rust::soap::SubscriptionError;

#[tokio::test]
async fn bearer_token_is_required() -> Result<()> {
    let app = TestApp::new();
    let (status, _) = app.send(Request::get("/subscription").body(Body::empty())?).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::get("/subscription")
        .header("Authorization", "Bearer not-a-token")
        .body(Body::empty())?;
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.soap.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn non_admins_are_refused_before_any_network_call() -> Result<()> {
    let app = TestApp::new();
    let body = json!({ "creatorID": ANA, "subscriberID": SAM });

    let (status, _) = app.authed("GET", "/subscription", SAM, false, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.authed("POST", "/subscription/approve", SAM, false, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.authed("POST", "/subscription/reject", SAM, false, Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.soap.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn pending_list_uses_legacy_field_names() -> Result<()> {
    let app = TestApp::new();
    app.soap.set_pending(Ok(list_xml(&[(ANA, "PENDING", "sam@example.com", SAM)])));

    let (status, body) = app.authed("GET", "/subscription", ADMIN, true, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([{ "creatorID": 7, "status": "PENDING", "subscriberEmail": "sam@example.com", "subscriberID": 42 }])
    );
    Ok(())
}

#[tokio::test]
async fn undecodable_pending_record_does_not_hide_the_queue() -> Result<()> {
    let app = TestApp::new();
    app.soap.set_pending(Ok(list_xml(&[
        (ANA, "PENDING", "sam@example.com", SAM),
        (BEN, "ON_HOLD", "sam@example.com", SAM),
    ])));

    let (status, body) = app.authed("GET", "/subscription", ADMIN, true, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([{ "creatorID": 7, "status": "PENDING", "subscriberEmail": "sam@example.com", "subscriberID": 42 }])
    );
    Ok(())
}

#[tokio::test]
async fn approve_success() -> Result<()> {
    let app = TestApp::new();
    app.soap.set_command_phrase("approve", "Successfully rejected subscription request");

    let body = json!({ "creatorID": 7, "subscriberID": "42" });
    let (status, response) = app.authed("POST", "/subscription/approve", ADMIN, true, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Successfully rejected subscription request");
    assert_eq!(response["data"], json!({ "creatorID": 7, "subscriberID": 42 }));

    let envelope = app.soap.last_envelope().unwrap();
    assert!(envelope.contains("<approve xmlns="));
    assert_eq!(envelope_arg(&envelope, 0).as_deref(), Some(SOAP_SECRET));
    assert_eq!(envelope_arg(&envelope, 1).as_deref(), Some("7"));
    assert_eq!(envelope_arg(&envelope, 2).as_deref(), Some("42"));
    Ok(())
}

#[tokio::test]
async fn reject_success() -> Result<()> {
    let app = TestApp::new();
    app.soap.set_command_phrase("reject", "Successfully rejected subscription request");

    let body = json!({ "creatorID": 7, "subscriberID": 42 });
    let (status, response) = app.authed("POST", "/subscription/reject", ADMIN, true, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Successfully rejected subscription request");
    assert!(app.soap.last_envelope().unwrap().contains("<reject xmlns="));
    Ok(())
}

#[tokio::test]
async fn no_request_found_is_not_found() -> Result<()> {
    let app = TestApp::new();
    app.soap.set_command_phrase("reject", "No subscription request found");

    let body = json!({ "creatorID": 7, "subscriberID": 42 });
    let (status, response) = app.authed("POST", "/subscription/reject", ADMIN, true, Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["message"], "No subscription request found");
    Ok(())
}

#[tokio::test]
async fn unrecognized_phrases_are_bad_requests() -> Result<()> {
    let app = TestApp::new();
    let body = json!({ "creatorID": 7, "subscriberID": 42 });

    app.soap.set_command_phrase("approve", "Something odd happened");
    let (status, _) = app.authed("POST", "/subscription/approve", ADMIN, true, Some(body.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // the approve confirmation does not confirm a rejection
    app.soap.set_command_phrase("reject", "Successfully approved subscription request");
    let (status, _) = app.authed("POST", "/subscription/reject", ADMIN, true, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn missing_ids_are_rejected_without_network_calls() -> Result<()> {
    let app = TestApp::new();
    for body in [json!({}), json!({ "creatorID": 7 }), json!({ "subscriberID": 42 })] {
        let (status, response) = app.authed("POST", "/subscription/approve", ADMIN, true, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["message"], "Field creatorID and subscriberID cannot be empty.");
    }

    let body = json!({ "creatorID": "seven", "subscriberID": 42 });
    let (status, response) = app.authed("POST", "/subscription/reject", ADMIN, true, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Invalid id parameter.");

    assert_eq!(app.soap.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn service_failures_are_generic_server_errors() -> Result<()> {
    let app = TestApp::new();
    app.soap.set_pending(Err(SubscriptionError::Transport("connect 10.1.2.3:8001 refused".into())));
    let (status, body) = app.authed("GET", "/subscription", ADMIN, true, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal Server Error");

    app.soap.set_command_reply(Ok(fault_xml("bad key")));
    let body = json!({ "creatorID": 7, "subscriberID": 42 });
    let (status, response) = app.authed("POST", "/subscription/approve", ADMIN, true, Some(body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.to_string().contains("bad key"));
    Ok(())
}
