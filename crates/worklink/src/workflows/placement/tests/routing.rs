use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::placement::domain::SubmitApplication;
use crate::workflows::placement::router::placement_router;

fn post(uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .expect("request builds")
}

#[tokio::test]
async fn submit_endpoint_returns_created_application() {
    let harness = harness();
    let router = placement_router(harness.service.clone());

    let payload = serde_json::to_string(&SubmitApplication {
        job: job(),
        employee: employee(),
    })
    .expect("payload serializes");
    let response = router
        .oneshot(post("/api/v1/applications", Body::from(payload)))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "APPLICATION_SUBMITTED");
    assert_eq!(body["job"]["title"], "Household Nurse");
}

#[tokio::test]
async fn duplicate_shortlist_maps_to_conflict() {
    let harness = harness();
    let first = harness.service.submit(submission()).expect("submitted");
    let second = harness
        .service
        .submit(SubmitApplication {
            job: job(),
            employee: second_employee(),
        })
        .expect("submitted");
    harness
        .service
        .shortlist(&first.job.id, &first.id)
        .expect("first shortlist");

    let router = placement_router(harness.service.clone());
    let uri = format!(
        "/api/v1/jobs/{}/applications/{}/shortlist",
        second.job.id.0, second.id.0
    );
    let response = router
        .oneshot(post(&uri, Body::empty()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn dispatch_without_artifact_maps_to_io_error() {
    let harness = harness();
    let record = harness.service.submit(submission()).expect("submitted");

    let router = placement_router(harness.service.clone());
    let uri = format!("/api/v1/applications/{}/contract/dispatch", record.id.0);
    let response = router
        .oneshot(post(&uri, Body::empty()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "IO_ERROR");
}

#[tokio::test]
async fn generate_then_dispatch_round_trip() {
    let harness = harness();
    let record = harness.service.submit(submission()).expect("submitted");

    let router = placement_router(harness.service.clone());
    let generate_uri = format!("/api/v1/applications/{}/contract", record.id.0);
    let response = router
        .clone()
        .oneshot(post(&generate_uri, Body::empty()))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let url = body["url"].as_str().expect("url returned");
    assert!(url.ends_with(&format!("/contracts/{}.pdf", record.id.0)));

    let dispatch_uri = format!("/api/v1/applications/{}/contract/dispatch", record.id.0);
    let response = router
        .oneshot(post(&dispatch_uri, Body::empty()))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["application"]["status"], "CONTRACT_SENT");
    assert_eq!(body["application"]["contract_url"], url);
}

#[tokio::test]
async fn flight_ticket_endpoint_validates_required_fields() {
    let harness = harness();
    let router = placement_router(harness.service.clone());

    let response = router
        .oneshot(post(
            "/api/v1/flight-tickets",
            Body::from(r#"{"contract_id": "", "file_url": "/uploads/t1.pdf"}"#),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
