use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::{FlightTicketRequest, SubmitApplication};
use super::repository::PlacementRepository;
use super::service::{PlacementError, PlacementService};
use crate::workflows::ids::{ApplicationId, JobId};
use crate::workflows::notify::NotificationSink;

/// Router builder exposing the placement lifecycle operations.
pub fn placement_router<R, N>(service: Arc<PlacementService<R, N>>) -> Router
where
    R: PlacementRepository + 'static,
    N: NotificationSink + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(submit_handler::<R, N>))
        .route(
            "/api/v1/jobs/:job_id/applications/:application_id/shortlist",
            post(shortlist_handler::<R, N>),
        )
        .route(
            "/api/v1/applications/:application_id/contract",
            post(generate_handler::<R, N>),
        )
        .route(
            "/api/v1/applications/:application_id/contract/dispatch",
            post(dispatch_handler::<R, N>),
        )
        .route("/api/v1/flight-tickets", post(flight_ticket_handler::<R, N>))
        .with_state(service)
}

fn error_response(error: &PlacementError) -> Response {
    let status = match error {
        PlacementError::Validation(_) => StatusCode::BAD_REQUEST,
        PlacementError::NotFound(_) => StatusCode::NOT_FOUND,
        PlacementError::Conflict => StatusCode::CONFLICT,
        PlacementError::Dispatch(_) => StatusCode::BAD_GATEWAY,
        PlacementError::Render(_) | PlacementError::Storage(_) | PlacementError::Unavailable(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
        "code": error.code(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    axum::Json(submission): axum::Json<SubmitApplication>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NotificationSink + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn shortlist_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    Path((job_id, application_id)): Path<(String, String)>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NotificationSink + 'static,
{
    match service.shortlist(&JobId(job_id), &ApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn generate_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NotificationSink + 'static,
{
    match service.generate_contract(&ApplicationId(application_id)) {
        Ok(url) => (StatusCode::OK, axum::Json(json!({ "url": url }))).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn dispatch_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NotificationSink + 'static,
{
    match service.dispatch_contract(&ApplicationId(application_id)) {
        Ok(outcome) => (
            StatusCode::OK,
            axum::Json(json!({
                "message": "emails sent and status updated",
                "contract": outcome.contract,
                "application": outcome.application,
            })),
        )
            .into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn flight_ticket_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    axum::Json(request): axum::Json<FlightTicketRequest>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NotificationSink + 'static,
{
    match service.record_flight_ticket(request) {
        Ok(ticket) => (StatusCode::CREATED, axum::Json(ticket)).into_response(),
        Err(error) => error_response(&error),
    }
}
