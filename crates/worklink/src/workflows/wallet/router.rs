use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::WalletOperation;
use super::ledger::{LedgerError, WalletLedger};
use super::repository::WalletRepository;
use crate::workflows::ids::UserId;

/// Mutation payload: `{"amount": 500, "type": "CREDIT"}`.
#[derive(Debug, Deserialize)]
pub struct WalletMutation {
    pub amount: i64,
    #[serde(rename = "type")]
    pub operation: WalletOperation,
}

/// Router builder exposing wallet read and mutate endpoints.
pub fn wallet_router<W>(ledger: Arc<WalletLedger<W>>) -> Router
where
    W: WalletRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/wallet/:user_id",
            get(get_wallet_handler::<W>).post(apply_handler::<W>),
        )
        .with_state(ledger)
}

fn error_response(error: &LedgerError) -> Response {
    let status = match error {
        LedgerError::Validation(_) | LedgerError::InsufficientBalance { .. } => {
            StatusCode::BAD_REQUEST
        }
        LedgerError::NotFound => StatusCode::NOT_FOUND,
        LedgerError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
        "code": error.code(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn get_wallet_handler<W>(
    State(ledger): State<Arc<WalletLedger<W>>>,
    Path(user_id): Path<String>,
) -> Response
where
    W: WalletRepository + 'static,
{
    match ledger.get_or_create(&UserId(user_id)) {
        Ok(wallet) => (StatusCode::OK, axum::Json(wallet)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn apply_handler<W>(
    State(ledger): State<Arc<WalletLedger<W>>>,
    Path(user_id): Path<String>,
    axum::Json(mutation): axum::Json<WalletMutation>,
) -> Response
where
    W: WalletRepository + 'static,
{
    match ledger.apply(&UserId(user_id), mutation.amount, mutation.operation) {
        Ok(wallet) => (StatusCode::OK, axum::Json(wallet)).into_response(),
        Err(error) => error_response(&error),
    }
}
