//! HTTP handlers for the function shell.
//!
//! Equivalent to the gateway's REST routes except that verification reads
//! `zoi`/`token` from the request body, which is what the function
//! platform's callers send.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use fiscal_core::error::AppError;
use fiscal_core::furs::document::InvoiceSubmission;
use fiscal_core::furs::{SubmissionReceipt, VerificationReport};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::AppState;

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "function-service" })),
    )
}

#[derive(Debug, Deserialize)]
pub struct CheckBody {
    pub zoi: String,
    pub token: String,
}

#[tracing::instrument(skip(state, payload))]
pub async fn send_invoice(
    State(state): State<AppState>,
    Json(payload): Json<InvoiceSubmission>,
) -> Result<Json<SubmissionReceipt>, AppError> {
    payload.validate()?;

    tracing::info!(invoice_number = %payload.invoice_number, "registering invoice");
    let receipt = state.furs.submit_invoice(&payload).await?;

    Ok(Json(receipt))
}

#[tracing::instrument(skip(state, payload))]
pub async fn check_invoice(
    State(state): State<AppState>,
    Json(payload): Json<CheckBody>,
) -> Result<Json<VerificationReport>, AppError> {
    let report = state
        .furs
        .check_invoice(&payload.zoi, &payload.token)
        .await?;

    Ok(Json(report))
}
