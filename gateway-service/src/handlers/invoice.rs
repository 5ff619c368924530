//! REST adapter for invoice registration and verification.
//!
//! Both routes are thin: decode parameters, call the fiscal client, reply
//! with the normalized result verbatim.

use axum::{
    Json,
    extract::{Query, State},
};
use fiscal_core::error::AppError;
use fiscal_core::furs::document::InvoiceSubmission;
use fiscal_core::furs::{SubmissionReceipt, VerificationReport};
use serde::Deserialize;
use validator::Validate;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckParams {
    pub zoi: String,
    pub token: String,
}

#[tracing::instrument(skip(state, payload))]
pub async fn submit_invoice(
    State(state): State<AppState>,
    Json(payload): Json<InvoiceSubmission>,
) -> Result<Json<SubmissionReceipt>, AppError> {
    payload.validate()?;

    tracing::info!(invoice_number = %payload.invoice_number, "registering invoice");
    let receipt = state.furs.submit_invoice(&payload).await?;

    Ok(Json(receipt))
}

#[tracing::instrument(skip(state, params))]
pub async fn check_invoice(
    State(state): State<AppState>,
    Query(params): Query<CheckParams>,
) -> Result<Json<VerificationReport>, AppError> {
    let report = state.furs.check_invoice(&params.zoi, &params.token).await?;

    Ok(Json(report))
}
