//! FURS fiscal-authority client.
//!
//! Implements invoice registration and verification against the
//! tax-authority REST endpoint. Each operation makes exactly one outbound
//! call; there are no retries.

pub mod document;

use anyhow::anyhow;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::FursConfig;
use crate::error::AppError;
use self::document::{InvoiceSubmission, build_invoice_request};

/// Client for the fiscal-authority endpoints.
#[derive(Clone)]
pub struct FursClient {
    client: Client,
    config: FursConfig,
}

/// Normalized result of a successful registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub zoi: String,
    pub qr: String,
    #[serde(rename = "messageID")]
    pub message_id: String,
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "uniqueInvoiceID")]
    pub unique_invoice_id: String,
}

/// Normalized result of a verification lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub tax: String,
    pub amount: String,
    pub date: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    #[serde(rename = "ZOI")]
    zoi: Option<String>,
    #[serde(rename = "QR")]
    qr: Option<String>,
    response: Option<RegisterResponseBody>,
}

#[derive(Debug, Deserialize)]
struct RegisterResponseBody {
    #[serde(rename = "InvoiceResponse")]
    invoice_response: Option<InvoiceResponse>,
}

#[derive(Debug, Deserialize)]
struct InvoiceResponse {
    #[serde(rename = "Header")]
    header: Option<ResponseHeader>,
    #[serde(rename = "UniqueInvoiceID")]
    unique_invoice_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseHeader {
    #[serde(rename = "MessageID")]
    message_id: Option<String>,
    #[serde(rename = "DateTime")]
    date_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(rename = "TAX")]
    tax: Option<String>,
    #[serde(rename = "AMOUNT")]
    amount: Option<String>,
    #[serde(rename = "DATETIME")]
    date_time: Option<String>,
    #[serde(rename = "CONTENT")]
    content: Option<CheckContent>,
}

#[derive(Debug, Deserialize)]
struct CheckContent {
    token: Option<String>,
}

fn missing(field: &str) -> AppError {
    AppError::MalformedResponse(format!("response missing {field}"))
}

impl RegisterResponse {
    fn into_receipt(self) -> Result<SubmissionReceipt, AppError> {
        let invoice_response = self
            .response
            .and_then(|r| r.invoice_response)
            .ok_or_else(|| missing("response.InvoiceResponse"))?;
        let header = invoice_response
            .header
            .ok_or_else(|| missing("response.InvoiceResponse.Header"))?;

        Ok(SubmissionReceipt {
            zoi: self.zoi.ok_or_else(|| missing("ZOI"))?,
            qr: self.qr.ok_or_else(|| missing("QR"))?,
            message_id: header.message_id.ok_or_else(|| missing("Header.MessageID"))?,
            date_time: header.date_time.ok_or_else(|| missing("Header.DateTime"))?,
            unique_invoice_id: invoice_response
                .unique_invoice_id
                .ok_or_else(|| missing("UniqueInvoiceID"))?,
        })
    }
}

impl CheckResponse {
    fn into_report(self) -> Result<VerificationReport, AppError> {
        Ok(VerificationReport {
            tax: self.tax.ok_or_else(|| missing("TAX"))?,
            amount: self.amount.ok_or_else(|| missing("AMOUNT"))?,
            date: self.date_time.ok_or_else(|| missing("DATETIME"))?,
            token: self
                .content
                .and_then(|c| c.token)
                .ok_or_else(|| missing("CONTENT.token"))?,
        })
    }
}

impl FursClient {
    /// Create a new client for the given upstream configuration.
    pub fn new(config: FursConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

        Ok(Self { client, config })
    }

    /// Register an invoice with the fiscal authority.
    pub async fn submit_invoice(
        &self,
        submission: &InvoiceSubmission,
    ) -> Result<SubmissionReceipt, AppError> {
        let document = build_invoice_request(submission, &self.config);
        let url = format!("{}/invoice", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&submission.token)
            .json(&document)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, body = %body, "FURS registration response");

        if !status.is_success() {
            tracing::error!(status = %status, "FURS invoice registration failed");
            return Err(AppError::Upstream(anyhow!(
                "fiscal endpoint returned {status}: {body}"
            )));
        }

        let parsed: RegisterResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::MalformedResponse(format!("unparseable registration response: {e}")))?;
        let receipt = parsed.into_receipt()?;

        tracing::info!(
            zoi = %receipt.zoi,
            message_id = %receipt.message_id,
            "invoice registered"
        );

        Ok(receipt)
    }

    /// Look up a registered invoice by its protection code.
    pub async fn check_invoice(
        &self,
        zoi: &str,
        token: &str,
    ) -> Result<VerificationReport, AppError> {
        let url = format!("{}/check-invoice", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("zoi", zoi)])
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, body = %body, "FURS verification response");

        if !status.is_success() {
            tracing::error!(status = %status, zoi = %zoi, "FURS invoice verification failed");
            return Err(AppError::Upstream(anyhow!(
                "fiscal endpoint returned {status}: {body}"
            )));
        }

        let parsed: CheckResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::MalformedResponse(format!("unparseable verification response: {e}")))?;
        parsed.into_report()
    }
}
