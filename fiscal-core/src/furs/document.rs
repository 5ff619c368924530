//! Fiscal invoice document construction.
//!
//! Builds the `InvoiceRequest` JSON document the tax authority accepts.
//! Field casing in this module mirrors the upstream wire contract, which
//! is authoritative and must not change.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::config::FursConfig;

/// Caller-supplied fields for an invoice registration.
///
/// Fields are forwarded as given; only presence is validated.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSubmission {
    #[validate(length(min = 1))]
    pub invoice_number: String,
    pub amount: f64,
    #[validate(length(min = 1))]
    pub business_unit_id: String,
    #[validate(length(min = 1))]
    pub device_id: String,
    /// Bearer credential, forwarded verbatim to the authority.
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 1))]
    pub tax_number: String,
    #[validate(length(min = 1))]
    pub numbering_structure: String,
}

/// Top-level registration document.
#[derive(Debug, Serialize)]
pub struct FiscalDocument {
    #[serde(rename = "InvoiceRequest")]
    pub invoice_request: InvoiceRequest,
}

#[derive(Debug, Serialize)]
pub struct InvoiceRequest {
    #[serde(rename = "Header")]
    pub header: MessageHeader,
    #[serde(rename = "Invoice")]
    pub invoice: InvoiceDetail,
}

#[derive(Debug, Serialize)]
pub struct MessageHeader {
    #[serde(rename = "MessageID")]
    pub message_id: String,
    #[serde(rename = "DateTime")]
    pub date_time: String,
}

#[derive(Debug, Serialize)]
pub struct InvoiceDetail {
    #[serde(rename = "TaxNumber")]
    pub tax_number: String,
    #[serde(rename = "IssueDateTime")]
    pub issue_date_time: String,
    #[serde(rename = "NumberingStructure")]
    pub numbering_structure: String,
    #[serde(rename = "InvoiceIdentifier")]
    pub invoice_identifier: InvoiceIdentifier,
    #[serde(rename = "InvoiceAmount")]
    pub invoice_amount: f64,
    #[serde(rename = "PaymentAmount")]
    pub payment_amount: f64,
    #[serde(rename = "TaxesPerSeller")]
    pub taxes_per_seller: Vec<SellerTaxes>,
    #[serde(rename = "OperatorTaxNumber")]
    pub operator_tax_number: String,
    #[serde(rename = "ProtectedID")]
    pub protected_id: String,
}

#[derive(Debug, Serialize)]
pub struct InvoiceIdentifier {
    #[serde(rename = "BusinessPremiseID")]
    pub business_premise_id: String,
    #[serde(rename = "ElectronicDeviceID")]
    pub electronic_device_id: String,
    #[serde(rename = "InvoiceNumber")]
    pub invoice_number: String,
}

#[derive(Debug, Serialize)]
pub struct SellerTaxes {
    #[serde(rename = "VAT")]
    pub vat: Vec<VatEntry>,
}

#[derive(Debug, Serialize)]
pub struct VatEntry {
    #[serde(rename = "TaxRate")]
    pub tax_rate: f64,
    #[serde(rename = "TaxableAmount")]
    pub taxable_amount: f64,
    #[serde(rename = "TaxAmount")]
    pub tax_amount: f64,
}

/// VAT split of a gross amount at the given percentage rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VatBreakdown {
    pub taxable_amount: f64,
    pub tax_amount: f64,
}

pub fn vat_breakdown(amount: f64, rate: f64) -> VatBreakdown {
    let taxable = amount / (1.0 + rate / 100.0);
    // The tax figure subtracts the *unrounded* quotient. Rounding
    // `taxable` first changes published amounts; keep this order.
    VatBreakdown {
        taxable_amount: round2(taxable),
        tax_amount: round2(amount - taxable),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Protection code derived from the message identifier: the MD5 digest in
/// lowercase hex, 32 characters.
pub fn protected_id(message_id: &str) -> String {
    hex::encode(Md5::digest(message_id.as_bytes()))
}

/// Assemble the registration document for a submission.
///
/// Generates a fresh `MessageID`; the issue timestamp comes from config
/// (a pinned literal by default, not the current time).
pub fn build_invoice_request(submission: &InvoiceSubmission, config: &FursConfig) -> FiscalDocument {
    let message_id = Uuid::new_v4().to_string();
    let breakdown = vat_breakdown(submission.amount, config.vat_rate);

    FiscalDocument {
        invoice_request: InvoiceRequest {
            header: MessageHeader {
                message_id: message_id.clone(),
                date_time: config.issue_timestamp.clone(),
            },
            invoice: InvoiceDetail {
                tax_number: submission.tax_number.clone(),
                issue_date_time: config.issue_timestamp.clone(),
                numbering_structure: submission.numbering_structure.clone(),
                invoice_identifier: InvoiceIdentifier {
                    business_premise_id: submission.business_unit_id.clone(),
                    electronic_device_id: submission.device_id.clone(),
                    invoice_number: submission.invoice_number.clone(),
                },
                invoice_amount: submission.amount,
                payment_amount: submission.amount,
                taxes_per_seller: vec![SellerTaxes {
                    vat: vec![VatEntry {
                        tax_rate: round2(config.vat_rate),
                        taxable_amount: breakdown.taxable_amount,
                        tax_amount: breakdown.tax_amount,
                    }],
                }],
                operator_tax_number: submission.tax_number.clone(),
                protected_id: protected_id(&message_id),
            },
        },
    }
}
