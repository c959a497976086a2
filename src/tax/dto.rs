use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Ledger months are plain `YYYY-MM` strings, e.g. "2025-09".
pub fn validate_month(month: &str) -> Result<(), ApiError> {
    lazy_static! {
        static ref MONTH_RE: Regex = Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").unwrap();
    }
    if MONTH_RE.is_match(month) {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "month must be in YYYY-MM format, got {month:?}"
        )))
    }
}

pub fn validate_amount(amount: f64) -> Result<(), ApiError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(ApiError::Validation("amount must be non-negative".into()))
    }
}

/// Single-family upsert: `POST /api/admin/families/tax`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTaxRequest {
    pub family_id: Uuid,
    pub month: String,
    pub amount: f64,
    pub paid: Option<bool>,
}

/// Bulk upsert: `POST /api/admin/families/tax/bulk`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BulkTaxRequest {
    pub family_ids: Vec<Uuid>,
    pub month: String,
    pub amount: f64,
    pub paid: Option<bool>,
}

/// Mark paid: `PATCH /api/admin/families/:id/tax`. `paid` defaults to true.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MarkPaidRequest {
    pub month: String,
    pub paid: Option<bool>,
    pub amount: Option<f64>,
}

/// Per-item outcome counters for the bulk loop. A single item's failure is
/// recorded and never aborts the remainder of the batch.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct BulkTaxReport {
    pub updated: u32,
    pub created: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl BulkTaxReport {
    pub fn record_upsert(&mut self, created: bool) {
        if created {
            self.created += 1;
        } else {
            self.updated += 1;
        }
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_failed(&mut self) {
        self.failed += 1;
    }

    pub fn total(&self) -> u32 {
        self.updated + self.created + self.skipped + self.failed
    }
}

#[derive(Debug, Serialize)]
pub struct MonthTotalResponse {
    pub month: String,
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_accepts_valid_values() {
        assert!(validate_month("2025-09").is_ok());
        assert!(validate_month("2025-12").is_ok());
        assert!(validate_month("1999-01").is_ok());
    }

    #[test]
    fn month_rejects_out_of_range_and_malformed() {
        assert!(validate_month("2025-13").is_err());
        assert!(validate_month("2025-00").is_err());
        assert!(validate_month("202509").is_err());
        assert!(validate_month("2025-9").is_err());
        assert!(validate_month("").is_err());
    }

    #[test]
    fn amount_rejects_negative_and_nan() {
        assert!(validate_amount(0.0).is_ok());
        assert!(validate_amount(500.0).is_ok());
        assert!(validate_amount(-1.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
    }

    #[test]
    fn bulk_report_accumulates_per_item() {
        let mut report = BulkTaxReport::default();
        report.record_upsert(true);
        report.record_upsert(false);
        report.record_skipped();
        report.record_failed();
        assert_eq!(
            report,
            BulkTaxReport {
                updated: 1,
                created: 1,
                skipped: 1,
                failed: 1,
            }
        );
        assert_eq!(report.total(), 4);
    }

    #[test]
    fn update_request_rejects_unknown_fields() {
        let body = r#"{"familyId":"c1a7a7de-93a9-4b7e-9a63-0a2c8b1f0001",
                       "month":"2025-10","amount":500,"taxAmount":700}"#;
        assert!(serde_json::from_str::<UpdateTaxRequest>(body).is_err());
    }

    #[test]
    fn update_request_paid_defaults_to_none() {
        let body = r#"{"familyId":"c1a7a7de-93a9-4b7e-9a63-0a2c8b1f0001",
                       "month":"2025-10","amount":500}"#;
        let req: UpdateTaxRequest = serde_json::from_str(body).unwrap();
        assert!(req.paid.is_none());
        assert_eq!(req.amount, 500.0);
    }
}
