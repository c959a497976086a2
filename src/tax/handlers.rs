use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{
    validate_amount, validate_month, BulkTaxRequest, BulkTaxReport, MarkPaidRequest,
    MonthTotalResponse, UpdateTaxRequest,
};
use super::repo::TaxEntry;
use crate::auth::{AdminAuth, FamilyAuth};
use crate::error::ApiError;
use crate::families::repo::Family;
use crate::state::AppState;

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/families/tax", post(update_tax))
        .route("/families/tax/bulk", post(bulk_update_tax))
        .route("/families/tax/total/:month", get(total_tax_by_month))
        .route("/families/:family_id/tax", patch(mark_tax_paid))
        .route("/families/:family_id/tax/:tax_id", delete(delete_tax))
}

pub fn family_router() -> Router<AppState> {
    Router::new().route("/tax/:tax_id", delete(delete_own_tax))
}

#[instrument(skip(state, _admin, payload))]
pub async fn update_tax(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(payload): Json<UpdateTaxRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_month(&payload.month)?;
    validate_amount(payload.amount)?;

    Family::find_by_id(&state.db, payload.family_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Family"))?;

    let outcome = TaxEntry::upsert(
        &state.db,
        payload.family_id,
        &payload.month,
        payload.amount,
        payload.paid,
    )
    .await?;

    info!(family_id = %payload.family_id, month = %payload.month,
          created = outcome.created, "tax updated");
    Ok(Json(json!({ "message": "Tax updated", "entry": outcome.entry })))
}

#[instrument(skip(state, _admin, payload))]
pub async fn bulk_update_tax(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(payload): Json<BulkTaxRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.family_ids.is_empty() {
        return Err(ApiError::Validation(
            "familyIds must be a non-empty array".into(),
        ));
    }
    validate_month(&payload.month)?;
    validate_amount(payload.amount)?;

    let mut report = BulkTaxReport::default();
    for id in &payload.family_ids {
        match Family::find_by_id(&state.db, *id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                report.record_skipped();
                continue;
            }
            Err(e) => {
                warn!(family_id = %id, error = %e, "bulk tax lookup failed");
                report.record_failed();
                continue;
            }
        }
        match TaxEntry::upsert(&state.db, *id, &payload.month, payload.amount, payload.paid).await
        {
            Ok(outcome) => report.record_upsert(outcome.created),
            Err(e) => {
                warn!(family_id = %id, error = %e, "bulk tax upsert failed");
                report.record_failed();
            }
        }
    }

    info!(month = %payload.month, total = report.total(), "bulk tax processed");
    Ok(Json(json!({
        "message": format!("Tax processed for {} families", payload.family_ids.len()),
        "results": report,
    })))
}

#[instrument(skip(state, _admin, payload))]
pub async fn mark_tax_paid(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(family_id): Path<Uuid>,
    Json(payload): Json<MarkPaidRequest>,
) -> Result<Json<Value>, ApiError> {
    validate_month(&payload.month)?;
    if let Some(amount) = payload.amount {
        validate_amount(amount)?;
    }

    Family::find_by_id(&state.db, family_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Family"))?;

    let paid = payload.paid.unwrap_or(true);
    let entry =
        TaxEntry::mark_paid(&state.db, family_id, &payload.month, paid, payload.amount).await?;

    info!(family_id = %family_id, month = %payload.month, paid, "tax entry updated");
    Ok(Json(json!({ "message": "Tax entry updated", "entry": entry })))
}

#[instrument(skip(state, _admin))]
pub async fn delete_tax(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path((family_id, tax_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, ApiError> {
    if !TaxEntry::delete(&state.db, family_id, tax_id).await? {
        return Err(ApiError::not_found("Tax record"));
    }
    Ok(Json(json!({ "message": "Tax record deleted" })))
}

#[instrument(skip(state, auth))]
pub async fn delete_own_tax(
    State(state): State<AppState>,
    auth: FamilyAuth,
    Path(tax_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let family = auth.0;
    if !TaxEntry::delete(&state.db, family.id, tax_id).await? {
        return Err(ApiError::not_found("Tax record"));
    }
    info!(family_id = %family.id, %tax_id, "tax record deleted by family");
    Ok(Json(json!({ "message": "Tax record deleted" })))
}

#[instrument(skip(state, _admin))]
pub async fn total_tax_by_month(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(month): Path<String>,
) -> Result<Json<MonthTotalResponse>, ApiError> {
    validate_month(&month)?;
    let total = TaxEntry::total_paid_for_month(&state.db, &month).await?;
    Ok(Json(MonthTotalResponse { month, total }))
}
