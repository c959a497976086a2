use std::collections::HashMap;

use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{
    is_valid_email, ApprovalRequest, FamilyAuthResponse, FamilyLoginRequest, PublicFamily,
    RegisterFamilyRequest,
};
use super::repo::{Family, NewFamily};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::{AdminAuth, FamilyAuth};
use crate::documents::repo::Document;
use crate::error::ApiError;
use crate::state::AppState;
use crate::tax::repo::TaxEntry;

pub fn family_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_family))
        .route("/login", post(login_family))
        .route("/me", get(get_my_family))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/families", get(list_families).post(create_family))
        .route("/families/approve", post(approve_family))
        .route("/families/reject", post(reject_family))
}

async fn load_profile(state: &AppState, family: Family) -> Result<PublicFamily, ApiError> {
    let tax = TaxEntry::list_for_family(&state.db, family.id).await?;
    let docs = Document::list_for_family(&state.db, family.id).await?;
    Ok(PublicFamily::from_parts(family, tax, docs))
}

async fn insert_family(
    state: &AppState,
    mut payload: RegisterFamilyRequest,
) -> Result<Family, ApiError> {
    payload.family_id = payload.family_id.trim().to_string();
    payload.leader_name = payload.leader_name.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    if payload.family_id.is_empty()
        || payload.leader_name.is_empty()
        || payload.email.is_empty()
        || payload.password.is_empty()
    {
        return Err(ApiError::Validation(
            "Family ID, Leader Name, Email, and Password are required".into(),
        ));
    }
    if !is_valid_email(&payload.email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }

    if Family::find_by_family_id(&state.db, &payload.family_id)
        .await?
        .is_some()
    {
        warn!(family_id = %payload.family_id, "duplicate family id");
        return Err(ApiError::Conflict("Family ID already exists".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let family = Family::create(
        &state.db,
        NewFamily {
            family_id: &payload.family_id,
            password_hash: &password_hash,
            leader_name: &payload.leader_name,
            members: &payload.members,
            address: &payload.address,
            email: &payload.email,
            phone: &payload.phone,
        },
    )
    .await?;
    Ok(family)
}

#[instrument(skip(state, payload))]
pub async fn register_family(
    State(state): State<AppState>,
    Json(payload): Json<RegisterFamilyRequest>,
) -> Result<Json<Value>, ApiError> {
    let family = insert_family(&state, payload).await?;
    info!(family_id = %family.family_id, "family registered");
    // Fresh registrations always have empty tax and document sets.
    let profile = PublicFamily::from_parts(family, vec![], vec![]);
    Ok(Json(json!({ "message": "Family registered", "family": profile })))
}

#[instrument(skip(state, payload))]
pub async fn login_family(
    State(state): State<AppState>,
    Json(payload): Json<FamilyLoginRequest>,
) -> Result<Json<FamilyAuthResponse>, ApiError> {
    let family_id = payload.family_id.trim();
    if family_id.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Family ID and password are required".into(),
        ));
    }

    let family = Family::find_by_family_id(&state.db, family_id)
        .await?
        .ok_or_else(|| {
            warn!(family_id = %family_id, "login unknown family");
            ApiError::invalid_credentials()
        })?;

    if !verify_password(&payload.password, &family.password_hash)? {
        warn!(family_id = %family_id, "family login invalid password");
        return Err(ApiError::invalid_credentials());
    }

    // Approval does not gate login; the profile carries the flag so the
    // client can limit what an unapproved family sees.
    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign_family(family.id)?;

    info!(family_id = %family.family_id, "family logged in");
    let profile = load_profile(&state, family).await?;
    Ok(Json(FamilyAuthResponse {
        token,
        family: profile,
    }))
}

#[instrument(skip(state, auth))]
pub async fn get_my_family(
    State(state): State<AppState>,
    auth: FamilyAuth,
) -> Result<Json<PublicFamily>, ApiError> {
    let profile = load_profile(&state, auth.0).await?;
    Ok(Json(profile))
}

#[instrument(skip(state, _admin))]
pub async fn list_families(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> Result<Json<Vec<PublicFamily>>, ApiError> {
    let families = Family::list_all(&state.db).await?;

    // Two scans instead of a query per family; grouped in memory.
    let mut tax_by_family: HashMap<Uuid, Vec<TaxEntry>> = HashMap::new();
    for entry in TaxEntry::list_all(&state.db).await? {
        tax_by_family.entry(entry.family_id).or_default().push(entry);
    }
    let mut docs_by_family: HashMap<Uuid, Vec<Document>> = HashMap::new();
    for doc in Document::list_all(&state.db).await? {
        docs_by_family.entry(doc.family_id).or_default().push(doc);
    }

    let profiles = families
        .into_iter()
        .map(|f| {
            let tax = tax_by_family.remove(&f.id).unwrap_or_default();
            let docs = docs_by_family.remove(&f.id).unwrap_or_default();
            PublicFamily::from_parts(f, tax, docs)
        })
        .collect();
    Ok(Json(profiles))
}

#[instrument(skip(state, _admin, payload))]
pub async fn create_family(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(payload): Json<RegisterFamilyRequest>,
) -> Result<Json<Value>, ApiError> {
    let family = insert_family(&state, payload).await?;
    info!(family_id = %family.family_id, "family created by admin");
    let profile = PublicFamily::from_parts(family, vec![], vec![]);
    Ok(Json(json!({ "message": "Family created", "family": profile })))
}

#[instrument(skip(state, _admin, payload))]
pub async fn approve_family(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(payload): Json<ApprovalRequest>,
) -> Result<Json<Value>, ApiError> {
    set_approval(&state, payload.id, true, "Family approved").await
}

#[instrument(skip(state, _admin, payload))]
pub async fn reject_family(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(payload): Json<ApprovalRequest>,
) -> Result<Json<Value>, ApiError> {
    set_approval(&state, payload.id, false, "Family rejected").await
}

async fn set_approval(
    state: &AppState,
    id: Uuid,
    approved: bool,
    message: &str,
) -> Result<Json<Value>, ApiError> {
    let family = Family::set_approved(&state.db, id, approved)
        .await?
        .ok_or_else(|| ApiError::not_found("Family"))?;

    info!(family_id = %family.family_id, approved, "approval updated");
    let profile = load_profile(state, family).await?;
    Ok(Json(json!({ "message": message, "family": profile })))
}
