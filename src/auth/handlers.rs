use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{AdminLoginRequest, AdminLoginResponse, PublicAdmin};
use super::jwt::JwtKeys;
use super::password::verify_password;
use super::repo::Admin;
use crate::error::ApiError;
use crate::state::AppState;

pub fn admin_router() -> Router<AppState> {
    Router::new().route("/login", post(login_admin))
}

#[instrument(skip(state, payload))]
pub async fn login_admin(
    State(state): State<AppState>,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    let admin = Admin::find_by_username(&state.db, &payload.username)
        .await?
        .ok_or_else(|| {
            warn!(username = %payload.username, "login unknown admin");
            ApiError::invalid_credentials()
        })?;

    if !verify_password(&payload.password, &admin.password_hash)? {
        warn!(username = %payload.username, "admin login invalid password");
        return Err(ApiError::invalid_credentials());
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign_admin(admin.id)?;

    info!(admin_id = %admin.id, "admin logged in");
    Ok(Json(AdminLoginResponse {
        token,
        admin: PublicAdmin {
            id: admin.id,
            username: admin.username,
            role: admin.role,
        },
    }))
}
