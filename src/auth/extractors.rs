use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use super::claims::Role;
use super::jwt::JwtKeys;
use super::repo::Admin;
use crate::error::ApiError;
use crate::families::repo::Family;
use crate::state::AppState;

/// Extracts a verified admin principal from the bearer token.
pub struct AdminAuth(pub Admin);

/// Extracts a verified family principal from the bearer token.
pub struct FamilyAuth(pub Family);

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Auth("Not authorized".into()))?;

    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .ok_or_else(|| ApiError::Auth("Not authorized".into()))
}

fn verify_role(parts: &Parts, state: &AppState, role: Role) -> Result<uuid::Uuid, ApiError> {
    let token = bearer_token(parts)?;
    let keys = JwtKeys::from_ref(state);
    let claims = keys
        .verify(token)
        .map_err(|_| ApiError::Auth("Invalid or expired token".into()))?;
    if claims.role != role {
        return Err(ApiError::Forbidden);
    }
    Ok(claims.sub)
}

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = verify_role(parts, state, Role::Admin)?;
        // The principal may have been removed since the token was issued.
        let admin = Admin::find_by_id(&state.db, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Admin"))?;
        Ok(AdminAuth(admin))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for FamilyAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = verify_role(parts, state, Role::Family)?;
        let family = Family::find_by_id(&state.db, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Family"))?;
        Ok(FamilyAuth(family))
    }
}
