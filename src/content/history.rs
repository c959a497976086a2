use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Bilingual village history entry. The UI treats the newest entry as "the"
/// history, so listing is newest-first.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub content_en: String,
    pub content_ta: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HistoryRequest {
    #[serde(default)]
    pub content_en: String,
    #[serde(default)]
    pub content_ta: String,
}

impl HistoryEntry {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<HistoryEntry>> {
        let rows = sqlx::query_as::<_, HistoryEntry>(
            "SELECT id, content_en, content_ta, created_at FROM history ORDER BY created_at DESC",
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(db: &PgPool, req: &HistoryRequest) -> anyhow::Result<HistoryEntry> {
        let entry = sqlx::query_as::<_, HistoryEntry>(
            r#"
            INSERT INTO history (content_en, content_ta)
            VALUES ($1, $2)
            RETURNING id, content_en, content_ta, created_at
            "#,
        )
        .bind(&req.content_en)
        .bind(&req.content_ta)
        .fetch_one(db)
        .await?;
        Ok(entry)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        req: &HistoryRequest,
    ) -> anyhow::Result<Option<HistoryEntry>> {
        let entry = sqlx::query_as::<_, HistoryEntry>(
            r#"
            UPDATE history
            SET content_en = $2, content_ta = $3
            WHERE id = $1
            RETURNING id, content_en, content_ta, created_at
            "#,
        )
        .bind(id)
        .bind(&req.content_en)
        .bind(&req.content_ta)
        .fetch_optional(db)
        .await?;
        Ok(entry)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM history WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/history", get(list_history).post(create_history))
        .route("/history/:id", put(update_history).delete(delete_history))
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/history", get(list_history_public))
}

#[instrument(skip(state, _admin))]
async fn list_history(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    Ok(Json(HistoryEntry::list(&state.db).await?))
}

#[instrument(skip(state))]
async fn list_history_public(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    Ok(Json(HistoryEntry::list(&state.db).await?))
}

#[instrument(skip(state, _admin, payload))]
async fn create_history(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(payload): Json<HistoryRequest>,
) -> Result<Json<Value>, ApiError> {
    let entry = HistoryEntry::create(&state.db, &payload).await?;
    Ok(Json(json!({ "message": "History entry created", "entry": entry })))
}

#[instrument(skip(state, _admin, payload))]
async fn update_history(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<HistoryRequest>,
) -> Result<Json<Value>, ApiError> {
    let entry = HistoryEntry::update(&state.db, id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("History entry"))?;
    Ok(Json(json!({ "message": "History updated", "entry": entry })))
}

#[instrument(skip(state, _admin))]
async fn delete_history(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !HistoryEntry::delete(&state.db, id).await? {
        return Err(ApiError::not_found("History entry"));
    }
    Ok(Json(json!({ "message": "History entry deleted" })))
}
