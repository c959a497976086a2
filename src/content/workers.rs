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

/// Village service provider listing (electrician, plumber, ...).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: Uuid,
    pub kind: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateWorkerRequest {
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateWorkerRequest {
    pub kind: Option<String>,
    pub description: Option<String>,
}

impl Worker {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Worker>> {
        let rows = sqlx::query_as::<_, Worker>(
            "SELECT id, kind, description, created_at FROM workers ORDER BY kind ASC",
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(db: &PgPool, req: &CreateWorkerRequest) -> anyhow::Result<Worker> {
        let worker = sqlx::query_as::<_, Worker>(
            r#"
            INSERT INTO workers (kind, description)
            VALUES ($1, $2)
            RETURNING id, kind, description, created_at
            "#,
        )
        .bind(&req.kind)
        .bind(&req.description)
        .fetch_one(db)
        .await?;
        Ok(worker)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        req: &UpdateWorkerRequest,
    ) -> anyhow::Result<Option<Worker>> {
        let worker = sqlx::query_as::<_, Worker>(
            r#"
            UPDATE workers
            SET kind = COALESCE($2, kind),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id, kind, description, created_at
            "#,
        )
        .bind(id)
        .bind(&req.kind)
        .bind(&req.description)
        .fetch_optional(db)
        .await?;
        Ok(worker)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM workers WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/workers", get(list_workers).post(create_worker))
        .route("/workers/:id", put(update_worker).delete(delete_worker))
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/workers", get(list_workers_public))
}

#[instrument(skip(state, _admin))]
async fn list_workers(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> Result<Json<Vec<Worker>>, ApiError> {
    Ok(Json(Worker::list(&state.db).await?))
}

#[instrument(skip(state))]
async fn list_workers_public(
    State(state): State<AppState>,
) -> Result<Json<Vec<Worker>>, ApiError> {
    Ok(Json(Worker::list(&state.db).await?))
}

#[instrument(skip(state, _admin, payload))]
async fn create_worker(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(payload): Json<CreateWorkerRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.kind.trim().is_empty() {
        return Err(ApiError::Validation("Worker type is required".into()));
    }
    let worker = Worker::create(&state.db, &payload).await?;
    Ok(Json(json!({ "message": "Worker created", "worker": worker })))
}

#[instrument(skip(state, _admin, payload))]
async fn update_worker(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWorkerRequest>,
) -> Result<Json<Value>, ApiError> {
    let worker = Worker::update(&state.db, id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Worker"))?;
    Ok(Json(json!({ "message": "Worker updated", "worker": worker })))
}

#[instrument(skip(state, _admin))]
async fn delete_worker(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !Worker::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Worker"));
    }
    Ok(Json(json!({ "message": "Worker deleted" })))
}
