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

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

impl Event {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, Event>(
            "SELECT id, title, description, date, created_at FROM events ORDER BY date ASC",
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(db: &PgPool, req: &CreateEventRequest) -> anyhow::Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, description, date)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, date, created_at
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.date)
        .fetch_one(db)
        .await?;
        Ok(event)
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        req: &UpdateEventRequest,
    ) -> anyhow::Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date)
            WHERE id = $1
            RETURNING id, title, description, date, created_at
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.date)
        .fetch_optional(db)
        .await?;
        Ok(event)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/:id", put(update_event).delete(delete_event))
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/events", get(list_events_public))
}

#[instrument(skip(state, _admin))]
async fn list_events(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(Event::list(&state.db).await?))
}

#[instrument(skip(state))]
async fn list_events_public(
    State(state): State<AppState>,
) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(Event::list(&state.db).await?))
}

#[instrument(skip(state, _admin, payload))]
async fn create_event(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Event title is required".into()));
    }
    let event = Event::create(&state.db, &payload).await?;
    Ok(Json(json!({ "message": "Event created", "event": event })))
}

#[instrument(skip(state, _admin, payload))]
async fn update_event(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<Value>, ApiError> {
    let event = Event::update(&state.db, id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Event"))?;
    Ok(Json(json!({ "message": "Event updated", "event": event })))
}

#[instrument(skip(state, _admin))]
async fn delete_event(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !Event::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Event"));
    }
    Ok(Json(json!({ "message": "Event deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_requires_rfc3339_date() {
        let body = r#"{"title":"Pongal","date":"2026-01-14T06:00:00Z"}"#;
        let req: CreateEventRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.description, "");
        assert_eq!(req.date.year(), 2026);

        let bad = r#"{"title":"Pongal","date":"14-01-2026"}"#;
        assert!(serde_json::from_str::<CreateEventRequest>(bad).is_err());
    }

    #[test]
    fn update_request_fields_are_optional() {
        let req: UpdateEventRequest = serde_json::from_str(r#"{"title":"New"}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("New"));
        assert!(req.date.is_none());
    }
}
