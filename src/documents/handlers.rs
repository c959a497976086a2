use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::repo::Document;
use super::service;
use crate::auth::FamilyAuth;
use crate::error::ApiError;
use crate::state::AppState;

pub fn family_router() -> Router<AppState> {
    Router::new()
        .route("/documents", post(upload_document))
        .route("/documents/:doc_id", delete(delete_document))
        .route("/download/:stored_name", get(download_document))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

#[instrument(skip(state, auth, mp))]
pub async fn upload_document(
    State(state): State<AppState>,
    auth: FamilyAuth,
    mut mp: Multipart,
) -> Result<Json<Value>, ApiError> {
    let family = auth.0;

    let mut file: Option<(String, bytes::Bytes)> = None;
    while let Ok(Some(field)) = mp.next_field().await {
        if field.name() == Some("document") {
            let original = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "document".into());
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(format!("could not read upload: {e}")))?;
            file = Some((original, data));
            break;
        }
    }
    let (original_name, body) =
        file.ok_or_else(|| ApiError::Validation("No file uploaded".into()))?;

    let stored_name = service::stored_name_for(&original_name);
    service::save_file(&state.config.upload_dir, &stored_name, body).await?;

    let doc = Document::insert(
        &state.db,
        family.id,
        &original_name,
        &stored_name,
        &format!("/uploads/documents/{stored_name}"),
    )
    .await?;

    info!(family_id = %family.id, stored_name = %doc.stored_name, "document uploaded");
    Ok(Json(json!({ "message": "Document uploaded", "document": doc })))
}

#[instrument(skip(state, auth))]
pub async fn download_document(
    State(state): State<AppState>,
    auth: FamilyAuth,
    Path(stored_name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let family = auth.0;

    let doc = Document::find_by_stored_name(&state.db, family.id, &stored_name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Document not found in your uploads".into()))?;

    let path = service::documents_dir(&state.config.upload_dir).join(&doc.stored_name);
    let body = tokio::fs::read(&path)
        .await
        .map_err(|_| ApiError::NotFound("File does not exist on server".into()))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    let disposition = format!(
        "attachment; filename=\"{}\"",
        service::sanitize_filename(&doc.original_name)
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?,
    );

    Ok((headers, body))
}

#[instrument(skip(state, auth))]
pub async fn delete_document(
    State(state): State<AppState>,
    auth: FamilyAuth,
    Path(doc_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let family = auth.0;

    let doc = Document::delete(&state.db, family.id, doc_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Document"))?;

    service::remove_file(&state.config.upload_dir, &doc.stored_name).await;

    info!(family_id = %family.id, stored_name = %doc.stored_name, "document deleted");
    Ok(Json(json!({ "message": "Document deleted" })))
}
