use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{delete, get},
    Json, Router,
};
use bytes::Bytes;
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::repo::GalleryItem;
use crate::auth::AdminAuth;
use crate::documents::service::sanitize_filename;
use crate::error::ApiError;
use crate::state::AppState;

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/gallery", get(list_gallery).post(upload_gallery_image))
        .route("/gallery/:id", delete(delete_gallery_item))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/gallery", get(list_gallery_public))
}

struct GalleryUpload {
    title: String,
    description: String,
    file_name: String,
    content_type: String,
    body: Bytes,
}

async fn read_upload(mp: &mut Multipart) -> Result<GalleryUpload, ApiError> {
    let mut title = String::from("Untitled");
    let mut description = String::new();
    let mut file: Option<(String, String, Bytes)> = None;

    while let Ok(Some(field)) = mp.next_field().await {
        match field.name() {
            Some("title") => {
                if let Ok(v) = field.text().await {
                    if !v.trim().is_empty() {
                        title = v;
                    }
                }
            }
            Some("description") => {
                if let Ok(v) = field.text().await {
                    description = v;
                }
            }
            Some("image") => {
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "image".into());
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("could not read upload: {e}")))?;
                file = Some((file_name, content_type, body));
            }
            _ => {}
        }
    }

    let (file_name, content_type, body) =
        file.ok_or_else(|| ApiError::Validation("No file uploaded".into()))?;
    Ok(GalleryUpload {
        title,
        description,
        file_name,
        content_type,
        body,
    })
}

#[instrument(skip(state, _admin, mp))]
pub async fn upload_gallery_image(
    State(state): State<AppState>,
    _admin: AdminAuth,
    mut mp: Multipart,
) -> Result<Json<Value>, ApiError> {
    let upload = read_upload(&mut mp).await?;

    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let key = format!("gallery/{}-{}", millis, sanitize_filename(&upload.file_name));

    state
        .storage
        .put_object(&key, upload.body, &upload.content_type)
        .await?;

    let url = format!(
        "{}/{}",
        state.config.storage.public_url.trim_end_matches('/'),
        key
    );
    let item =
        GalleryItem::insert(&state.db, &upload.title, &upload.description, &url, &key).await?;

    info!(key = %key, "gallery image uploaded");
    Ok(Json(json!({ "message": "Gallery uploaded", "galleryItem": item })))
}

#[instrument(skip(state, _admin))]
pub async fn list_gallery(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> Result<Json<Vec<GalleryItem>>, ApiError> {
    Ok(Json(GalleryItem::list(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn list_gallery_public(
    State(state): State<AppState>,
) -> Result<Json<Vec<GalleryItem>>, ApiError> {
    Ok(Json(GalleryItem::list(&state.db).await?))
}

#[instrument(skip(state, _admin))]
pub async fn delete_gallery_item(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let item = GalleryItem::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gallery item"))?;

    // Remote delete is best-effort; the record goes either way.
    if let Some(key) = &item.object_key {
        if let Err(e) = state.storage.delete_object(key).await {
            warn!(key = %key, error = %e, "gallery remote delete failed");
        }
    }

    GalleryItem::delete(&state.db, id).await?;
    info!(%id, "gallery item deleted");
    Ok(Json(json!({ "message": "Gallery item deleted" })))
}
