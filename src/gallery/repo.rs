use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Shared (non-family-scoped) gallery image. `object_key` is None for
/// legacy rows whose `url` points outside our object store.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub url: String,
    pub object_key: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl GalleryItem {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<GalleryItem>> {
        let rows = sqlx::query_as::<_, GalleryItem>(
            r#"
            SELECT id, title, description, url, object_key, created_at
            FROM gallery
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn insert(
        db: &PgPool,
        title: &str,
        description: &str,
        url: &str,
        object_key: &str,
    ) -> anyhow::Result<GalleryItem> {
        let item = sqlx::query_as::<_, GalleryItem>(
            r#"
            INSERT INTO gallery (title, description, url, object_key)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, url, object_key, created_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(url)
        .bind(object_key)
        .fetch_one(db)
        .await?;
        Ok(item)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<GalleryItem>> {
        let item = sqlx::query_as::<_, GalleryItem>(
            r#"
            SELECT id, title, description, url, object_key, created_at
            FROM gallery
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(item)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM gallery WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
