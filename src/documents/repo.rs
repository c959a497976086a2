use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Metadata row for a family-owned file on local disk.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub family_id: Uuid,
    pub original_name: String,
    pub stored_name: String,
    pub path: String,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}

impl Document {
    pub async fn insert(
        db: &PgPool,
        family_id: Uuid,
        original_name: &str,
        stored_name: &str,
        path: &str,
    ) -> anyhow::Result<Document> {
        let doc = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (family_id, original_name, stored_name, path)
            VALUES ($1, $2, $3, $4)
            RETURNING id, family_id, original_name, stored_name, path, uploaded_at
            "#,
        )
        .bind(family_id)
        .bind(original_name)
        .bind(stored_name)
        .bind(path)
        .fetch_one(db)
        .await?;
        Ok(doc)
    }

    /// Lookup scoped to the owning family; other families' files are invisible.
    pub async fn find_by_stored_name(
        db: &PgPool,
        family_id: Uuid,
        stored_name: &str,
    ) -> anyhow::Result<Option<Document>> {
        let doc = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, family_id, original_name, stored_name, path, uploaded_at
            FROM documents
            WHERE family_id = $1 AND stored_name = $2
            "#,
        )
        .bind(family_id)
        .bind(stored_name)
        .fetch_optional(db)
        .await?;
        Ok(doc)
    }

    /// Remove the row, returning it so the caller can delete the backing file.
    pub async fn delete(
        db: &PgPool,
        family_id: Uuid,
        doc_id: Uuid,
    ) -> anyhow::Result<Option<Document>> {
        let doc = sqlx::query_as::<_, Document>(
            r#"
            DELETE FROM documents
            WHERE id = $1 AND family_id = $2
            RETURNING id, family_id, original_name, stored_name, path, uploaded_at
            "#,
        )
        .bind(doc_id)
        .bind(family_id)
        .fetch_optional(db)
        .await?;
        Ok(doc)
    }

    pub async fn list_for_family(db: &PgPool, family_id: Uuid) -> anyhow::Result<Vec<Document>> {
        let rows = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, family_id, original_name, stored_name, path, uploaded_at
            FROM documents
            WHERE family_id = $1
            ORDER BY uploaded_at ASC
            "#,
        )
        .bind(family_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Document>> {
        let rows = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, family_id, original_name, stored_name, path, uploaded_at
            FROM documents
            ORDER BY uploaded_at ASC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
