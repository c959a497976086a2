use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Root aggregate of the portal. Tax entries and documents hang off this row
/// via `tax_entries` and `documents`; families are never hard-deleted.
#[derive(Debug, Clone, FromRow)]
pub struct Family {
    pub id: Uuid,
    pub family_id: String,
    pub password_hash: String,
    pub leader_name: String,
    pub members: Vec<String>,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub approved: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub struct NewFamily<'a> {
    pub family_id: &'a str,
    pub password_hash: &'a str,
    pub leader_name: &'a str,
    pub members: &'a [String],
    pub address: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
}

const COLUMNS: &str = "id, family_id, password_hash, leader_name, members, \
                       address, email, phone, approved, created_at, updated_at";

impl Family {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Family>> {
        let family = sqlx::query_as::<_, Family>(&format!(
            "SELECT {COLUMNS} FROM families WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(family)
    }

    pub async fn find_by_family_id(db: &PgPool, family_id: &str) -> anyhow::Result<Option<Family>> {
        let family = sqlx::query_as::<_, Family>(&format!(
            "SELECT {COLUMNS} FROM families WHERE family_id = $1"
        ))
        .bind(family_id)
        .fetch_optional(db)
        .await?;
        Ok(family)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Family>> {
        let rows = sqlx::query_as::<_, Family>(&format!(
            "SELECT {COLUMNS} FROM families ORDER BY family_id ASC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(db: &PgPool, new: NewFamily<'_>) -> anyhow::Result<Family> {
        let family = sqlx::query_as::<_, Family>(&format!(
            r#"
            INSERT INTO families (family_id, password_hash, leader_name, members,
                                  address, email, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(new.family_id)
        .bind(new.password_hash)
        .bind(new.leader_name)
        .bind(new.members)
        .bind(new.address)
        .bind(new.email)
        .bind(new.phone)
        .fetch_one(db)
        .await?;
        Ok(family)
    }

    /// Flip the approval flag; idempotent. Returns None when the id is unknown.
    pub async fn set_approved(
        db: &PgPool,
        id: Uuid,
        approved: bool,
    ) -> anyhow::Result<Option<Family>> {
        let family = sqlx::query_as::<_, Family>(&format!(
            r#"
            UPDATE families
            SET approved = $2, updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(approved)
        .fetch_optional(db)
        .await?;
        Ok(family)
    }

    /// Families with at least one unpaid ledger entry and a usable email.
    pub async fn with_unpaid_tax(db: &PgPool) -> anyhow::Result<Vec<Family>> {
        let rows = sqlx::query_as::<_, Family>(
            r#"
            SELECT DISTINCT f.id, f.family_id, f.password_hash, f.leader_name,
                   f.members, f.address, f.email, f.phone, f.approved,
                   f.created_at, f.updated_at
            FROM families f
            JOIN tax_entries t ON t.family_id = f.id AND NOT t.paid
            WHERE f.email <> ''
            ORDER BY f.family_id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
