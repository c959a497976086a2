use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// One monthly ledger row. The `(family_id, month)` unique constraint makes
/// "at most one entry per month" a schema guarantee, so every write path
/// below is an upsert keyed on the month.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaxEntry {
    pub id: Uuid,
    pub family_id: Uuid,
    pub month: String,
    pub amount: f64,
    pub paid: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
struct UpsertRow {
    id: Uuid,
    family_id: Uuid,
    month: String,
    amount: f64,
    paid: bool,
    created_at: OffsetDateTime,
    inserted: bool,
}

#[derive(Debug)]
pub struct UpsertOutcome {
    pub entry: TaxEntry,
    /// True when a new month row was appended rather than overwritten.
    pub created: bool,
}

impl From<UpsertRow> for UpsertOutcome {
    fn from(row: UpsertRow) -> Self {
        Self {
            entry: TaxEntry {
                id: row.id,
                family_id: row.family_id,
                month: row.month,
                amount: row.amount,
                paid: row.paid,
                created_at: row.created_at,
            },
            created: row.inserted,
        }
    }
}

impl TaxEntry {
    /// Insert-or-update the family's entry for `month`. `amount` is always
    /// overwritten; `paid` only when explicitly supplied (defaults to false
    /// on insert).
    pub async fn upsert(
        db: &PgPool,
        family_id: Uuid,
        month: &str,
        amount: f64,
        paid: Option<bool>,
    ) -> anyhow::Result<UpsertOutcome> {
        let row = sqlx::query_as::<_, UpsertRow>(
            r#"
            INSERT INTO tax_entries (family_id, month, amount, paid)
            VALUES ($1, $2, $3, COALESCE($4, FALSE))
            ON CONFLICT (family_id, month)
            DO UPDATE SET amount = EXCLUDED.amount,
                          paid = COALESCE($4, tax_entries.paid)
            RETURNING id, family_id, month, amount, paid, created_at,
                      (xmax = 0) AS inserted
            "#,
        )
        .bind(family_id)
        .bind(month)
        .bind(amount)
        .bind(paid)
        .fetch_one(db)
        .await?;
        Ok(row.into())
    }

    /// Upsert scoped to the paid flag: `paid` is always written, `amount`
    /// only when supplied (defaults to 0 when the month row is created).
    pub async fn mark_paid(
        db: &PgPool,
        family_id: Uuid,
        month: &str,
        paid: bool,
        amount: Option<f64>,
    ) -> anyhow::Result<TaxEntry> {
        let entry = sqlx::query_as::<_, TaxEntry>(
            r#"
            INSERT INTO tax_entries (family_id, month, amount, paid)
            VALUES ($1, $2, COALESCE($3, 0), $4)
            ON CONFLICT (family_id, month)
            DO UPDATE SET paid = $4,
                          amount = COALESCE($3, tax_entries.amount)
            RETURNING id, family_id, month, amount, paid, created_at
            "#,
        )
        .bind(family_id)
        .bind(month)
        .bind(amount)
        .bind(paid)
        .fetch_one(db)
        .await?;
        Ok(entry)
    }

    /// Remove one entry by id, scoped to the owning family.
    pub async fn delete(db: &PgPool, family_id: Uuid, tax_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM tax_entries
            WHERE id = $1 AND family_id = $2
            "#,
        )
        .bind(tax_id)
        .bind(family_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_family(db: &PgPool, family_id: Uuid) -> anyhow::Result<Vec<TaxEntry>> {
        let rows = sqlx::query_as::<_, TaxEntry>(
            r#"
            SELECT id, family_id, month, amount, paid, created_at
            FROM tax_entries
            WHERE family_id = $1
            ORDER BY month ASC
            "#,
        )
        .bind(family_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<TaxEntry>> {
        let rows = sqlx::query_as::<_, TaxEntry>(
            r#"
            SELECT id, family_id, month, amount, paid, created_at
            FROM tax_entries
            ORDER BY family_id, month ASC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Sum of paid amounts across all families for one month. Unpaid entries
    /// are excluded.
    pub async fn total_paid_for_month(db: &PgPool, month: &str) -> anyhow::Result<f64> {
        let total = sqlx::query_scalar::<_, f64>(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM tax_entries
            WHERE month = $1 AND paid
            "#,
        )
        .bind(month)
        .fetch_one(db)
        .await?;
        Ok(total)
    }
}
