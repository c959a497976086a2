//! Seeds a development database with one admin and two sample families.
//! Destructive: clears existing admins and families first.

use sqlx::postgres::PgPoolOptions;
use village_portal::auth::password::hash_password;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "village_portal=info".into()),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL")?;
    let db = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&db).await?;

    sqlx::query("TRUNCATE families, admins CASCADE")
        .execute(&db)
        .await?;

    let admin_hash = hash_password("admin123")?;
    sqlx::query(
        r#"
        INSERT INTO admins (username, password_hash, role)
        VALUES ($1, $2, 'superadmin')
        "#,
    )
    .bind("admin1")
    .bind(&admin_hash)
    .execute(&db)
    .await?;

    let family_hash = hash_password("family123")?;
    let families = [
        (
            "FAM001",
            "Ravi Kumar",
            vec!["Ravi Kumar", "Anita", "Arjun"],
            "12 Main Street, Udaikulam",
            "ravi.family@example.com",
            "9876543210",
        ),
        (
            "FAM002",
            "Priya Devi",
            vec!["Priya Devi", "Sanjay", "Divya"],
            "45 Lake Road, Udaikulam",
            "priya.family@example.com",
            "9876501234",
        ),
    ];

    for (family_id, leader, members, address, email, phone) in families {
        let members: Vec<String> = members.into_iter().map(String::from).collect();
        sqlx::query(
            r#"
            INSERT INTO families (family_id, password_hash, leader_name, members,
                                  address, email, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(family_id)
        .bind(&family_hash)
        .bind(leader)
        .bind(&members)
        .bind(address)
        .bind(email)
        .bind(phone)
        .execute(&db)
        .await?;
    }

    tracing::info!("database seeded");
    Ok(())
}
