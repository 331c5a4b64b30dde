use anyhow::Context;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("connect to database")?;
    Ok(pool)
}

/// Create-if-absent schema setup, run once at startup.
pub async fn init_schema(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            company TEXT NOT NULL,
            age INTEGER NOT NULL,
            dob TEXT NOT NULL,
            profile_image TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(db)
    .await
    .context("create users table")?;

    // No FK on user_id: deleting an account leaves its challenge rows
    // behind, and the verification join simply stops matching them.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS otp_challenges (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            code TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(db)
    .await
    .context("create otp_challenges table")?;

    Ok(())
}
