use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Create the favourites and cocktail-of-the-day tables. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS favourite_cocktails (
            id INTEGER PRIMARY KEY
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Single-row table: the cached cocktail of the day.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cocktail_of_the_day (
            slot INTEGER PRIMARY KEY CHECK (slot = 0),
            cocktail_id INTEGER NOT NULL,
            date TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("database schema up to date");
    Ok(())
}
