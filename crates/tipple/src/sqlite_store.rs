//! SQLite-backed [`LocalStore`] implementation.
//!
//! Rows are the source of truth; the `watch` channels mirror them so that
//! subscribers never hit the database. The mirror is loaded once on
//! [`SqliteStore::open`] and updated after every successful write.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};
use tokio::sync::watch;
use tracing::debug;

use tipple_core::models::CocktailOfTheDay;
use tipple_core::store::LocalStore;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite implementation of the [`LocalStore`] trait.
///
/// Expects the schema created by [`run_migrations`](crate::migrate::run_migrations).
pub struct SqliteStore {
    pool: SqlitePool,
    favourites: watch::Sender<BTreeSet<i32>>,
    cocktail_of_the_day: watch::Sender<Option<CocktailOfTheDay>>,
}

impl SqliteStore {
    /// Load current state from `pool` and start publishing it.
    pub async fn open(pool: SqlitePool) -> Result<Self> {
        let favourites = load_favourites(&pool).await?;
        let cocktail_of_the_day = load_cocktail_of_the_day(&pool).await?;
        debug!(
            favourites = favourites.len(),
            has_cocktail_of_the_day = cocktail_of_the_day.is_some(),
            "opened sqlite store"
        );

        let (favourites, _) = watch::channel(favourites);
        let (cocktail_of_the_day, _) = watch::channel(cocktail_of_the_day);
        Ok(Self {
            pool,
            favourites,
            cocktail_of_the_day,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn load_favourites(pool: &SqlitePool) -> Result<BTreeSet<i32>> {
    let ids: Vec<i32> = sqlx::query_scalar("SELECT id FROM favourite_cocktails")
        .fetch_all(pool)
        .await?;
    Ok(ids.into_iter().collect())
}

async fn load_cocktail_of_the_day(pool: &SqlitePool) -> Result<Option<CocktailOfTheDay>> {
    let row = sqlx::query("SELECT cocktail_id, date FROM cocktail_of_the_day WHERE slot = 0")
        .fetch_optional(pool)
        .await?;

    let row = match row {
        Some(row) => row,
        None => return Ok(None),
    };

    let date: String = row.get("date");
    let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
        .with_context(|| format!("invalid cocktail_of_the_day.date: {}", date))?;

    Ok(Some(CocktailOfTheDay {
        id: row.get("cocktail_id"),
        date,
    }))
}

#[async_trait]
impl LocalStore for SqliteStore {
    fn favourite_ids(&self) -> watch::Receiver<BTreeSet<i32>> {
        self.favourites.subscribe()
    }

    async fn insert_favourite(&self, id: i32) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO favourite_cocktails (id) VALUES (?)")
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.favourites.send_if_modified(|ids| ids.insert(id));
        Ok(())
    }

    async fn delete_favourite(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM favourite_cocktails WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.favourites.send_if_modified(|ids| ids.remove(&id));
        Ok(())
    }

    fn cocktail_of_the_day(&self) -> watch::Receiver<Option<CocktailOfTheDay>> {
        self.cocktail_of_the_day.subscribe()
    }

    async fn save_cocktail_of_the_day(&self, entry: CocktailOfTheDay) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cocktail_of_the_day (slot, cocktail_id, date)
            VALUES (0, ?, ?)
            ON CONFLICT(slot) DO UPDATE SET
                cocktail_id = excluded.cocktail_id,
                date = excluded.date
            "#,
        )
        .bind(entry.id)
        .bind(entry.date.format(DATE_FORMAT).to_string())
        .execute(&self.pool)
        .await?;

        self.cocktail_of_the_day.send_replace(Some(entry));
        Ok(())
    }
}
