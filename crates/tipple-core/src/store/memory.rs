//! In-memory [`LocalStore`] implementation.
//!
//! State lives directly in the `watch` senders; there is no backing store.

use std::collections::BTreeSet;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::watch;

use crate::models::CocktailOfTheDay;

use super::LocalStore;

/// In-memory store for tests and for hosts without SQLite.
pub struct InMemoryStore {
    favourites: watch::Sender<BTreeSet<i32>>,
    cocktail_of_the_day: watch::Sender<Option<CocktailOfTheDay>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_state(BTreeSet::new(), None)
    }

    /// Start from existing favourites and day entry.
    pub fn with_state(
        favourites: BTreeSet<i32>,
        cocktail_of_the_day: Option<CocktailOfTheDay>,
    ) -> Self {
        let (favourites, _) = watch::channel(favourites);
        let (cocktail_of_the_day, _) = watch::channel(cocktail_of_the_day);
        Self {
            favourites,
            cocktail_of_the_day,
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocalStore for InMemoryStore {
    fn favourite_ids(&self) -> watch::Receiver<BTreeSet<i32>> {
        self.favourites.subscribe()
    }

    async fn insert_favourite(&self, id: i32) -> Result<()> {
        self.favourites.send_if_modified(|ids| ids.insert(id));
        Ok(())
    }

    async fn delete_favourite(&self, id: i32) -> Result<()> {
        self.favourites.send_if_modified(|ids| ids.remove(&id));
        Ok(())
    }

    fn cocktail_of_the_day(&self) -> watch::Receiver<Option<CocktailOfTheDay>> {
        self.cocktail_of_the_day.subscribe()
    }

    async fn save_cocktail_of_the_day(&self, entry: CocktailOfTheDay) -> Result<()> {
        self.cocktail_of_the_day.send_replace(Some(entry));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_insert_is_idempotent() {
        let store = InMemoryStore::new();
        let mut ids = store.favourite_ids();

        store.insert_favourite(3).await.unwrap();
        assert!(ids.has_changed().unwrap());
        ids.borrow_and_update();

        store.insert_favourite(3).await.unwrap();
        assert!(!ids.has_changed().unwrap());
        assert_eq!(*ids.borrow(), BTreeSet::from([3]));
    }

    #[tokio::test]
    async fn test_delete_absent_is_noop() {
        let store = InMemoryStore::with_state(BTreeSet::from([1]), None);
        let ids = store.favourite_ids();

        store.delete_favourite(2).await.unwrap();
        assert!(!ids.has_changed().unwrap());
        assert_eq!(*ids.borrow(), BTreeSet::from([1]));

        store.delete_favourite(1).await.unwrap();
        assert!(ids.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_save_overwrites_day_entry() {
        let store = InMemoryStore::new();
        let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();

        store
            .save_cocktail_of_the_day(CocktailOfTheDay { id: 1, date: day(1) })
            .await
            .unwrap();
        store
            .save_cocktail_of_the_day(CocktailOfTheDay { id: 2, date: day(2) })
            .await
            .unwrap();

        assert_eq!(
            *store.cocktail_of_the_day().borrow(),
            Some(CocktailOfTheDay { id: 2, date: day(2) })
        );
    }
}
