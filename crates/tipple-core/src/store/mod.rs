//! Local storage abstraction for Tipple.
//!
//! The [`LocalStore`] trait covers the two pieces of state kept on the
//! device: the favourite id set and the cached cocktail of the day. Both are
//! push-based: readers hold a [`watch::Receiver`] that always exposes the
//! current value and wakes on every change, so any number of subscribers
//! share one copy of the state without re-reading the backend.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use std::collections::BTreeSet;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::watch;

use crate::models::CocktailOfTheDay;

/// Abstract local storage backend.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`favourite_ids`](LocalStore::favourite_ids) | Observe the favourite id set |
/// | [`insert_favourite`](LocalStore::insert_favourite) | Add an id (no-op if present) |
/// | [`delete_favourite`](LocalStore::delete_favourite) | Remove an id (no-op if absent) |
/// | [`cocktail_of_the_day`](LocalStore::cocktail_of_the_day) | Observe the cached day entry |
/// | [`save_cocktail_of_the_day`](LocalStore::save_cocktail_of_the_day) | Replace the cached day entry |
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Subscribe to the favourite id set.
    fn favourite_ids(&self) -> watch::Receiver<BTreeSet<i32>>;

    /// Mark `id` as a favourite. Inserting a present id changes nothing.
    async fn insert_favourite(&self, id: i32) -> Result<()>;

    /// Unmark `id`. Deleting an absent id changes nothing.
    async fn delete_favourite(&self, id: i32) -> Result<()>;

    /// Subscribe to the cached cocktail of the day, if any.
    ///
    /// The entry is returned regardless of its date; callers decide
    /// whether it is still valid.
    fn cocktail_of_the_day(&self) -> watch::Receiver<Option<CocktailOfTheDay>>;

    /// Overwrite the cached cocktail of the day.
    async fn save_cocktail_of_the_day(&self, entry: CocktailOfTheDay) -> Result<()>;
}
