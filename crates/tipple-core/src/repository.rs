//! Repository facade over the remote catalog and the local store.
//!
//! [`TippleRepository`] is the single dependency of every use case and
//! presentation state holder. Remote calls never fail: whatever goes wrong
//! (transport, decoding, an empty lookup) comes back as
//! [`Resource::Error`]. Local reads are forwarded as observables and local
//! writes are awaited before returning.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::{BoxStream, StreamExt};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::error::TippleError;
use crate::models::{Cocktail, CocktailOfTheDay};
use crate::network::{NetworkCocktail, NetworkDataSource};
use crate::resource::Resource;
use crate::store::LocalStore;

/// Data access used by the pipelines and state holders.
#[async_trait]
pub trait TippleRepository: Send + Sync {
    /// Search the catalog by name. Blank text is forwarded unchanged.
    async fn search_cocktails(&self, name: &str) -> Resource<Vec<Cocktail>>;

    /// Fetch one cocktail; `Error(Empty)` when the id is unknown.
    async fn get_cocktail_by_id(&self, id: i32) -> Resource<Cocktail>;

    /// Fetch a random cocktail.
    async fn get_random_cocktail(&self) -> Resource<Cocktail>;

    /// Subscribe to the favourite id set.
    fn favourite_ids(&self) -> watch::Receiver<BTreeSet<i32>>;

    /// Whether `id` is a favourite, now and on every later change.
    fn observe_favourite(&self, id: i32) -> BoxStream<'static, bool> {
        WatchStream::new(self.favourite_ids())
            .map(move |ids| ids.contains(&id))
            .boxed()
    }

    async fn add_favourite(&self, id: i32) -> Result<(), TippleError>;

    async fn remove_favourite(&self, id: i32) -> Result<(), TippleError>;

    /// Subscribe to the cached cocktail of the day, whatever its date.
    fn cocktail_of_the_day(&self) -> watch::Receiver<Option<CocktailOfTheDay>>;

    /// Record `id` as the cocktail of the day for `date`.
    async fn save_cocktail_of_the_day(&self, id: i32, date: NaiveDate) -> Result<(), TippleError>;
}

/// Default [`TippleRepository`] backed by a [`NetworkDataSource`] and a
/// [`LocalStore`].
pub struct Repository<N, L> {
    network: N,
    local: L,
}

impl<N, L> Repository<N, L>
where
    N: NetworkDataSource,
    L: LocalStore,
{
    pub fn new(network: N, local: L) -> Self {
        Self { network, local }
    }

    pub fn local(&self) -> &L {
        &self.local
    }
}

/// Take the first drink of a lookup response.
fn first_cocktail(drinks: Vec<NetworkCocktail>) -> Result<Cocktail, TippleError> {
    drinks
        .first()
        .map(NetworkCocktail::to_cocktail)
        .ok_or(TippleError::Empty("drink"))
}

fn network_result<T>(result: anyhow::Result<T>) -> Result<T, TippleError> {
    result.map_err(|err| TippleError::from_network(&err))
}

fn local_result(result: anyhow::Result<()>) -> Result<(), TippleError> {
    result.map_err(|err| TippleError::from_local(&err))
}

#[async_trait]
impl<N, L> TippleRepository for Repository<N, L>
where
    N: NetworkDataSource,
    L: LocalStore,
{
    async fn search_cocktails(&self, name: &str) -> Resource<Vec<Cocktail>> {
        network_result(self.network.search_cocktails(name).await)
            .map(|drinks| drinks.iter().map(NetworkCocktail::to_cocktail).collect::<Vec<_>>())
            .into()
    }

    async fn get_cocktail_by_id(&self, id: i32) -> Resource<Cocktail> {
        network_result(self.network.get_cocktails_by_id(id).await)
            .and_then(first_cocktail)
            .into()
    }

    async fn get_random_cocktail(&self) -> Resource<Cocktail> {
        network_result(self.network.get_random_cocktail().await)
            .and_then(first_cocktail)
            .into()
    }

    fn favourite_ids(&self) -> watch::Receiver<BTreeSet<i32>> {
        self.local.favourite_ids()
    }

    async fn add_favourite(&self, id: i32) -> Result<(), TippleError> {
        local_result(self.local.insert_favourite(id).await)
    }

    async fn remove_favourite(&self, id: i32) -> Result<(), TippleError> {
        local_result(self.local.delete_favourite(id).await)
    }

    fn cocktail_of_the_day(&self) -> watch::Receiver<Option<CocktailOfTheDay>> {
        self.local.cocktail_of_the_day()
    }

    async fn save_cocktail_of_the_day(&self, id: i32, date: NaiveDate) -> Result<(), TippleError> {
        local_result(
            self.local
                .save_cocktail_of_the_day(CocktailOfTheDay { id, date })
                .await,
        )
    }
}
