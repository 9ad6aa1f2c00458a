//! Pipeline factories for the three queries the screens run.
//!
//! | Factory | Query | Fetch |
//! |---------|-------|-------|
//! | [`search_cocktails`] | `String` | `TippleRepository::search_cocktails` |
//! | [`get_cocktail`] | `i32` | `TippleRepository::get_cocktail_by_id` |
//! | [`cocktail_of_the_day`] | `()` | [`resolve_cocktail_of_the_day`] |

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use mockable::Clock;
use tracing::{debug, warn};

use tipple_core::{Cocktail, Resource, TippleRepository};

use crate::pipeline::QueryPipeline;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

pub type SearchPipeline = QueryPipeline<String, Vec<Cocktail>>;
pub type CocktailPipeline = QueryPipeline<i32, Cocktail>;
pub type CocktailOfTheDayPipeline = QueryPipeline<(), Cocktail>;

pub fn search_cocktails(repo: Arc<dyn TippleRepository>, debounce: Duration) -> SearchPipeline {
    QueryPipeline::spawn(debounce, move |query: String| {
        let repo = Arc::clone(&repo);
        async move { repo.search_cocktails(&query).await }
    })
}

pub fn get_cocktail(repo: Arc<dyn TippleRepository>, debounce: Duration) -> CocktailPipeline {
    QueryPipeline::spawn(debounce, move |id: i32| {
        let repo = Arc::clone(&repo);
        async move { repo.get_cocktail_by_id(id).await }
    })
}

/// Build the cocktail-of-the-day pipeline. Each trigger reads "today" from
/// `clock` at dispatch time, as a local calendar date.
pub fn cocktail_of_the_day(
    repo: Arc<dyn TippleRepository>,
    clock: Arc<dyn Clock + Send + Sync>,
    debounce: Duration,
) -> CocktailOfTheDayPipeline {
    QueryPipeline::spawn(debounce, move |()| {
        let repo = Arc::clone(&repo);
        let today = clock.local().date_naive();
        async move { resolve_cocktail_of_the_day(repo.as_ref(), today).await }
    })
}

/// Serve the cached cocktail of the day if it was picked on `today`,
/// otherwise pick a random one and cache it for `today`.
///
/// A failed random fetch is returned as-is and leaves the cache untouched.
/// A failed cache write is logged; the fetched cocktail is still returned.
pub async fn resolve_cocktail_of_the_day(
    repo: &dyn TippleRepository,
    today: NaiveDate,
) -> Resource<Cocktail> {
    let cached = *repo.cocktail_of_the_day().borrow();

    if let Some(entry) = cached.filter(|entry| entry.is_valid_on(today)) {
        debug!(id = entry.id, %today, "cocktail of the day cache hit");
        return repo.get_cocktail_by_id(entry.id).await;
    }

    debug!(%today, "cocktail of the day cache miss");
    let result = repo.get_random_cocktail().await;
    if let Resource::Success(cocktail) = &result {
        if let Err(e) = repo.save_cocktail_of_the_day(cocktail.id, today).await {
            warn!(error = %e, id = cocktail.id, "failed to cache cocktail of the day");
        }
    }
    result
}
