//! Search screen state holder.
//!
//! [`SearchCocktails`] owns the search pipeline and the cocktail-of-the-day
//! pipeline, reconciles both with the favourite set, and publishes a single
//! [`SearchCocktailsState`]. The cocktail of the day is requested as soon as
//! the holder is created, so the first state is already loading.
//!
//! `is_loading` is true while either pipeline has a submission whose fetch
//! has not settled yet.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use tipple_core::reconcile::{CatalogView, FavouriteToggle};
use tipple_core::TippleRepository;

use crate::usecases::{self, CocktailOfTheDayPipeline, SearchPipeline};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCocktailsState {
    pub search_query: String,
    pub is_loading: bool,
    pub catalog: CatalogView,
}

impl SearchCocktailsState {
    /// The screen shows the cocktail of the day instead of search results
    /// while the query is blank.
    pub fn is_cocktail_of_the_day(&self) -> bool {
        self.search_query.trim().is_empty()
    }
}

impl Default for SearchCocktailsState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            is_loading: true,
            catalog: CatalogView::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCocktailsAction {
    Search(String),
    Retry,
    OpenCocktail(i32),
    FavouriteToggle(i32),
}

struct Inner {
    repo: Arc<dyn TippleRepository>,
    search: SearchPipeline,
    cocktail_of_the_day: CocktailOfTheDayPipeline,
    awaited_search: AtomicU64,
    awaited_cocktail_of_the_day: AtomicU64,
    favourites: watch::Receiver<BTreeSet<i32>>,
    state: watch::Sender<SearchCocktailsState>,
}

impl Inner {
    fn is_loading(&self) -> bool {
        let search_settled = *self.search.settled().borrow();
        let day_settled = *self.cocktail_of_the_day.settled().borrow();
        search_settled < self.awaited_search.load(Ordering::SeqCst)
            || day_settled < self.awaited_cocktail_of_the_day.load(Ordering::SeqCst)
    }

    /// Apply `update`, re-annotate, recompute the loading flag, and notify
    /// subscribers if anything changed.
    fn publish(&self, update: impl FnOnce(&mut SearchCocktailsState)) {
        let favourites = self.favourites.borrow().clone();
        self.state.send_if_modified(|state| {
            let before = state.clone();
            update(state);
            state.catalog.annotate(&favourites);
            state.is_loading = self.is_loading();
            *state != before
        });
    }

    fn trigger_cocktail_of_the_day(&self) {
        let ticket = self.cocktail_of_the_day.submit(());
        self.awaited_cocktail_of_the_day.store(ticket, Ordering::SeqCst);
    }
}

pub struct SearchCocktails {
    inner: Arc<Inner>,
    driver: JoinHandle<()>,
}

impl SearchCocktails {
    /// Create the holder and request the cocktail of the day.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        repo: Arc<dyn TippleRepository>,
        clock: Arc<dyn Clock + Send + Sync>,
        debounce: Duration,
    ) -> Self {
        let search = usecases::search_cocktails(Arc::clone(&repo), debounce);
        let cocktail_of_the_day =
            usecases::cocktail_of_the_day(Arc::clone(&repo), clock, debounce);
        let favourites = repo.favourite_ids();
        let (state, _) = watch::channel(SearchCocktailsState::default());

        let inner = Arc::new(Inner {
            repo,
            search,
            cocktail_of_the_day,
            awaited_search: AtomicU64::new(0),
            awaited_cocktail_of_the_day: AtomicU64::new(0),
            favourites,
            state,
        });
        let search_settled = inner.search.settled();
        let day_settled = inner.cocktail_of_the_day.settled();
        let favourites = inner.favourites.clone();
        inner.trigger_cocktail_of_the_day();

        let driver = tokio::spawn(drive(
            Arc::clone(&inner),
            search_settled,
            day_settled,
            favourites,
        ));
        Self { inner, driver }
    }

    pub fn state(&self) -> watch::Receiver<SearchCocktailsState> {
        self.inner.state.subscribe()
    }

    pub fn current(&self) -> SearchCocktailsState {
        self.inner.state.borrow().clone()
    }

    pub fn dispatch(&self, action: SearchCocktailsAction) {
        match action {
            SearchCocktailsAction::Search(query) => self.search(query),
            SearchCocktailsAction::Retry => self.retry(),
            SearchCocktailsAction::OpenCocktail(id) => debug!(id, "open cocktail"),
            SearchCocktailsAction::FavouriteToggle(id) => self.toggle_favourite(id),
        }
    }

    fn search(&self, query: String) {
        let ticket = self.inner.search.submit(query.clone());
        self.inner.awaited_search.store(ticket, Ordering::SeqCst);
        self.inner.publish(|state| {
            state.search_query = query;
            state.catalog.has_cocktails_error = false;
        });
    }

    /// Re-run the current query, and the cocktail of the day if it failed.
    fn retry(&self) {
        let query = self.inner.state.borrow().search_query.clone();
        self.search(query);

        if self.inner.state.borrow().catalog.has_cocktail_of_the_day_error {
            self.inner.trigger_cocktail_of_the_day();
            self.inner
                .publish(|state| state.catalog.has_cocktail_of_the_day_error = false);
        }
    }

    /// Flip the favourite flag of a rendered cocktail, searching the result
    /// list first and then the cocktail of the day.
    fn toggle_favourite(&self, id: i32) {
        let toggle = match self.inner.state.borrow().catalog.find(id) {
            Some(cocktail) => FavouriteToggle::for_cocktail(cocktail),
            None => {
                warn!(id, "favourite toggle for a cocktail not on screen");
                return;
            }
        };

        let repo = Arc::clone(&self.inner.repo);
        tokio::spawn(async move {
            let result = match toggle {
                FavouriteToggle::Add(id) => repo.add_favourite(id).await,
                FavouriteToggle::Remove(id) => repo.remove_favourite(id).await,
            };
            if let Err(e) = result {
                warn!(error = %e, id = toggle.id(), "favourite toggle failed");
            }
        });
    }
}

impl Drop for SearchCocktails {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive(
    inner: Arc<Inner>,
    mut search_settled: watch::Receiver<u64>,
    mut day_settled: watch::Receiver<u64>,
    mut favourites: watch::Receiver<BTreeSet<i32>>,
) {
    loop {
        tokio::select! {
            changed = search_settled.changed() => {
                if changed.is_err() {
                    break;
                }
                search_settled.borrow_and_update();
                let result = inner.search.latest();
                inner.publish(|state| {
                    if let Some(result) = &result {
                        state.catalog.apply_search(result);
                    }
                });
            }

            changed = day_settled.changed() => {
                if changed.is_err() {
                    break;
                }
                day_settled.borrow_and_update();
                let result = inner.cocktail_of_the_day.latest();
                inner.publish(|state| {
                    if let Some(result) = &result {
                        state.catalog.apply_cocktail_of_the_day(result);
                    }
                });
            }

            changed = favourites.changed() => {
                if changed.is_err() {
                    break;
                }
                favourites.borrow_and_update();
                inner.publish(|_| {});
            }
        }
    }
}
