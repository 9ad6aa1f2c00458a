//! Details screen state holder.
//!
//! Fetches one cocktail by id and keeps its favourite flag in step with the
//! membership stream for that id.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{BoxStream, StreamExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use tipple_core::{Cocktail, Resource, TippleRepository};

use crate::usecases::{self, CocktailPipeline};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CocktailDetailsState {
    pub is_loading: bool,
    pub has_error: bool,
    pub cocktail: Option<Cocktail>,
}

impl Default for CocktailDetailsState {
    fn default() -> Self {
        Self {
            is_loading: true,
            has_error: false,
            cocktail: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CocktailDetailsAction {
    Retry,
    FavouriteToggle,
    GoBack,
}

struct Inner {
    repo: Arc<dyn TippleRepository>,
    id: i32,
    pipeline: CocktailPipeline,
    awaited: AtomicU64,
    state: watch::Sender<CocktailDetailsState>,
}

impl Inner {
    fn publish(&self, update: impl FnOnce(&mut CocktailDetailsState)) {
        self.state.send_if_modified(|state| {
            let before = state.clone();
            update(state);
            let settled = *self.pipeline.settled().borrow();
            state.is_loading = settled < self.awaited.load(Ordering::SeqCst);
            *state != before
        });
    }

    fn request(&self) {
        let ticket = self.pipeline.submit(self.id);
        self.awaited.store(ticket, Ordering::SeqCst);
        self.publish(|state| state.has_error = false);
    }
}

pub struct CocktailDetails {
    inner: Arc<Inner>,
    driver: JoinHandle<()>,
}

impl CocktailDetails {
    /// Create the holder and request cocktail `id`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(repo: Arc<dyn TippleRepository>, id: i32, debounce: Duration) -> Self {
        let pipeline = usecases::get_cocktail(Arc::clone(&repo), debounce);
        let membership = repo.observe_favourite(id);
        let (state, _) = watch::channel(CocktailDetailsState::default());

        let inner = Arc::new(Inner {
            repo,
            id,
            pipeline,
            awaited: AtomicU64::new(0),
            state,
        });
        let settled = inner.pipeline.settled();
        inner.request();

        let driver = tokio::spawn(drive(Arc::clone(&inner), settled, membership));
        Self { inner, driver }
    }

    pub fn id(&self) -> i32 {
        self.inner.id
    }

    pub fn state(&self) -> watch::Receiver<CocktailDetailsState> {
        self.inner.state.subscribe()
    }

    pub fn current(&self) -> CocktailDetailsState {
        self.inner.state.borrow().clone()
    }

    pub fn dispatch(&self, action: CocktailDetailsAction) {
        match action {
            CocktailDetailsAction::Retry => self.inner.request(),
            CocktailDetailsAction::FavouriteToggle => self.toggle_favourite(),
            CocktailDetailsAction::GoBack => debug!(id = self.inner.id, "leave details"),
        }
    }

    fn toggle_favourite(&self) {
        let is_favourite = match self.inner.state.borrow().cocktail.as_ref() {
            Some(cocktail) => cocktail.is_favourite,
            None => {
                debug!(id = self.inner.id, "favourite toggle before cocktail loaded");
                return;
            }
        };

        let repo = Arc::clone(&self.inner.repo);
        let id = self.inner.id;
        tokio::spawn(async move {
            let result = if is_favourite {
                repo.remove_favourite(id).await
            } else {
                repo.add_favourite(id).await
            };
            if let Err(e) = result {
                warn!(error = %e, id, "favourite toggle failed");
            }
        });
    }
}

impl Drop for CocktailDetails {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive(
    inner: Arc<Inner>,
    mut settled: watch::Receiver<u64>,
    mut membership: BoxStream<'static, bool>,
) {
    let mut is_favourite = inner.repo.favourite_ids().borrow().contains(&inner.id);

    loop {
        tokio::select! {
            changed = settled.changed() => {
                if changed.is_err() {
                    break;
                }
                settled.borrow_and_update();
                let result = inner.pipeline.latest();
                inner.publish(|state| match result {
                    Some(Resource::Success(cocktail)) => {
                        state.cocktail = Some(cocktail.with_favourite(is_favourite));
                        state.has_error = false;
                    }
                    Some(Resource::Error(_)) => state.has_error = true,
                    Some(Resource::Loading) | None => {}
                });
            }

            Some(flag) = membership.next() => {
                is_favourite = flag;
                inner.publish(|state| {
                    if let Some(cocktail) = state.cocktail.as_mut() {
                        cocktail.is_favourite = flag;
                    }
                });
            }
        }
    }
}
