//! Composition root: wires configuration, storage, and the HTTP client into
//! a repository and hands out screen state holders.

use std::sync::Arc;

use anyhow::Result;
use mockable::{Clock, DefaultClock};
use tracing::info;

use tipple_core::{Repository, TippleRepository};

use crate::cocktaildb::CocktailDbClient;
use crate::config::Config;
use crate::db;
use crate::details::CocktailDetails;
use crate::migrate;
use crate::search::SearchCocktails;
use crate::sqlite_store::SqliteStore;

pub type AppRepository = Repository<CocktailDbClient, SqliteStore>;

pub struct App {
    config: Config,
    repository: Arc<AppRepository>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl App {
    /// Connect to the database, bring the schema up to date, and build the
    /// repository.
    pub async fn open(config: Config) -> Result<Self> {
        let pool = db::connect(&config).await?;
        migrate::run_migrations(&pool).await?;
        let store = SqliteStore::open(pool).await?;
        let client = CocktailDbClient::new(&config.api)?;
        info!(db = %config.db.path.display(), api = %config.api.base_url, "tipple ready");

        Ok(Self {
            repository: Arc::new(Repository::new(client, store)),
            clock: Arc::new(DefaultClock),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> Arc<dyn TippleRepository> {
        self.repository.clone()
    }

    pub fn search_screen(&self) -> SearchCocktails {
        SearchCocktails::new(
            self.repository(),
            Arc::clone(&self.clock),
            self.config.pipeline.debounce(),
        )
    }

    pub fn details_screen(&self, id: i32) -> CocktailDetails {
        CocktailDetails::new(self.repository(), id, self.config.pipeline.debounce())
    }
}
