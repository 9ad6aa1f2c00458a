//! HTTP client for TheCocktailDB.
//!
//! Implements [`NetworkDataSource`] against three read-only endpoints:
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | `search_cocktails` | `GET search.php?s={name}` |
//! | `get_cocktails_by_id` | `GET lookup.php?i={id}` |
//! | `get_random_cocktail` | `GET random.php` |
//!
//! Every endpoint answers with the same `{"drinks": [...] | null}` envelope.
//! Bodies are decoded with `serde_json` directly so that a malformed payload
//! keeps its `serde_json::Error` in the error chain and is reported as a
//! deserialization failure rather than a transport one.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use tipple_core::network::{DrinksResponse, NetworkCocktail, NetworkDataSource};

use crate::config::ApiConfig;

pub struct CocktailDbClient {
    client: reqwest::Client,
    base_url: Url,
}

impl CocktailDbClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .with_context(|| format!("api.base_url is not a valid URL: {}", config.base_url))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    async fn fetch_drinks(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Vec<NetworkCocktail>> {
        let url = self.base_url.join(endpoint)?;
        debug!(%url, ?query, "catalog request");

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("TheCocktailDB error {}: {}", status, body_text);
        }

        let body = response.text().await?;
        let envelope: DrinksResponse = serde_json::from_str(&body)
            .with_context(|| format!("Failed to decode {} response", endpoint))?;
        let drinks = envelope.into_drinks();
        debug!(endpoint, count = drinks.len(), "catalog response");
        Ok(drinks)
    }
}

#[async_trait]
impl NetworkDataSource for CocktailDbClient {
    async fn search_cocktails(&self, name: &str) -> Result<Vec<NetworkCocktail>> {
        self.fetch_drinks("search.php", &[("s", name.to_string())]).await
    }

    async fn get_cocktails_by_id(&self, id: i32) -> Result<Vec<NetworkCocktail>> {
        self.fetch_drinks("lookup.php", &[("i", id.to_string())]).await
    }

    async fn get_random_cocktail(&self) -> Result<Vec<NetworkCocktail>> {
        self.fetch_drinks("random.php", &[]).await
    }
}
