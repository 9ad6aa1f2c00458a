//! Remote catalog records and the [`NetworkDataSource`] abstraction.
//!
//! TheCocktailDB returns drinks as flat JSON objects where every field is
//! optional and ingredients are spread over fifteen numbered
//! `strIngredientN` / `strMeasureN` pairs. [`NetworkCocktail`] captures that
//! shape verbatim; [`NetworkCocktail::to_cocktail`] normalizes it into the
//! domain [`Cocktail`].

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::Cocktail;

/// Number of ingredient/measure slots in a catalog record.
pub const INGREDIENT_SLOTS: usize = 15;

/// Read-only access to the remote cocktail catalog.
///
/// Lookups return collections because the API does: `lookup.php` and
/// `random.php` wrap their single drink in the same `drinks` array as
/// `search.php`. Picking the first element is the repository's job.
#[async_trait]
pub trait NetworkDataSource: Send + Sync {
    /// Find drinks whose name contains `name`.
    async fn search_cocktails(&self, name: &str) -> Result<Vec<NetworkCocktail>>;

    /// Look up drinks by catalog id.
    async fn get_cocktails_by_id(&self, id: i32) -> Result<Vec<NetworkCocktail>>;

    /// Fetch one random drink.
    async fn get_random_cocktail(&self) -> Result<Vec<NetworkCocktail>>;
}

/// Envelope shared by every catalog endpoint.
///
/// `drinks` is `null` (or missing) when nothing matched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrinksResponse {
    #[serde(default)]
    pub drinks: Option<Vec<NetworkCocktail>>,
}

impl DrinksResponse {
    pub fn into_drinks(self) -> Vec<NetworkCocktail> {
        self.drinks.unwrap_or_default()
    }
}

/// A drink exactly as the catalog API describes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct NetworkCocktail {
    pub id: i32,
    pub name: Option<String>,
    pub category: Option<String>,
    pub generation: Option<String>,
    pub kind: Option<String>,
    pub glass: Option<String>,
    pub instructions: Option<String>,
    pub image: Option<String>,
    pub ingredients: [Option<String>; INGREDIENT_SLOTS],
    pub measures: [Option<String>; INGREDIENT_SLOTS],
}

impl TryFrom<Map<String, Value>> for NetworkCocktail {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let text = |key: &str| match fields.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        };

        let id = match fields.get("idDrink") {
            None | Some(Value::Null) => 0,
            Some(Value::String(s)) => s
                .trim()
                .parse::<i32>()
                .map_err(|e| format!("invalid idDrink {s:?}: {e}"))?,
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| format!("invalid idDrink {n}"))?,
            Some(other) => return Err(format!("invalid idDrink {other}")),
        };

        let ingredients = std::array::from_fn(|i| text(&format!("strIngredient{}", i + 1)));
        let measures = std::array::from_fn(|i| text(&format!("strMeasure{}", i + 1)));

        Ok(Self {
            id,
            name: text("strDrink"),
            category: text("strCategory"),
            generation: text("strIBA"),
            kind: text("strAlcoholic"),
            glass: text("strGlass"),
            instructions: text("strInstructions"),
            image: text("strDrinkThumb"),
            ingredients,
            measures,
        })
    }
}

impl NetworkCocktail {
    /// Normalize into the domain record.
    ///
    /// Missing text fields become empty strings. The favourite flag is left
    /// unset; it is not part of the remote record.
    pub fn to_cocktail(&self) -> Cocktail {
        let image = self.image.clone().unwrap_or_default();
        Cocktail {
            id: self.id,
            name: self.name.clone().unwrap_or_default(),
            ingredients: self.ingredient_descriptions(),
            instructions: self.instructions.clone().unwrap_or_default(),
            thumbnail: image.clone(),
            image,
            generation: self.generation.clone(),
            kind: self.kind.clone().unwrap_or_default(),
            serving_glass: self.glass.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
            is_favourite: false,
        }
    }

    /// Join each present ingredient with its measure, in slot order.
    ///
    /// Slots without an ingredient name are skipped entirely; a missing
    /// measure leaves just the name.
    pub fn ingredient_descriptions(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .zip(self.measures.iter())
            .filter_map(|(ingredient, measure)| {
                let name = ingredient.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
                let measure = measure.as_deref().map(str::trim).unwrap_or_default();
                Some(format!("{name} {measure}").trim().to_string())
            })
            .collect()
    }
}
