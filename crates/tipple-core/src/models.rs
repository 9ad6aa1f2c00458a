//! Core data models used throughout Tipple.
//!
//! These types represent the normalized cocktail records and the locally
//! cached cocktail of the day that flow from the data sources through the
//! repository to the presentation state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A normalized catalog record.
///
/// Everything except `is_favourite` comes from the remote catalog.
/// `is_favourite` defaults to `false` and is stamped in by
/// [`reconcile`](crate::reconcile) from the local favourite set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cocktail {
    /// Catalog identifier (`idDrink`).
    pub id: i32,
    pub name: String,
    /// Each entry is `"<ingredient> <measure>"`, in source slot order.
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub thumbnail: String,
    pub image: String,
    /// IBA era label, e.g. `"Contemporary Classics"`.
    pub generation: Option<String>,
    /// Alcoholic / non-alcoholic label.
    pub kind: String,
    pub serving_glass: String,
    pub category: String,
    #[serde(default)]
    pub is_favourite: bool,
}

impl Cocktail {
    /// Returns a copy with the favourite flag set to `is_favourite`.
    pub fn with_favourite(mut self, is_favourite: bool) -> Self {
        self.is_favourite = is_favourite;
        self
    }
}

/// The locally cached cocktail of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CocktailOfTheDay {
    pub id: i32,
    /// Calendar date the entry was written on.
    pub date: NaiveDate,
}

impl CocktailOfTheDay {
    /// An entry is only valid for the calendar date it was written on.
    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        self.date == today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cocktail_of_the_day_expires_at_midnight() {
        let entry = CocktailOfTheDay {
            id: 11007,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert!(entry.is_valid_on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(!entry.is_valid_on(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()));
        assert!(!entry.is_valid_on(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
    }
}
