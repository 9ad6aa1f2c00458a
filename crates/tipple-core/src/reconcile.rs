//! Favourite reconciliation.
//!
//! Catalog results arrive without a favourite flag; the favourite set lives
//! in the local store. [`CatalogView`] combines the latest search result, the
//! latest cocktail of the day, and the live favourite set into what a screen
//! renders. Each result slot carries its own error flag so that a failure in
//! one never blanks out a good value in the other.
//!
//! # Slot transitions
//!
//! | Incoming result | Payload | Error flag |
//! |-----------------|---------|------------|
//! | `Success(v)` | replaced by `v` | cleared |
//! | `Error(_)` | previous payload kept | set |
//! | `Loading` | previous payload kept | unchanged |
//!
//! Payloads are re-annotated against the favourite set on every change.

use std::collections::BTreeSet;

use crate::models::Cocktail;
use crate::resource::Resource;

/// Stamp `is_favourite` on a single cocktail.
pub fn annotate(cocktail: &mut Cocktail, favourites: &BTreeSet<i32>) {
    cocktail.is_favourite = favourites.contains(&cocktail.id);
}

pub fn annotate_all(cocktails: &mut [Cocktail], favourites: &BTreeSet<i32>) {
    for cocktail in cocktails {
        annotate(cocktail, favourites);
    }
}

/// Direction of a favourite toggle, decided from the current annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavouriteToggle {
    Add(i32),
    Remove(i32),
}

impl FavouriteToggle {
    /// Remove if currently a favourite, add otherwise.
    pub fn for_cocktail(cocktail: &Cocktail) -> Self {
        if cocktail.is_favourite {
            FavouriteToggle::Remove(cocktail.id)
        } else {
            FavouriteToggle::Add(cocktail.id)
        }
    }

    pub fn id(self) -> i32 {
        match self {
            FavouriteToggle::Add(id) | FavouriteToggle::Remove(id) => id,
        }
    }
}

/// Search results and cocktail of the day, annotated with favourites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogView {
    pub cocktails: Vec<Cocktail>,
    pub has_cocktails_error: bool,
    pub cocktail_of_the_day: Option<Cocktail>,
    pub has_cocktail_of_the_day_error: bool,
}

impl CatalogView {
    /// Build a view from scratch out of the three inputs.
    pub fn combine(
        search: Option<&Resource<Vec<Cocktail>>>,
        favourites: &BTreeSet<i32>,
        cocktail_of_the_day: Option<&Resource<Cocktail>>,
    ) -> Self {
        let mut view = Self::default();
        if let Some(result) = search {
            view.apply_search(result);
        }
        if let Some(result) = cocktail_of_the_day {
            view.apply_cocktail_of_the_day(result);
        }
        view.annotate(favourites);
        view
    }

    pub fn apply_search(&mut self, result: &Resource<Vec<Cocktail>>) {
        match result {
            Resource::Success(cocktails) => {
                self.cocktails = cocktails.clone();
                self.has_cocktails_error = false;
            }
            Resource::Error(_) => self.has_cocktails_error = true,
            Resource::Loading => {}
        }
    }

    pub fn apply_cocktail_of_the_day(&mut self, result: &Resource<Cocktail>) {
        match result {
            Resource::Success(cocktail) => {
                self.cocktail_of_the_day = Some(cocktail.clone());
                self.has_cocktail_of_the_day_error = false;
            }
            Resource::Error(_) => self.has_cocktail_of_the_day_error = true,
            Resource::Loading => {}
        }
    }

    /// Re-stamp every payload against `favourites`.
    pub fn annotate(&mut self, favourites: &BTreeSet<i32>) {
        annotate_all(&mut self.cocktails, favourites);
        if let Some(cocktail) = self.cocktail_of_the_day.as_mut() {
            annotate(cocktail, favourites);
        }
    }

    /// Find a rendered cocktail by id, search results first.
    pub fn find(&self, id: i32) -> Option<&Cocktail> {
        self.cocktails
            .iter()
            .find(|c| c.id == id)
            .or(self.cocktail_of_the_day.as_ref().filter(|c| c.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TippleError;

    fn cocktail(id: i32) -> Cocktail {
        Cocktail {
            id,
            name: format!("Cocktail {id}"),
            ingredients: vec![],
            instructions: String::new(),
            thumbnail: String::new(),
            image: String::new(),
            generation: None,
            kind: "Alcoholic".to_string(),
            serving_glass: String::new(),
            category: String::new(),
            is_favourite: false,
        }
    }

    #[test]
    fn test_search_result_is_annotated() {
        let view = CatalogView::combine(
            Some(&Resource::Success(vec![cocktail(1), cocktail(2)])),
            &BTreeSet::from([1]),
            None,
        );
        assert!(view.cocktails[0].is_favourite);
        assert!(!view.cocktails[1].is_favourite);
    }

    #[test]
    fn test_day_error_keeps_search_result() {
        let view = CatalogView::combine(
            Some(&Resource::Success(vec![cocktail(1)])),
            &BTreeSet::new(),
            Some(&Resource::Error(TippleError::Transport("offline".into()))),
        );
        assert_eq!(view.cocktails, vec![cocktail(1)]);
        assert!(!view.has_cocktails_error);
        assert!(view.has_cocktail_of_the_day_error);
        assert_eq!(view.cocktail_of_the_day, None);
    }

    #[test]
    fn test_search_error_keeps_previous_payload() {
        let mut view = CatalogView::default();
        view.apply_search(&Resource::Success(vec![cocktail(3)]));
        view.apply_search(&Resource::Error(TippleError::Empty("drink")));
        assert_eq!(view.cocktails, vec![cocktail(3)]);
        assert!(view.has_cocktails_error);

        view.apply_search(&Resource::Success(vec![]));
        assert!(view.cocktails.is_empty());
        assert!(!view.has_cocktails_error);
    }

    #[test]
    fn test_reannotate_on_favourite_change() {
        let mut view = CatalogView::default();
        view.apply_cocktail_of_the_day(&Resource::Success(cocktail(9)));
        view.annotate(&BTreeSet::from([9]));
        assert!(view.cocktail_of_the_day.as_ref().unwrap().is_favourite);

        view.annotate(&BTreeSet::new());
        assert!(!view.cocktail_of_the_day.as_ref().unwrap().is_favourite);
    }

    #[test]
    fn test_find_falls_back_to_day_item() {
        let mut view = CatalogView::default();
        view.apply_search(&Resource::Success(vec![cocktail(1)]));
        view.apply_cocktail_of_the_day(&Resource::Success(cocktail(2)));
        assert_eq!(view.find(1).map(|c| c.id), Some(1));
        assert_eq!(view.find(2).map(|c| c.id), Some(2));
        assert!(view.find(3).is_none());
    }

    #[test]
    fn test_toggle_direction_follows_annotation() {
        let mut c = cocktail(5);
        assert_eq!(FavouriteToggle::for_cocktail(&c), FavouriteToggle::Add(5));
        c.is_favourite = true;
        assert_eq!(FavouriteToggle::for_cocktail(&c), FavouriteToggle::Remove(5));
    }
}
