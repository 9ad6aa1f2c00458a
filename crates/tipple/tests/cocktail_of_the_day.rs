//! Tests for the cocktail-of-the-day caching policy.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tipple::usecases::{self, resolve_cocktail_of_the_day};
use tipple_core::{CocktailOfTheDay, Resource, TippleRepository};

use common::{cocktail, date, offline, FakeRepository, FixedClock};

#[tokio::test]
async fn test_cached_entry_for_today_skips_random() {
    let repo = FakeRepository::new();
    let today = date(2024, 6, 1);
    repo.set_cocktail_of_the_day(Some(CocktailOfTheDay { id: 11007, date: today }));
    repo.on_lookup(11007, Resource::Success(cocktail(11007, "Margarita")));

    let result = resolve_cocktail_of_the_day(&repo, today).await;

    assert_eq!(result, Resource::Success(cocktail(11007, "Margarita")));
    assert_eq!(repo.random_calls(), 0);
    assert_eq!(*repo.lookups.lock().unwrap(), vec![11007]);
    assert!(repo.saves.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_stale_entry_is_replaced() {
    let repo = FakeRepository::new();
    repo.set_cocktail_of_the_day(Some(CocktailOfTheDay {
        id: 11007,
        date: date(2024, 5, 31),
    }));
    repo.on_random(Resource::Success(cocktail(17222, "A1")));

    let result = resolve_cocktail_of_the_day(&repo, date(2024, 6, 1)).await;

    assert_eq!(result, Resource::Success(cocktail(17222, "A1")));
    assert_eq!(repo.random_calls(), 1);
    assert!(repo.lookups.lock().unwrap().is_empty());
    assert_eq!(
        *repo.cocktail_of_the_day().borrow(),
        Some(CocktailOfTheDay {
            id: 17222,
            date: date(2024, 6, 1)
        })
    );
}

#[tokio::test]
async fn test_empty_cache_fetches_random_and_saves() {
    let repo = FakeRepository::new();
    repo.on_random(Resource::Success(cocktail(1, "Mojito")));

    resolve_cocktail_of_the_day(&repo, date(2024, 6, 1)).await;

    assert_eq!(
        *repo.saves.lock().unwrap(),
        vec![CocktailOfTheDay {
            id: 1,
            date: date(2024, 6, 1)
        }]
    );
}

#[tokio::test]
async fn test_failed_random_leaves_cache_untouched() {
    let repo = FakeRepository::new();
    let yesterday = CocktailOfTheDay {
        id: 11007,
        date: date(2024, 5, 31),
    };
    repo.set_cocktail_of_the_day(Some(yesterday));
    repo.on_random(Resource::Error(offline()));

    let result = resolve_cocktail_of_the_day(&repo, date(2024, 6, 1)).await;

    assert_eq!(result, Resource::Error(offline()));
    assert!(repo.saves.lock().unwrap().is_empty());
    assert_eq!(*repo.cocktail_of_the_day().borrow(), Some(yesterday));
}

#[tokio::test]
async fn test_failed_save_still_returns_cocktail() {
    let repo = FakeRepository::new();
    repo.on_random(Resource::Success(cocktail(1, "Mojito")));
    repo.fail_local_writes();

    let result = resolve_cocktail_of_the_day(&repo, date(2024, 6, 1)).await;

    assert_eq!(result, Resource::Success(cocktail(1, "Mojito")));
    assert_eq!(*repo.cocktail_of_the_day().borrow(), None);
}

#[tokio::test(start_paused = true)]
async fn test_pipeline_reads_today_from_clock() {
    let repo = Arc::new(FakeRepository::new());
    repo.on_random(Resource::Success(cocktail(1, "Mojito")));
    repo.on_lookup(1, Resource::Success(cocktail(1, "Mojito")));
    let clock = Arc::new(FixedClock::on(date(2024, 6, 1)));

    let pipeline = usecases::cocktail_of_the_day(
        repo.clone(),
        clock.clone(),
        Duration::from_millis(10),
    );

    pipeline.submit(());
    pipeline.settled().wait_for(|t| *t == 1).await.unwrap();
    assert_eq!(repo.random_calls(), 1);

    // Same day: served from the cache.
    pipeline.submit(());
    pipeline.settled().wait_for(|t| *t == 2).await.unwrap();
    assert_eq!(repo.random_calls(), 1);
    assert_eq!(*repo.lookups.lock().unwrap(), vec![1]);

    // Past midnight: a new pick.
    clock.set(date(2024, 6, 2));
    repo.on_random(Resource::Success(cocktail(2, "Negroni")));
    pipeline.submit(());
    pipeline.settled().wait_for(|t| *t == 3).await.unwrap();

    assert_eq!(repo.random_calls(), 2);
    assert_eq!(pipeline.latest(), Some(Resource::Success(cocktail(2, "Negroni"))));
    assert_eq!(
        repo.cocktail_of_the_day().borrow().map(|e| e.date),
        Some(date(2024, 6, 2))
    );
}
