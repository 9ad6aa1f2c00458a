//! Shared fixtures for the app crate's integration tests.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use tokio::sync::watch;

use tipple_core::{Cocktail, CocktailOfTheDay, Resource, TippleError, TippleRepository};

// ─── Fixtures ───────────────────────────────────────────────────────

pub fn cocktail(id: i32, name: &str) -> Cocktail {
    Cocktail {
        id,
        name: name.to_string(),
        ingredients: vec!["Rum 50ml".to_string()],
        instructions: "Stir.".to_string(),
        thumbnail: format!("https://example.com/{id}.jpg"),
        image: format!("https://example.com/{id}.jpg"),
        generation: None,
        kind: "Alcoholic".to_string(),
        serving_glass: "Highball glass".to_string(),
        category: "Cocktail".to_string(),
        is_favourite: false,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn offline() -> TippleError {
    TippleError::Transport("connection refused".to_string())
}

// ─── Clock ──────────────────────────────────────────────────────────

/// A clock frozen at noon local time on a given day.
pub struct FixedClock(Mutex<DateTime<Local>>);

impl FixedClock {
    pub fn on(day: NaiveDate) -> Self {
        Self(Mutex::new(Self::noon(day)))
    }

    pub fn set(&self, day: NaiveDate) {
        *self.0.lock().unwrap() = Self::noon(day);
    }

    fn noon(day: NaiveDate) -> DateTime<Local> {
        Local
            .from_local_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
            .single()
            .unwrap()
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        *self.0.lock().unwrap()
    }

    fn utc(&self) -> DateTime<Utc> {
        self.local().with_timezone(&Utc)
    }
}

// ─── Repository ─────────────────────────────────────────────────────

/// A scripted [`TippleRepository`] that records every call.
///
/// Unscripted searches succeed with no results; unscripted lookups fail
/// with `Empty`.
pub struct FakeRepository {
    search_replies: Mutex<HashMap<String, Resource<Vec<Cocktail>>>>,
    lookup_replies: Mutex<HashMap<i32, Resource<Cocktail>>>,
    random_reply: Mutex<Resource<Cocktail>>,
    fail_local_writes: AtomicBool,

    pub searches: Mutex<Vec<String>>,
    pub lookups: Mutex<Vec<i32>>,
    pub random_calls: AtomicUsize,
    pub adds: AtomicUsize,
    pub removes: AtomicUsize,
    pub saves: Mutex<Vec<CocktailOfTheDay>>,

    favourites: watch::Sender<BTreeSet<i32>>,
    cocktail_of_the_day: watch::Sender<Option<CocktailOfTheDay>>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self {
            search_replies: Mutex::new(HashMap::new()),
            lookup_replies: Mutex::new(HashMap::new()),
            random_reply: Mutex::new(Resource::Error(TippleError::Empty("drink"))),
            fail_local_writes: AtomicBool::new(false),
            searches: Mutex::new(Vec::new()),
            lookups: Mutex::new(Vec::new()),
            random_calls: AtomicUsize::new(0),
            adds: AtomicUsize::new(0),
            removes: AtomicUsize::new(0),
            saves: Mutex::new(Vec::new()),
            favourites: watch::channel(BTreeSet::new()).0,
            cocktail_of_the_day: watch::channel(None).0,
        }
    }

    pub fn on_search(&self, query: &str, reply: Resource<Vec<Cocktail>>) {
        self.search_replies
            .lock()
            .unwrap()
            .insert(query.to_string(), reply);
    }

    pub fn on_lookup(&self, id: i32, reply: Resource<Cocktail>) {
        self.lookup_replies.lock().unwrap().insert(id, reply);
    }

    pub fn on_random(&self, reply: Resource<Cocktail>) {
        *self.random_reply.lock().unwrap() = reply;
    }

    pub fn fail_local_writes(&self) {
        self.fail_local_writes.store(true, Ordering::SeqCst);
    }

    pub fn set_favourites(&self, ids: impl IntoIterator<Item = i32>) {
        self.favourites.send_replace(ids.into_iter().collect());
    }

    pub fn set_cocktail_of_the_day(&self, entry: Option<CocktailOfTheDay>) {
        self.cocktail_of_the_day.send_replace(entry);
    }

    pub fn random_calls(&self) -> usize {
        self.random_calls.load(Ordering::SeqCst)
    }

    fn local_write(&self) -> Result<(), TippleError> {
        if self.fail_local_writes.load(Ordering::SeqCst) {
            Err(TippleError::from_local(&anyhow!("disk I/O error")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TippleRepository for FakeRepository {
    async fn search_cocktails(&self, name: &str) -> Resource<Vec<Cocktail>> {
        self.searches.lock().unwrap().push(name.to_string());
        self.search_replies
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or(Resource::Success(vec![]))
    }

    async fn get_cocktail_by_id(&self, id: i32) -> Resource<Cocktail> {
        self.lookups.lock().unwrap().push(id);
        self.lookup_replies
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or(Resource::Error(TippleError::Empty("drink")))
    }

    async fn get_random_cocktail(&self) -> Resource<Cocktail> {
        self.random_calls.fetch_add(1, Ordering::SeqCst);
        self.random_reply.lock().unwrap().clone()
    }

    fn favourite_ids(&self) -> watch::Receiver<BTreeSet<i32>> {
        self.favourites.subscribe()
    }

    async fn add_favourite(&self, id: i32) -> Result<(), TippleError> {
        self.adds.fetch_add(1, Ordering::SeqCst);
        self.local_write()?;
        self.favourites.send_if_modified(|ids| ids.insert(id));
        Ok(())
    }

    async fn remove_favourite(&self, id: i32) -> Result<(), TippleError> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.local_write()?;
        self.favourites.send_if_modified(|ids| ids.remove(&id));
        Ok(())
    }

    fn cocktail_of_the_day(&self) -> watch::Receiver<Option<CocktailOfTheDay>> {
        self.cocktail_of_the_day.subscribe()
    }

    async fn save_cocktail_of_the_day(&self, id: i32, date: NaiveDate) -> Result<(), TippleError> {
        self.local_write()?;
        let entry = CocktailOfTheDay { id, date };
        self.saves.lock().unwrap().push(entry);
        self.cocktail_of_the_day.send_replace(Some(entry));
        Ok(())
    }
}
