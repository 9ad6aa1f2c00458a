//! # Tipple
//!
//! Search TheCocktailDB, keep a list of favourites, and get a cocktail of
//! the day.
//!
//! Tipple wires the runtime-agnostic pieces of [`tipple_core`] to a real
//! HTTP client, a SQLite store, and a tokio runtime, and exposes the two
//! screens of the app as state holders that publish through
//! `tokio::sync::watch`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Screen state │──▶│QueryPipeline │──▶│  Repository  │
//! └──────▲───────┘   └──────────────┘   └──┬────────┬──┘
//!        │                                 ▼        ▼
//!        │ favourites              ┌──────────┐ ┌──────────┐
//!        └─────────────────────────│  SQLite  │ │CocktailDB│
//!                                  └──────────┘ └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! tipple init                    # create database
//! tipple today                   # cocktail of the day
//! tipple search margarita        # search by name
//! tipple favourite 11007         # toggle a favourite
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | Favourites and day cache in SQLite |
//! | [`cocktaildb`] | TheCocktailDB HTTP client |
//! | [`pipeline`] | Debounced latest-wins query pipeline |
//! | [`usecases`] | Pipelines for search, lookup, and cocktail of the day |
//! | [`search`] | Search screen state |
//! | [`details`] | Details screen state |
//! | [`app`] | Composition root |

pub mod app;
pub mod cocktaildb;
pub mod config;
pub mod db;
pub mod details;
pub mod migrate;
pub mod pipeline;
pub mod search;
pub mod sqlite_store;
pub mod usecases;
