//! # Tipple Core
//!
//! Shared, runtime-agnostic logic for Tipple: cocktail models, the
//! [`Resource`](resource::Resource) result envelope, data source traits,
//! the repository facade, and favourite reconciliation.
//!
//! This crate contains no network, filesystem, or async runtime
//! dependencies. Observable local state is published through
//! `tokio::sync::watch`, which needs no runtime to send or borrow.

pub mod error;
pub mod models;
pub mod network;
pub mod reconcile;
pub mod repository;
pub mod resource;
pub mod store;

pub use error::TippleError;
pub use models::{Cocktail, CocktailOfTheDay};
pub use repository::{Repository, TippleRepository};
pub use resource::Resource;
