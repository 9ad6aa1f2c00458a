//! # Tipple CLI (`tipple`)
//!
//! Search TheCocktailDB from the terminal, keep favourites, and see the
//! cocktail of the day.
//!
//! ## Usage
//!
//! ```bash
//! tipple --config ./config/tipple.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tipple init` | Create the SQLite database and run schema migrations |
//! | `tipple search "<name>"` | Search cocktails by name |
//! | `tipple today` | Show the cocktail of the day |
//! | `tipple show <id>` | Show one cocktail in full |
//! | `tipple favourite <id>` | Add or remove a favourite |
//! | `tipple favourites` | List favourites |
//!
//! Set `RUST_LOG=debug` to see pipeline and HTTP activity on stderr.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tipple::app::App;
use tipple::config;
use tipple::details::CocktailDetailsState;
use tipple::search::{SearchCocktailsAction, SearchCocktailsState};
use tipple::{db, migrate};
use tipple_core::{Cocktail, Resource};

/// Tipple: cocktail search, favourites, and a cocktail of the day.
#[derive(Parser)]
#[command(name = "tipple", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/tipple.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Safe to run repeatedly.
    Init,

    /// Search cocktails by name.
    Search {
        /// Name, or part of a name.
        query: String,
    },

    /// Show the cocktail of the day.
    ///
    /// The same cocktail is shown all day; a new one is picked on the first
    /// run after local midnight.
    Today,

    /// Show one cocktail by catalog id.
    Show { id: i32 },

    /// Toggle a cocktail in the favourites list.
    Favourite { id: i32 },

    /// List favourite cocktails.
    Favourites,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    if let Commands::Init = cli.command {
        let pool = db::connect(&cfg).await?;
        migrate::run_migrations(&pool).await?;
        println!("Database initialized successfully.");
        return Ok(());
    }

    let app = App::open(cfg).await?;

    match cli.command {
        Commands::Init => {}
        Commands::Search { query } => {
            let screen = app.search_screen();
            screen.dispatch(SearchCocktailsAction::Search(query.clone()));
            let state = settle_search(&screen, |s| s.search_query == query).await?;

            if state.catalog.has_cocktails_error {
                anyhow::bail!("Search failed. Check your connection and try again.");
            }
            if state.catalog.cocktails.is_empty() {
                println!("No cocktails found for '{}'.", query);
            }
            for cocktail in &state.catalog.cocktails {
                print_summary(cocktail);
            }
        }
        Commands::Today => {
            let screen = app.search_screen();
            let state = settle_search(&screen, |_| true).await?;

            match state.catalog.cocktail_of_the_day {
                Some(cocktail) if !state.catalog.has_cocktail_of_the_day_error => {
                    print_details(&cocktail)
                }
                _ => anyhow::bail!("Could not load the cocktail of the day."),
            }
        }
        Commands::Show { id } => {
            let screen = app.details_screen(id);
            let state = screen
                .state()
                .wait_for(|s: &CocktailDetailsState| !s.is_loading)
                .await?
                .clone();

            match state.cocktail {
                Some(cocktail) if !state.has_error => print_details(&cocktail),
                _ => anyhow::bail!("Could not load cocktail {}.", id),
            }
        }
        Commands::Favourite { id } => {
            let repo = app.repository();
            let is_favourite = repo.favourite_ids().borrow().contains(&id);
            if is_favourite {
                repo.remove_favourite(id).await?;
                println!("Removed {} from favourites.", id);
            } else {
                repo.add_favourite(id).await?;
                println!("Added {} to favourites.", id);
            }
        }
        Commands::Favourites => {
            let repo = app.repository();
            let ids: Vec<i32> = repo.favourite_ids().borrow().iter().copied().collect();
            if ids.is_empty() {
                println!("No favourites yet.");
            }
            for id in ids {
                match repo.get_cocktail_by_id(id).await {
                    Resource::Success(cocktail) => print_summary(&cocktail.with_favourite(true)),
                    _ => println!("★ {:>6}  (unavailable)", id),
                }
            }
        }
    }

    Ok(())
}

/// Wait until the search screen has nothing in flight and `ready` holds.
async fn settle_search(
    screen: &tipple::search::SearchCocktails,
    ready: impl Fn(&SearchCocktailsState) -> bool,
) -> Result<SearchCocktailsState> {
    let state = screen
        .state()
        .wait_for(|s| !s.is_loading && ready(s))
        .await?
        .clone();
    Ok(state)
}

fn print_summary(cocktail: &Cocktail) {
    let marker = if cocktail.is_favourite { "★" } else { " " };
    println!(
        "{} {:>6}  {}  [{}]",
        marker, cocktail.id, cocktail.name, cocktail.category
    );
}

fn print_details(cocktail: &Cocktail) {
    print_summary(cocktail);
    println!("    {} · {}", cocktail.kind, cocktail.serving_glass);
    if let Some(generation) = &cocktail.generation {
        println!("    IBA: {}", generation);
    }
    println!();
    for ingredient in &cocktail.ingredients {
        println!("    - {}", ingredient);
    }
    if !cocktail.instructions.is_empty() {
        println!();
        println!("    {}", cocktail.instructions);
    }
}
