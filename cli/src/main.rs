mod client;
mod seed;
mod state;

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use potluck_core::filter::ALL;
use potluck_core::{Debouncer, Recipe, RecipeFilter, SessionState, SessionStore, SEARCH_DEBOUNCE};
use tracing_subscriber::EnvFilter;

use crate::client::ApiClient;
use crate::state::LocalState;

#[derive(Parser)]
#[command(name = "potluck")]
#[command(about = "Potluck CLI", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(long, global = true, default_value = "http://localhost:3000")]
    server: String,

    /// Directory holding the session token and favorites
    #[arg(long, global = true, default_value = ".potluck")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in and remember the session
    Signin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Revoke the remembered session
    Signout,
    /// Show the signed-in user
    Whoami,
    /// List recipes with optional search and filters
    Browse {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = ALL)]
        difficulty: String,
        #[arg(long, default_value = ALL)]
        category: String,
        #[arg(long)]
        page: Option<i64>,
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Search as you type: each stdin line replaces the query
    Search,
    /// Manage locally stored favorite recipes
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Create sample recipes as the signed-in user
    Seed {
        /// Directory with optional `{slug}.{png,jpg,gif,webp}` images
        #[arg(long)]
        images: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// Show favorite recipes
    List,
    Add { id: i64 },
    Remove { id: i64 },
    /// Add if absent, remove if present
    Toggle { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let state = LocalState::open(&cli.state_dir)?;
    let client = ApiClient::new(&cli.server, state.token()?);

    match cli.command {
        Commands::Signup {
            full_name,
            email,
            password,
        } => {
            let message = client.sign_up(&full_name, &email, &password).await?;
            println!("{}", message);
        }
        Commands::Signin { email, password } => {
            let session = client.sign_in(&email, &password).await?;
            state.set_token(&session.token)?;
            println!("Signed in as {}", session.user.display_name());
        }
        Commands::Signout => {
            if state.token()?.is_some() {
                client.sign_out().await?;
                state.clear_token()?;
            }
            println!("Signed out");
        }
        Commands::Whoami => whoami(&client).await?,
        Commands::Browse {
            search,
            difficulty,
            category,
            page,
            limit,
        } => {
            let filter = RecipeFilter::from_params(
                Some(&search),
                Some(&difficulty),
                Some(&category),
                page,
                limit,
            )
            .map_err(|errors| anyhow::anyhow!("Invalid filter: {:?}", errors))?;
            browse(&client, &filter).await?;
        }
        Commands::Search => search(&client).await?,
        Commands::Favorites { action } => favorites(&client, &state, action).await?,
        Commands::Seed { images } => {
            if state.token()?.is_none() {
                bail!("Sign in first: potluck signin --email ... --password ...");
            }
            seed::seed(&client, images.as_deref()).await?;
        }
    }

    Ok(())
}

async fn whoami(client: &ApiClient) -> Result<()> {
    let session = SessionStore::new();
    session.resolve(client.current_user().await?);

    match session.state() {
        SessionState::Authenticated(user) => {
            println!("{} <{}>", user.display_name(), user.email);
        }
        SessionState::Anonymous => println!("Not signed in"),
        SessionState::Loading => println!("Session unknown"),
    }
    Ok(())
}

fn print_recipe(recipe: &Recipe) {
    let categories = recipe
        .categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "#{:<5} {} [{}; {}] by {}",
        recipe.id, recipe.title, recipe.difficulty, categories, recipe.author_name
    );
}

async fn browse(client: &ApiClient, filter: &RecipeFilter) -> Result<()> {
    let page = client.browse(filter).await?;
    for recipe in &page.recipes {
        print_recipe(recipe);
    }
    println!(
        "Page {} of {} ({} recipes)",
        page.page,
        page.total_pages.max(1),
        page.total
    );
    Ok(())
}

/// Debounced search over stdin lines: only the query standing after a quiet
/// period hits the server.
async fn search(client: &ApiClient) -> Result<()> {
    let (mut debouncer, mut queries) = Debouncer::new(SEARCH_DEBOUNCE);
    let (lines_tx, mut lines) = tokio::sync::mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if lines_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut filter = RecipeFilter::default();
    loop {
        tokio::select! {
            line = lines.recv() => match line {
                Some(line) => debouncer.push(line),
                None => {
                    // End of input: let the last pending query land.
                    let last = tokio::time::timeout(SEARCH_DEBOUNCE * 2, queries.recv()).await;
                    if let Ok(Some(query)) = last {
                        filter.set_search(query);
                        browse(client, &filter).await?;
                    }
                    break;
                }
            },
            Some(query) = queries.recv() => {
                filter.set_search(query);
                browse(client, &filter).await?;
            }
        }
    }

    Ok(())
}

async fn favorites(client: &ApiClient, state: &LocalState, action: FavoritesAction) -> Result<()> {
    let favorites = state.favorites();
    match action {
        FavoritesAction::List => {
            let ids = favorites.list();
            if ids.is_empty() {
                println!("No favorites yet");
                return Ok(());
            }
            for recipe in client.recipes_by_ids(&ids).await? {
                print_recipe(&recipe);
            }
        }
        FavoritesAction::Add { id } => {
            favorites.add(id)?;
            println!("Added #{} to favorites", id);
        }
        FavoritesAction::Remove { id } => {
            favorites.remove(id)?;
            println!("Removed #{} from favorites", id);
        }
        FavoritesAction::Toggle { id } => {
            if favorites.toggle(id)? {
                println!("Added #{} to favorites", id);
            } else {
                println!("Removed #{} from favorites", id);
            }
        }
    }
    Ok(())
}
