//! Hestia command-line client
//!
//! Drives the same screens a browser would, printing them as text.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use hestia_client::screens::{Home, LoginForm, RegisterForm};
use hestia_client::search::SearchMode;
use hestia_client::{Hestia, Location, MemoryLocation, Recipe, Result, Screen, SearchState};
use log::{error, warn};

/// Hestia - share and search recipes
#[derive(Parser, Debug)]
#[command(name = "hestia", version, about = "Command-line client for the Hestia recipe service")]
struct Cli {
    /// Backend base URL (overrides hestia.toml and HESTIA__API_BASE_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Log in with this email before running the command
    #[arg(long, requires = "password")]
    email: Option<String>,

    /// Password for --email
    #[arg(long, requires = "email")]
    password: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a path to its screen and render it
    Open { path: String },

    /// Search recipes by name or description
    Search { query: String },

    /// Search recipes by ingredients
    Ingredients {
        #[arg(required = true)]
        names: Vec<String>,

        /// Only return recipes containing every ingredient
        #[arg(long)]
        match_all: bool,
    },

    /// Show a single recipe
    Recipe { id: u64 },

    /// List the newest recipes
    Recipes {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long = "new-email")]
        email: String,
        #[arg(long = "new-password")]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },

    /// Show the logged-in user
    Whoami,

    /// End the session
    Logout,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let location = Arc::new(MemoryLocation::new("/"));
    let mut builder = Hestia::builder().location(location.clone());
    if let Some(url) = cli.api_url {
        builder = builder.base_url(url);
    }
    let hestia = builder.build()?;

    if let (Some(email), Some(password)) = (cli.email, cli.password) {
        location.assign("/login");
        let mut form = LoginForm {
            email,
            password,
            ..LoginForm::default()
        };
        if form.submit(hestia.client()).await?.is_none() {
            warn!("Backend accepted the login but reports no session");
        }
    }

    match cli.command {
        Command::Open { path } => {
            location.assign(&path);
            open(&hestia).await?;
        }
        Command::Search { query } => {
            let composer = hestia.search_composer();
            let outcome = composer.search_now(query).await;
            print_results(&composer.snapshot());
            outcome?;
        }
        Command::Ingredients { names, match_all } => {
            let composer = hestia.search_composer();
            composer.set_mode(SearchMode::ByIngredients);
            for name in &names {
                composer.add_ingredient(name);
            }
            composer.set_match_all(match_all);
            let outcome = composer.execute_ingredient_search().await;
            print_results(&composer.snapshot());
            outcome?;
        }
        Command::Recipe { id } => {
            location.assign(&format!("/recipe/{}", id));
            open(&hestia).await?;
        }
        Command::Recipes { page } => {
            let recipes = hestia
                .client()
                .list_recipes(page, hestia.config().search.page_size)
                .await?;
            for recipe in &recipes {
                print_card(recipe);
            }
        }
        Command::Signup {
            username,
            email,
            password,
            confirm_password,
        } => {
            location.assign("/register");
            let mut form = RegisterForm {
                username,
                email,
                password,
                confirm_password,
                ..RegisterForm::default()
            };
            let user = form.submit(hestia.client()).await?;
            println!("Registered {} <{}>", user.username, user.email);
        }
        Command::Whoami => match hestia.session().refresh(hestia.client()).await {
            Some(user) => println!("{} <{}> (id {})", user.username, user.email, user.id),
            None => println!("Not logged in"),
        },
        Command::Logout => {
            let mut indicator = hestia.session_indicator();
            indicator.logout(hestia.client()).await;
            println!("Logged out");
        }
    }

    Ok(())
}

async fn open(hestia: &Hestia) -> Result<()> {
    let mut indicator = hestia.session_indicator();
    indicator.mount(hestia.client()).await;
    print_navbar(&indicator);

    match hestia.dispatch() {
        Screen::Home => {
            println!("{}\n{}\n", Home::TITLE, Home::TAGLINE);
            for line in Home::highlights() {
                println!("  * {}", line);
            }
        }
        Screen::Register(_) => println!("Register: use `hestia signup`"),
        Screen::Login(_) => println!("Login: pass --email and --password"),
        Screen::Kitchen(mut kitchen) => {
            if kitchen.mount().await.is_none() {
                println!("Not logged in, redirected to {}", hestia.location().pathname());
                return Ok(());
            }
            println!("My Kitchen");
            if let Some(welcome) = kitchen.welcome() {
                println!("{}", welcome);
            }
        }
        Screen::RecipeDetail(mut detail) => {
            let outcome = detail.load().await;
            if let Some(recipe) = detail.recipe() {
                print_recipe(recipe, detail.is_owner());
            } else if let Some(message) = detail.error() {
                println!("{}", message);
            }
            outcome?;
        }
    }
    Ok(())
}

fn print_navbar(indicator: &hestia_client::SessionIndicator) {
    if indicator.shows_login_button() {
        println!("[Login]");
    }
    if indicator.shows_account_menu() {
        let name = indicator.user().map(|u| u.username).unwrap_or_default();
        println!("[Profile: {}] [Settings] [Logout]", name);
    }
}

fn print_results(state: &SearchState) {
    if let Some(error) = &state.error {
        println!("{}", error);
        return;
    }
    if state.shows_empty_state() {
        println!("No recipes found. Try a different search.");
    }
    for recipe in &state.recipes {
        print_card(recipe);
    }
}

fn print_card(recipe: &Recipe) {
    println!("#{} {}", recipe.id, recipe.title);
    if let Some(description) = &recipe.description {
        println!("    {}", description);
    }
    let mut meta = Vec::new();
    if let Some(prep) = recipe.prep_time.filter(|t| *t > 0) {
        meta.push(format!("Prep: {} min", prep));
    }
    if let Some(cook) = recipe.cook_time.filter(|t| *t > 0) {
        meta.push(format!("Cook: {} min", cook));
    }
    if let Some(servings) = recipe.servings.filter(|n| *n > 0) {
        meta.push(format!("Serves: {}", servings));
    }
    if !meta.is_empty() {
        println!("    {}", meta.join(" | "));
    }
}

fn print_recipe(recipe: &Recipe, is_owner: bool) {
    print_card(recipe);
    if let Some(total) = recipe.total_time() {
        println!("    Total: {} min", total);
    }
    if let Some(url) = &recipe.source_url {
        println!("    View original recipe: {}", url);
    }
    if is_owner {
        println!("    [Edit] [Delete]");
    }

    println!("\nIngredients");
    for item in recipe.ingredient_items() {
        let amount = [item.quantity.as_deref(), item.unit.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if amount.is_empty() {
            println!("  - {}", item.name);
        } else {
            println!("  - {} {}", amount, item.name);
        }
    }

    println!("\nInstructions");
    for (i, step) in recipe.steps().iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}
