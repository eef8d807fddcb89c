//! Storefront Cart CLI - Inspect catalogs and replay cart events.
//!
//! # Usage
//!
//! ```bash
//! # List the products a page exposes
//! cart-cli catalog --page index.html
//!
//! # Add two mugs, open the cart and print the header markup
//! cart-cli run --page index.html add:Mug add:Mug click-cart
//!
//! # Watch the cart hide itself
//! CART_HIDE_TIMEOUT_MS=500 cart-cli run --page index.html click-cart wait:600 --json
//! ```
//!
//! # Commands
//!
//! - `catalog` - Scrape featured items into the product database and list them
//! - `run` - Replay page events against a cart and print the result

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use storefront_cart::config::WidgetConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::run::PageEvent;

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Storefront cart widget tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the products found in a page's featured items
    Catalog {
        /// Storefront page markup
        #[arg(short, long)]
        page: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Replay page events against a fresh cart
    Run {
        /// Storefront page markup
        #[arg(short, long)]
        page: PathBuf,

        /// Events in order: `add:NAME`, `remove:NAME`, `click-cart`, `wait:MS`
        events: Vec<PageEvent>,

        /// Print JSON instead of markup
        #[arg(long)]
        json: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &WidgetConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match WidgetConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Tracing is not up yet
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Failed to load configuration: {e}");
            }
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storefront_cart=info,cart_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &WidgetConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { page, json } => commands::catalog::list(&page, json)?,
        Commands::Run { page, events, json } => {
            commands::run::replay(config, &page, &events, json).await?;
        }
    }
    Ok(())
}
