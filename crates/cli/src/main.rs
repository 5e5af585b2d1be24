//! Shopcart CLI - Browse a Shopify catalog and drive a cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List products from the Admin API
//! shopcart products
//!
//! # Show one product with the variant IDs carts accept
//! shopcart product 632910392
//!
//! # Create a cart, then add to it and inspect it
//! shopcart cart create
//! shopcart cart add --cart gid://shopify/Cart/abc 808950810
//! shopcart cart show --cart gid://shopify/Cart/abc
//!
//! # Check out, printing the URL instead of opening a browser
//! shopcart --no-open cart checkout --cart gid://shopify/Cart/abc
//!
//! # All of the above in one go
//! shopcart buy 808950810 49148385
//! ```
//!
//! # Environment Variables
//!
//! - `SHOP_CONFIG_PATH` - Config file (default: `Intermediate/ProjectFiles/ShopConfig.json`)
//! - `SHOP_REQUEST_TIMEOUT_SECS` - Deadline for a single API call
//! - `SENTRY_DSN` - Report errors to Sentry when set
//! - `RUST_LOG` - Log filter (default: `shopcart_session=info,shopcart_cli=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "shopcart")]
#[command(author, version, about = "Shopify cart and catalog client")]
struct Cli {
    /// Shop config file (overrides `SHOP_CONFIG_PATH`)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print checkout URLs instead of opening them in a browser
    #[arg(long, global = true)]
    no_open: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all products
    Products,
    /// Show a product and its variants
    Product {
        /// Product ID
        id: String,
    },
    /// Manage a cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Create a cart, add one of each variant, and check out
    Buy {
        /// Variant IDs (bare or `gid://shopify/ProductVariant/...`)
        #[arg(required = true)]
        variants: Vec<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Create a cart and print its ID
    Create,
    /// Add one unit of a variant
    Add {
        /// Cart ID
        #[arg(long)]
        cart: String,
        /// Variant ID
        variant: String,
    },
    /// Remove a line
    Remove {
        /// Cart ID
        #[arg(long)]
        cart: String,
        /// Line item ID
        line: String,
    },
    /// List lines and subtotal
    Show {
        /// Cart ID
        #[arg(long)]
        cart: String,
    },
    /// Create a checkout and open it
    Checkout {
        /// Cart ID
        #[arg(long)]
        cart: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|dsn| !dsn.is_empty())?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Errors and warnings become Sentry events; info and debug become
/// breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let _sentry_guard = init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopcart_session=info,shopcart_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = commands::load_config(cli.config.as_deref())?;
    let state = commands::build_state(config, cli.no_open);

    match cli.command {
        Commands::Products => commands::products::list(&state).await?,
        Commands::Product { id } => commands::products::show(&state, &id).await?,
        Commands::Cart { action } => match action {
            CartAction::Create => {
                commands::cart::create(&state).await?;
            }
            CartAction::Add { cart, variant } => {
                commands::cart::add(&state, &cart, &variant).await?;
            }
            CartAction::Remove { cart, line } => {
                commands::cart::remove(&state, &cart, &line).await?;
            }
            CartAction::Show { cart } => commands::cart::show(&state, &cart).await?,
            CartAction::Checkout { cart } => commands::cart::checkout(&state, &cart).await?,
        },
        Commands::Buy { variants } => commands::cart::buy(&state, &variants).await?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add() {
        let cli = Cli::try_parse_from([
            "shopcart",
            "cart",
            "add",
            "--cart",
            "gid://shopify/Cart/1",
            "808950810",
        ])
        .unwrap();
        let Commands::Cart {
            action: CartAction::Add { cart, variant },
        } = cli.command
        else {
            panic!("expected cart add");
        };
        assert_eq!(cart, "gid://shopify/Cart/1");
        assert_eq!(variant, "808950810");
        assert!(!cli.no_open);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "shopcart",
            "buy",
            "1",
            "2",
            "--no-open",
            "--config",
            "shop.json",
        ])
        .unwrap();
        assert!(cli.no_open);
        assert_eq!(cli.config, Some(PathBuf::from("shop.json")));
        let Commands::Buy { variants } = cli.command else {
            panic!("expected buy");
        };
        assert_eq!(variants, vec!["1", "2"]);
    }

    #[test]
    fn test_buy_requires_variants() {
        assert!(Cli::try_parse_from(["shopcart", "buy"]).is_err());
    }
}
