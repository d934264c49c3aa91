//! Dessert Cart CLI - catalog checks and cart inspection.
//!
//! # Usage
//!
//! ```bash
//! # Validate the bundled catalog
//! dc-cli catalog check crates/storefront/static/data.json
//!
//! # Validate a remote catalog
//! dc-cli catalog check https://example.com/data.json
//!
//! # Show the persisted cart, priced against a catalog
//! dc-cli cart show --catalog crates/storefront/static/data.json
//!
//! # Empty the persisted cart
//! dc-cli cart clear --dir .dessert-cart
//! ```
//!
//! # Commands
//!
//! - `catalog check` - Load a catalog document and report its products
//! - `cart show` - Print the persisted cart slot
//! - `cart clear` - Reset the persisted cart slot to an empty cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dc-cli")]
#[command(author, version, about = "Dessert Cart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect catalog documents
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect or reset the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Load a catalog and report its products
    Check {
        /// File path or http(s) URL of the catalog document
        source: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the persisted cart
    Show {
        /// Directory holding the cart slot
        #[arg(short, long, default_value = commands::cart::DEFAULT_DIR)]
        dir: PathBuf,

        /// Catalog to price the cart against
        #[arg(short, long)]
        catalog: Option<String>,
    },
    /// Reset the persisted cart to empty
    Clear {
        /// Directory holding the cart slot
        #[arg(short, long, default_value = commands::cart::DEFAULT_DIR)]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Check { source } => {
                commands::catalog::check(&source).await?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Show { dir, catalog } => {
                commands::cart::show(&dir, catalog.as_deref()).await?;
            }
            CartAction::Clear { dir } => commands::cart::clear(&dir)?,
        },
    }
    Ok(())
}
