//! Ark CLI - catalog management tools.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally filtered
//! ark-cli products list --category Shoes --search runner
//!
//! # Create products from a YAML file
//! ark-cli products seed catalog.yaml
//!
//! # Validate the file without creating anything
//! ark-cli products seed catalog.yaml --dry-run
//! ```
//!
//! # Environment Variables
//!
//! - `BACKEND_API_URL` - Base URL of the REST backend
//! - `ARK_ADMIN_EMAIL` - Administrator email
//! - `ARK_ADMIN_PASSWORD` - Administrator password

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ark-cli")]
#[command(author, version, about = "Ark catalog tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage catalog products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products with inventory stats
    List {
        /// Only show products in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Match title or SKU (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create products from a YAML list of drafts
    Seed {
        /// Path to the YAML file
        file: PathBuf,

        /// Parse and validate only
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List { category, search } => {
                commands::products::list(category.as_deref(), search.as_deref()).await?;
            }
            ProductsAction::Seed { file, dry_run } => {
                commands::seed::products(&file, dry_run).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_help_names_matched_fields() {
        let mut cli = Cli::command();
        let list = cli
            .find_subcommand_mut("products")
            .unwrap()
            .find_subcommand_mut("list")
            .unwrap();
        let search = list.get_arguments().find(|a| a.get_id() == "search").unwrap();
        let help = search.get_help().unwrap().to_string();
        assert!(help.contains("title or SKU"));
        assert!(!help.contains("brand"));
    }

    #[test]
    fn test_parse_list_filters() {
        let cli = Cli::try_parse_from([
            "ark-cli", "products", "list", "--category", "Shoes", "--search", "runner",
        ])
        .unwrap();
        let Commands::Products {
            action: ProductsAction::List { category, search },
        } = cli.command
        else {
            panic!("expected products list");
        };
        assert_eq!(category.as_deref(), Some("Shoes"));
        assert_eq!(search.as_deref(), Some("runner"));
    }
}
