//! eDairy CLI - visitor storage inspection and cleanup.
//!
//! # Usage
//!
//! ```bash
//! # List visitors with stored data
//! edairy-cli storage list
//!
//! # Show a visitor's cart, liked items and order totals
//! edairy-cli storage show 0b6f1c1e-6a4e-4a57-9d0c-3f2d1e5a7b21
//!
//! # Empty a visitor's cart only
//! edairy-cli storage clear 0b6f1c1e-6a4e-4a57-9d0c-3f2d1e5a7b21 --cart
//! ```
//!
//! The storage root is `STOREFRONT_DATA_DIR` unless `--data-dir` is given.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "edairy-cli")]
#[command(author, version, about = "eDairy CLI tools")]
struct Cli {
    /// Root of per-visitor storage
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or clean up visitor storage
    Storage {
        #[command(subcommand)]
        action: StorageAction,
    },
}

#[derive(Subcommand)]
enum StorageAction {
    /// List visitors with stored data
    List,
    /// Show a visitor's cart, liked items and order totals
    Show {
        /// Visitor ID
        visitor: String,
    },
    /// Clear a visitor's stored cart and/or liked items
    Clear {
        /// Visitor ID
        visitor: String,

        /// Only clear the cart
        #[arg(long, conflicts_with = "liked")]
        cart: bool,

        /// Only clear liked items
        #[arg(long)]
        liked: bool,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => edairy_storefront::config::StorefrontConfig::from_env()?.data_dir,
    };

    match cli.command {
        Commands::Storage { action } => match action {
            StorageAction::List => commands::storage::list(&data_dir)?,
            StorageAction::Show { visitor } => commands::storage::show(&data_dir, &visitor)?,
            StorageAction::Clear {
                visitor,
                cart,
                liked,
            } => {
                let target = commands::storage::ClearTarget::from_flags(cart, liked);
                commands::storage::clear(&data_dir, &visitor, target)?;
            }
        },
    }
    Ok(())
}
