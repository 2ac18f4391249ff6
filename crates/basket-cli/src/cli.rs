//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Basket - Shopping list with purchase-history suggestions
#[derive(Parser)]
#[command(name = "basket")]
#[command(about = "Self-hosted shopping list with smart suggestions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "basket.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set BASKET_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Create the demo user (test / test123)
    Seed,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing the built web client (e.g., client/build)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Create the demo user on startup
        #[arg(long)]
        demo_user: bool,
    },

    /// Show a user's shopping list grouped by category
    Items {
        /// Username or email
        #[arg(short, long)]
        user: String,
    },

    /// Suggest items for a user from their purchase history
    Suggest {
        /// Username or email
        #[arg(short, long)]
        user: String,

        /// Days of purchase history to consider
        #[arg(long, default_value = "60")]
        days: i64,

        /// Print the full suggestion set as JSON
        #[arg(long)]
        json: bool,
    },
}
