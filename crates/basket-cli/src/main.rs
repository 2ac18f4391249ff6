//! Basket CLI - Shopping list with smart suggestions
//!
//! Usage:
//!   basket init                    Initialize database
//!   basket seed                    Create the demo user
//!   basket serve --port 3001       Start web server
//!   basket items --user NAME       Show a user's list
//!   basket suggest --user NAME     Suggest items from purchase history

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Seed => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_seed(&db)
        }
        Commands::Serve {
            port,
            host,
            static_dir,
            demo_user,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                cli.no_encrypt,
                static_dir.as_deref(),
                demo_user,
            )
            .await
        }
        Commands::Items { user } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_items(&db, &user)
        }
        Commands::Suggest { user, days, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_suggest(&db, &user, days, json)
        }
    }
}
