//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use basket_core::db::{DEMO_PASSWORD, DEMO_USERNAME};
use basket_server::{ServerConfig, ALLOWED_ORIGINS_ENV, JWT_SECRET_ENV};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_encrypt: bool,
    static_dir: Option<&Path>,
    demo_user: bool,
) -> Result<()> {
    println!("🚀 Starting Basket web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let config = ServerConfig::from_env();

    if std::env::var(JWT_SECRET_ENV).is_ok() {
        println!("   🔒 Token secret: {}", JWT_SECRET_ENV);
    } else {
        println!();
        println!(
            "   ⚠️  {} not set - using the development secret, do not expose to network!",
            JWT_SECRET_ENV
        );
    }
    if !config.allowed_origins.is_empty() {
        println!(
            "   🌐 CORS origins: {} ({})",
            config.allowed_origins.join(", "),
            ALLOWED_ORIGINS_ENV
        );
    }

    let db = open_db(db_path, no_encrypt)?;

    if demo_user && db.ensure_demo_user().context("Failed to create demo user")? {
        println!("   👤 Demo user created ({} / {})", DEMO_USERNAME, DEMO_PASSWORD);
    }

    println!();

    let static_dir = match static_dir {
        Some(dir) => Some(
            dir.to_str()
                .with_context(|| format!("Static dir is not valid UTF-8: {}", dir.display()))?,
        ),
        None => None,
    };

    basket_server::serve_with_config(db, host, port, static_dir, config).await
}
