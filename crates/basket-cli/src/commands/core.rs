//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `find_user` - Resolve a username or email
//! - `cmd_init` - Initialize the database
//! - `cmd_seed` - Create the demo user

use std::path::Path;

use anyhow::{Context, Result};
use basket_core::db::{Database, DEMO_PASSWORD, DEMO_USERNAME};
use basket_core::models::User;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Look up a user by username or email, failing if there is none
pub fn find_user(db: &Database, login: &str) -> Result<User> {
    db.find_user_by_login(login)
        .context("Failed to look up user")?
        .with_context(|| format!("No user named '{}'", login))
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create the demo user: basket seed");
    println!("  2. Start web UI: basket serve");

    Ok(())
}

pub fn cmd_seed(db: &Database) -> Result<()> {
    if db.ensure_demo_user().context("Failed to create demo user")? {
        println!("✅ Demo user created");
    } else {
        println!("ℹ️  Demo user already exists");
    }
    println!("   Username: {}", DEMO_USERNAME);
    println!("   Password: {}", DEMO_PASSWORD);

    Ok(())
}
