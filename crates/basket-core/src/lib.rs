//! Basket Core Library
//!
//! Shared functionality for the Basket shopping list:
//! - Database access and migrations (users, list items, purchase history)
//! - Password hashing
//! - Heuristic suggestion engine over purchase history

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod suggestions;

pub use db::Database;
pub use error::{Error, Result};
pub use suggestions::generate_suggestions;
