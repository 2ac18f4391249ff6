//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, seed) and shared utilities (open_db, find_user)
//! - `items` - Shopping list and suggestion commands
//! - `serve` - Web server command

pub mod core;
pub mod items;
pub mod serve;

// Re-export command functions for main.rs
pub use core::*;
pub use items::*;
pub use serve::*;

/// Truncate a string to `max` characters, ending with "..." when cut
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
