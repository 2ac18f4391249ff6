//! Shopping list and suggestion commands

use anyhow::{Context, Result};
use basket_core::db::Database;
use basket_core::generate_suggestions;
use basket_core::models::{group_items_by_category, Item, Suggestion, SuggestionSet};
use chrono::{Duration, Utc};
use tracing::debug;

use super::{find_user, truncate};

/// Width of the item name column
const NAME_WIDTH: usize = 30;

fn format_item(item: &Item) -> String {
    let mark = if item.bought { "x" } else { " " };
    let mut line = format!(
        "  [{}] {:<width$} x{}",
        mark,
        truncate(&item.name, NAME_WIDTH),
        item.quantity,
        width = NAME_WIDTH
    );
    if let Some(price) = item.price {
        line.push_str(&format!("  {:.2} zł", price));
    }
    line
}

/// Render a list grouped by category
pub fn render_items(items: &[Item]) -> String {
    let mut out = String::new();
    for group in group_items_by_category(items) {
        out.push_str(&format!("{} ({})\n", group.category, group.items.len()));
        for item in &group.items {
            out.push_str(&format_item(item));
            out.push('\n');
        }
    }
    out
}

fn format_suggestion(suggestion: &Suggestion) -> String {
    format!(
        "  {:<width$} {:>3}  {:<13} {}",
        truncate(&suggestion.name, NAME_WIDTH),
        suggestion.score,
        suggestion.suggestion_type.as_str(),
        suggestion.reason,
        width = NAME_WIDTH
    )
}

/// Render the merged suggestions as a table
pub fn render_suggestions(set: &SuggestionSet) -> String {
    let mut out = format!(
        "  {:<width$} {:>3}  {:<13} {}\n",
        "Item",
        "Pts",
        "Rule",
        "Reason",
        width = NAME_WIDTH
    );
    for suggestion in &set.suggestions {
        out.push_str(&format_suggestion(suggestion));
        out.push('\n');
    }
    out
}

pub fn cmd_items(db: &Database, login: &str) -> Result<()> {
    let user = find_user(db, login)?;
    let items = db.list_items(user.id).context("Failed to list items")?;

    if items.is_empty() {
        println!("🛒 {}'s list is empty", user.username);
        return Ok(());
    }

    let remaining = items.iter().filter(|i| !i.bought).count();
    println!(
        "🛒 {}'s list: {} item(s), {} still to buy",
        user.username,
        items.len(),
        remaining
    );
    println!();
    print!("{}", render_items(&items));

    Ok(())
}

pub fn cmd_suggest(db: &Database, login: &str, days: i64, json: bool) -> Result<()> {
    if days <= 0 {
        anyhow::bail!("--days must be positive");
    }

    let now = Utc::now();
    let since = Duration::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .with_context(|| format!("--days {} is out of range", days))?;

    let user = find_user(db, login)?;

    let history = db
        .purchase_history(user.id, since)
        .context("Failed to load purchase history")?;
    let current = db
        .current_items(user.id)
        .context("Failed to load current list")?;

    let set = generate_suggestions(&history, &current, now);
    debug!(
        user_id = user.id,
        regular = set.regular.len(),
        overdue = set.overdue.len(),
        category = set.category.len(),
        complementary = set.complementary.len(),
        "Suggestion rules evaluated"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&set)?);
        return Ok(());
    }

    println!(
        "💡 Suggestions for {} ({} purchase(s) in the last {} days, {} item(s) on the list)",
        user.username,
        history.len(),
        days,
        current.len()
    );

    if set.suggestions.is_empty() {
        println!("   Nothing to suggest yet - mark some items as bought first.");
        return Ok(());
    }

    println!();
    print!("{}", render_suggestions(&set));

    Ok(())
}
