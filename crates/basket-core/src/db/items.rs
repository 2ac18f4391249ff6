//! Shopping list item operations

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{format_timestamp, parse_datetime, parse_timestamp, Database};
use crate::error::{Error, Result};
use crate::models::{CurrentItem, Item, ItemUpdate, NewItem, PurchaseRecord, DEFAULT_CATEGORY};

const ITEM_COLUMNS: &str =
    "id, user_id, name, category, quantity, price, bought, bought_date, created_at";

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    let bought_date: Option<String> = row.get(7)?;
    let created_at: String = row.get(8)?;
    Ok(Item {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        quantity: row.get(4)?,
        price: row.get(5)?,
        bought: row.get::<_, i64>(6)? != 0,
        bought_date: bought_date.as_deref().and_then(parse_timestamp),
        created_at: parse_datetime(&created_at),
    })
}

/// Trimmed category, or the default when missing or blank
fn normalize_category(category: Option<&str>) -> String {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string()
}

fn required_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidData("Name is required".to_string()));
    }
    Ok(name.to_string())
}

impl Database {
    /// List a user's items: unbought first, newest first
    pub fn list_items(&self, user_id: i64) -> Result<Vec<Item>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM items WHERE user_id = ? ORDER BY bought ASC, created_at DESC, id DESC",
            ITEM_COLUMNS
        ))?;

        let items = stmt
            .query_map(params![user_id], item_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Get one of a user's items
    pub fn get_item(&self, user_id: i64, id: i64) -> Result<Option<Item>> {
        let conn = self.conn()?;
        let item = conn
            .query_row(
                &format!(
                    "SELECT {} FROM items WHERE id = ? AND user_id = ?",
                    ITEM_COLUMNS
                ),
                params![id, user_id],
                item_from_row,
            )
            .optional()?;
        Ok(item)
    }

    /// Add an item to a user's list
    ///
    /// The name is trimmed and must not be empty; the category defaults to
    /// `Inne` and the quantity to 1.
    pub fn create_item(&self, user_id: i64, item: &NewItem) -> Result<Item> {
        let name = required_name(&item.name)?;
        let category = normalize_category(item.category.as_deref());

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO items (user_id, name, category, quantity, price) VALUES (?, ?, ?, ?, ?)",
            params![
                user_id,
                name,
                category,
                item.quantity.unwrap_or(1),
                item.price
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_item(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Item {} not found after insert", id)))
    }

    /// Apply a partial update to one of a user's items
    ///
    /// Marking an unbought item as bought stamps `bought_date` with the
    /// current time; unmarking clears it. Returns `None` if the item doesn't
    /// exist or belongs to someone else.
    pub fn update_item(&self, user_id: i64, id: i64, update: &ItemUpdate) -> Result<Option<Item>> {
        self.update_item_at(user_id, id, update, Utc::now())
    }

    /// [`Database::update_item`] with an explicit clock
    pub fn update_item_at(
        &self,
        user_id: i64,
        id: i64,
        update: &ItemUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Item>> {
        let Some(existing) = self.get_item(user_id, id)? else {
            return Ok(None);
        };

        let name = match &update.name {
            Some(name) => required_name(name)?,
            None => existing.name,
        };
        let category = match &update.category {
            Some(category) => Some(normalize_category(Some(category.as_str()))),
            None => existing.category,
        };
        let quantity = update.quantity.unwrap_or(existing.quantity);
        let price = update.price.or(existing.price);

        let (bought, bought_date) = match update.bought {
            Some(true) if existing.bought => (true, existing.bought_date),
            Some(true) => (true, Some(now)),
            Some(false) => (false, None),
            None => (existing.bought, existing.bought_date),
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE items SET name = ?, category = ?, quantity = ?, price = ?, bought = ?, bought_date = ?
             WHERE id = ? AND user_id = ?",
            params![
                name,
                category,
                quantity,
                price,
                bought as i64,
                bought_date.map(format_timestamp),
                id,
                user_id
            ],
        )?;
        drop(conn);

        self.get_item(user_id, id)
    }

    /// Delete one of a user's items; false if there was nothing to delete
    pub fn delete_item(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM items WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(changed > 0)
    }

    /// Delete all of a user's items, returning how many were removed
    pub fn delete_all_items(&self, user_id: i64) -> Result<usize> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM items WHERE user_id = ?", params![user_id])?;
        Ok(changed)
    }

    /// Items still to buy, reduced to what the suggestion engine needs
    pub fn current_items(&self, user_id: i64) -> Result<Vec<CurrentItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT name, category FROM items WHERE user_id = ? AND bought = 0 ORDER BY created_at DESC, id DESC",
        )?;

        let items = stmt
            .query_map(params![user_id], |row| {
                Ok(CurrentItem {
                    name: row.get(0)?,
                    category: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// A user's purchases bought at or after `since`, newest first
    pub fn purchase_history(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<PurchaseRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT name, category, bought_date FROM items
             WHERE user_id = ? AND bought = 1 AND bought_date IS NOT NULL AND bought_date >= ?
             ORDER BY bought_date DESC",
        )?;

        let history = stmt
            .query_map(params![user_id, format_timestamp(since)], |row| {
                let bought_date: Option<String> = row.get(2)?;
                Ok(PurchaseRecord {
                    name: row.get(0)?,
                    category: row.get(1)?,
                    bought_date: bought_date.as_deref().and_then(parse_timestamp),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(history)
    }

    /// Record a past purchase as a bought item
    pub fn record_purchase(
        &self,
        user_id: i64,
        name: &str,
        category: Option<&str>,
        bought_at: DateTime<Utc>,
    ) -> Result<Item> {
        let name = required_name(name)?;
        let category = normalize_category(category);

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO items (user_id, name, category, bought, bought_date) VALUES (?, ?, ?, 1, ?)",
            params![user_id, name, category, format_timestamp(bought_at)],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_item(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Item {} not found after insert", id)))
    }
}
