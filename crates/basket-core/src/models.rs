//! Domain models for Basket

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Category assigned to items created without one
pub const DEFAULT_CATEGORY: &str = "Inne";

/// Normalize an item name for matching: trimmed and lowercased
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A registered user
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user, as embedded in auth responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// An item on a user's shopping list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub quantity: i64,
    pub price: Option<f64>,
    pub bought: bool,
    /// When the item was last marked as bought
    pub bought_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new list item
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Partial update of a list item; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub bought: Option<bool>,
}

/// Accepts `true`/`false` as well as the `1`/`0` the web client sends
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => Some(b),
        Some(Flag::Int(i)) => Some(i != 0),
        None => None,
    })
}

/// One past purchase, as consumed by the suggestion engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub bought_date: Option<DateTime<Utc>>,
}

/// An item currently on the (unbought) list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentItem {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl CurrentItem {
    pub fn new(name: impl Into<String>, category: Option<&str>) -> Self {
        Self {
            name: name.into(),
            category: category.map(str::to_string),
        }
    }
}

/// Which rule produced a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Regular,
    Overdue,
    Category,
    Complementary,
}

impl SuggestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Overdue => "overdue",
            Self::Category => "category",
            Self::Complementary => "complementary",
        }
    }
}

impl std::fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recommended item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub name: String,
    pub category: Option<String>,
    pub reason: String,
    pub score: i64,
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    /// Whole days since the last purchase (overdue suggestions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_since: Option<i64>,
    /// Most recent purchase (regular suggestions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_purchase: Option<DateTime<Utc>>,
}

/// Output of the suggestion engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSet {
    /// Merged, deduplicated top picks across all rules
    pub suggestions: Vec<Suggestion>,
    pub regular: Vec<Suggestion>,
    pub overdue: Vec<Suggestion>,
    pub category: Vec<Suggestion>,
    pub complementary: Vec<Suggestion>,
}

impl SuggestionSet {
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
            && self.regular.is_empty()
            && self.overdue.is_empty()
            && self.category.is_empty()
            && self.complementary.is_empty()
    }
}

/// Items of one category, for grouped list display
#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<Item>,
}

/// Group items by category: alphabetical, with the default category last
pub fn group_items_by_category(items: &[Item]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for item in items {
        let category = item
            .category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        match groups.iter_mut().find(|g| g.category == category) {
            Some(group) => group.items.push(item.clone()),
            None => groups.push(CategoryGroup {
                category: category.to_string(),
                items: vec![item.clone()],
            }),
        }
    }

    groups.sort_by(|a, b| {
        match (a.category == DEFAULT_CATEGORY, b.category == DEFAULT_CATEGORY) {
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            _ => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
        }
    });

    groups
}
