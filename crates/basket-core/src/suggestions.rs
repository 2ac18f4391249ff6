//! Purchase-history suggestions
//!
//! Recommends items for a shopping list from a user's recent purchases.
//! Four independent rules each produce a capped list:
//! - Regular: bought at least 3 times
//! - Overdue: bought at least twice, last time more than 7 days ago
//! - Category: popular items in the categories already on the list
//! - Complementary: items bought on the same day as something on the list
//!
//! The rule outputs are then merged into one deduplicated top-10 list.
//! Everything here is a pure function of its inputs; `now` is passed in.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{
    normalize_name, CurrentItem, PurchaseRecord, Suggestion, SuggestionSet, SuggestionType,
    DEFAULT_CATEGORY,
};

/// Purchases needed before an item counts as regular
pub const REGULAR_MIN_COUNT: usize = 3;

/// Purchases needed before an item can be overdue
pub const OVERDUE_MIN_COUNT: usize = 2;

/// An item is overdue once more than this many days have passed
pub const OVERDUE_AFTER_DAYS: i64 = 7;

/// Cap on each per-rule list
pub const RULE_LIMIT: usize = 5;

/// Items suggested per category on the list
pub const PER_CATEGORY_LIMIT: usize = 3;

/// Cap on the merged list
pub const MERGED_LIMIT: usize = 10;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Aggregated purchase stats for one normalized name
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyEntry {
    pub count: usize,
    pub category: String,
    pub last_purchase: Option<DateTime<Utc>>,
    /// Every dated purchase, in history order
    pub purchases: Vec<DateTime<Utc>>,
}

fn category_or_default(category: Option<&str>) -> &str {
    category.filter(|c| !c.is_empty()).unwrap_or(DEFAULT_CATEGORY)
}

/// Uppercase the first character, leaving the rest as-is
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Display form of a normalized name
///
/// Capitalized unless that would change what the name normalizes to.
fn display_name(key: &str) -> String {
    let capitalized = capitalize(key);
    if normalize_name(&capitalized) == key {
        capitalized
    } else {
        key.to_string()
    }
}

fn current_name_set(current_items: &[CurrentItem]) -> HashSet<String> {
    current_items
        .iter()
        .map(|item| normalize_name(&item.name))
        .collect()
}

/// Build the per-name frequency table
///
/// Undated records count toward `count` but never toward `last_purchase`.
/// The category follows the most recent dated purchase.
pub fn calculate_frequency(history: &[PurchaseRecord]) -> HashMap<String, FrequencyEntry> {
    let mut frequency: HashMap<String, FrequencyEntry> = HashMap::new();

    for record in history {
        let category = category_or_default(record.category.as_deref());
        let entry = frequency
            .entry(normalize_name(&record.name))
            .or_insert_with(|| FrequencyEntry {
                count: 0,
                category: category.to_string(),
                last_purchase: None,
                purchases: Vec::new(),
            });

        entry.count += 1;

        if let Some(date) = record.bought_date {
            entry.purchases.push(date);
            if entry.last_purchase.map_or(true, |last| date > last) {
                entry.last_purchase = Some(date);
                entry.category = category.to_string();
            }
        }
    }

    frequency
}

/// Items bought at least [`REGULAR_MIN_COUNT`] times that aren't on the list
pub fn regular_items(
    frequency: &HashMap<String, FrequencyEntry>,
    current_names: &HashSet<String>,
) -> Vec<Suggestion> {
    let mut items: Vec<Suggestion> = frequency
        .iter()
        .filter(|(name, data)| data.count >= REGULAR_MIN_COUNT && !current_names.contains(*name))
        .map(|(name, data)| Suggestion {
            name: display_name(name),
            category: Some(data.category.clone()),
            reason: format!("Kupowane regularnie ({} razy)", data.count),
            score: data.count as i64,
            suggestion_type: SuggestionType::Regular,
            days_since: None,
            last_purchase: data.last_purchase,
        })
        .collect();

    items.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    items.truncate(RULE_LIMIT);
    items
}

/// Repeat purchases not bought in over [`OVERDUE_AFTER_DAYS`] days
///
/// Sorted by days since the last purchase, longest first.
pub fn overdue_items(
    frequency: &HashMap<String, FrequencyEntry>,
    current_names: &HashSet<String>,
    now: DateTime<Utc>,
) -> Vec<Suggestion> {
    let mut items: Vec<Suggestion> = frequency
        .iter()
        .filter(|(name, data)| data.count >= OVERDUE_MIN_COUNT && !current_names.contains(*name))
        .filter_map(|(name, data)| {
            let last = data.last_purchase?;
            let elapsed_ms = (now - last).num_milliseconds();
            if elapsed_ms <= OVERDUE_AFTER_DAYS * MS_PER_DAY {
                return None;
            }
            let days_since = elapsed_ms.div_euclid(MS_PER_DAY);

            Some(Suggestion {
                name: display_name(name),
                category: Some(data.category.clone()),
                reason: format!("Ostatnio kupowane {} dni temu", days_since),
                score: data.count as i64,
                suggestion_type: SuggestionType::Overdue,
                days_since: Some(days_since),
                last_purchase: None,
            })
        })
        .collect();

    items.sort_by(|a, b| {
        b.days_since
            .cmp(&a.days_since)
            .then_with(|| a.name.cmp(&b.name))
    });
    items.truncate(RULE_LIMIT);
    items
}

/// Popular history items from the categories already on the list
///
/// Categories are visited in order of first appearance on the list; each
/// contributes up to [`PER_CATEGORY_LIMIT`] items.
pub fn category_suggestions(
    history: &[PurchaseRecord],
    current_items: &[CurrentItem],
) -> Vec<Suggestion> {
    let current_names = current_name_set(current_items);

    let mut current_categories: Vec<&str> = Vec::new();
    for item in current_items {
        let category = category_or_default(item.category.as_deref());
        if !current_categories.contains(&category) {
            current_categories.push(category);
        }
    }

    let mut category_frequency: HashMap<&str, HashMap<String, i64>> = HashMap::new();
    for record in history {
        *category_frequency
            .entry(category_or_default(record.category.as_deref()))
            .or_default()
            .entry(normalize_name(&record.name))
            .or_default() += 1;
    }

    let mut suggestions = Vec::new();
    for category in current_categories {
        let Some(counts) = category_frequency.get(category) else {
            continue;
        };

        let mut top: Vec<(&String, i64)> = counts
            .iter()
            .filter(|(name, _)| !current_names.contains(*name))
            .map(|(name, count)| (name, *count))
            .collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        suggestions.extend(
            top.into_iter()
                .take(PER_CATEGORY_LIMIT)
                .map(|(name, count)| Suggestion {
                    name: display_name(name),
                    category: Some(category.to_string()),
                    reason: format!("Często kupowane w kategorii {}", category),
                    score: count,
                    suggestion_type: SuggestionType::Category,
                    days_since: None,
                    last_purchase: None,
                }),
        );
    }

    suggestions.truncate(RULE_LIMIT);
    suggestions
}

/// Count same-day co-purchases
///
/// Every ordered pair of entries with different names on the same UTC date
/// bumps the counter of their unordered pair, so each co-occurrence counts
/// twice and repeated entries multiply.
pub fn same_day_pairs(history: &[PurchaseRecord]) -> BTreeMap<(String, String), i64> {
    let mut by_date: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    for record in history {
        if let Some(date) = record.bought_date {
            by_date
                .entry(date.date_naive())
                .or_default()
                .push(normalize_name(&record.name));
        }
    }

    let mut pairs: BTreeMap<(String, String), i64> = BTreeMap::new();
    for names in by_date.values() {
        for a in names {
            for b in names {
                if a == b {
                    continue;
                }
                let key = if a < b {
                    (a.clone(), b.clone())
                } else {
                    (b.clone(), a.clone())
                };
                *pairs.entry(key).or_default() += 1;
            }
        }
    }

    pairs
}

/// Items often bought on the same day as something on the list
pub fn complementary_items(
    history: &[PurchaseRecord],
    current_items: &[CurrentItem],
) -> Vec<Suggestion> {
    let current_names = current_name_set(current_items);

    // candidate -> (best pair count, listed item it was paired with)
    let mut candidates: HashMap<&str, (i64, &str)> = HashMap::new();
    let pairs = same_day_pairs(history);

    for ((a, b), &count) in &pairs {
        for (listed, other) in [(a, b), (b, a)] {
            if !current_names.contains(listed) || current_names.contains(other) {
                continue;
            }
            let best = candidates
                .entry(other.as_str())
                .or_insert((count, listed.as_str()));
            if count > best.0 {
                *best = (count, listed.as_str());
            }
        }
    }

    let mut items: Vec<Suggestion> = candidates
        .into_iter()
        .map(|(name, (score, paired_with))| Suggestion {
            name: display_name(name),
            category: None,
            reason: format!("Często kupowane razem z {}", paired_with),
            score,
            suggestion_type: SuggestionType::Complementary,
            days_since: None,
            last_purchase: None,
        })
        .collect();

    items.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    items.truncate(RULE_LIMIT);
    items
}

/// Merge rule outputs into one ranked list
///
/// Earlier lists win when names collide, so precedence is
/// regular, overdue, category, complementary.
fn merge(lists: [&[Suggestion]; 4]) -> Vec<Suggestion> {
    let mut seen = HashSet::new();
    let mut merged: Vec<Suggestion> = lists
        .into_iter()
        .flatten()
        .filter(|s| seen.insert(normalize_name(&s.name)))
        .cloned()
        .collect();

    // Stable: equal scores keep precedence order
    merged.sort_by(|a, b| b.score.cmp(&a.score));
    merged.truncate(MERGED_LIMIT);
    merged
}

/// Generate suggestions from purchase history and the current list
///
/// `history` should already be limited to one user's bought items within the
/// look-back window. An empty history yields an empty set.
pub fn generate_suggestions(
    history: &[PurchaseRecord],
    current_items: &[CurrentItem],
    now: DateTime<Utc>,
) -> SuggestionSet {
    if history.is_empty() {
        return SuggestionSet::default();
    }

    let frequency = calculate_frequency(history);
    let current_names = current_name_set(current_items);

    let regular = regular_items(&frequency, &current_names);
    let overdue = overdue_items(&frequency, &current_names, now);
    let category = category_suggestions(history, current_items);
    let complementary = complementary_items(history, current_items);

    let suggestions = merge([
        regular.as_slice(),
        overdue.as_slice(),
        category.as_slice(),
        complementary.as_slice(),
    ]);

    SuggestionSet {
        suggestions,
        regular,
        overdue,
        category,
        complementary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn bought(name: &str, category: Option<&str>, date: DateTime<Utc>) -> PurchaseRecord {
        PurchaseRecord {
            name: name.to_string(),
            category: category.map(str::to_string),
            bought_date: Some(date),
        }
    }

    fn undated(name: &str, category: Option<&str>) -> PurchaseRecord {
        PurchaseRecord {
            name: name.to_string(),
            category: category.map(str::to_string),
            bought_date: None,
        }
    }

    fn names(list: &[Suggestion]) -> Vec<String> {
        list.iter().map(|s| s.name.clone()).collect()
    }

    fn all_lists(set: &SuggestionSet) -> Vec<&Suggestion> {
        set.suggestions
            .iter()
            .chain(&set.regular)
            .chain(&set.overdue)
            .chain(&set.category)
            .chain(&set.complementary)
            .collect()
    }

    #[test]
    fn test_calculate_frequency() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let history = vec![
            bought("Mleko", Some("Nabiał"), base),
            bought("Mleko", Some("Nabiał"), base + Duration::days(7)),
            bought(" mleko ", Some("Nabiał"), base + Duration::days(14)),
            bought("Chleb", Some("Pieczywo"), base + Duration::days(4)),
            bought("Chleb", Some("Pieczywo"), base + Duration::days(11)),
        ];

        let frequency = calculate_frequency(&history);

        assert_eq!(frequency["mleko"].count, 3);
        assert_eq!(frequency["chleb"].count, 2);
        assert_eq!(frequency["mleko"].category, "Nabiał");
        assert_eq!(
            frequency["mleko"].last_purchase,
            Some(base + Duration::days(14))
        );
        assert_eq!(frequency["mleko"].purchases.len(), 3);
    }

    #[test]
    fn test_frequency_undated_records_only_count() {
        let history = vec![
            undated("Ser", None),
            undated("Ser", Some("Nabiał")),
            bought("Ser", Some("Nabiał"), now() - Duration::days(3)),
        ];

        let frequency = calculate_frequency(&history);
        let ser = &frequency["ser"];
        assert_eq!(ser.count, 3);
        assert_eq!(ser.purchases.len(), 1);
        assert_eq!(ser.last_purchase, Some(now() - Duration::days(3)));
        // Category follows the dated purchase, not the first undated record
        assert_eq!(ser.category, "Nabiał");
    }

    #[test]
    fn test_frequency_category_defaults_to_inne() {
        let history = vec![undated("Baterie", None), undated("Baterie", Some(""))];
        let frequency = calculate_frequency(&history);
        assert_eq!(frequency["baterie"].category, DEFAULT_CATEGORY);
        assert_eq!(frequency["baterie"].last_purchase, None);
    }

    #[test]
    fn test_empty_history_yields_empty_set() {
        let current = vec![CurrentItem::new("Mleko", Some("Nabiał"))];

        assert!(generate_suggestions(&[], &[], now()).is_empty());
        assert_eq!(
            generate_suggestions(&[], &current, now()),
            SuggestionSet::default()
        );
    }

    #[test]
    fn test_weekly_purchases_are_regular() {
        let history: Vec<_> = (0..5)
            .map(|i| bought("Mleko", Some("Nabiał"), now() - Duration::days(i * 7)))
            .collect();

        let result = generate_suggestions(&history, &[], now());

        assert_eq!(result.regular.len(), 1);
        assert_eq!(result.regular[0].name, "Mleko");
        assert_eq!(result.regular[0].score, 5);
        assert_eq!(result.regular[0].category.as_deref(), Some("Nabiał"));
        assert_eq!(result.regular[0].reason, "Kupowane regularnie (5 razy)");
        assert_eq!(result.regular[0].last_purchase, Some(now()));
        assert!(names(&result.suggestions).contains(&"Mleko".to_string()));
        // Bought today, so not overdue
        assert!(result.overdue.is_empty());
    }

    #[test]
    fn test_regular_requires_three_purchases() {
        let history = vec![
            bought("Chleb", None, now()),
            bought("Chleb", None, now()),
            undated("Jajka", None),
            undated("Jajka", None),
            undated("Jajka", None),
        ];

        let result = generate_suggestions(&history, &[], now());
        assert_eq!(names(&result.regular), vec!["Jajka"]);
    }

    #[test]
    fn test_overdue_after_a_week() {
        let history = vec![
            bought("Mleko", Some("Nabiał"), now() - Duration::days(8)),
            bought("Mleko", Some("Nabiał"), now() - Duration::days(15)),
        ];

        let result = generate_suggestions(&history, &[], now());

        assert_eq!(result.overdue.len(), 1);
        let mleko = &result.overdue[0];
        assert_eq!(mleko.name, "Mleko");
        assert_eq!(mleko.days_since, Some(8));
        assert_eq!(mleko.score, 2);
        assert_eq!(mleko.reason, "Ostatnio kupowane 8 dni temu");
        assert_eq!(mleko.suggestion_type, SuggestionType::Overdue);
    }

    #[test]
    fn test_overdue_threshold_is_exclusive() {
        let history = vec![
            bought("Masło", None, now() - Duration::days(7)),
            bought("Masło", None, now() - Duration::days(14)),
            // 7.5 days: past the threshold, floored to 7 for display
            bought("Ser", None, now() - Duration::hours(180)),
            bought("Ser", None, now() - Duration::days(20)),
        ];

        let result = generate_suggestions(&history, &[], now());
        assert_eq!(names(&result.overdue), vec!["Ser"]);
        assert_eq!(result.overdue[0].days_since, Some(7));
    }

    #[test]
    fn test_overdue_needs_two_dated_purchases() {
        let history = vec![
            bought("Kawa", None, now() - Duration::days(30)),
            undated("Herbata", None),
            undated("Herbata", None),
        ];

        let result = generate_suggestions(&history, &[], now());
        assert!(result.overdue.is_empty());
    }

    #[test]
    fn test_overdue_sorted_by_days_since() {
        let history = vec![
            bought("A", None, now() - Duration::days(10)),
            bought("A", None, now() - Duration::days(20)),
            bought("B", None, now() - Duration::days(30)),
            bought("B", None, now() - Duration::days(40)),
            bought("C", None, now() - Duration::days(9)),
            bought("C", None, now() - Duration::days(12)),
        ];

        let result = generate_suggestions(&history, &[], now());
        assert_eq!(names(&result.overdue), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_listed_items_never_suggested() {
        let history = vec![
            bought("Mleko", Some("Nabiał"), now()),
            bought("Mleko", Some("Nabiał"), now()),
            bought("Mleko", Some("Nabiał"), now()),
        ];
        let current = vec![CurrentItem::new("Mleko", None)];

        let result = generate_suggestions(&history, &current, now());

        assert!(all_lists(&result)
            .iter()
            .all(|s| normalize_name(&s.name) != "mleko"));
    }

    #[test]
    fn test_listed_items_matched_case_insensitively() {
        let mut history = Vec::new();
        for days in [9, 16, 23] {
            history.push(bought("Mleko", Some("Nabiał"), now() - Duration::days(days)));
            history.push(bought("Ser", Some("Nabiał"), now() - Duration::days(days)));
            history.push(bought("Chleb", Some("Pieczywo"), now() - Duration::days(days)));
        }
        let current = vec![
            CurrentItem::new("  MLEKO ", Some("Nabiał")),
            CurrentItem::new("chleb", Some("Nabiał")),
        ];

        let result = generate_suggestions(&history, &current, now());

        for suggestion in all_lists(&result) {
            let key = normalize_name(&suggestion.name);
            assert_ne!(key, "mleko");
            assert_ne!(key, "chleb");
        }
        assert!(names(&result.regular).contains(&"Ser".to_string()));
    }

    #[test]
    fn test_category_suggestions() {
        let history = vec![
            undated("Mleko", Some("Nabiał")),
            undated("Ser", Some("Nabiał")),
            undated("Jogurt", Some("Nabiał")),
            undated("Jogurt", Some("Nabiał")),
            undated("Chleb", Some("Pieczywo")),
        ];
        let current = vec![CurrentItem::new("Mleko", Some("Nabiał"))];

        let suggestions = category_suggestions(&history, &current);

        assert_eq!(names(&suggestions), vec!["Jogurt", "Ser"]);
        assert_eq!(suggestions[0].score, 2);
        assert_eq!(suggestions[0].category.as_deref(), Some("Nabiał"));
        assert_eq!(suggestions[0].reason, "Często kupowane w kategorii Nabiał");
    }

    #[test]
    fn test_category_suggestions_default_category() {
        let history = vec![undated("Baterie", None), undated("Żarówka", Some("Inne"))];
        let current = vec![CurrentItem::new("Taśma", None)];

        let suggestions = category_suggestions(&history, &current);
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions
            .iter()
            .all(|s| s.category.as_deref() == Some(DEFAULT_CATEGORY)));
    }

    #[test]
    fn test_category_suggestions_capped() {
        let mut history = Vec::new();
        for name in ["a1", "a2", "a3", "a4"] {
            history.push(undated(name, Some("A")));
        }
        for name in ["b1", "b2", "b3", "b4"] {
            history.push(undated(name, Some("B")));
        }
        let current = vec![
            CurrentItem::new("a0", Some("A")),
            CurrentItem::new("b0", Some("B")),
        ];

        let suggestions = category_suggestions(&history, &current);

        assert_eq!(suggestions.len(), RULE_LIMIT);
        // Three from the first listed category, then the remainder from the next
        assert!(suggestions[..3]
            .iter()
            .all(|s| s.category.as_deref() == Some("A")));
        assert!(suggestions[3..]
            .iter()
            .all(|s| s.category.as_deref() == Some("B")));
    }

    #[test]
    fn test_complementary_items() {
        let d1 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let d2 = Utc.with_ymd_and_hms(2024, 1, 8, 10, 0, 0).unwrap();
        let history = vec![
            bought("Mleko", None, d1),
            bought("Chleb", None, d1),
            bought("Mleko", None, d2),
            bought("Chleb", None, d2),
            bought("Jajka", None, d2),
        ];
        let current = vec![CurrentItem::new("Mleko", None)];

        let complementary = complementary_items(&history, &current);

        assert_eq!(names(&complementary), vec!["Chleb", "Jajka"]);
        assert_eq!(complementary[0].score, 4);
        assert_eq!(complementary[0].reason, "Często kupowane razem z mleko");
        assert_eq!(complementary[1].score, 2);
        assert!(complementary.iter().all(|s| s.category.is_none()));
    }

    #[test]
    fn test_same_day_pairs_ignore_time_of_day() {
        let morning = Utc.with_ymd_and_hms(2024, 1, 1, 0, 5, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 1, 1, 23, 55, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2024, 1, 2, 0, 5, 0).unwrap();
        let history = vec![
            bought("Kawa", None, morning),
            bought("Cukier", None, evening),
            bought("Mleko", None, next_day),
            undated("Kawa", None),
            undated("Mleko", None),
        ];

        let pairs = same_day_pairs(&history);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[&("cukier".to_string(), "kawa".to_string())], 2);
    }

    #[test]
    fn test_same_day_pairs_count_repeats() {
        let day = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let history = vec![
            bought("Mleko", None, day),
            bought("mleko", None, day),
            bought("Chleb", None, day),
        ];

        let pairs = same_day_pairs(&history);
        assert_eq!(pairs[&("chleb".to_string(), "mleko".to_string())], 4);
    }

    #[test]
    fn test_complementary_requires_exactly_one_listed() {
        let day = now() - Duration::days(2);
        let history = vec![
            bought("Mleko", None, day),
            bought("Chleb", None, day),
            bought("Masło", None, day),
        ];
        let current = vec![
            CurrentItem::new("Mleko", None),
            CurrentItem::new("Chleb", None),
        ];

        let complementary = complementary_items(&history, &current);
        assert_eq!(names(&complementary), vec!["Masło"]);
    }

    #[test]
    fn test_merge_dedupes_with_precedence() {
        // Regular (3 purchases) and overdue (last one 10 days ago) at once
        let history = vec![
            bought("Ser", Some("Nabiał"), now() - Duration::days(10)),
            bought("Ser", Some("Nabiał"), now() - Duration::days(17)),
            bought("Ser", Some("Nabiał"), now() - Duration::days(24)),
        ];

        let result = generate_suggestions(&history, &[], now());

        assert_eq!(result.regular.len(), 1);
        assert_eq!(result.overdue.len(), 1);
        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(
            result.suggestions[0].suggestion_type,
            SuggestionType::Regular
        );
    }

    #[test]
    fn test_merged_list_capped_and_unique() {
        let mut history = Vec::new();
        // Regular: bought 3 times, undated
        for i in 0..6 {
            for _ in 0..3 {
                history.push(undated(&format!("regularny {}", i), Some("R")));
            }
        }
        // Overdue: bought twice, last time 10 days ago
        for i in 0..6 {
            let name = format!("zaległy {}", i);
            history.push(bought(&name, Some("O"), now() - Duration::days(10)));
            history.push(bought(&name, Some("O"), now() - Duration::days(20)));
        }
        // Category: once each in the listed item's category
        for i in 0..4 {
            history.push(undated(&format!("kategoria {}", i), Some("C")));
        }
        // Complementary: bought together with the listed item
        let together = now() - Duration::days(30);
        history.push(bought("Lista", Some("C"), together));
        for i in 0..6 {
            history.push(bought(&format!("para {}", i), Some("P"), together));
        }
        let current = vec![CurrentItem::new("lista", Some("C"))];

        let result = generate_suggestions(&history, &current, now());

        assert_eq!(result.regular.len(), RULE_LIMIT);
        assert_eq!(result.overdue.len(), RULE_LIMIT);
        assert_eq!(result.category.len(), 3);
        assert_eq!(result.complementary.len(), RULE_LIMIT);
        assert_eq!(result.suggestions.len(), MERGED_LIMIT);

        let unique: HashSet<String> = result
            .suggestions
            .iter()
            .map(|s| normalize_name(&s.name))
            .collect();
        assert_eq!(unique.len(), result.suggestions.len());

        let scores: Vec<i64> = result.suggestions.iter().map(|s| s.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));

        // Overdue and complementary both score 2; overdue wins the tie
        assert!(result.suggestions[..5]
            .iter()
            .all(|s| s.suggestion_type == SuggestionType::Regular));
        assert!(result.suggestions[5..]
            .iter()
            .all(|s| s.suggestion_type == SuggestionType::Overdue));

        assert!(all_lists(&result)
            .iter()
            .all(|s| normalize_name(&s.name) != "lista"));
    }

    #[test]
    fn test_regular_and_overdue_thresholds_hold() {
        let mut history = Vec::new();
        for (name, count, gap) in [("a", 1, 9), ("b", 2, 9), ("c", 3, 1), ("d", 4, 12)] {
            for k in 1..=count {
                history.push(bought(name, None, now() - Duration::days(gap * k)));
            }
        }

        let result = generate_suggestions(&history, &[], now());
        let frequency = calculate_frequency(&history);

        for s in &result.regular {
            assert!(frequency[&normalize_name(&s.name)].count >= REGULAR_MIN_COUNT);
        }
        for s in &result.overdue {
            assert!(frequency[&normalize_name(&s.name)].count >= OVERDUE_MIN_COUNT);
            assert!(s.days_since.unwrap() > OVERDUE_AFTER_DAYS);
        }
        assert_eq!(names(&result.overdue), vec!["D", "B"]);
    }

    #[test]
    fn test_capitalize_unicode() {
        assert_eq!(capitalize("śmietana"), "Śmietana");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_display_name_keeps_normalized_form() {
        assert_eq!(display_name("mleko"), "Mleko");
        assert_eq!(display_name("straße"), "Straße");
        // Dotless i uppercases to I, which lowercases to a different name
        assert_eq!(display_name("ıx"), "ıx");
        assert_eq!(display_name("ßx"), "ßx");
    }

    #[test]
    fn test_case_mapping_never_collides_with_list() {
        let mut history = Vec::new();
        for days in [9, 16, 23] {
            history.push(bought("ıx", Some("Inne"), now() - Duration::days(days)));
            history.push(bought("ßx", Some("Inne"), now() - Duration::days(days)));
        }
        let current = vec![
            CurrentItem::new("ix", Some("Inne")),
            CurrentItem::new("ssx", Some("Inne")),
        ];

        let result = generate_suggestions(&history, &current, now());

        for suggestion in all_lists(&result) {
            let key = normalize_name(&suggestion.name);
            assert_ne!(key, "ix");
            assert_ne!(key, "ssx");
        }
        assert_eq!(names(&result.regular), vec!["ßx", "ıx"]);

        for list in [&result.regular, &result.overdue, &result.category] {
            let unique: HashSet<String> = list.iter().map(|s| normalize_name(&s.name)).collect();
            assert_eq!(unique.len(), list.len());
        }
    }

    #[test]
    fn test_listed_item_excluded_across_categories() {
        let history = vec![
            undated("Mleko", Some("Nabiał")),
            undated("Mleko", Some("Nabiał")),
            undated("Jogurt", Some("Nabiał")),
        ];
        // Mleko is listed without a category; Ser brings Nabiał onto the list
        let current = vec![
            CurrentItem::new("Mleko", None),
            CurrentItem::new("Ser", Some("Nabiał")),
        ];

        let suggestions = category_suggestions(&history, &current);

        assert_eq!(names(&suggestions), vec!["Jogurt"]);
    }

    #[test]
    fn test_complementary_example_through_generate() {
        let d1 = now() - Duration::days(3);
        let d2 = now() - Duration::days(10);
        let history = vec![
            bought("Mleko", Some("Nabiał"), d1),
            bought("Chleb", Some("Pieczywo"), d1),
            bought("Mleko", Some("Nabiał"), d2),
            bought("Chleb", Some("Pieczywo"), d2),
        ];
        let current = vec![CurrentItem::new("Mleko", None)];

        let result = generate_suggestions(&history, &current, now());
        assert_eq!(names(&result.complementary), vec!["Chleb"]);
        assert!(result.suggestions.iter().any(|s| s.name == "Chleb"));
    }
}
