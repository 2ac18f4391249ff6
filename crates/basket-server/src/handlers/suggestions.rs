//! Shopping suggestion handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Extension, Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::debug;

use basket_core::generate_suggestions;
use basket_core::models::{CurrentItem, SuggestionSet};

use super::read_json;
use crate::{AppError, AppState, Claims};

/// How far back purchase history is considered
pub const HISTORY_WINDOW_DAYS: i64 = 60;

/// Request body for suggestions against a client-supplied list
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsRequest {
    #[serde(default)]
    pub current_items: Vec<CurrentItem>,
}

fn suggest(
    state: &AppState,
    user_id: i64,
    current_items: &[CurrentItem],
) -> Result<SuggestionSet, AppError> {
    let now = Utc::now();
    let history = state
        .db
        .purchase_history(user_id, now - Duration::days(HISTORY_WINDOW_DAYS))?;

    let set = generate_suggestions(&history, current_items, now);
    debug!(
        user_id,
        history = history.len(),
        listed = current_items.len(),
        suggested = set.suggestions.len(),
        "Generated suggestions"
    );
    Ok(set)
}

/// POST /api/ai/suggestions - Suggestions for the list sent in the body
pub async fn suggestions(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    request: Request,
) -> Result<Json<SuggestionSet>, AppError> {
    let req: SuggestionsRequest = read_json(request, true).await?;
    let set = suggest(&state, claims.id, &req.current_items)?;
    Ok(Json(set))
}

/// GET /api/ai/suggestions - Suggestions for the caller's stored list
pub async fn suggestions_for_list(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<SuggestionSet>, AppError> {
    let current_items = state.db.current_items(claims.id)?;
    let set = suggest(&state, claims.id, &current_items)?;
    Ok(Json(set))
}
