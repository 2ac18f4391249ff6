//! Shopping list handlers
//!
//! Every route is scoped to the authenticated user; another user's item
//! answers 404 exactly like a missing one.

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use basket_core::models::{Item, ItemUpdate, NewItem};

use super::read_json;
use crate::{AppError, AppState, Claims};

/// Request body for creating an item
#[derive(Debug, Default, Deserialize)]
pub struct CreateItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
}

/// Plain confirmation message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for clearing the list
#[derive(Debug, Serialize)]
pub struct DeleteAllResponse {
    pub message: String,
    pub count: usize,
}

fn item_not_found() -> AppError {
    AppError::not_found("Item not found")
}

/// GET /api/items - List the caller's items
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Item>>, AppError> {
    let items = state.db.list_items(claims.id)?;
    Ok(Json(items))
}

/// GET /api/items/:id - Get a single item
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<Item>, AppError> {
    let item = state
        .db
        .get_item(claims.id, id)?
        .ok_or_else(item_not_found)?;
    Ok(Json(item))
}

/// POST /api/items - Add an item to the list
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    request: Request,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let req: CreateItemRequest = read_json(request, true).await?;

    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::bad_request("Name is required"))?;

    let item = state.db.create_item(
        claims.id,
        &NewItem {
            name: name.to_string(),
            category: req.category,
            quantity: req.quantity,
            price: req.price,
        },
    )?;

    info!(user_id = claims.id, item_id = item.id, name = %item.name, "Item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/items/:id - Partially update an item
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Item>, AppError> {
    let update: ItemUpdate = read_json(request, true).await?;

    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::bad_request("Name is required"));
    }

    let item = state
        .db
        .update_item(claims.id, id, &update)?
        .ok_or_else(item_not_found)?;

    info!(user_id = claims.id, item_id = id, bought = item.bought, "Item updated");
    Ok(Json(item))
}

/// DELETE /api/items/:id - Remove an item
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.db.delete_item(claims.id, id)? {
        return Err(item_not_found());
    }

    info!(user_id = claims.id, item_id = id, "Item deleted");
    Ok(Json(MessageResponse {
        message: "Item deleted successfully".to_string(),
    }))
}

/// DELETE /api/items - Clear the caller's list
pub async fn delete_all_items(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DeleteAllResponse>, AppError> {
    let count = state.db.delete_all_items(claims.id)?;

    info!(user_id = claims.id, count, "All items deleted");
    Ok(Json(DeleteAllResponse {
        message: "All items deleted successfully".to_string(),
        count,
    }))
}
