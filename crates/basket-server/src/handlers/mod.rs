//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod auth;
pub mod health;
pub mod items;
pub mod suggestions;

// Re-export all handlers for use in router
pub use auth::*;
pub use health::*;
pub use items::*;
pub use suggestions::*;

use axum::extract::Request;
use http_body_util::LengthLimitError;
use serde::de::DeserializeOwned;

use crate::{AppError, MAX_BODY_SIZE};

/// Read and parse a JSON request body
///
/// An empty body parses as `T::default()` when `allow_empty` is set. Bodies
/// over [`MAX_BODY_SIZE`] are 413, like the body limit layer.
pub(crate) async fn read_json<T>(request: Request, allow_empty: bool) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|e| {
            if e.into_inner().is::<LengthLimitError>() {
                AppError::payload_too_large("Request body too large")
            } else {
                AppError::bad_request("Invalid request body")
            }
        })?;

    if allow_empty && bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(&bytes).map_err(|_| AppError::bad_request("Invalid JSON"))
}
