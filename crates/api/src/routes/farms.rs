//! Route definitions for the `/farms` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::farm;
use crate::state::AppState;

/// Routes mounted at `/farms`.
///
/// ```text
/// POST /       -> create_farm
/// PUT  /{id}   -> update_farm
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(farm::create_farm))
        .route("/{id}", put(farm::update_farm))
}
