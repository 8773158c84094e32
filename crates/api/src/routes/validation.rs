//! Route definitions for the `/validation` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::validation;
use crate::state::AppState;

/// Routes mounted at `/validation`.
///
/// ```text
/// GET    /profiles    -> list_profiles
/// POST   /{profile}   -> validate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profiles", get(validation::list_profiles))
        .route("/{profile}", post(validation::validate))
}
