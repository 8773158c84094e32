//! Route definitions for the `/auth` forms.

use axum::routing::post;
use axum::Router;

use crate::handlers::forms;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register  -> register
/// POST /login     -> login
/// POST /recover   -> recover_password
/// POST /password  -> update_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(forms::register))
        .route("/login", post(forms::login))
        .route("/recover", post(forms::recover_password))
        .route("/password", post(forms::update_password))
}
