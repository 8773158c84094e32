use axum::routing::post;
use axum::Router;

use crate::handlers::forms;
use crate::state::AppState;

/// Routes mounted at `/sales`.
///
/// ```text
/// POST /pergamino  -> sell_pergamino
/// POST /packaged   -> sell_packaged
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pergamino", post(forms::sell_pergamino))
        .route("/packaged", post(forms::sell_packaged))
}
