use axum::routing::post;
use axum::Router;

use crate::handlers::forms;
use crate::state::AppState;

/// Lot and drying-log routes, merged at the `/api/v1` root.
///
/// ```text
/// POST /lots         -> create_lot
/// POST /drying-logs  -> create_drying_log
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lots", post(forms::create_lot))
        .route("/drying-logs", post(forms::create_drying_log))
}
