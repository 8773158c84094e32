pub mod auth;
pub mod farms;
pub mod health;
pub mod lots;
pub mod sales;
pub mod validation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /validation/profiles                 list profiles
/// /validation/{profile}                validate any profile (POST)
///
/// /auth/register                       user registration
/// /auth/login                          login form
/// /auth/recover                        password-recovery request
/// /auth/password                       password update
///
/// /sales/pergamino                     sale of unprocessed coffee
/// /sales/packaged                      sale of packaged coffee
///
/// /lots                                coffee lot
/// /drying-logs                         drying-process log
///
/// /farms                               create (POST)
/// /farms/{id}                          update (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Generic profile runner.
        .nest("/validation", validation::router())
        // User forms.
        .nest("/auth", auth::router())
        // Sales forms.
        .nest("/sales", sales::router())
        // Lots and drying logs.
        .merge(lots::router())
        // Farm create/update behind the farm guards.
        .nest("/farms", farms::router())
}
