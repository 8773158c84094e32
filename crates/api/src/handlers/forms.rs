//! Form endpoints for users, sales, lots and drying logs.
//!
//! Each endpoint is a fixed binding to one validation profile; the sanitized
//! record is handed back for the persistence layer to store.

use axum::extract::State;
use axum::Json;
use toastem_core::validation::profiles;
use toastem_core::validation::SanitizedRecord;

use super::validation::run_profile;
use crate::error::AppResult;
use crate::extract::RawInput;
use crate::response::DataResponse;
use crate::state::AppState;

type FormResponse = AppResult<Json<DataResponse<SanitizedRecord>>>;

/// POST /api/v1/auth/register
pub async fn register(State(state): State<AppState>, RawInput(input): RawInput) -> FormResponse {
    run_profile(&state, profiles::REGISTRATION, &input)
}

/// POST /api/v1/auth/login
pub async fn login(State(state): State<AppState>, RawInput(input): RawInput) -> FormResponse {
    run_profile(&state, profiles::LOGIN, &input)
}

/// POST /api/v1/auth/recover
pub async fn recover_password(
    State(state): State<AppState>,
    RawInput(input): RawInput,
) -> FormResponse {
    run_profile(&state, profiles::PASSWORD_RECOVERY, &input)
}

/// POST /api/v1/auth/password
pub async fn update_password(
    State(state): State<AppState>,
    RawInput(input): RawInput,
) -> FormResponse {
    run_profile(&state, profiles::PASSWORD_UPDATE, &input)
}

/// POST /api/v1/sales/pergamino
pub async fn sell_pergamino(
    State(state): State<AppState>,
    RawInput(input): RawInput,
) -> FormResponse {
    run_profile(&state, profiles::PERGAMINO_SALE, &input)
}

/// POST /api/v1/sales/packaged
pub async fn sell_packaged(State(state): State<AppState>, RawInput(input): RawInput) -> FormResponse {
    run_profile(&state, profiles::PACKAGED_SALE, &input)
}

/// POST /api/v1/lots
pub async fn create_lot(State(state): State<AppState>, RawInput(input): RawInput) -> FormResponse {
    run_profile(&state, profiles::COFFEE_LOT, &input)
}

/// POST /api/v1/drying-logs
pub async fn create_drying_log(
    State(state): State<AppState>,
    RawInput(input): RawInput,
) -> FormResponse {
    run_profile(&state, profiles::DRYING_LOG, &input)
}
