//! Handlers for the `/validation` resource.
//!
//! Runs a named validation profile over a submitted form and returns either
//! the sanitized record or the full list of field errors.

use axum::extract::{Path, State};
use axum::Json;
use toastem_core::validation::profiles::{ProfileError, ProfileSummary};
use toastem_core::validation::{FormInput, SanitizedRecord};

use crate::error::AppResult;
use crate::extract::RawInput;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/validation/profiles
///
/// List every profile with the fields its records carry.
pub async fn list_profiles(State(state): State<AppState>) -> Json<DataResponse<Vec<ProfileSummary>>> {
    let data = state.profiles.iter().map(|p| p.describe()).collect();
    Json(DataResponse { data })
}

/// POST /api/v1/validation/{profile}
///
/// Validate and sanitize a submission. 400 with every `{field, message}` on
/// rejection, 404 for an unknown profile.
pub async fn validate(
    State(state): State<AppState>,
    Path(profile): Path<String>,
    RawInput(input): RawInput,
) -> AppResult<Json<DataResponse<SanitizedRecord>>> {
    run_profile(&state, &profile, &input)
}

/// Run one profile and shape the outcome for HTTP.
pub(crate) fn run_profile(
    state: &AppState,
    name: &str,
    input: &FormInput,
) -> AppResult<Json<DataResponse<SanitizedRecord>>> {
    let profile = state.profiles.get(name)?;
    match profile.process(input) {
        Ok(record) => {
            tracing::debug!(profile = name, fields = record.len(), "Form accepted");
            Ok(Json(DataResponse { data: record }))
        }
        Err(ProfileError::Rejected(rejection)) => {
            tracing::info!(
                profile = name,
                fields = rejection.errors.len(),
                errors = rejection.errors.error_count(),
                "Form rejected"
            );
            Err(rejection.into())
        }
        Err(err) => Err(err.into()),
    }
}
