//! Handlers for the `/farms` resource.
//!
//! Farm writes go through the throwing guards in `toastem_core::farm`. A
//! guard failure is reported as one message, not as a field error list.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use toastem_core::error::CoreError;
use toastem_core::farm::{FarmDraft, FarmGuardError};
use toastem_core::types::DbId;
use toastem_core::validation::FormInput;

use crate::error::{AppError, AppResult};
use crate::extract::RawInput;
use crate::response::DataResponse;

/// A guarded farm, with its id once it refers to a stored record.
#[derive(Debug, Serialize)]
pub struct FarmResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    #[serde(flatten)]
    pub farm: FarmDraft,
}

/// POST /api/v1/farms
pub async fn create_farm(
    RawInput(input): RawInput,
) -> AppResult<(StatusCode, Json<DataResponse<FarmResponse>>)> {
    let farm = guarded_draft(&input)?;
    tracing::debug!(nombre = %farm.nombre, "Farm accepted for creation");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: FarmResponse { id: None, farm },
        }),
    ))
}

/// PUT /api/v1/farms/{id}
pub async fn update_farm(
    Path(id): Path<DbId>,
    RawInput(input): RawInput,
) -> AppResult<Json<DataResponse<FarmResponse>>> {
    if id <= 0 {
        return Err(AppError::Core(CoreError::NotFound { entity: "Farm", id }));
    }
    let farm = guarded_draft(&input)?;
    tracing::debug!(id, nombre = %farm.nombre, "Farm accepted for update");
    Ok(Json(DataResponse {
        data: FarmResponse { id: Some(id), farm },
    }))
}

fn guarded_draft(input: &FormInput) -> AppResult<FarmDraft> {
    let name = input.get("nombre").unwrap_or_default();
    FarmDraft::new(name, input.get("ubicacion")).map_err(guard_failure)
}

/// Translate a guard failure into the single-message validation error.
fn guard_failure(err: FarmGuardError) -> AppError {
    tracing::info!(error = %err, "Farm guard refused input");
    AppError::Core(CoreError::Validation(err.to_string()))
}
