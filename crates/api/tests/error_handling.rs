//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server needed.

use assert_matches::assert_matches;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use toastem_api::error::AppError;
use toastem_core::error::CoreError;
use toastem_core::validation::profiles::ProfileError;
use toastem_core::validation::{ErrorMap, Rejection, ValidationError};

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Farm",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Farm with id 42 not found");
}

#[tokio::test]
async fn unknown_profile_returns_404() {
    let err = AppError::Core(CoreError::UnknownProfile("cosecha".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Unknown validation profile 'cosecha'");
}

#[tokio::test]
async fn rejection_returns_400_with_field_list() {
    let mut errors = ErrorMap::new();
    errors.push(ValidationError::new("password", "Ingrese su contraseña"));
    let err = AppError::Rejected(Rejection { errors });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(
        json["errors"],
        serde_json::json!([{"field": "password", "message": "Ingrese su contraseña"}])
    );
}

#[tokio::test]
async fn single_message_validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("El nombre de la finca es obligatorio".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "El nombre de la finca es obligatorio");
    assert!(json.get("errors").is_none());
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid body".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid body");
}

#[tokio::test]
async fn internal_errors_return_500_and_sanitize_the_message() {
    for err in [
        AppError::InternalError("secret detail".into()),
        AppError::Core(CoreError::Internal("sanitizer precondition violated".into())),
    ] {
        let (status, json) = error_to_response(err).await;

        assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"], "An internal error occurred");
    }
}

#[test]
fn profile_errors_keep_their_channel() {
    let mut errors = ErrorMap::new();
    errors.push(ValidationError::new("cantidad", "Ingrese la cantidad"));

    assert_matches!(
        AppError::from(ProfileError::Rejected(Rejection { errors })),
        AppError::Rejected(rejection) if rejection.errors.contains("cantidad")
    );
    assert_matches!(
        AppError::from(ProfileError::Core(CoreError::Internal("boom".into()))),
        AppError::Core(CoreError::Internal(_))
    );
}
