//! Request body extractor for form submissions.

use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde_json::{Map, Value};
use toastem_core::validation::FormInput;

use crate::error::AppError;

/// Raw form input from either a JSON object or an urlencoded HTML form.
///
/// The body is picked by `Content-Type`: `application/json` is read as a JSON
/// object, anything else as `application/x-www-form-urlencoded`. JSON arrays
/// or objects as field values are refused with 400.
#[derive(Debug)]
pub struct RawInput(pub FormInput);

impl<S> FromRequest<S> for RawInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(body) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            let input = FormInput::from_json_object(&body)
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            Ok(Self(input))
        } else {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self(pairs.into_iter().collect()))
        }
    }
}
