//! Custom axum extractors for HistoTrack

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::Error;

/// JSON extractor that validates the deserialized value automatically.
///
/// Deserialization and validation errors return 400; bodies over the
/// configured limit return 413.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

/// Rejection type for `ValidatedJson`
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    Json(JsonRejection),
    Validation(Error),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            ValidatedJsonRejection::Json(e) => Error::from_json_rejection(e).into_response(),
            ValidatedJsonRejection::Validation(e) => e.into_response(),
        }
    }
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;
        value
            .validate()
            .map_err(|e| ValidatedJsonRejection::Validation(validation_failed(e)))?;
        Ok(ValidatedJson(value))
    }
}

impl<T> ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
{
    /// Deserialize and validate a body that was extracted as raw JSON.
    ///
    /// For handlers that have to authorize the caller before judging the body.
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        let value: T = serde_json::from_value(value).map_err(|e| {
            Error::Validation(format!("Failed to deserialize the JSON body: {e}"))
        })?;
        value.validate().map_err(validation_failed)?;
        Ok(ValidatedJson(value))
    }
}

fn validation_failed(errors: ValidationErrors) -> Error {
    Error::Validation(format!("Validation failed: {}", errors))
}
