//! Request extraction
//!
//! A crate-local `Json` extractor whose rejection is the standard error
//! envelope, plus the deserializer that turns an explicit JSON `null`
//! into a field error instead of treating it like an absent field.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::ValidationErrors;
use crate::error::ApiError;

/// `axum::Json` with rejections folded into [`ApiError`], so malformed
/// bodies and type mismatches come back in the same shape as any other
/// validation failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let (field, message) = field_and_message(&err.body_text());
            ValidationErrors::single(&field, message).into()
        }
        JsonRejection::JsonSyntaxError(_) => {
            ValidationErrors::single("body", "Must be valid JSON").into()
        }
        JsonRejection::MissingJsonContentType(_) => {
            ValidationErrors::single("body", "Expected Content-Type: application/json").into()
        }
        _ => ValidationErrors::single("body", "Unable to read request body").into(),
    }
}

/// Recover the failing field from a deserialization error. axum runs serde
/// through a path tracker, so the text reads
/// `Failed to deserialize the JSON body into the target type: <path>:
/// <detail> at line L column C`. Anything without a usable path lands on
/// `body`.
fn field_and_message(detail: &str) -> (String, String) {
    let rest = match detail.split_once(": ") {
        Some((prefix, rest)) if prefix.starts_with("Failed") => rest,
        _ => detail,
    };

    let (field, message) = match rest.split_once(": ") {
        Some((path, message)) if is_field_path(path) => (path.to_string(), message),
        _ => ("body".to_string(), rest),
    };

    let message = match message.rfind(" at line ") {
        Some(idx) => &message[..idx],
        None => message,
    };

    (field, message.to_string())
}

fn is_field_path(path: &str) -> bool {
    !path.is_empty() && path != "." && !path.contains(char::is_whitespace)
}

/// For `Option` fields that default when absent: absence stays `None`, but
/// an explicit `null` is rejected. No field in the API is nullable.
pub(crate) fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<T>::deserialize(deserializer)? {
        Some(value) => Ok(Some(value)),
        None => Err(serde::de::Error::custom("May not be null")),
    }
}
