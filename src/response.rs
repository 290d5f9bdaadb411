//! The uniform response envelope.

use crate::{schema, store};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `code` and `message` of every successful outcome.
pub const SUCCESS: &str = "Success";

/// `code` of a rejected payload.
pub const VALIDATION_ERROR: &str = "ValidationError";

/// `message` of a rejected payload.
pub const VALIDATION_MESSAGE: &str = "Failed API request validator";

/// Status DynamoDB reports for every request it serves.
pub const STORE_SUCCESS_STATUS: u16 = 200;

/// Envelope wrapped around every outcome, successful or not.
///
/// ```rust
/// use serde_json::{Value, json};
/// use simple_crud_api::response::ApiResponse;
///
/// let response = ApiResponse::success("create_item", Value::String(String::new()));
/// assert_eq!(
///     serde_json::to_value(&response).unwrap(),
///     json!({
///         "code": "Success",
///         "message": "Success",
///         "http_status_code": 200,
///         "operation": "create_item",
///         "body": "",
///     })
/// );
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ApiResponse {
    /// `Success`, `ValidationError` or the store's error code.
    pub code: String,
    /// Human readable outcome.
    pub message: String,
    /// HTTP status of the outcome; also used as the transport status.
    pub http_status_code: u16,
    /// Handler operation on success and validation failure, store operation on store failure.
    pub operation: String,
    /// Operation specific payload.
    pub body: Value,
}

impl ApiResponse {
    /// A successful outcome of `operation`.
    pub fn success(operation: &str, body: Value) -> Self {
        Self {
            code: SUCCESS.to_string(),
            message: SUCCESS.to_string(),
            http_status_code: STORE_SUCCESS_STATUS,
            operation: operation.to_string(),
            body,
        }
    }

    /// A store failure, carrying the provider's code and message verbatim.
    pub fn store_error(error: &store::StoreError) -> Self {
        Self {
            code: error.code.clone(),
            message: error.message.clone(),
            http_status_code: 500,
            operation: error.operation.to_string(),
            body: Value::String(String::new()),
        }
    }

    /// A rejected payload for `operation`.
    pub fn validation_error(operation: &str, error: &schema::ValidationError) -> Self {
        Self {
            code: VALIDATION_ERROR.to_string(),
            message: VALIDATION_MESSAGE.to_string(),
            http_status_code: 400,
            operation: operation.to_string(),
            body: Value::String(error.to_string()),
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
