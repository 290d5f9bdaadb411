//! HTTP routes of the users API.

use crate::{handler::UserHandler, response::ApiResponse};

use axum::{Router, body::Bytes, extract::State, routing::get};
use serde_json::Value;
use std::sync;
use tower_http::trace::TraceLayer;

/// Path of the single-record operations.
pub const USER_PATH: &str = "/simple-crud-api/user";

/// Path of the status index query.
pub const USER_INDEX_PATH: &str = "/simple-crud-api/user/index";

type SharedHandler = State<sync::Arc<UserHandler>>;

/// Read the request body as JSON. Anything that is not JSON becomes `null`,
/// which every schema rejects as an invalid input type.
fn payload(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|err| {
        if !body.is_empty() {
            tracing::debug!(error = %err, "request body is not JSON");
        }
        Value::Null
    })
}

async fn get_user(State(handler): SharedHandler, body: Bytes) -> ApiResponse {
    handler.get_user(&payload(&body)).await
}

async fn create_user(State(handler): SharedHandler, body: Bytes) -> ApiResponse {
    handler.create_user(&payload(&body)).await
}

async fn update_user(State(handler): SharedHandler, body: Bytes) -> ApiResponse {
    handler.update_user(&payload(&body)).await
}

async fn delete_user(State(handler): SharedHandler, body: Bytes) -> ApiResponse {
    handler.delete_user(&payload(&body)).await
}

async fn index_query(State(handler): SharedHandler, body: Bytes) -> ApiResponse {
    handler.index_query(&payload(&body)).await
}

/// Create the application router with all routes and middleware.
pub fn create_app(handler: UserHandler) -> Router {
    Router::new()
        .route(
            USER_PATH,
            get(get_user)
                .post(create_user)
                .put(update_user)
                .delete(delete_user),
        )
        .route(USER_INDEX_PATH, get(index_query))
        .layer(TraceLayer::new_for_http())
        .with_state(sync::Arc::new(handler))
}
