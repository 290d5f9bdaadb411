//! The five user operations.
//!
//! Each operation validates its payload, issues exactly one store call and
//! wraps the outcome in an [`ApiResponse`]. Validation failures never reach
//! the store.

use crate::{
    response::ApiResponse,
    schema::{self, StatusQueryRequest, UserStatusRequest},
    store::{StoreError, UserStore},
    user,
};

use serde_json::{Value, json};
use std::sync;

/// Operation name of a get.
pub const GET_ITEM: &str = "get_item";
/// Operation name of a create.
pub const CREATE_ITEM: &str = "create_item";
/// Operation name of an update.
pub const UPDATE_ITEM: &str = "update_item";
/// Operation name of a delete.
pub const DELETE_ITEM: &str = "delete_item";
/// Operation name of a status index query.
pub const QUERY: &str = "query";

/// Body of a delete that matched no record.
pub const NO_ITEMS_DELETED: &str = "No items matched. No items deleted.";

fn empty_body() -> Value {
    Value::String(String::new())
}

fn rejected(operation: &str, err: &schema::ValidationError) -> ApiResponse {
    tracing::warn!(operation, errors = %err, "request failed validation");
    ApiResponse::validation_error(operation, err)
}

fn failed(operation: &str, table: &str, err: &StoreError) -> ApiResponse {
    tracing::error!(
        operation,
        table,
        store_operation = %err.operation,
        code = %err.code,
        error_message = %err.message,
        "store call failed"
    );
    ApiResponse::store_error(err)
}

/// Handles user requests against an injected store.
///
/// ```rust
/// use serde_json::json;
/// use simple_crud_api::{handler::UserHandler, store::InMemoryUserStore};
/// use std::sync::Arc;
///
/// # async fn example() {
/// let handler = UserHandler::new(Arc::new(InMemoryUserStore::default()));
/// let response = handler
///     .create_user(&json!({"user_id": "123", "username": "alice"}))
///     .await;
/// assert_eq!(response.http_status_code, 200);
/// # }
/// ```
#[derive(Clone)]
pub struct UserHandler {
    store: sync::Arc<dyn UserStore>,
    clock: fn() -> String,
}

impl UserHandler {
    /// Creates a handler stamping new records with today's local date.
    pub fn new(store: sync::Arc<dyn UserStore>) -> Self {
        Self {
            store,
            clock: user::today,
        }
    }

    /// Replace the source of creation dates.
    pub fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = clock;
        self
    }

    /// Fetch one user by primary key. An absent record yields an empty body.
    pub async fn get_user(&self, input: &Value) -> ApiResponse {
        let key: user::UserKey = match schema::GET_USER.load(input) {
            Ok(key) => key,
            Err(err) => return rejected(GET_ITEM, &err),
        };
        match self.store.get(&key).await {
            Ok(Some(user)) => ApiResponse::success(GET_ITEM, json!(user)),
            Ok(None) => ApiResponse::success(GET_ITEM, empty_body()),
            Err(err) => failed(GET_ITEM, self.store.table_name(), &err),
        }
    }

    /// Write a new user stamped with today's date, replacing any record with the same key.
    pub async fn create_user(&self, input: &Value) -> ApiResponse {
        let request: UserStatusRequest = match schema::CREATE_USER.load(input) {
            Ok(request) => request,
            Err(err) => return rejected(CREATE_ITEM, &err),
        };
        let user = user::User::new(request.key(), request.status, (self.clock)());
        match self.store.put(&user).await {
            Ok(()) => {
                tracing::debug!(user_id = %user.user_id, username = %user.username, "user created");
                ApiResponse::success(CREATE_ITEM, empty_body())
            }
            Err(err) => failed(CREATE_ITEM, self.store.table_name(), &err),
        }
    }

    /// Set the status of one user and return the record as written.
    pub async fn update_user(&self, input: &Value) -> ApiResponse {
        let request: UserStatusRequest = match schema::UPDATE_USER.load(input) {
            Ok(request) => request,
            Err(err) => return rejected(UPDATE_ITEM, &err),
        };
        match self.store.update_status(&request.key(), request.status).await {
            Ok(user) => ApiResponse::success(UPDATE_ITEM, json!(user)),
            Err(err) => failed(UPDATE_ITEM, self.store.table_name(), &err),
        }
    }

    /// Remove one user and return what was removed, or the no-match sentinel.
    pub async fn delete_user(&self, input: &Value) -> ApiResponse {
        let key: user::UserKey = match schema::DELETE_USER.load(input) {
            Ok(key) => key,
            Err(err) => return rejected(DELETE_ITEM, &err),
        };
        match self.store.delete(&key).await {
            Ok(Some(user)) => ApiResponse::success(DELETE_ITEM, json!(user)),
            Ok(None) => {
                ApiResponse::success(DELETE_ITEM, Value::String(NO_ITEMS_DELETED.to_string()))
            }
            Err(err) => failed(DELETE_ITEM, self.store.table_name(), &err),
        }
    }

    /// List users with a given status through the status index.
    pub async fn index_query(&self, input: &Value) -> ApiResponse {
        let request: StatusQueryRequest = match schema::STATUS_INDEX_QUERY.load(input) {
            Ok(request) => request,
            Err(err) => return rejected(QUERY, &err),
        };
        match self.store.query_by_status(request.status).await {
            Ok(page) => ApiResponse::success(
                QUERY,
                json!({
                    "Count": page.items.len(),
                    "Items": page.items,
                    "Truncated": page.truncated,
                }),
            ),
            Err(err) => failed(QUERY, self.store.table_name(), &err),
        }
    }
}
