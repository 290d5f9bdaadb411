//! Record store adapter.
//!
//! [`UserStore`] is the only seam between the handlers and persistence. The
//! DynamoDB implementation is used in production; the in-memory one mirrors
//! DynamoDB's semantics for tests and local runs.

/// DynamoDB-backed store.
pub mod dynamodb;

/// In-memory store with DynamoDB semantics.
pub mod memory;

use crate::user;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::{error, fmt, num};

pub use dynamodb::DynamoUserStore;
pub use memory::InMemoryUserStore;

/// Provider operation name of a get.
pub const GET_ITEM: &str = "GetItem";
/// Provider operation name of a create.
pub const PUT_ITEM: &str = "PutItem";
/// Provider operation name of an update.
pub const UPDATE_ITEM: &str = "UpdateItem";
/// Provider operation name of a delete.
pub const DELETE_ITEM: &str = "DeleteItem";
/// Provider operation name of an index query.
pub const QUERY: &str = "Query";

/// Code of a write rejected by its condition.
pub const CONDITIONAL_CHECK_FAILED: &str = "ConditionalCheckFailedException";
/// Code of a request the service refused as malformed, e.g. an empty key attribute.
pub const VALIDATION_EXCEPTION: &str = "ValidationException";
/// Code of a stored item that is not a valid user record.
pub const DESERIALIZATION_ERROR: &str = "DeserializationError";
/// Code of a failure that never reached the service (dispatch, timeout, construction).
pub const SDK_ERROR: &str = "SdkError";

/// Result type returned by every store operation.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// A failed store call, with the provider's code and message kept verbatim.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{operation} failed. Code: {code}. Message: {message}")]
pub struct StoreError {
    /// Provider operation name, e.g. `PutItem`.
    pub operation: String,
    /// Provider error code, e.g. `ResourceNotFoundException`.
    pub code: String,
    /// Provider error message.
    pub message: String,
}

impl StoreError {
    /// Build an error from its parts.
    pub fn new(operation: &str, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.to_string(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Keep the service's code and message, or describe a failure that never got an answer.
    pub(crate) fn from_sdk<E, R>(operation: &str, err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + error::Error + 'static,
        R: fmt::Debug,
    {
        let code = err.code().unwrap_or(SDK_ERROR).to_string();
        let message = match err.message() {
            Some(message) => message.to_string(),
            None => DisplayErrorContext(&err).to_string(),
        };
        Self::new(operation, code, message)
    }
}

/// Tunables shared by every store implementation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StoreOptions {
    /// Most items a status query returns.
    pub max_query_items: num::NonZeroUsize,
    /// Refuse to update a key that holds no record instead of creating a partial one.
    pub strict_update: bool,
}

/// Default cap on status query results.
pub const DEFAULT_MAX_QUERY_ITEMS: num::NonZeroUsize = match num::NonZeroUsize::new(1000) {
    Some(max_query_items) => max_query_items,
    None => num::NonZeroUsize::MIN,
};

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            max_query_items: DEFAULT_MAX_QUERY_ITEMS,
            strict_update: false,
        }
    }
}

/// Users sharing a status.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserPage {
    /// Matching users, at most `max_query_items` of them.
    pub items: Vec<user::User>,
    /// Whether more users matched than were returned.
    pub truncated: bool,
}

/// Persistence of user records.
///
/// Absence is never an error: `get` and `delete` return `None` for a key that
/// holds no record.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Name of the table holding the records, for logs.
    fn table_name(&self) -> &str;

    /// Fetch the record stored under `key`.
    async fn get(&self, key: &user::UserKey) -> Result<Option<user::User>>;

    /// Write `user`, replacing any record with the same key.
    async fn put(&self, user: &user::User) -> Result<()>;

    /// Set the status of the record under `key` and return the record as written.
    ///
    /// Unless [`StoreOptions::strict_update`] is set, a missing key yields a
    /// partial record holding only the key and the status.
    async fn update_status(&self, key: &user::UserKey, status: user::Status) -> Result<user::User>;

    /// Remove the record under `key`, returning it if it existed.
    async fn delete(&self, key: &user::UserKey) -> Result<Option<user::User>>;

    /// Every record with `status`, up to [`StoreOptions::max_query_items`].
    async fn query_by_status(&self, status: user::Status) -> Result<UserPage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    use aws_sdk_dynamodb::{error::ErrorMetadata, operation::get_item::GetItemError};

    #[test]
    fn test_default_options() {
        let options = StoreOptions::default();
        assert_eq!(options.max_query_items.get(), 1000);
        assert!(!options.strict_update);
    }

    #[test]
    fn test_from_sdk_keeps_service_code_and_message() {
        let service_error = GetItemError::generic(
            ErrorMetadata::builder()
                .code("AccessDeniedException")
                .message("User is not authorized to perform: dynamodb:GetItem")
                .build(),
        );
        let err: SdkError<GetItemError, ()> = SdkError::service_error(service_error, ());
        assert_eq!(
            StoreError::from_sdk(GET_ITEM, err),
            StoreError::new(
                GET_ITEM,
                "AccessDeniedException",
                "User is not authorized to perform: dynamodb:GetItem"
            )
        );
    }

    #[test]
    fn test_from_sdk_without_service_answer() {
        let err: SdkError<GetItemError, ()> = SdkError::construction_failure("bad key");
        let store_error = StoreError::from_sdk(GET_ITEM, err);
        assert_eq!(store_error.code, SDK_ERROR);
        assert!(!store_error.message.is_empty());
    }
}
