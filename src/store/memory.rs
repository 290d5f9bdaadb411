use crate::{
    store::{self, StoreError, StoreOptions, UserPage, UserStore},
    user,
};

use async_trait::async_trait;
use std::{collections, sync};
use tokio::sync::RwLock;

/// Table name reported by [`InMemoryUserStore`].
pub const IN_MEMORY_TABLE: &str = "in-memory";

/// Reject an empty key attribute the way DynamoDB does.
fn check_key(operation: &str, user_id: &str, username: &str) -> store::Result<()> {
    match [(user::USER_ID, user_id), (user::USERNAME, username)]
        .into_iter()
        .find(|(_, value)| value.is_empty())
    {
        Some((name, _)) => Err(StoreError::new(
            operation,
            store::VALIDATION_EXCEPTION,
            format!(
                "One or more parameter values are not valid. The AttributeValue for a key \
                 attribute cannot contain an empty string value. Key: {name}"
            ),
        )),
        None => Ok(()),
    }
}

/// In-memory users table.
///
/// Reproduces what the DynamoDB table does for the operations the API uses:
/// empty key attributes are rejected, puts overwrite, updates of a missing
/// key create a partial record (or fail the existence condition in strict
/// mode), and status queries are capped. Records are lost when the last
/// clone is dropped.
#[derive(Clone, Debug, Default)]
pub struct InMemoryUserStore {
    users: sync::Arc<RwLock<collections::BTreeMap<user::UserKey, user::User>>>,
    options: StoreOptions,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    pub fn new(options: StoreOptions) -> Self {
        Self {
            users: Default::default(),
            options,
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store holds no record.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    fn table_name(&self) -> &str {
        IN_MEMORY_TABLE
    }

    async fn get(&self, key: &user::UserKey) -> store::Result<Option<user::User>> {
        check_key(store::GET_ITEM, &key.user_id, &key.username)?;
        Ok(self.users.read().await.get(key).cloned())
    }

    async fn put(&self, user: &user::User) -> store::Result<()> {
        check_key(store::PUT_ITEM, &user.user_id, &user.username)?;
        self.users.write().await.insert(user.key(), user.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        key: &user::UserKey,
        status: user::Status,
    ) -> store::Result<user::User> {
        check_key(store::UPDATE_ITEM, &key.user_id, &key.username)?;
        let mut users = self.users.write().await;
        match users.get_mut(key) {
            Some(existing) => {
                existing.status = status;
                Ok(existing.clone())
            }
            None if self.options.strict_update => Err(StoreError::new(
                store::UPDATE_ITEM,
                store::CONDITIONAL_CHECK_FAILED,
                "The conditional request failed",
            )),
            None => {
                let partial = user::User {
                    user_id: key.user_id.clone(),
                    username: key.username.clone(),
                    status,
                    created_date: None,
                };
                users.insert(key.clone(), partial.clone());
                Ok(partial)
            }
        }
    }

    async fn delete(&self, key: &user::UserKey) -> store::Result<Option<user::User>> {
        check_key(store::DELETE_ITEM, &key.user_id, &key.username)?;
        Ok(self.users.write().await.remove(key))
    }

    async fn query_by_status(&self, status: user::Status) -> store::Result<UserPage> {
        let max_items = self.options.max_query_items.get();
        let users = self.users.read().await;
        let mut items: Vec<_> = users
            .values()
            .filter(|user| user.status == status)
            .take(max_items + 1)
            .cloned()
            .collect();
        let truncated = items.len() > max_items;
        items.truncate(max_items);
        Ok(UserPage { items, truncated })
    }
}
