use crate::{common, read};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result};
use std::collections;

/// get item operation
#[derive(Clone, Debug, Default, PartialEq)]
struct GetItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    single_read_operation: read::common::SingleReadInput,
}

/// Get item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use simple_crud_api::{common, read, user};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let key = user::UserKey {
///     user_id: "123".to_string(),
///     username: "alice".to_string(),
/// };
/// let get_item = read::get_item::GetItem {
///     keys: common::key::Keys::from(&key),
///     single_read_args: read::common::SingleReadArgs {
///         table_name: "Users-dev".to_string(),
///     },
/// };
/// get_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetItem<T> {
    /// The primary key of the item to retrieve.
    pub keys: common::key::Keys<T>,
    /// Table to read from.
    pub single_read_args: read::common::SingleReadArgs,
}

impl<T: Serialize> TryFrom<GetItem<T>> for GetItemInput {
    type Error = Error;

    fn try_from(get_item: GetItem<T>) -> Result<Self> {
        let keys = get_item.keys.try_into()?;
        let operation = Self {
            keys,
            single_read_operation: get_item.single_read_args.into(),
        };
        Ok(operation)
    }
}

impl<T: Serialize + std::fmt::Debug> GetItem<T> {
    /// Execute the get item operation.
    #[tracing::instrument(name = "simple_crud_api.get_item", skip(client), err)]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::get_item::GetItemOutput,
        error::SdkError<operation::get_item::GetItemError>,
    > {
        let get_item: GetItemInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client.get_item().set_key(Some(get_item.keys));
        crate::apply_single_read_operation!(builder, get_item.single_read_operation)
            .send()
            .await
    }
}
