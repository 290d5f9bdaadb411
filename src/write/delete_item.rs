use crate::{common, write};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result};
use std::collections;

/// delete item operation
#[derive(Debug, PartialEq)]
struct DeleteItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    write_operation: write::common::WriteInput,
}

/// Delete item operation.
///
/// Deleting a key that holds no item succeeds; with `ReturnValue::AllOld`
/// the output simply carries no attributes.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::{Client, types};
/// use simple_crud_api::{common, user, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let key = user::UserKey {
///     user_id: "123".to_string(),
///     username: "alice".to_string(),
/// };
/// let delete_item = write::delete_item::DeleteItem {
///     keys: common::key::Keys::from(&key),
///     write_args: write::common::WriteArgs {
///         return_values: Some(types::ReturnValue::AllOld),
///         table_name: "Users-dev".to_string(),
///         ..Default::default()
///     },
/// };
/// let output = delete_item.send(client).await?;
/// let existed = output.attributes.is_some();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct DeleteItem<T> {
    /// The primary key of the item to delete.
    pub keys: common::key::Keys<T>,
    /// Table name, condition and return values.
    pub write_args: write::common::WriteArgs,
}

impl<T: Serialize> TryFrom<DeleteItem<T>> for DeleteItemInput {
    type Error = Error;

    fn try_from(delete_item: DeleteItem<T>) -> Result<Self> {
        let keys = delete_item.keys.try_into()?;
        let write_operation: write::common::WriteInput = delete_item.write_args.try_into()?;
        let operation = Self {
            keys,
            write_operation,
        };
        Ok(operation)
    }
}

impl<T: Serialize + std::fmt::Debug> DeleteItem<T> {
    /// Execute the delete item operation.
    #[tracing::instrument(name = "simple_crud_api.delete_item", skip(client), err)]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::delete_item::DeleteItemOutput,
        error::SdkError<operation::delete_item::DeleteItemError>,
    > {
        let delete_item: DeleteItemInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client.delete_item().set_key(Some(delete_item.keys));
        crate::apply_write_operation!(builder, delete_item.write_operation)
            .send()
            .await
    }
}
