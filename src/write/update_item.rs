use crate::{common, write};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result, to_attribute_value};
use std::{collections, fmt};

/// Render `SET` assignments, one value placeholder per attribute.
fn get_set_expression<V: Serialize>(
    assignments: Vec<(String, V)>,
) -> Result<common::ExpressionInput> {
    let mut operations = Vec::with_capacity(assignments.len());
    for (index, (name, value)) in assignments.into_iter().enumerate() {
        let placeholder = common::add_placeholder(&name);
        let value_placeholder = format!(":set{index}");
        let value = to_attribute_value(value)?;
        operations.push(common::ExpressionInput {
            expression: format!("{placeholder} = {value_placeholder}"),
            expression_attribute_names: collections::HashMap::from([(placeholder, name)]),
            expression_attribute_values: collections::HashMap::from([(value_placeholder, value)]),
        });
    }
    let mut operation = common::ExpressionInput::merge(", ", operations);
    operation.expression = format!("SET {}", operation.expression);
    Ok(operation)
}

/// update item operation
#[derive(Clone, Debug, Default, PartialEq)]
struct UpdateItemInput {
    keys: collections::HashMap<String, types::AttributeValue>,
    update_expression: String,
    write_operation: write::common::WriteInput,
}

/// Update item operation: assigns the given attributes on one item.
///
/// When no item has the key, DynamoDB creates one holding only the key and
/// the assigned attributes, unless a write condition prevents it.
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
/// let update_item = write::update_item::UpdateItem {
///     keys: common::key::Keys::from(&key),
///     set: vec![(user::STATUS.to_string(), user::Status::Active)],
///     write_args: write::common::WriteArgs {
///         return_values: Some(types::ReturnValue::AllNew),
///         table_name: "Users-dev".to_string(),
///         ..Default::default()
///     },
/// };
/// // SET #status = :set0
/// update_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateItem<K, V> {
    /// The primary key of the item to update.
    pub keys: common::key::Keys<K>,
    /// Attributes to assign, in order.
    pub set: Vec<(String, V)>,
    /// Table name, condition and return values.
    pub write_args: write::common::WriteArgs,
}

impl<K: Serialize, V: Serialize> TryFrom<UpdateItem<K, V>> for UpdateItemInput {
    type Error = Error;

    fn try_from(update_item: UpdateItem<K, V>) -> Result<Self> {
        let keys = update_item.keys.try_into()?;
        let mut write_operation: write::common::WriteInput = update_item.write_args.try_into()?;
        let operation = get_set_expression(update_item.set)?;
        let update_expression = write_operation.merge_expression(operation);
        let operation = Self {
            keys,
            update_expression,
            write_operation,
        };
        Ok(operation)
    }
}

impl<K, V> UpdateItem<K, V>
where
    K: Serialize + fmt::Debug,
    V: Serialize + fmt::Debug,
{
    /// Execute the update item operation.
    #[tracing::instrument(name = "simple_crud_api.update_item", skip(client), err)]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::update_item::UpdateItemOutput,
        error::SdkError<operation::update_item::UpdateItemError>,
    > {
        let update_item: UpdateItemInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client
            .update_item()
            .set_key(Some(update_item.keys))
            .update_expression(update_item.update_expression);
        crate::apply_write_operation!(builder, update_item.write_operation)
            .send()
            .await
    }
}
