use crate::write;

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result, to_item};
use std::collections;

/// put item operation
#[derive(Debug, PartialEq)]
struct PutItemInput {
    item: collections::HashMap<String, types::AttributeValue>,
    write_operation: write::common::WriteInput,
}

/// Put item operation: writes the whole item, replacing any item with the same key.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use simple_crud_api::{user, write};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let key = user::UserKey {
///     user_id: "123".to_string(),
///     username: "alice".to_string(),
/// };
/// let put_item = write::put_item::PutItem {
///     item: user::User::new(key, user::Status::Inactive, user::today()),
///     write_args: write::common::WriteArgs {
///         table_name: "Users-dev".to_string(),
///         ..Default::default()
///     },
/// };
/// put_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq)]
pub struct PutItem<T> {
    /// The item to put into the table.
    pub item: T,
    /// Table name, condition and return values.
    pub write_args: write::common::WriteArgs,
}

impl<T: Serialize> TryFrom<PutItem<T>> for PutItemInput {
    type Error = Error;

    fn try_from(put_item: PutItem<T>) -> Result<Self> {
        let item = to_item(put_item.item)?;
        let write_operation: write::common::WriteInput = put_item.write_args.try_into()?;
        let operation = Self {
            item,
            write_operation,
        };
        Ok(operation)
    }
}

impl<T: Serialize + std::fmt::Debug> PutItem<T> {
    /// Execute the put item operation.
    #[tracing::instrument(name = "simple_crud_api.put_item", skip(client), err)]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<
        operation::put_item::PutItemOutput,
        error::SdkError<operation::put_item::PutItemError>,
    > {
        let put_item: PutItemInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client.put_item().set_item(Some(put_item.item));
        crate::apply_write_operation!(builder, put_item.write_operation)
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::user;

    use rstest::rstest;

    fn alice(created_date: Option<&str>) -> user::User {
        user::User {
            user_id: "123".to_string(),
            username: "alice".to_string(),
            status: user::Status::Inactive,
            created_date: created_date.map(str::to_string),
        }
    }

    #[rstest]
    #[case::blind_upsert(
        PutItem {
            item: alice(Some("10/18/26")),
            write_args: write::common::WriteArgs {
                table_name: "Users-dev".to_string(),
                ..Default::default()
            },
        },
        PutItemInput {
            item: collections::HashMap::from(
                [
                    (
                        "user_id".to_string(),
                        types::AttributeValue::S(
                            "123".to_string()
                        ),
                    ),
                    (
                        "username".to_string(),
                        types::AttributeValue::S(
                            "alice".to_string()
                        ),
                    ),
                    (
                        "status".to_string(),
                        types::AttributeValue::S(
                            "INACTIVE".to_string()
                        ),
                    ),
                    (
                        "created_date".to_string(),
                        types::AttributeValue::S(
                            "10/18/26".to_string()
                        ),
                    ),
                ]
            ),
            write_operation: write::common::WriteInput {
                table_name: "Users-dev".to_string(),
                ..Default::default()
            },
        }
    )]
    #[case::partial_record_omits_created_date(
        PutItem {
            item: alice(None),
            write_args: write::common::WriteArgs {
                table_name: "Users-prod".to_string(),
                ..Default::default()
            },
        },
        PutItemInput {
            item: collections::HashMap::from(
                [
                    (
                        "user_id".to_string(),
                        types::AttributeValue::S(
                            "123".to_string()
                        ),
                    ),
                    (
                        "username".to_string(),
                        types::AttributeValue::S(
                            "alice".to_string()
                        ),
                    ),
                    (
                        "status".to_string(),
                        types::AttributeValue::S(
                            "INACTIVE".to_string()
                        ),
                    ),
                ]
            ),
            write_operation: write::common::WriteInput {
                table_name: "Users-prod".to_string(),
                ..Default::default()
            },
        }
    )]
    fn test_put_item(#[case] args: PutItem<user::User>, #[case] expected: PutItemInput) {
        let actual: PutItemInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }
}
