use crate::{common, read};

use aws_sdk_dynamodb::{Client, error, operation, types};
use serde::Serialize;
use serde_dynamo::{Error, Result};
use std::collections;

/// query operation
#[derive(Clone, Debug, Default, PartialEq)]
struct QueryInput {
    expression_attribute_names: Option<collections::HashMap<String, String>>,
    expression_attribute_values: Option<collections::HashMap<String, types::AttributeValue>>,
    key_condition_expression: String,
    max_items: Option<usize>,
    multiple_read_operation: read::common::MultipleReadInput,
}

/// Items collected by a [`Query`], across every page that was read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryPage {
    /// Matching items, at most `max_items` of them.
    pub items: Vec<collections::HashMap<String, types::AttributeValue>>,
    /// Whether the item cap cut the result short.
    pub truncated: bool,
}

/// Query operation: an equality lookup on a partition key, usually of an index.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use simple_crud_api::{common, read, user};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let query = read::query::Query {
///     partition_key: common::key::Key {
///         name: user::STATUS.to_string(),
///         value: user::Status::Active,
///     },
///     multiple_read_args: read::common::MultipleReadArgs {
///         index_name: Some("StatusIndex".to_string()),
///         max_items: Some(1000),
///         table_name: "Users-dev".to_string(),
///     },
/// };
/// let page = query.send(client).await?;
/// println!("{} items, truncated: {}", page.items.len(), page.truncated);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query<T> {
    /// Index, table and item cap.
    pub multiple_read_args: read::common::MultipleReadArgs,
    /// The partition key value to query for.
    pub partition_key: common::key::Key<T>,
}

impl<T: Serialize> TryFrom<Query<T>> for QueryInput {
    type Error = Error;

    fn try_from(query: Query<T>) -> Result<Self> {
        let max_items = query.multiple_read_args.max_items;
        let multiple_read_operation = query.multiple_read_args.into();
        let key_condition = common::condition::KeyCondition {
            condition: common::condition::Condition::Equals(query.partition_key.value),
            name: query.partition_key.name,
        };
        let key_condition_operation =
            common::condition::KeyCondition::get_expression_operation(vec![key_condition])?;
        let mut expression_attribute_names = None;
        let mut expression_attribute_values = None;
        let key_condition_expression = key_condition_operation.merge_into(
            &mut expression_attribute_names,
            &mut expression_attribute_values,
        );
        let operation = Self {
            expression_attribute_names,
            expression_attribute_values,
            key_condition_expression,
            max_items,
            multiple_read_operation,
        };
        Ok(operation)
    }
}

impl<T: Serialize + std::fmt::Debug> Query<T> {
    /// Execute the query, following pages until the item cap is reached.
    #[tracing::instrument(name = "simple_crud_api.query", skip(client), err)]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<QueryPage, error::SdkError<operation::query::QueryError>> {
        let query: QueryInput = self.try_into().map_err(error::BuildError::other)?;
        let builder = client
            .query()
            .key_condition_expression(query.key_condition_expression)
            .set_expression_attribute_names(query.expression_attribute_names)
            .set_expression_attribute_values(query.expression_attribute_values);
        let mut paginator =
            crate::apply_multiple_read_operation!(builder, query.multiple_read_operation)
                .into_paginator()
                .send();
        let mut items = Vec::new();
        let mut last_evaluated_key = None;
        while let Some(page) = paginator.next().await {
            let page = page?;
            last_evaluated_key = page.last_evaluated_key;
            items.extend(page.items.unwrap_or_default());
            if query.max_items.is_some_and(|max_items| items.len() >= max_items) {
                break;
            }
        }
        let truncated = match query.max_items {
            Some(max_items) if items.len() > max_items => {
                items.truncate(max_items);
                true
            }
            Some(max_items) => items.len() == max_items && last_evaluated_key.is_some(),
            None => false,
        };
        if truncated {
            tracing::warn!(returned = items.len(), "query result capped");
        }
        Ok(QueryPage { items, truncated })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::user;

    use rstest::rstest;

    #[rstest]
    #[case::base_table_unbounded(
        Query {
            multiple_read_args: read::common::MultipleReadArgs {
                table_name: "Users-dev".to_string(),
                ..Default::default()
            },
            partition_key: common::key::Key {
                name: "user_id".to_string(),
                value: "123".to_string(),
            },
        },
        QueryInput {
            expression_attribute_names: Some(
                collections::HashMap::from(
                    [
                        ("#user_id".to_string(), "user_id".to_string()),
                    ]
                )
            ),
            expression_attribute_values: Some(
                collections::HashMap::from(
                    [
                        (
                            ":user_id_eq0".to_string(),
                            types::AttributeValue::S(
                                "123".to_string()
                            )
                        ),
                    ]
                )
            ),
            key_condition_expression: "#user_id = :user_id_eq0".to_string(),
            max_items: None,
            multiple_read_operation: read::common::MultipleReadInput {
                table_name: "Users-dev".to_string(),
                ..Default::default()
            },
        }
    )]
    #[case::status_index_capped(
        Query {
            multiple_read_args: read::common::MultipleReadArgs {
                index_name: Some("StatusIndex".to_string()),
                max_items: Some(50),
                table_name: "Users-dev".to_string(),
            },
            partition_key: common::key::Key {
                name: "status".to_string(),
                value: user::Status::Active.to_string(),
            },
        },
        QueryInput {
            expression_attribute_names: Some(
                collections::HashMap::from(
                    [
                        ("#status".to_string(), "status".to_string()),
                    ]
                )
            ),
            expression_attribute_values: Some(
                collections::HashMap::from(
                    [
                        (
                            ":status_eq0".to_string(),
                            types::AttributeValue::S(
                                "ACTIVE".to_string()
                            )
                        ),
                    ]
                )
            ),
            key_condition_expression: "#status = :status_eq0".to_string(),
            max_items: Some(50),
            multiple_read_operation: read::common::MultipleReadInput {
                index_name: Some("StatusIndex".to_string()),
                limit: Some(51),
                table_name: "Users-dev".to_string(),
            },
        }
    )]
    fn test_query(#[case] args: Query<String>, #[case] expected: QueryInput) {
        let actual: QueryInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }
}
