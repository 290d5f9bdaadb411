use crate::common;

use aws_sdk_dynamodb::types;
use serde_dynamo::{Error, Result};
use std::collections;

/// Write operation parameters with the condition already rendered.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct WriteInput {
    pub(crate) condition_expression: Option<String>,
    pub(crate) expression_attribute_names: Option<collections::HashMap<String, String>>,
    pub(crate) expression_attribute_values:
        Option<collections::HashMap<String, types::AttributeValue>>,
    pub(crate) return_values: Option<types::ReturnValue>,
    pub(crate) table_name: String,
}

impl WriteInput {
    /// Merge an expression operation into this write operation.
    pub(crate) fn merge_expression(&mut self, operation: common::ExpressionInput) -> String {
        operation.merge_into(
            &mut self.expression_attribute_names,
            &mut self.expression_attribute_values,
        )
    }
}

/// Arguments common to all write operations (Put, Update, Delete).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteArgs {
    /// Conditions that must all hold for the write to succeed.
    ///
    /// When one fails, DynamoDB rejects the write with `ConditionalCheckFailedException`.
    pub condition: Option<Vec<common::condition::KeyCondition<String>>>,
    /// Which item attributes to return in the response.
    ///
    /// `AllOld` for deletes, `AllNew` for updates; puts return nothing.
    pub return_values: Option<types::ReturnValue>,
    /// The name of the table to write to.
    pub table_name: String,
}

impl TryFrom<WriteArgs> for WriteInput {
    type Error = Error;

    fn try_from(write_args: WriteArgs) -> Result<Self> {
        let (condition_expression, expression_attribute_names, expression_attribute_values) =
            match write_args.condition {
                Some(condition) => {
                    let condition_operation =
                        common::condition::KeyCondition::get_expression_operation(condition)?;
                    let values = Some(condition_operation.expression_attribute_values)
                        .filter(|values| !values.is_empty());
                    (
                        Some(condition_operation.expression),
                        Some(condition_operation.expression_attribute_names),
                        values,
                    )
                }
                None => (None, None, None),
            };
        let operation = Self {
            condition_expression,
            expression_attribute_names,
            expression_attribute_values,
            return_values: write_args.return_values,
            table_name: write_args.table_name,
        };
        Ok(operation)
    }
}

/// apply common write operation settings to a builder
#[macro_export]
macro_rules! apply_write_operation {
    ($builder:expr, $write_operation:expr) => {
        $builder
            .set_condition_expression($write_operation.condition_expression)
            .set_expression_attribute_names($write_operation.expression_attribute_names)
            .set_expression_attribute_values($write_operation.expression_attribute_values)
            .set_return_values($write_operation.return_values)
            .table_name($write_operation.table_name)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::blind_write(
        WriteArgs {
            table_name: "Users-dev".to_string(),
            ..Default::default()
        },
        WriteInput {
            table_name: "Users-dev".to_string(),
            ..Default::default()
        }
    )]
    #[case::existing_user_only(
        WriteArgs {
            condition: Some(
                vec![
                    common::condition::KeyCondition {
                        name: "user_id".to_string(),
                        condition: common::condition::Condition::NotNull,
                    },
                ]
            ),
            return_values: Some(
                types::ReturnValue::AllNew
            ),
            table_name: "Users-dev".to_string(),
        },
        WriteInput {
            condition_expression: Some(
                "attribute_exists(#user_id)".to_string()
            ),
            expression_attribute_names: Some(
                collections::HashMap::from(
                    [
                        ("#user_id".to_string(), "user_id".to_string()),
                    ]
                )
            ),
            expression_attribute_values: None,
            return_values: Some(
                types::ReturnValue::AllNew
            ),
            table_name: "Users-dev".to_string(),
        }
    )]
    fn test_write_args(#[case] args: WriteArgs, #[case] expected: WriteInput) {
        let actual: WriteInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }
}
