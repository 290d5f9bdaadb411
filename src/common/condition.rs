use crate::common;

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Result, to_attribute_value};
use std::collections;

/// Condition on a single attribute.
///
/// ```rust
/// use simple_crud_api::common::condition;
///
/// let eq = condition::Condition::Equals("ACTIVE".to_string());
/// let exists: condition::Condition<String> = condition::Condition::NotNull;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Condition<T> {
    /// The attribute equals a value. The only condition a partition key accepts.
    Equals(T),
    /// The attribute exists on the item.
    NotNull,
}

impl<T: Serialize> Condition<T> {
    fn get_expression(
        self,
        key: &str,
        key_placeholder: &str,
        index: &mut usize,
    ) -> Result<(String, collections::HashMap<String, types::AttributeValue>)> {
        let mut expression_attribute_values = collections::HashMap::new();
        let expression = match self {
            Self::Equals(value) => {
                let value = to_attribute_value(value)?;
                let value_placeholder = format!(":{key}_eq{index}");
                *index += 1;
                let expression = format!("{key_placeholder} = {value_placeholder}");
                expression_attribute_values.insert(value_placeholder, value);
                expression
            }
            Self::NotNull => format!("attribute_exists({key_placeholder})"),
        };
        Ok((expression, expression_attribute_values))
    }
}

/// Condition applied to a named attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyCondition<T> {
    /// The condition to apply to the attribute.
    pub condition: Condition<T>,
    /// The name of the attribute to apply the condition to.
    pub name: String,
}

impl<T: Serialize> KeyCondition<T> {
    /// Render conditions that must all hold, numbering value placeholders in order.
    pub(crate) fn get_expression_operation(
        conditions: Vec<Self>,
    ) -> Result<common::ExpressionInput> {
        let mut operations = Vec::with_capacity(conditions.len());
        let mut index = 0;
        for key_condition in conditions {
            let placeholder = common::add_placeholder(&key_condition.name);
            let (expression, expression_attribute_values) = key_condition.condition.get_expression(
                &key_condition.name,
                &placeholder,
                &mut index,
            )?;
            operations.push(common::ExpressionInput {
                expression,
                expression_attribute_names: collections::HashMap::from([(
                    placeholder,
                    key_condition.name,
                )]),
                expression_attribute_values,
            });
        }
        Ok(common::ExpressionInput::merge(" AND ", operations))
    }
}
