//! Shared building blocks for DynamoDB requests.
//!
//! Keys and conditions are rendered into expression strings with placeholder
//! maps (`#name` for attribute names, `:value` for attribute values), so that
//! reserved words such as `status` never appear verbatim in an expression.

/// Conditions used in key conditions and conditional writes.
pub mod condition;

/// Primary key of the users table.
pub mod key;

use aws_sdk_dynamodb::types;
use std::collections;

pub(crate) fn add_placeholder(name: &str) -> String {
    format!("#{name}")
}

fn get_expression(left: String, operator: &str, right: String) -> String {
    if left.is_empty() {
        right
    } else if right.is_empty() {
        left
    } else {
        format!("{left}{operator}{right}")
    }
}

/// expression operation
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ExpressionInput {
    pub(crate) expression: String,
    pub(crate) expression_attribute_names: collections::HashMap<String, String>,
    pub(crate) expression_attribute_values: collections::HashMap<String, types::AttributeValue>,
}

impl ExpressionInput {
    pub(crate) fn merge(operator: &str, items: Vec<Self>) -> Self {
        let mut operation = Self::default();
        for item in items {
            operation
                .expression_attribute_names
                .extend(item.expression_attribute_names);
            operation
                .expression_attribute_values
                .extend(item.expression_attribute_values);
            operation.expression = get_expression(operation.expression, operator, item.expression);
        }
        operation
    }

    /// Move the placeholder maps into a request's optional maps and return the expression.
    pub(crate) fn merge_into(
        self,
        names: &mut Option<collections::HashMap<String, String>>,
        values: &mut Option<collections::HashMap<String, types::AttributeValue>>,
    ) -> String {
        match names {
            Some(existing) => existing.extend(self.expression_attribute_names),
            None => *names = Some(self.expression_attribute_names),
        }
        if !self.expression_attribute_values.is_empty() {
            match values {
                Some(existing) => existing.extend(self.expression_attribute_values),
                None => *values = Some(self.expression_attribute_values),
            }
        }
        self.expression
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn named(expression: &str, name: &str) -> ExpressionInput {
        ExpressionInput {
            expression: expression.to_string(),
            expression_attribute_names: collections::HashMap::from([(
                add_placeholder(name),
                name.to_string(),
            )]),
            ..Default::default()
        }
    }

    #[rstest]
    #[case::empty(vec![], "")]
    #[case::single(vec![named("#a = :a0", "a")], "#a = :a0")]
    #[case::pair(
        vec![
            named("#a = :a0", "a"),
            named("#b = :b1", "b"),
        ],
        "#a = :a0 AND #b = :b1"
    )]
    fn test_merge(#[case] items: Vec<ExpressionInput>, #[case] expected: &str) {
        let names = items.len();
        let actual = ExpressionInput::merge(" AND ", items);
        assert_eq!(actual.expression, expected);
        assert_eq!(actual.expression_attribute_names.len(), names);
    }

    #[test]
    fn test_merge_into_keeps_values_unset_when_empty() {
        let mut names = None;
        let mut values = None;
        let expression = named("attribute_exists(#a)", "a").merge_into(&mut names, &mut values);
        assert_eq!(expression, "attribute_exists(#a)");
        assert_eq!(
            names,
            Some(collections::HashMap::from([(
                "#a".to_string(),
                "a".to_string()
            )]))
        );
        assert_eq!(values, None);
    }

    #[test]
    fn test_merge_into_extends_existing_maps() {
        let mut names = Some(collections::HashMap::from([(
            "#b".to_string(),
            "b".to_string(),
        )]));
        let mut values = Some(collections::HashMap::from([(
            ":b0".to_string(),
            types::AttributeValue::S("x".to_string()),
        )]));
        let input = ExpressionInput {
            expression: "#a = :a1".to_string(),
            expression_attribute_names: collections::HashMap::from([(
                "#a".to_string(),
                "a".to_string(),
            )]),
            expression_attribute_values: collections::HashMap::from([(
                ":a1".to_string(),
                types::AttributeValue::S("y".to_string()),
            )]),
        };
        input.merge_into(&mut names, &mut values);
        assert_eq!(names.unwrap().len(), 2);
        assert_eq!(values.unwrap().len(), 2);
    }
}
