use crate::user;

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::{Error, Result, to_attribute_value};
use std::collections;

/// Key component.
///
/// ```rust
/// use simple_crud_api::common::key;
///
/// let key = key::Key {
///     name: "user_id".to_string(),
///     value: "123".to_string(),
/// };
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Key<T> {
    /// The attribute name of the key.
    pub name: String,
    /// The value of the key.
    pub value: T,
}

/// Composite primary key: partition key and sort key.
///
/// The users table always has both halves, so the sort key is not optional.
///
/// ```rust
/// use simple_crud_api::{common::key, user};
///
/// let keys: key::Keys<String> = key::Keys::from(&user::UserKey {
///     user_id: "123".to_string(),
///     username: "alice".to_string(),
/// });
/// assert_eq!(keys.partition_key.name, "user_id");
/// assert_eq!(keys.sort_key.name, "username");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keys<T> {
    /// The partition key.
    pub partition_key: Key<T>,
    /// The sort key.
    pub sort_key: Key<T>,
}

impl From<&user::UserKey> for Keys<String> {
    fn from(key: &user::UserKey) -> Self {
        Self {
            partition_key: Key {
                name: user::USER_ID.to_string(),
                value: key.user_id.clone(),
            },
            sort_key: Key {
                name: user::USERNAME.to_string(),
                value: key.username.clone(),
            },
        }
    }
}

impl<T: Serialize> TryFrom<Keys<T>> for collections::HashMap<String, types::AttributeValue> {
    type Error = Error;

    fn try_from(keys: Keys<T>) -> Result<Self> {
        let partition_key_value = to_attribute_value(keys.partition_key.value)?;
        let sort_key_value = to_attribute_value(keys.sort_key.value)?;
        Ok(Self::from([
            (keys.partition_key.name, partition_key_value),
            (keys.sort_key.name, sort_key_value),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::strings(
        user::UserKey {
            user_id: "123".to_string(),
            username: "alice".to_string(),
        },
        collections::HashMap::from(
            [
                (
                    "user_id".to_string(),
                    types::AttributeValue::S(
                        "123".to_string()
                    )
                ),
                (
                    "username".to_string(),
                    types::AttributeValue::S(
                        "alice".to_string()
                    )
                ),
            ]
        )
    )]
    #[case::numeric_looking_id_stays_a_string(
        user::UserKey {
            user_id: "0042".to_string(),
            username: "bob".to_string(),
        },
        collections::HashMap::from(
            [
                (
                    "user_id".to_string(),
                    types::AttributeValue::S(
                        "0042".to_string()
                    )
                ),
                (
                    "username".to_string(),
                    types::AttributeValue::S(
                        "bob".to_string()
                    )
                ),
            ]
        )
    )]
    fn test_user_key_to_hash_map(
        #[case] key: user::UserKey,
        #[case] expected: collections::HashMap<String, types::AttributeValue>,
    ) {
        let keys = Keys::from(&key);
        let actual: collections::HashMap<String, types::AttributeValue> = keys.try_into().unwrap();
        assert_eq!(actual, expected);
    }
}
