use crate::{
    common, read,
    store::{self, StoreError, StoreOptions, UserPage, UserStore},
    user, write,
};

use async_trait::async_trait;
use aws_sdk_dynamodb::{Client, types};
use std::collections;

/// Users table in DynamoDB.
///
/// The client is built once at startup and shared read-only by every request.
#[derive(Clone, Debug)]
pub struct DynamoUserStore {
    client: Client,
    table_name: String,
    status_index_name: String,
    options: StoreOptions,
}

impl DynamoUserStore {
    /// Creates a store over `table_name`, querying statuses on `status_index_name`.
    pub fn new(
        client: Client,
        table_name: impl Into<String>,
        status_index_name: impl Into<String>,
        options: StoreOptions,
    ) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            status_index_name: status_index_name.into(),
            options,
        }
    }

    fn write_args(&self, return_values: Option<types::ReturnValue>) -> write::common::WriteArgs {
        write::common::WriteArgs {
            return_values,
            table_name: self.table_name.clone(),
            ..Default::default()
        }
    }
}

fn decode(
    operation: &str,
    item: collections::HashMap<String, types::AttributeValue>,
) -> store::Result<user::User> {
    serde_dynamo::from_item(item)
        .map_err(|err| StoreError::new(operation, store::DESERIALIZATION_ERROR, err.to_string()))
}

#[async_trait]
impl UserStore for DynamoUserStore {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn get(&self, key: &user::UserKey) -> store::Result<Option<user::User>> {
        let get_item = read::get_item::GetItem {
            keys: common::key::Keys::from(key),
            single_read_args: read::common::SingleReadArgs {
                table_name: self.table_name.clone(),
            },
        };
        let output = get_item
            .send(&self.client)
            .await
            .map_err(|err| StoreError::from_sdk(store::GET_ITEM, err))?;
        output
            .item
            .map(|item| decode(store::GET_ITEM, item))
            .transpose()
    }

    async fn put(&self, user: &user::User) -> store::Result<()> {
        let put_item = write::put_item::PutItem {
            item: user.clone(),
            write_args: self.write_args(None),
        };
        put_item
            .send(&self.client)
            .await
            .map_err(|err| StoreError::from_sdk(store::PUT_ITEM, err))?;
        Ok(())
    }

    async fn update_status(
        &self,
        key: &user::UserKey,
        status: user::Status,
    ) -> store::Result<user::User> {
        let mut write_args = self.write_args(Some(types::ReturnValue::AllNew));
        if self.options.strict_update {
            write_args.condition = Some(vec![common::condition::KeyCondition {
                name: user::USER_ID.to_string(),
                condition: common::condition::Condition::NotNull,
            }]);
        }
        let update_item = write::update_item::UpdateItem {
            keys: common::key::Keys::from(key),
            set: vec![(user::STATUS.to_string(), status)],
            write_args,
        };
        let output = update_item
            .send(&self.client)
            .await
            .map_err(|err| StoreError::from_sdk(store::UPDATE_ITEM, err))?;
        match output.attributes {
            Some(item) => decode(store::UPDATE_ITEM, item),
            None => Err(StoreError::new(
                store::UPDATE_ITEM,
                store::DESERIALIZATION_ERROR,
                "UpdateItem returned no attributes",
            )),
        }
    }

    async fn delete(&self, key: &user::UserKey) -> store::Result<Option<user::User>> {
        let delete_item = write::delete_item::DeleteItem {
            keys: common::key::Keys::from(key),
            write_args: self.write_args(Some(types::ReturnValue::AllOld)),
        };
        let output = delete_item
            .send(&self.client)
            .await
            .map_err(|err| StoreError::from_sdk(store::DELETE_ITEM, err))?;
        output
            .attributes
            .map(|item| decode(store::DELETE_ITEM, item))
            .transpose()
    }

    async fn query_by_status(&self, status: user::Status) -> store::Result<UserPage> {
        let query = read::query::Query {
            multiple_read_args: read::common::MultipleReadArgs {
                index_name: Some(self.status_index_name.clone()),
                max_items: Some(self.options.max_query_items.get()),
                table_name: self.table_name.clone(),
            },
            partition_key: common::key::Key {
                name: user::STATUS.to_string(),
                value: status,
            },
        };
        let page = query
            .send(&self.client)
            .await
            .map_err(|err| StoreError::from_sdk(store::QUERY, err))?;
        let items = page
            .items
            .into_iter()
            .map(|item| decode(store::QUERY, item))
            .collect::<store::Result<Vec<_>>>()?;
        Ok(UserPage {
            items,
            truncated: page.truncated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn attribute(value: &str) -> types::AttributeValue {
        types::AttributeValue::S(value.to_string())
    }

    #[rstest]
    #[case::full_record(
        collections::HashMap::from(
            [
                ("user_id".to_string(), attribute("123")),
                ("username".to_string(), attribute("alice")),
                ("status".to_string(), attribute("ACTIVE")),
                ("created_date".to_string(), attribute("10/18/26")),
            ]
        ),
        Ok(
            user::User {
                user_id: "123".to_string(),
                username: "alice".to_string(),
                status: user::Status::Active,
                created_date: Some("10/18/26".to_string()),
            }
        )
    )]
    #[case::partial_record(
        collections::HashMap::from(
            [
                ("user_id".to_string(), attribute("404")),
                ("username".to_string(), attribute("ghost")),
                ("status".to_string(), attribute("INACTIVE")),
            ]
        ),
        Ok(
            user::User {
                user_id: "404".to_string(),
                username: "ghost".to_string(),
                status: user::Status::Inactive,
                created_date: None,
            }
        )
    )]
    fn test_decode(
        #[case] item: collections::HashMap<String, types::AttributeValue>,
        #[case] expected: store::Result<user::User>,
    ) {
        assert_eq!(decode(store::GET_ITEM, item), expected);
    }

    #[test]
    fn test_decode_rejects_unknown_status() {
        let item = collections::HashMap::from([
            ("user_id".to_string(), attribute("1")),
            ("username".to_string(), attribute("mallory")),
            ("status".to_string(), attribute("BANNED")),
        ]);
        let err = decode(store::QUERY, item).unwrap_err();
        assert_eq!(err.operation, store::QUERY);
        assert_eq!(err.code, store::DESERIALIZATION_ERROR);
    }

    #[test]
    fn test_store_keeps_configuration() {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(aws_sdk_dynamodb::config::BehaviorVersion::latest())
            .build();
        let store = DynamoUserStore::new(
            Client::from_conf(config),
            "Users-test",
            "StatusIndex",
            StoreOptions::default(),
        );
        assert_eq!(store.table_name(), "Users-test");
        let write_args = store.write_args(Some(types::ReturnValue::AllOld));
        assert_eq!(write_args.table_name, "Users-test");
        assert_eq!(write_args.condition, None);
    }
}
