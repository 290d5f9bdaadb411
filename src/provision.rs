//! Declaration and idempotent creation of the users table.

use crate::{store::StoreError, user};

use aws_sdk_dynamodb::{
    Client,
    error::BuildError,
    types::{
        AttributeDefinition, BillingMode, GlobalSecondaryIndex, IndexStatus, KeySchemaElement,
        KeyType, Projection, ProjectionType, ScalarAttributeType, TableStatus,
    },
};
use std::time;

/// Index with `status` as hash key.
pub const STATUS_INDEX: &str = "StatusIndex";

/// Index with `status` as hash key and `created_date` as range key.
pub const STATUS_CREATED_DATE_INDEX: &str = "StatusCreatedDateIndex";

const DESCRIBE_TABLE: &str = "DescribeTable";
const CREATE_TABLE: &str = "CreateTable";

const MAX_ACTIVATION_ATTEMPTS: usize = 60;
const ACTIVATION_DELAY: time::Duration = time::Duration::from_secs(2);

/// Errors raised while provisioning.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// A table, key or index description was incomplete.
    #[error("invalid table definition: {0}")]
    Build(#[from] BuildError),
    /// DynamoDB refused a request.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The table was created but did not become active in time.
    #[error("table `{table_name}` not active after {attempts} checks")]
    NotActive {
        /// Created table.
        table_name: String,
        /// Status checks performed.
        attempts: usize,
    },
}

/// A hash or range key, always a string attribute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyDefinition {
    /// Attribute name.
    pub name: &'static str,
    /// Whether this is the hash or the range key.
    pub key_type: KeyType,
}

impl KeyDefinition {
    const fn hash(name: &'static str) -> Self {
        Self {
            name,
            key_type: KeyType::Hash,
        }
    }

    const fn range(name: &'static str) -> Self {
        Self {
            name,
            key_type: KeyType::Range,
        }
    }

    fn build(&self) -> Result<KeySchemaElement, BuildError> {
        KeySchemaElement::builder()
            .attribute_name(self.name)
            .key_type(self.key_type.clone())
            .build()
    }
}

/// A global secondary index projecting every attribute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexDefinition {
    /// Index name.
    pub name: &'static str,
    /// Hash key, then the optional range key.
    pub keys: Vec<KeyDefinition>,
}

impl IndexDefinition {
    fn build(&self) -> Result<GlobalSecondaryIndex, BuildError> {
        let key_schema = self
            .keys
            .iter()
            .map(KeyDefinition::build)
            .collect::<Result<Vec<_>, _>>()?;
        GlobalSecondaryIndex::builder()
            .index_name(self.name)
            .set_key_schema(Some(key_schema))
            .projection(
                Projection::builder()
                    .projection_type(ProjectionType::All)
                    .build(),
            )
            .build()
    }
}

/// A table billed on demand.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableDefinition {
    /// Table name.
    pub table_name: String,
    /// Primary key: hash key, then range key.
    pub keys: Vec<KeyDefinition>,
    /// String attributes used by the primary key or any index.
    pub attributes: Vec<&'static str>,
    /// Global secondary indexes.
    pub indexes: Vec<IndexDefinition>,
}

impl TableDefinition {
    /// The users table of `stack`, named `Users-<stack>`.
    pub fn users(stack: &str) -> Self {
        Self {
            table_name: format!("Users-{stack}"),
            keys: vec![
                KeyDefinition::hash(user::USER_ID),
                KeyDefinition::range(user::USERNAME),
            ],
            attributes: vec![
                user::USER_ID,
                user::USERNAME,
                user::CREATED_DATE,
                user::STATUS,
            ],
            indexes: vec![
                IndexDefinition {
                    name: STATUS_INDEX,
                    keys: vec![KeyDefinition::hash(user::STATUS)],
                },
                IndexDefinition {
                    name: STATUS_CREATED_DATE_INDEX,
                    keys: vec![
                        KeyDefinition::hash(user::STATUS),
                        KeyDefinition::range(user::CREATED_DATE),
                    ],
                },
            ],
        }
    }

    fn attribute_definitions(&self) -> Result<Vec<AttributeDefinition>, BuildError> {
        self.attributes
            .iter()
            .map(|name| {
                AttributeDefinition::builder()
                    .attribute_name(*name)
                    .attribute_type(ScalarAttributeType::S)
                    .build()
            })
            .collect()
    }

    fn key_schema(&self) -> Result<Vec<KeySchemaElement>, BuildError> {
        self.keys.iter().map(KeyDefinition::build).collect()
    }

    fn global_secondary_indexes(&self) -> Result<Vec<GlobalSecondaryIndex>, BuildError> {
        self.indexes.iter().map(IndexDefinition::build).collect()
    }
}

/// What [`ensure_table`] did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Provisioned {
    /// The table was created and is active.
    Created,
    /// The table already existed and was left untouched.
    AlreadyExists,
}

enum TableState {
    Missing,
    Creating,
    Active,
}

async fn table_state(client: &Client, table_name: &str) -> Result<TableState, StoreError> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(output) => {
            let Some(table) = output.table() else {
                return Ok(TableState::Missing);
            };
            let indexes_active = table
                .global_secondary_indexes()
                .iter()
                .all(|index| index.index_status() == Some(&IndexStatus::Active));
            if table.table_status() == Some(&TableStatus::Active) && indexes_active {
                Ok(TableState::Active)
            } else {
                Ok(TableState::Creating)
            }
        }
        Err(err)
            if err
                .as_service_error()
                .is_some_and(|err| err.is_resource_not_found_exception()) =>
        {
            Ok(TableState::Missing)
        }
        Err(err) => Err(StoreError::from_sdk(DESCRIBE_TABLE, err)),
    }
}

/// Create the table described by `definition` unless it already exists,
/// then wait for it and its indexes to become active.
#[tracing::instrument(
    name = "simple_crud_api.ensure_table",
    skip_all,
    fields(table = %definition.table_name),
    err
)]
pub async fn ensure_table(
    client: &Client,
    definition: &TableDefinition,
) -> Result<Provisioned, ProvisionError> {
    let table_name = definition.table_name.as_str();
    if !matches!(table_state(client, table_name).await?, TableState::Missing) {
        tracing::info!("table already exists");
        return Ok(Provisioned::AlreadyExists);
    }

    let created = client
        .create_table()
        .table_name(table_name)
        .set_key_schema(Some(definition.key_schema()?))
        .set_attribute_definitions(Some(definition.attribute_definitions()?))
        .set_global_secondary_indexes(Some(definition.global_secondary_indexes()?))
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;
    match created {
        Ok(_) => tracing::info!("table creation requested"),
        Err(err)
            if err
                .as_service_error()
                .is_some_and(|err| err.is_resource_in_use_exception()) =>
        {
            tracing::info!("table created concurrently");
            return Ok(Provisioned::AlreadyExists);
        }
        Err(err) => return Err(StoreError::from_sdk(CREATE_TABLE, err).into()),
    }

    for _ in 0..MAX_ACTIVATION_ATTEMPTS {
        if let TableState::Active = table_state(client, table_name).await? {
            tracing::info!("table active");
            return Ok(Provisioned::Created);
        }
        tokio::time::sleep(ACTIVATION_DELAY).await;
    }
    Err(ProvisionError::NotActive {
        table_name: table_name.to_string(),
        attempts: MAX_ACTIVATION_ATTEMPTS,
    })
}
