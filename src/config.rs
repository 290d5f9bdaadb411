//! Command line and environment configuration.

use crate::{provision, store};

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client;
use clap::{Args, Parser, Subcommand};
use std::num;

/// Users CRUD API over DynamoDB
#[derive(Debug, Parser)]
#[command(name = "simple-crud-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "LOG_JSON")]
    pub log_json: bool,

    /// What to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of the binary.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the HTTP API
    Serve(ServeArgs),
    /// Create the users table and its indexes if they do not exist
    Provision(ProvisionArgs),
}

/// Options of `serve`.
#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "5000", env = "PORT")]
    pub port: u16,

    /// Users table
    #[arg(long, default_value = "Users-dev", env = "USERS_TABLE_NAME")]
    pub table_name: String,

    /// Index queried by status
    #[arg(long, default_value = provision::STATUS_INDEX, env = "STATUS_INDEX_NAME")]
    pub status_index_name: String,

    /// Custom DynamoDB endpoint, e.g. DynamoDB Local
    #[arg(long, env = "DYNAMODB_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Most users returned by a status query
    #[arg(long, default_value = "1000", env = "MAX_QUERY_ITEMS")]
    pub max_query_items: num::NonZeroUsize,

    /// Fail updates of users that do not exist instead of creating partial records
    #[arg(long, env = "STRICT_UPDATE")]
    pub strict_update: bool,

    /// Keep users in memory instead of DynamoDB
    #[arg(long)]
    pub in_memory: bool,
}

impl ServeArgs {
    /// Address the server listens on.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Store tunables.
    pub fn store_options(&self) -> store::StoreOptions {
        store::StoreOptions {
            max_query_items: self.max_query_items,
            strict_update: self.strict_update,
        }
    }
}

/// Options of `provision`.
#[derive(Args, Clone, Debug)]
pub struct ProvisionArgs {
    /// Deployment stack; the table is named `Users-<stack>`
    #[arg(long, default_value = "dev", env = "STACK")]
    pub stack: String,

    /// Table name, overriding the one derived from the stack
    #[arg(long)]
    pub table_name: Option<String>,

    /// Custom DynamoDB endpoint, e.g. DynamoDB Local
    #[arg(long, env = "DYNAMODB_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,
}

impl ProvisionArgs {
    /// The table to provision.
    pub fn table_definition(&self) -> provision::TableDefinition {
        let mut definition = provision::TableDefinition::users(&self.stack);
        if let Some(table_name) = &self.table_name {
            definition.table_name = table_name.clone();
        }
        definition
    }
}

/// Creates a DynamoDB client from the default credential and region chain.
pub async fn dynamodb_client(endpoint_url: Option<&str>) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(endpoint_url) = endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    let sdk_config = loader.load().await;
    Client::new(&sdk_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from([
            "simple-crud-api",
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--table-name",
            "Users-prod",
            "--max-query-items",
            "25",
            "--strict-update",
            "--in-memory",
        ])
        .unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind_address(), "127.0.0.1:8080");
        assert_eq!(args.table_name, "Users-prod");
        assert!(args.in_memory);
        assert_eq!(
            args.store_options(),
            store::StoreOptions {
                max_query_items: num::NonZeroUsize::new(25).unwrap(),
                strict_update: true,
            }
        );
    }

    #[test]
    fn test_log_json_is_global() {
        let cli = Cli::try_parse_from(["simple-crud-api", "provision", "--log-json"]).unwrap();
        assert!(cli.log_json);
    }

    #[rstest]
    #[case::zero("0")]
    #[case::negative("-1")]
    #[case::not_a_number("many")]
    fn test_max_query_items_must_be_positive(#[case] value: &str) {
        let result =
            Cli::try_parse_from(["simple-crud-api", "serve", "--max-query-items", value]);
        assert!(result.is_err());
    }

    #[rstest]
    #[case::from_stack(&["simple-crud-api", "provision", "--stack", "prod"], "Users-prod")]
    #[case::overridden(
        &["simple-crud-api", "provision", "--stack", "prod", "--table-name", "Accounts"],
        "Accounts"
    )]
    fn test_provision_table_name(#[case] argv: &[&str], #[case] expected: &str) {
        let cli = Cli::try_parse_from(argv).unwrap();
        let Command::Provision(args) = cli.command else {
            panic!("expected provision");
        };
        assert_eq!(args.table_definition().table_name, expected);
    }

    #[test]
    fn test_missing_subcommand() {
        assert!(Cli::try_parse_from(["simple-crud-api"]).is_err());
    }
}
