//! Read operations against the users table:
//! - Getting one item by primary key
//! - Querying an index by partition key, with a cap on returned items

/// Common utilities and types for read operations.
pub mod common;

/// Get item operation for retrieving a single item by primary key.
pub mod get_item;

/// Query operation for retrieving items with a key condition.
pub mod query;
