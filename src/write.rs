//! Write operations against the users table:
//! - Putting new items or replacing existing ones
//! - Assigning attributes on one item
//! - Deleting items by primary key

/// Common utilities and types for write operations.
pub mod common;

/// Delete item operation for removing items from tables.
pub mod delete_item;

/// Put item operation for creating or replacing items.
pub mod put_item;

/// Update item operation for assigning attributes.
pub mod update_item;
