#![deny(missing_docs)]
#![deny(warnings)]

//! # Simple CRUD API
//!
//! A users CRUD API over an Amazon DynamoDB table.
//!
//! ## Overview
//!
//! Every request goes through the same straight line:
//! - the payload is validated against the operation's [`schema::Schema`]
//! - exactly one [`store::UserStore`] call is issued
//! - the outcome is wrapped in a uniform [`response::ApiResponse`] envelope
//!
//! DynamoDB requests are described by structured types instead of expression
//! strings; placeholders for reserved attribute names such as `status` are
//! generated for you.
//!
//! ## Quick Example
//!
//! ```no_run
//! use serde_json::json;
//! use simple_crud_api::{handler::UserHandler, router, store};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = simple_crud_api::config::dynamodb_client(None).await;
//! let store = store::DynamoUserStore::new(
//!     client,
//!     "Users-dev",
//!     "StatusIndex",
//!     store::StoreOptions::default(),
//! );
//! let handler = UserHandler::new(Arc::new(store));
//!
//! // Handlers can be called directly...
//! let response = handler
//!     .create_user(&json!({"user_id": "123", "username": "alice"}))
//!     .await;
//! assert_eq!(response.code, "Success");
//!
//! // ...or served over HTTP
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, router::create_app(handler)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@common`] - Shared building blocks for keys and conditions
//! - [`mod@read`] - Read operations (GetItem, Query)
//! - [`mod@write`] - Write operations (PutItem, UpdateItem, DeleteItem)
//! - [`mod@store`] - The record store seam and its implementations
//! - [`mod@handler`] - The five user operations
//! - [`mod@router`] - HTTP routes
//! - [`mod@provision`] - Users table declaration and creation

/// Common utilities for keys and conditions.
pub mod common;

/// Command line and environment configuration.
pub mod config;

/// The five user operations.
pub mod handler;

/// Users table declaration and creation.
pub mod provision;

/// Read operations for retrieving data from DynamoDB tables.
pub mod read;

/// The uniform response envelope.
pub mod response;

/// HTTP routes.
pub mod router;

/// Request payload validation.
pub mod schema;

/// Persistence of user records.
pub mod store;

/// The user record.
pub mod user;

/// Write operations for modifying data in DynamoDB tables.
pub mod write;
