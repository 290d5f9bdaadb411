//! The user record and its attribute names.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::{fmt, str};

/// Partition key attribute.
pub const USER_ID: &str = "user_id";

/// Sort key attribute.
pub const USERNAME: &str = "username";

/// Status attribute, hash key of both secondary indexes.
pub const STATUS: &str = "status";

/// Creation date attribute, range key of the status/created date index.
pub const CREATED_DATE: &str = "created_date";

/// Account status of a user.
///
/// ```rust
/// use simple_crud_api::user::Status;
///
/// assert_eq!(Status::default(), Status::Inactive);
/// assert_eq!("ACTIVE".parse::<Status>(), Ok(Status::Active));
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// The user is active.
    Active,
    /// The user is inactive. New users start here unless told otherwise.
    #[default]
    Inactive,
}

impl Status {
    /// Every accepted status, in the order they are reported to clients.
    pub const ALL: [Status; 2] = [Status::Active, Status::Inactive];

    /// The wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl str::FromStr for Status {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| format!("unknown status `{value}`"))
    }
}

/// Composite primary key of a user record.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct UserKey {
    /// Partition key.
    pub user_id: String,
    /// Sort key.
    pub username: String,
}

/// A user record as stored in the table.
///
/// `created_date` is absent only on partial records, which the table creates
/// when a status update targets a key that was never written.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
    /// Partition key.
    pub user_id: String,
    /// Sort key.
    pub username: String,
    /// Current status.
    pub status: Status,
    /// Date the record was created, in `%x` format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
}

impl User {
    /// Build a full record for `key`, stamped with `created_date`.
    pub fn new(key: UserKey, status: Status, created_date: String) -> Self {
        Self {
            user_id: key.user_id,
            username: key.username,
            status,
            created_date: Some(created_date),
        }
    }

    /// The record's primary key.
    pub fn key(&self) -> UserKey {
        UserKey {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
        }
    }
}

/// Render a creation date the way records store it (`MM/DD/YY`).
pub fn creation_date<Tz>(now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    now.format("%x").to_string()
}

/// Today's creation date in the local timezone.
pub fn today() -> String {
    creation_date(chrono::Local::now())
}
