use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full `users` row, including the stored session token consulted by the
/// revocation check. Never serialized to clients.
#[derive(Debug, Clone, PartialEq)]
pub struct DbUser {
    pub id: i64,
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
    pub profile_picture: Option<String>,
    pub token: Option<String>,
}

/// Fields required to insert a new `users` row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub email: String,
    pub password_hash: String,
    pub profile_picture: String,
}

/// Owner-scoped projection of an `accounts` row, as returned by the list
/// operation. `password` is the stored site credential, not the platform
/// password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct AccountRecord {
    pub id: i64,
    pub site: String,
    pub username: String,
    pub password: String,
    pub image: String,
}

/// Caller-supplied fields written on account create and update.
#[derive(Debug, Clone)]
pub struct AccountFields {
    pub site: String,
    pub username: String,
    pub password: String,
    pub image: String,
}
