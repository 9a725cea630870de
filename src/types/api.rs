//! Request and response payloads for the JSON API.
//!
//! Every response body carries `success` and `message`; error bodies share
//! the same shape via `error::ApiErrorBody`.

use serde::{Deserialize, Serialize};

use crate::db::models::AccountRecord;
use crate::error::VaultError;

/// Registration payload. Fields stay optional so absence surfaces as the
/// API's own validation failure rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub firstname: Option<String>,
    pub middlename: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl RegisterRequest {
    pub fn required_fields(&self) -> Result<(&str, &str, &str, &str), VaultError> {
        match (
            non_empty(self.firstname.as_deref()),
            non_empty(self.lastname.as_deref()),
            non_empty(self.email.as_deref()),
            non_empty(self.password.as_deref()),
        ) {
            (Some(firstname), Some(lastname), Some(email), Some(password)) => {
                Ok((firstname, lastname, email, password))
            }
            _ => Err(VaultError::Validation("All fields are required.")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn required_fields(&self) -> Result<(&str, &str), VaultError> {
        match (
            non_empty(self.email.as_deref()),
            non_empty(self.password.as_deref()),
        ) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(VaultError::Validation("Email and password are required.")),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Bare acknowledgement, used by logout, delete and the health probe.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

/// Successful register/login response carrying the minted session token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub message: &'static str,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct CreateAccountResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(rename = "accountId")]
    pub account_id: i64,
}

#[derive(Debug, Serialize)]
pub struct AccountsResponse {
    pub success: bool,
    pub message: &'static str,
    pub accounts: Vec<AccountRecord>,
}

/// Update response echoes the image reference now stored on the row.
#[derive(Debug, Serialize)]
pub struct UpdateAccountResponse {
    pub success: bool,
    pub message: &'static str,
    pub image: String,
}
