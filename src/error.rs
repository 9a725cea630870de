use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum VaultError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("access token required")]
    Unauthenticated,

    #[error("token rejected: {0}")]
    InvalidToken(&'static str),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailInUse,

    #[error("{0}")]
    NotFoundOrForbidden(&'static str),

    /// Store failure while resolving a token. Kept separate from
    /// `Persistence` so the response never hints at whether the token
    /// itself was valid.
    #[error("token lookup failed: {0}")]
    AuthInfrastructure(#[source] SqlxError),

    /// Store failure inside a handler; carries the operation's
    /// user-facing message.
    #[error("{0}")]
    Persistence(&'static str, #[source] SqlxError),

    #[error("database error: {0}")]
    Database(#[from] SqlxError),

    #[error("blob store error: {0}")]
    BlobStore(#[from] std::io::Error),

    #[error("password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("token signing error: {0}")]
    TokenSigning(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for VaultError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            VaultError::Validation(msg) => (StatusCode::BAD_REQUEST, *msg),
            VaultError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Access token required."),
            VaultError::InvalidToken(msg) => (StatusCode::FORBIDDEN, *msg),
            VaultError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials!"),
            VaultError::EmailInUse => (StatusCode::CONFLICT, "Email already in use."),
            VaultError::NotFoundOrForbidden(msg) => (StatusCode::NOT_FOUND, *msg),
            VaultError::AuthInfrastructure(e) => {
                error!(error = %e, "store lookup failed during token validation");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred during token validation.",
                )
            }
            VaultError::Persistence(msg, e) => {
                error!(error = %e, "store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, *msg)
            }
            VaultError::Database(e) => {
                error!(error = %e, "unhandled database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.",
                )
            }
            VaultError::BlobStore(e) => {
                error!(error = %e, "blob store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error storing uploaded image.",
                )
            }
            VaultError::PasswordHash(e) => {
                error!(error = %e, "password hashing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.",
                )
            }
            VaultError::TokenSigning(e) => {
                error!(error = %e, "session token signing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.",
                )
            }
        };
        (status, Json(ApiErrorBody::new(message))).into_response()
    }
}

/// Standardized API error response body: every failure carries the same
/// `{success: false, message}` shape with no internal detail.
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub success: bool,
    pub message: &'static str,
}

impl ApiErrorBody {
    fn new(message: &'static str) -> Self {
        Self {
            success: false,
            message,
        }
    }
}
