use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::VaultError;
use crate::router::AppState;

const SIGNATURE_REJECTED: &str = "Invalid or expired token. Please log in again.";
const NOT_IN_STORE: &str = "Invalid token. Please log in again.";

/// Identity resolved by the bearer-token gate; every ownership filter
/// downstream uses exactly this id.
///
/// Resolution is two-step on every request, never cached:
/// 1. signature + expiry check on the presented token
/// 2. revocation check against the token stored for the embedded user id,
///    so logout and rotation take effect even though the signature alone
///    would still verify
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = VaultError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| VaultError::Unauthenticated)?;
        let token = bearer.token();

        let claims = state.keys.verify(token).map_err(|e| {
            debug!(error = %e, "token failed signature or expiry check");
            VaultError::InvalidToken(SIGNATURE_REJECTED)
        })?;

        let user = state
            .storage
            .user_by_id(claims.id)
            .await
            .map_err(VaultError::AuthInfrastructure)?;

        let live = user.filter(|u| {
            u.token
                .as_deref()
                .is_some_and(|stored| bool::from(stored.as_bytes().ct_eq(token.as_bytes())))
        });
        let Some(user) = live else {
            debug!(user_id = claims.id, "token absent from store; rotated or revoked");
            return Err(VaultError::InvalidToken(NOT_IN_STORE));
        };

        Ok(AuthUser {
            id: user.id,
            email: user.email,
        })
    }
}
