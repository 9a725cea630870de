use axum::{Json, extract::State};
use bcrypt::DEFAULT_COST;
use tracing::{debug, info};

use crate::config::DEFAULT_PROFILE_PICTURE;
use crate::db::models::NewUser;
use crate::error::VaultError;
use crate::middleware::AuthUser;
use crate::router::AppState;
use crate::types::api::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse};

/// Register a new user. The minted token is persisted immediately, so a
/// fresh registration is also a live session.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, VaultError> {
    let (firstname, lastname, email, password) = req.required_fields()?;

    let existing = state
        .storage
        .user_by_email(email)
        .await
        .map_err(|e| VaultError::Persistence("An error occurred during registration.", e))?;
    if existing.is_some() {
        return Err(VaultError::EmailInUse);
    }

    let password_hash = bcrypt::hash(password, DEFAULT_COST)?;
    let user = NewUser {
        firstname: firstname.to_string(),
        middlename: req.middlename.clone().filter(|m| !m.is_empty()),
        lastname: lastname.to_string(),
        email: email.to_string(),
        password_hash,
        profile_picture: DEFAULT_PROFILE_PICTURE.to_string(),
    };

    let id = state.storage.insert_user(&user).await.map_err(|e| {
        // Two concurrent registrations can race past the lookup above.
        if e.as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            VaultError::EmailInUse
        } else {
            VaultError::Persistence("An error occurred during registration.", e)
        }
    })?;

    let token = state.keys.sign(id, email)?;
    state
        .storage
        .set_session_token(id, Some(&token))
        .await
        .map_err(|e| VaultError::Persistence("An error occurred during registration.", e))?;

    info!(user_id = id, "user registered");
    Ok(Json(TokenResponse {
        success: true,
        message: "Registration successful!",
        token,
    }))
}

/// Log in with email and password. Unknown email and wrong password produce
/// the same response. A successful login rotates the stored token,
/// invalidating any previous session.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, VaultError> {
    let (email, password) = req.required_fields()?;

    let user = state
        .storage
        .user_by_email(email)
        .await
        .map_err(|e| VaultError::Persistence("An error occurred during login.", e))?;
    let Some(user) = user else {
        debug!("login rejected: unknown email");
        return Err(VaultError::InvalidCredentials);
    };

    if !bcrypt::verify(password, &user.password_hash)? {
        debug!(user_id = user.id, "login rejected: password mismatch");
        return Err(VaultError::InvalidCredentials);
    }

    let token = state.keys.sign(user.id, &user.email)?;
    state
        .storage
        .set_session_token(user.id, Some(&token))
        .await
        .map_err(|e| VaultError::Persistence("An error occurred during login.", e))?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(TokenResponse {
        success: true,
        message: "Login successful!",
        token,
    }))
}

/// Clear the stored token so the presented one fails the revocation check
/// from the next request on.
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<MessageResponse>, VaultError> {
    state
        .storage
        .set_session_token(user.id, None)
        .await
        .map_err(|e| VaultError::Persistence("An error occurred during logout.", e))?;

    info!(user_id = user.id, "user logged out");
    Ok(Json(MessageResponse::ok("Logout successful!")))
}
