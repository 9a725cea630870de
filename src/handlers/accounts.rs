use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{info, warn};

use crate::db::models::AccountFields;
use crate::error::VaultError;
use crate::middleware::{AccountForm, AuthUser};
use crate::router::AppState;
use crate::storage::{DEFAULT_IMAGE, normalize_image_path};
use crate::types::api::{
    AccountsResponse, CreateAccountResponse, MessageResponse, UpdateAccountResponse,
};

const UPDATE_NOT_FOUND: &str = "Account not found or you do not have permission to update it.";
const DELETE_NOT_FOUND: &str = "Account not found or you do not have permission to delete it.";

/// Create an account record owned by the caller. An uploaded image is
/// persisted first and unlinked again if the row insert fails.
pub async fn create_account(
    State(state): State<AppState>,
    user: AuthUser,
    form: AccountForm,
) -> Result<Json<CreateAccountResponse>, VaultError> {
    let (site, username, password) = form.required_fields()?;

    let image = match &form.image {
        Some(part) => state.images.store(&part.file_name, &part.bytes).await?,
        None => DEFAULT_IMAGE.to_string(),
    };

    let fields = AccountFields {
        site: site.to_string(),
        username: username.to_string(),
        password: password.to_string(),
        image: image.clone(),
    };
    match state.storage.insert_account(user.id, &fields).await {
        Ok(account_id) => {
            info!(user_id = user.id, account_id, "account created");
            Ok(Json(CreateAccountResponse {
                success: true,
                message: "Account created successfully!",
                account_id,
            }))
        }
        Err(e) => {
            if form.image.is_some() {
                discard_upload(&state, &image).await;
            }
            Err(VaultError::Persistence("Error creating account.", e))
        }
    }
}

/// List every account owned by the caller. Image references are normalized
/// so stored paths read the same regardless of the host that wrote them.
pub async fn list_accounts(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<AccountsResponse>, VaultError> {
    let mut accounts = state
        .storage
        .accounts_for_user(user.id)
        .await
        .map_err(|e| VaultError::Persistence("Error reading accounts.", e))?;

    for account in &mut accounts {
        account.image = normalize_image_path(&account.image);
    }

    Ok(Json(AccountsResponse {
        success: true,
        message: "Accounts retrieved successfully!",
        accounts,
    }))
}

/// Update an account owned by the caller. With no new upload the
/// caller-supplied `currentImage` value is written back unchanged; zero
/// affected rows means absent-or-foreign and is reported as not found
/// either way.
pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
    form: AccountForm,
) -> Result<Json<UpdateAccountResponse>, VaultError> {
    let (site, username, password) = form.required_fields()?;

    let (image, newly_uploaded) = match &form.image {
        Some(part) => (
            state.images.store(&part.file_name, &part.bytes).await?,
            true,
        ),
        None => (
            form.current_image
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            false,
        ),
    };

    let fields = AccountFields {
        site: site.to_string(),
        username: username.to_string(),
        password: password.to_string(),
        image: image.clone(),
    };
    match state.storage.update_account(id, user.id, &fields).await {
        Ok(0) => {
            // The freshly stored blob has no owning row; drop it again.
            if newly_uploaded {
                discard_upload(&state, &image).await;
            }
            Err(VaultError::NotFoundOrForbidden(UPDATE_NOT_FOUND))
        }
        Ok(_) => {
            info!(user_id = user.id, account_id = id, "account updated");
            Ok(Json(UpdateAccountResponse {
                success: true,
                message: "Account updated successfully!",
                image,
            }))
        }
        Err(e) => {
            if newly_uploaded {
                discard_upload(&state, &image).await;
            }
            Err(VaultError::Persistence("Error updating account.", e))
        }
    }
}

/// Delete an account owned by the caller, with the same absent-or-foreign
/// conflation as update.
pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: AuthUser,
) -> Result<Json<MessageResponse>, VaultError> {
    let affected = state
        .storage
        .delete_account(id, user.id)
        .await
        .map_err(|e| VaultError::Persistence("Error deleting account.", e))?;
    if affected == 0 {
        return Err(VaultError::NotFoundOrForbidden(DELETE_NOT_FOUND));
    }

    info!(user_id = user.id, account_id = id, "account deleted");
    Ok(Json(MessageResponse::ok("Account deleted successfully!")))
}

/// Best-effort cleanup of an uploaded blob whose row write failed; its own
/// failure is logged and never escalated.
async fn discard_upload(state: &AppState, image: &str) {
    if let Err(e) = state.images.remove(image).await {
        warn!(image, error = %e, "failed to delete orphaned upload");
    }
}
