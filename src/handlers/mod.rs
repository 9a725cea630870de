pub mod accounts;
pub mod auth;

use axum::Json;

use crate::types::api::MessageResponse;

pub async fn health() -> Json<MessageResponse> {
    Json(MessageResponse::ok("OK"))
}
