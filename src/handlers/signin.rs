//! Credential login.

use axum::extract::State;
use serde_json::{json, Value};

use crate::auth::generate_token;
use crate::error::ApiError;
use crate::middleware::json::ValidJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::schema::SigninRequest;

use super::AppState;

/// POST /signin - email + password login; returns a session token and
/// the user payload (secret fields never serialize).
pub async fn signin(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<SigninRequest>,
) -> ApiResult<Value> {
    body.validate()?;

    let user = state
        .users
        .get_by_email(&body.email)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found with this email address"))?;

    if !user.email_verified {
        return Err(ApiError::forbidden("verify your email before signing in"));
    }

    let password_hash = user.password_hash.as_deref().ok_or_else(|| {
        ApiError::unauthorized("this account signs in through an external provider")
    })?;

    if !pwhash::bcrypt::verify(&body.password, password_hash) {
        return Err(ApiError::unauthorized("invalid credentials"));
    }

    let token = generate_token(&user)?;

    Ok(ApiResponse::success(
        json!({ "token": token, "user": user }),
        "login successful",
    ))
}
