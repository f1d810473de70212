//! Email ownership verification via one-time code.

use axum::extract::State;
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::json::ValidJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::schema::VerifyRequest;

use super::AppState;

/// POST /verify - redeem a signup OTP.
///
/// Verified is terminal: an already-verified account always fails here,
/// regardless of the submitted code.
pub async fn verify(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<VerifyRequest>,
) -> ApiResult<Value> {
    body.validate()?;

    let user = state
        .users
        .get_by_email(&body.email)
        .await?
        .ok_or_else(|| ApiError::not_found("no user found with this email"))?;

    if user.email_verified {
        return Err(ApiError::forbidden("email is already verified"));
    }

    if user.otp.as_deref() != Some(body.otp.as_str()) {
        return Err(ApiError::forbidden("invalid OTP entered"));
    }

    match user.otp_expiry {
        Some(expiry) if expiry >= Utc::now() => {}
        _ => return Err(ApiError::forbidden("OTP expired")),
    }

    state.users.mark_verified(user.id).await?;

    Ok(ApiResponse::success(json!({}), "OTP verified successfully"))
}
