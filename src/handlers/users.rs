//! Signup and self-managed account endpoints.

use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::authz::{self, Policy};
use crate::error::ApiError;
use crate::mailer;
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ValidJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::{NewUser, SignupRefresh, User};
use crate::otp;
use crate::schema::{parse_id, CreateUserRequest, UpdateUserRequest};

use super::AppState;

fn hash_password(password: &str) -> Result<String, ApiError> {
    pwhash::bcrypt::hash(password).map_err(|e| {
        tracing::error!("password hashing failed: {e}");
        ApiError::internal("internal server error")
    })
}

async fn send_verification(state: &AppState, user: &User, code: &str) {
    let (subject, body) = mailer::verification_message(&user.name, code);
    // Delivery is best-effort; the signup already succeeded.
    if let Err(e) = state.mailer.compose_and_send(&user.email, &subject, &body).await {
        tracing::warn!(email = %user.email, "failed to send verification email: {e}");
    }
}

/// POST /users - create an account (or reissue the OTP for an
/// existing unverified one) and send the verification email.
///
/// A verified account with the same email is a hard 409: signup never
/// reissues an OTP for, or otherwise mutates, a verified user.
pub async fn signup(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CreateUserRequest>,
) -> ApiResult<Value> {
    body.validate()?;

    // Advisory pre-check; the store's unique constraint is the backstop.
    // Runs before OTP issuance and hashing so a conflicting signup costs
    // no bcrypt work.
    if let Some(existing) = state.users.get_by_email(&body.email).await? {
        if existing.email_verified {
            return Err(ApiError::conflict(
                "email is already registered to a verified account",
            ));
        }
        let code = otp::generate();
        let code_expiry = otp::expiry();
        let password_hash = hash_password(&body.password)?;
        let user = state
            .users
            .reissue_signup(
                existing.id,
                SignupRefresh {
                    name: body.name,
                    phone: Some(body.phone),
                    password_hash,
                    otp: code.clone(),
                    otp_expiry: code_expiry,
                },
            )
            .await?;
        send_verification(&state, &user, &code).await;
        return Ok(ApiResponse::success(
            json!({}),
            "verification mail sent to your email",
        ));
    }

    let code = otp::generate();
    let code_expiry = otp::expiry();
    let password_hash = hash_password(&body.password)?;
    let user = state
        .users
        .create(NewUser::signup(
            body.name.clone(),
            body.email.clone(),
            Some(body.phone.clone()),
            password_hash,
            body.role(),
            code.clone(),
            code_expiry,
        ))
        .await?;
    send_verification(&state, &user, &code).await;

    Ok(ApiResponse::created(
        json!({ "name": user.name, "email": user.email }),
        "account created successfully, check your email for the verification code",
    ))
}

/// GET /users - list all accounts (admin only, against the stored role).
pub async fn list(auth: AuthUser, State(state): State<AppState>) -> ApiResult<Vec<User>> {
    authz::check_current_role(&*state.users, &auth, Policy::AdminOnly).await?;
    let users = state.users.list().await?;
    Ok(ApiResponse::success(users, "all users fetched from database"))
}

/// GET /users/:id - fetch own account.
pub async fn get(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<User> {
    let user_id = parse_id(&id, "user")?;
    authz::check(&auth, Policy::OwnerOnly(user_id))?;
    let user = state
        .users
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;
    Ok(ApiResponse::success(user, "user fetched successfully"))
}

/// PUT /users/:id - partial profile update (name, email, phone).
pub async fn update(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
    ValidJson(body): ValidJson<UpdateUserRequest>,
) -> ApiResult<User> {
    let user_id = parse_id(&id, "user")?;
    authz::check(&auth, Policy::OwnerOnly(user_id))?;
    let changes = body.into_changes()?;

    let existing = state
        .users
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    // Advisory uniqueness pre-check on email change (store enforces too).
    if let Some(new_email) = &changes.email {
        if new_email != &existing.email {
            if let Some(other) = state.users.get_by_email(new_email).await? {
                if other.id != user_id {
                    return Err(ApiError::conflict("email is already in use"));
                }
            }
        }
    }

    let updated = state.users.update(user_id, changes).await?;
    Ok(ApiResponse::success(updated, "user updated successfully"))
}

/// DELETE /users/:id - remove own account.
pub async fn remove(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<User> {
    let user_id = parse_id(&id, "user")?;
    authz::check(&auth, Policy::OwnerOnly(user_id))?;
    let deleted = state.users.delete(user_id).await?;
    Ok(ApiResponse::success(deleted, "user deleted successfully"))
}
