//! Moderation surface over roommate posts, mounted at /posts.
//!
//! Every operation here requires the ADMIN role, checked against the
//! stored user row rather than the token claims. Unlike the
//! author-managed surface, creation names the author in the body.

use axum::extract::{Path, State};
use serde_json::json;

use crate::authz::{self, Policy};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ValidJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::{NewPost, RoommatePost};
use crate::schema::{parse_id, AdminCreatePostRequest, UpdatePostRequest};

use super::AppState;

async fn fetch_post(state: &AppState, post_id: i64) -> Result<RoommatePost, ApiError> {
    state
        .posts
        .get(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("post not found"))
}

/// POST /posts - create a post on behalf of a named user.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(body): ValidJson<AdminCreatePostRequest>,
) -> ApiResult<RoommatePost> {
    authz::check_current_role(&*state.users, &auth, Policy::AdminOnly).await?;
    body.validate()?;

    if state.users.get(body.user_id).await?.is_none() {
        return Err(ApiError::not_found("user not found"));
    }
    if state.stays.get(body.stay_id).await?.is_none() {
        return Err(ApiError::not_found("stay not found"));
    }

    let post = state
        .posts
        .create(NewPost {
            user_id: body.user_id,
            stay_id: body.stay_id,
            description: body.description,
            preferences: body.preferences.unwrap_or_else(|| json!({})),
        })
        .await?;

    Ok(ApiResponse::created(post, "post created successfully"))
}

/// GET /posts - every post on the platform; empty is a 404.
pub async fn list(auth: AuthUser, State(state): State<AppState>) -> ApiResult<Vec<RoommatePost>> {
    authz::check_current_role(&*state.users, &auth, Policy::AdminOnly).await?;
    let posts = state.posts.list().await?;
    if posts.is_empty() {
        return Err(ApiError::not_found("no posts found"));
    }
    Ok(ApiResponse::success(posts, "posts fetched successfully"))
}

/// GET /posts/:id
pub async fn get(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<RoommatePost> {
    authz::check_current_role(&*state.users, &auth, Policy::AdminOnly).await?;
    let post_id = parse_id(&id, "post")?;
    let post = fetch_post(&state, post_id).await?;
    Ok(ApiResponse::success(post, "post fetched successfully"))
}

/// PUT /posts/:id - moderate any post regardless of author.
pub async fn update(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
    ValidJson(body): ValidJson<UpdatePostRequest>,
) -> ApiResult<RoommatePost> {
    authz::check_current_role(&*state.users, &auth, Policy::AdminOnly).await?;
    let post_id = parse_id(&id, "post")?;
    let changes = body.into_changes()?;
    fetch_post(&state, post_id).await?;
    let updated = state.posts.update(post_id, changes).await?;
    Ok(ApiResponse::success(updated, "post updated successfully"))
}

/// DELETE /posts/:id
pub async fn remove(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<RoommatePost> {
    authz::check_current_role(&*state.users, &auth, Policy::AdminOnly).await?;
    let post_id = parse_id(&id, "post")?;
    fetch_post(&state, post_id).await?;
    let deleted = state.posts.delete(post_id).await?;
    Ok(ApiResponse::success(deleted, "post deleted successfully"))
}
