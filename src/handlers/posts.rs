//! Roommate-wanted posts, author-managed.
//!
//! Two route shapes reach these handlers: the flat `/roommate_post`
//! surface and the nested `/users/:userId/posts` surface. Both enforce
//! the same rule: a post belongs to its author and only the author can
//! change it. Closing a post is not terminal; an author may reopen it.

use axum::extract::{Path, State};
use serde_json::json;

use crate::authz::{self, Policy};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ValidJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::{NewPost, RoommatePost};
use crate::schema::{parse_id, CreatePostRequest, UpdatePostRequest};

use super::AppState;

async fn fetch_post(state: &AppState, post_id: i64) -> Result<RoommatePost, ApiError> {
    state
        .posts
        .get(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("post not found"))
}

/// POST /roommate_post - author comes from the token, never the body.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CreatePostRequest>,
) -> ApiResult<RoommatePost> {
    body.validate()?;

    if state.stays.get(body.stay_id).await?.is_none() {
        return Err(ApiError::not_found("stay not found"));
    }

    let post = state
        .posts
        .create(NewPost {
            user_id: auth.id,
            stay_id: body.stay_id,
            description: body.description,
            preferences: body.preferences.unwrap_or_else(|| json!({})),
        })
        .await?;

    Ok(ApiResponse::created(post, "roommate post created successfully"))
}

/// GET /roommate_post - every post on the platform; empty is a 404.
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<RoommatePost>> {
    let posts = state.posts.list().await?;
    if posts.is_empty() {
        return Err(ApiError::not_found("no roommate posts found"));
    }
    Ok(ApiResponse::success(posts, "roommate posts fetched successfully"))
}

/// GET /stays/:stayId/posts - all roommate posts for one stay; empty is
/// a 404.
pub async fn list_for_stay(
    Path(stay_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Vec<RoommatePost>> {
    let stay_id = parse_id(&stay_id, "stay")?;
    if state.stays.get(stay_id).await?.is_none() {
        return Err(ApiError::not_found("stay not found"));
    }
    let posts = state.posts.list_for_stay(stay_id).await?;
    if posts.is_empty() {
        return Err(ApiError::not_found("no roommate posts found for this stay"));
    }
    Ok(ApiResponse::success(posts, "roommate posts fetched successfully"))
}

/// GET /roommate_post/:id
pub async fn get(Path(id): Path<String>, State(state): State<AppState>) -> ApiResult<RoommatePost> {
    let post_id = parse_id(&id, "post")?;
    let post = fetch_post(&state, post_id).await?;
    Ok(ApiResponse::success(post, "roommate post fetched successfully"))
}

/// PUT /roommate_post/:id - author-only partial update; status may move
/// in either direction.
pub async fn update(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
    ValidJson(body): ValidJson<UpdatePostRequest>,
) -> ApiResult<RoommatePost> {
    let post_id = parse_id(&id, "post")?;
    let changes = body.into_changes()?;
    let post = fetch_post(&state, post_id).await?;
    authz::check(&auth, Policy::OwnerOnly(post.user_id))?;
    let updated = state.posts.update(post_id, changes).await?;
    Ok(ApiResponse::success(updated, "roommate post updated successfully"))
}

/// DELETE /roommate_post/:id - author-only.
pub async fn remove(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<RoommatePost> {
    let post_id = parse_id(&id, "post")?;
    let post = fetch_post(&state, post_id).await?;
    authz::check(&auth, Policy::OwnerOnly(post.user_id))?;
    let deleted = state.posts.delete(post_id).await?;
    Ok(ApiResponse::success(deleted, "roommate post deleted successfully"))
}

// ---------------------------------------------------------------------
// Nested surface: /users/:userId/posts
// ---------------------------------------------------------------------

/// GET /users/:userId/posts - a user's own posts; empty is a 404.
pub async fn list_for_user(
    auth: AuthUser,
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Vec<RoommatePost>> {
    let user_id = parse_id(&user_id, "user")?;
    authz::check(&auth, Policy::OwnerOnly(user_id))?;
    let posts = state.posts.list_for_user(user_id).await?;
    if posts.is_empty() {
        return Err(ApiError::not_found("no roommate posts found for this user"));
    }
    Ok(ApiResponse::success(posts, "roommate posts fetched successfully"))
}

/// The nested lookup is scoped: a post id under the wrong user is a 404.
async fn fetch_user_post(
    state: &AppState,
    user_id: i64,
    post_id: i64,
) -> Result<RoommatePost, ApiError> {
    match state.posts.get(post_id).await? {
        Some(post) if post.user_id == user_id => Ok(post),
        _ => Err(ApiError::not_found("post not found for this user")),
    }
}

/// GET /users/:userId/posts/:postId
pub async fn get_for_user(
    auth: AuthUser,
    Path((user_id, post_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> ApiResult<RoommatePost> {
    let user_id = parse_id(&user_id, "user")?;
    let post_id = parse_id(&post_id, "post")?;
    authz::check(&auth, Policy::OwnerOnly(user_id))?;
    let post = fetch_user_post(&state, user_id, post_id).await?;
    Ok(ApiResponse::success(post, "roommate post fetched successfully"))
}

/// PUT /users/:userId/posts/:postId
pub async fn update_for_user(
    auth: AuthUser,
    Path((user_id, post_id)): Path<(String, String)>,
    State(state): State<AppState>,
    ValidJson(body): ValidJson<UpdatePostRequest>,
) -> ApiResult<RoommatePost> {
    let user_id = parse_id(&user_id, "user")?;
    let post_id = parse_id(&post_id, "post")?;
    authz::check(&auth, Policy::OwnerOnly(user_id))?;
    let changes = body.into_changes()?;
    fetch_user_post(&state, user_id, post_id).await?;
    let updated = state.posts.update(post_id, changes).await?;
    Ok(ApiResponse::success(updated, "roommate post updated successfully"))
}

/// DELETE /users/:userId/posts/:postId
pub async fn remove_for_user(
    auth: AuthUser,
    Path((user_id, post_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> ApiResult<RoommatePost> {
    let user_id = parse_id(&user_id, "user")?;
    let post_id = parse_id(&post_id, "post")?;
    authz::check(&auth, Policy::OwnerOnly(user_id))?;
    fetch_user_post(&state, user_id, post_id).await?;
    let deleted = state.posts.delete(post_id).await?;
    Ok(ApiResponse::success(deleted, "roommate post deleted successfully"))
}
