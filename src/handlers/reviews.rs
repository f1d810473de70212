//! Stay reviews. Any signed-in user can post one; only the author can
//! edit or delete it afterwards.

use axum::extract::{Path, State};

use crate::authz::{self, Policy};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ValidJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::{NewReview, Review};
use crate::schema::{parse_id, CreateReviewRequest, UpdateReviewRequest};

use super::AppState;

async fn fetch_review(state: &AppState, review_id: i64) -> Result<Review, ApiError> {
    state
        .reviews
        .get(review_id)
        .await?
        .ok_or_else(|| ApiError::not_found("review not found"))
}

/// POST /reviews - the author is the bearer of the token, never a body
/// field.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CreateReviewRequest>,
) -> ApiResult<Review> {
    body.validate()?;

    if state.stays.get(body.stay_id).await?.is_none() {
        return Err(ApiError::not_found("stay not found"));
    }

    let review = state
        .reviews
        .create(NewReview {
            stay_id: body.stay_id,
            user_id: auth.id,
            comment: body.comment,
            rating: body.rating,
        })
        .await?;

    Ok(ApiResponse::created(review, "review posted successfully"))
}

/// GET /reviews - every review on the platform; empty is a 404.
/// Unlike reads by id, the full listing requires a signed-in caller.
pub async fn list(_auth: AuthUser, State(state): State<AppState>) -> ApiResult<Vec<Review>> {
    let reviews = state.reviews.list().await?;
    if reviews.is_empty() {
        return Err(ApiError::not_found("no reviews found"));
    }
    Ok(ApiResponse::success(reviews, "reviews fetched successfully"))
}

/// GET /stays/:stayId/reviews - all reviews of one stay; empty is a 404.
pub async fn list_for_stay(
    Path(stay_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Vec<Review>> {
    let stay_id = parse_id(&stay_id, "stay")?;
    if state.stays.get(stay_id).await?.is_none() {
        return Err(ApiError::not_found("stay not found"));
    }
    let reviews = state.reviews.list_for_stay(stay_id).await?;
    if reviews.is_empty() {
        return Err(ApiError::not_found("no reviews found for this stay"));
    }
    Ok(ApiResponse::success(reviews, "reviews fetched successfully"))
}

/// GET /users/:userId/reviews - a user's own reviews; empty is a 404.
pub async fn list_for_user(
    auth: AuthUser,
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Vec<Review>> {
    let user_id = parse_id(&user_id, "user")?;
    authz::check(&auth, Policy::OwnerOnly(user_id))?;
    let reviews = state.reviews.list_for_user(user_id).await?;
    if reviews.is_empty() {
        return Err(ApiError::not_found("no reviews found for this user"));
    }
    Ok(ApiResponse::success(reviews, "reviews fetched successfully"))
}

/// GET /reviews/:id
pub async fn get(Path(id): Path<String>, State(state): State<AppState>) -> ApiResult<Review> {
    let review_id = parse_id(&id, "review")?;
    let review = fetch_review(&state, review_id).await?;
    Ok(ApiResponse::success(review, "review fetched successfully"))
}

/// PUT /reviews/:id - author-only partial update (comment, rating).
pub async fn update(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
    ValidJson(body): ValidJson<UpdateReviewRequest>,
) -> ApiResult<Review> {
    let review_id = parse_id(&id, "review")?;
    let changes = body.into_changes()?;
    let review = fetch_review(&state, review_id).await?;
    authz::check(&auth, Policy::OwnerOnly(review.user_id))?;
    let updated = state.reviews.update(review_id, changes).await?;
    Ok(ApiResponse::success(updated, "review updated successfully"))
}

/// DELETE /reviews/:id - author-only.
pub async fn remove(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Review> {
    let review_id = parse_id(&id, "review")?;
    let review = fetch_review(&state, review_id).await?;
    authz::check(&auth, Policy::OwnerOnly(review.user_id))?;
    let deleted = state.reviews.delete(review_id).await?;
    Ok(ApiResponse::success(deleted, "review deleted successfully"))
}
