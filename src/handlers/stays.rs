//! Stay listing CRUD. Reads are public; writes require the OWNER role
//! and, for existing stays, ownership of the record.

use axum::extract::{Path, State};
use serde_json::json;

use crate::authz::{self, Policy};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ValidJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::{NewStay, Stay};
use crate::schema::{parse_id, CreateStayRequest, UpdateStayRequest};

use super::AppState;

async fn fetch_stay(state: &AppState, stay_id: i64) -> Result<Stay, ApiError> {
    state
        .stays
        .get(stay_id)
        .await?
        .ok_or_else(|| ApiError::not_found("stay not found"))
}

/// POST /stays - list a new property. Role is checked against the
/// stored row, not the token, so a demoted owner cannot keep creating.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CreateStayRequest>,
) -> ApiResult<Stay> {
    authz::check_current_role(&*state.users, &auth, Policy::OwnerRole).await?;
    body.validate()?;

    let stay = state
        .stays
        .create(NewStay {
            owner_id: auth.id,
            name: body.name,
            address: body.address,
            latitude: body.latitude,
            longitude: body.longitude,
            facilities: body.facilities.unwrap_or_else(|| json!({})),
            photos: body.photos.unwrap_or_default(),
        })
        .await?;

    Ok(ApiResponse::created(stay, "stay created successfully"))
}

/// GET /stays - every listed stay. An empty catalogue is a 404.
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Stay>> {
    let stays = state.stays.list().await?;
    if stays.is_empty() {
        return Err(ApiError::not_found("no stays found"));
    }
    Ok(ApiResponse::success(stays, "stays fetched successfully"))
}

/// GET /stays/:stayId
pub async fn get(Path(id): Path<String>, State(state): State<AppState>) -> ApiResult<Stay> {
    let stay_id = parse_id(&id, "stay")?;
    let stay = fetch_stay(&state, stay_id).await?;
    Ok(ApiResponse::success(stay, "stay fetched successfully"))
}

/// PUT /stays/:stayId - partial update by the owning user.
pub async fn update(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
    ValidJson(body): ValidJson<UpdateStayRequest>,
) -> ApiResult<Stay> {
    let stay_id = parse_id(&id, "stay")?;
    let changes = body.into_changes()?;
    let stay = fetch_stay(&state, stay_id).await?;
    authz::check(&auth, Policy::OwnerOnly(stay.owner_id))?;
    let updated = state.stays.update(stay_id, changes).await?;
    Ok(ApiResponse::success(updated, "stay updated successfully"))
}

/// DELETE /stays/:stayId - removes the stay and its dependent rows.
pub async fn remove(
    auth: AuthUser,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Stay> {
    let stay_id = parse_id(&id, "stay")?;
    let stay = fetch_stay(&state, stay_id).await?;
    authz::check(&auth, Policy::OwnerOnly(stay.owner_id))?;
    let deleted = state.stays.delete(stay_id).await?;
    Ok(ApiResponse::success(deleted, "stay deleted successfully"))
}
