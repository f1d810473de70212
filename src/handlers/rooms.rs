//! Room CRUD, always scoped under a parent stay. Reads are public;
//! writes require ownership of the parent stay.

use axum::extract::{Path, State};
use serde_json::json;

use crate::authz::{self, Policy};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::json::ValidJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::{NewRoom, Stay, StayRoom};
use crate::schema::{parse_id, CreateRoomRequest, UpdateRoomRequest};

use super::AppState;

async fn fetch_stay(state: &AppState, stay_id: i64) -> Result<Stay, ApiError> {
    state
        .stays
        .get(stay_id)
        .await?
        .ok_or_else(|| ApiError::not_found("stay not found"))
}

/// Room lookup is scoped: a valid room id under the wrong stay is a 404.
async fn fetch_room(state: &AppState, stay_id: i64, room_id: i64) -> Result<StayRoom, ApiError> {
    state
        .rooms
        .get_in_stay(stay_id, room_id)
        .await?
        .ok_or_else(|| ApiError::not_found("room not found in this stay"))
}

/// POST /stays/:stayId/rooms
pub async fn create(
    auth: AuthUser,
    Path(stay_id): Path<String>,
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CreateRoomRequest>,
) -> ApiResult<StayRoom> {
    let stay_id = parse_id(&stay_id, "stay")?;
    body.validate()?;
    let stay = fetch_stay(&state, stay_id).await?;
    authz::check(&auth, Policy::OwnerOnly(stay.owner_id))?;

    let room = state
        .rooms
        .create(NewRoom {
            stay_id,
            room_type: body.room_type,
            capacity: body.capacity,
            price: body.price,
            facilities: body.facilities.unwrap_or_else(|| json!({})),
            photos: body.photos.unwrap_or_default(),
        })
        .await?;

    Ok(ApiResponse::created(room, "room added to stay successfully"))
}

/// GET /stays/:stayId/rooms - all rooms of one stay; empty is a 404.
pub async fn list(
    Path(stay_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Vec<StayRoom>> {
    let stay_id = parse_id(&stay_id, "stay")?;
    fetch_stay(&state, stay_id).await?;
    let rooms = state.rooms.list_for_stay(stay_id).await?;
    if rooms.is_empty() {
        return Err(ApiError::not_found("no rooms found for this stay"));
    }
    Ok(ApiResponse::success(rooms, "rooms fetched successfully"))
}

/// GET /stays/:stayId/rooms/:roomId
pub async fn get(
    Path((stay_id, room_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> ApiResult<StayRoom> {
    let stay_id = parse_id(&stay_id, "stay")?;
    let room_id = parse_id(&room_id, "room")?;
    let room = fetch_room(&state, stay_id, room_id).await?;
    Ok(ApiResponse::success(room, "room fetched successfully"))
}

/// PUT /stays/:stayId/rooms/:roomId - partial update by the stay owner.
pub async fn update(
    auth: AuthUser,
    Path((stay_id, room_id)): Path<(String, String)>,
    State(state): State<AppState>,
    ValidJson(body): ValidJson<UpdateRoomRequest>,
) -> ApiResult<StayRoom> {
    let stay_id = parse_id(&stay_id, "stay")?;
    let room_id = parse_id(&room_id, "room")?;
    let changes = body.into_changes()?;
    let stay = fetch_stay(&state, stay_id).await?;
    authz::check(&auth, Policy::OwnerOnly(stay.owner_id))?;
    fetch_room(&state, stay_id, room_id).await?;
    let updated = state.rooms.update(room_id, changes).await?;
    Ok(ApiResponse::success(updated, "room updated successfully"))
}

/// DELETE /stays/:stayId/rooms/:roomId
pub async fn remove(
    auth: AuthUser,
    Path((stay_id, room_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> ApiResult<StayRoom> {
    let stay_id = parse_id(&stay_id, "stay")?;
    let room_id = parse_id(&room_id, "room")?;
    let stay = fetch_stay(&state, stay_id).await?;
    authz::check(&auth, Policy::OwnerOnly(stay.owner_id))?;
    fetch_room(&state, stay_id, room_id).await?;
    let deleted = state.rooms.delete(room_id).await?;
    Ok(ApiResponse::success(deleted, "room deleted successfully"))
}
