use std::sync::Arc;

use axum::response::IntoResponse;
use serde_json::json;
use sqlx::PgPool;

use crate::mailer::{EmailGateway, LogMailer};
use crate::store::memory::MemoryStore;
use crate::store::postgres::{PgPostStore, PgReviewStore, PgRoomStore, PgStayStore, PgUserStore};
use crate::store::{PostStore, ReviewStore, RoomStore, StayStore, UserStore};

pub mod admin_posts;
pub mod posts;
pub mod reviews;
pub mod rooms;
pub mod signin;
pub mod stays;
pub mod users;
pub mod verify;

/// Per-entity repositories plus the mail gateway, constructed once at
/// process start and injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub stays: Arc<dyn StayStore>,
    pub rooms: Arc<dyn RoomStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub posts: Arc<dyn PostStore>,
    pub mailer: Arc<dyn EmailGateway>,
}

impl AppState {
    pub fn postgres(pool: PgPool, mailer: Arc<dyn EmailGateway>) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            stays: Arc::new(PgStayStore::new(pool.clone())),
            rooms: Arc::new(PgRoomStore::new(pool.clone())),
            reviews: Arc::new(PgReviewStore::new(pool.clone())),
            posts: Arc::new(PgPostStore::new(pool)),
            mailer,
        }
    }

    pub fn in_memory() -> Self {
        Self::in_memory_with_mailer(Arc::new(LogMailer))
    }

    pub fn in_memory_with_mailer(mailer: Arc<dyn EmailGateway>) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            stays: store.clone(),
            rooms: store.clone(),
            reviews: store.clone(),
            posts: store,
            mailer,
        }
    }
}

pub async fn root() -> axum::response::Json<serde_json::Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "message": "Staynest API",
        "data": {
            "name": "Staynest API",
            "version": version,
            "endpoints": {
                "signup": "POST /users (public)",
                "verify": "POST /verify (public)",
                "signin": "POST /signin (public)",
                "users": "/users/:id (self-managed)",
                "stays": "/stays[/:stayId] (open read, owner write)",
                "rooms": "/stays/:stayId/rooms[/:roomId] (open read, owner write)",
                "reviews": "/reviews[/:id], /stays/:stayId/reviews, /users/:userId/reviews (open read by id, author write)",
                "roommate_posts": "/roommate_post[/:id], /users/:userId/posts (author-managed)",
                "admin_posts": "/posts[/:id] (admin only)",
            }
        }
    }))
}

pub async fn health() -> impl IntoResponse {
    axum::response::Json(json!({
        "success": true,
        "message": "ok",
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}
