//! Repository traits for the five persisted entities.
//!
//! Handlers only ever see these traits; the Postgres and in-memory
//! implementations are swapped at startup. Uniqueness constraints
//! (User.email) are enforced here, not by handler pre-checks, so a
//! check-then-act race still ends in `StoreError::Conflict`.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    NewPost, NewReview, NewRoom, NewStay, NewUser, PostChanges, ReviewChanges, Review, RoomChanges,
    RoommatePost, SignupRefresh, Stay, StayChanges, StayRoom, User, UserChanges,
};

pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound("record"),
            // 23505 = unique_violation
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                StoreError::Conflict("email is already registered to another account".to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> StoreResult<User>;
    async fn get(&self, id: i64) -> StoreResult<Option<User>>;
    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn list(&self) -> StoreResult<Vec<User>>;
    async fn update(&self, id: i64, changes: UserChanges) -> StoreResult<User>;
    async fn delete(&self, id: i64) -> StoreResult<User>;
    /// Overwrite pending-signup credentials and reissue the OTP on an
    /// existing unverified account.
    async fn reissue_signup(&self, id: i64, signup: SignupRefresh) -> StoreResult<User>;
    /// Transition to verified: sets email_verified and clears otp/otp_expiry.
    async fn mark_verified(&self, id: i64) -> StoreResult<User>;
}

#[async_trait]
pub trait StayStore: Send + Sync {
    async fn create(&self, stay: NewStay) -> StoreResult<Stay>;
    async fn get(&self, id: i64) -> StoreResult<Option<Stay>>;
    async fn list(&self) -> StoreResult<Vec<Stay>>;
    async fn update(&self, id: i64, changes: StayChanges) -> StoreResult<Stay>;
    async fn delete(&self, id: i64) -> StoreResult<Stay>;
}

#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn create(&self, room: NewRoom) -> StoreResult<StayRoom>;
    /// Lookup scoped to a stay: a room id under the wrong stay is absent.
    async fn get_in_stay(&self, stay_id: i64, room_id: i64) -> StoreResult<Option<StayRoom>>;
    async fn list_for_stay(&self, stay_id: i64) -> StoreResult<Vec<StayRoom>>;
    async fn update(&self, id: i64, changes: RoomChanges) -> StoreResult<StayRoom>;
    async fn delete(&self, id: i64) -> StoreResult<StayRoom>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn create(&self, review: NewReview) -> StoreResult<Review>;
    async fn get(&self, id: i64) -> StoreResult<Option<Review>>;
    async fn list(&self) -> StoreResult<Vec<Review>>;
    async fn list_for_stay(&self, stay_id: i64) -> StoreResult<Vec<Review>>;
    async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<Review>>;
    async fn update(&self, id: i64, changes: ReviewChanges) -> StoreResult<Review>;
    async fn delete(&self, id: i64) -> StoreResult<Review>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(&self, post: NewPost) -> StoreResult<RoommatePost>;
    async fn get(&self, id: i64) -> StoreResult<Option<RoommatePost>>;
    async fn list(&self) -> StoreResult<Vec<RoommatePost>>;
    async fn list_for_stay(&self, stay_id: i64) -> StoreResult<Vec<RoommatePost>>;
    async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<RoommatePost>>;
    async fn update(&self, id: i64, changes: PostChanges) -> StoreResult<RoommatePost>;
    async fn delete(&self, id: i64) -> StoreResult<RoommatePost>;
}
