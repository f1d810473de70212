//! Postgres-backed stores (sqlx).
//!
//! Partial updates use COALESCE so absent fields keep their stored
//! values; callers guarantee at least one field is present. Email
//! uniqueness rides on the `users_email_key` constraint and surfaces as
//! `StoreError::Conflict` via the sqlx error mapping.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{
    PostStore, ReviewStore, RoomStore, StayStore, StoreError, StoreResult, UserStore,
};
use crate::models::{
    NewPost, NewReview, NewRoom, NewStay, NewUser, PostChanges, Review, ReviewChanges,
    RoomChanges, RoommatePost, SignupRefresh, Stay, StayChanges, StayRoom, User, UserChanges,
};

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, User>(
            r#"INSERT INTO users
                   (name, email, phone, password_hash, role, profile_pic,
                    email_verified, otp, otp_expiry)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING *"#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.profile_pic)
        .bind(user.email_verified)
        .bind(&user.otp)
        .bind(user.otp_expiry)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get(&self, id: i64) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        let row = sqlx::query_as::<_, User>(
            r#"UPDATE users
               SET name  = COALESCE($2, name),
                   email = COALESCE($3, email),
                   phone = COALESCE($4, phone)
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.phone)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(StoreError::NotFound("user"))
    }

    async fn delete(&self, id: i64) -> StoreResult<User> {
        let row = sqlx::query_as::<_, User>("DELETE FROM users WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(StoreError::NotFound("user"))
    }

    async fn reissue_signup(&self, id: i64, signup: SignupRefresh) -> StoreResult<User> {
        let row = sqlx::query_as::<_, User>(
            r#"UPDATE users
               SET name = $2, phone = $3, password_hash = $4,
                   otp = $5, otp_expiry = $6
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&signup.name)
        .bind(&signup.phone)
        .bind(&signup.password_hash)
        .bind(&signup.otp)
        .bind(signup.otp_expiry)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(StoreError::NotFound("user"))
    }

    async fn mark_verified(&self, id: i64) -> StoreResult<User> {
        let row = sqlx::query_as::<_, User>(
            r#"UPDATE users
               SET email_verified = TRUE, otp = NULL, otp_expiry = NULL
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(StoreError::NotFound("user"))
    }
}

#[derive(Clone)]
pub struct PgStayStore {
    pool: PgPool,
}

impl PgStayStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StayStore for PgStayStore {
    async fn create(&self, stay: NewStay) -> StoreResult<Stay> {
        let row = sqlx::query_as::<_, Stay>(
            r#"INSERT INTO stays
                   (owner_id, name, address, latitude, longitude, facilities, photos)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#,
        )
        .bind(stay.owner_id)
        .bind(&stay.name)
        .bind(&stay.address)
        .bind(stay.latitude)
        .bind(stay.longitude)
        .bind(&stay.facilities)
        .bind(&stay.photos)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Stay>> {
        let row = sqlx::query_as::<_, Stay>("SELECT * FROM stays WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self) -> StoreResult<Vec<Stay>> {
        let rows = sqlx::query_as::<_, Stay>("SELECT * FROM stays ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update(&self, id: i64, changes: StayChanges) -> StoreResult<Stay> {
        let row = sqlx::query_as::<_, Stay>(
            r#"UPDATE stays
               SET name      = COALESCE($2, name),
                   address   = COALESCE($3, address),
                   contact   = COALESCE($4, contact),
                   latitude  = COALESCE($5, latitude),
                   longitude = COALESCE($6, longitude)
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.address)
        .bind(changes.contact)
        .bind(changes.latitude)
        .bind(changes.longitude)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(StoreError::NotFound("stay"))
    }

    async fn delete(&self, id: i64) -> StoreResult<Stay> {
        let row = sqlx::query_as::<_, Stay>("DELETE FROM stays WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(StoreError::NotFound("stay"))
    }
}

#[derive(Clone)]
pub struct PgRoomStore {
    pool: PgPool,
}

impl PgRoomStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomStore for PgRoomStore {
    async fn create(&self, room: NewRoom) -> StoreResult<StayRoom> {
        let row = sqlx::query_as::<_, StayRoom>(
            r#"INSERT INTO stay_rooms
                   (stay_id, room_type, capacity, price, facilities, photos)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(room.stay_id)
        .bind(room.room_type)
        .bind(room.capacity)
        .bind(room.price)
        .bind(&room.facilities)
        .bind(&room.photos)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_in_stay(&self, stay_id: i64, room_id: i64) -> StoreResult<Option<StayRoom>> {
        let row = sqlx::query_as::<_, StayRoom>(
            "SELECT * FROM stay_rooms WHERE id = $1 AND stay_id = $2",
        )
        .bind(room_id)
        .bind(stay_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_for_stay(&self, stay_id: i64) -> StoreResult<Vec<StayRoom>> {
        let rows = sqlx::query_as::<_, StayRoom>(
            "SELECT * FROM stay_rooms WHERE stay_id = $1 ORDER BY id",
        )
        .bind(stay_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, id: i64, changes: RoomChanges) -> StoreResult<StayRoom> {
        let row = sqlx::query_as::<_, StayRoom>(
            r#"UPDATE stay_rooms
               SET room_type  = COALESCE($2, room_type),
                   capacity   = COALESCE($3, capacity),
                   price      = COALESCE($4, price),
                   facilities = COALESCE($5, facilities),
                   photos     = COALESCE($6, photos)
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(changes.room_type)
        .bind(changes.capacity)
        .bind(changes.price)
        .bind(changes.facilities)
        .bind(changes.photos)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(StoreError::NotFound("room"))
    }

    async fn delete(&self, id: i64) -> StoreResult<StayRoom> {
        let row =
            sqlx::query_as::<_, StayRoom>("DELETE FROM stay_rooms WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.ok_or(StoreError::NotFound("room"))
    }
}

#[derive(Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn create(&self, review: NewReview) -> StoreResult<Review> {
        let row = sqlx::query_as::<_, Review>(
            r#"INSERT INTO reviews (stay_id, user_id, comment, rating)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(review.stay_id)
        .bind(review.user_id)
        .bind(&review.comment)
        .bind(review.rating)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Review>> {
        let row = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self) -> StoreResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, Review>("SELECT * FROM reviews ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_for_stay(&self, stay_id: i64) -> StoreResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE stay_id = $1 ORDER BY id",
        )
        .bind(stay_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, id: i64, changes: ReviewChanges) -> StoreResult<Review> {
        let row = sqlx::query_as::<_, Review>(
            r#"UPDATE reviews
               SET comment = COALESCE($2, comment),
                   rating  = COALESCE($3, rating)
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(changes.comment)
        .bind(changes.rating)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(StoreError::NotFound("review"))
    }

    async fn delete(&self, id: i64) -> StoreResult<Review> {
        let row = sqlx::query_as::<_, Review>("DELETE FROM reviews WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(StoreError::NotFound("review"))
    }
}

#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn create(&self, post: NewPost) -> StoreResult<RoommatePost> {
        let row = sqlx::query_as::<_, RoommatePost>(
            r#"INSERT INTO roommate_posts (user_id, stay_id, description, preferences)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(post.user_id)
        .bind(post.stay_id)
        .bind(&post.description)
        .bind(&post.preferences)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get(&self, id: i64) -> StoreResult<Option<RoommatePost>> {
        let row = sqlx::query_as::<_, RoommatePost>("SELECT * FROM roommate_posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self) -> StoreResult<Vec<RoommatePost>> {
        let rows = sqlx::query_as::<_, RoommatePost>("SELECT * FROM roommate_posts ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_for_stay(&self, stay_id: i64) -> StoreResult<Vec<RoommatePost>> {
        let rows = sqlx::query_as::<_, RoommatePost>(
            "SELECT * FROM roommate_posts WHERE stay_id = $1 ORDER BY id",
        )
        .bind(stay_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<RoommatePost>> {
        let rows = sqlx::query_as::<_, RoommatePost>(
            "SELECT * FROM roommate_posts WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, id: i64, changes: PostChanges) -> StoreResult<RoommatePost> {
        let row = sqlx::query_as::<_, RoommatePost>(
            r#"UPDATE roommate_posts
               SET description = COALESCE($2, description),
                   preferences = COALESCE($3, preferences),
                   status      = COALESCE($4, status)
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(changes.description)
        .bind(changes.preferences)
        .bind(changes.status)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(StoreError::NotFound("post"))
    }

    async fn delete(&self, id: i64) -> StoreResult<RoommatePost> {
        let row =
            sqlx::query_as::<_, RoommatePost>("DELETE FROM roommate_posts WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.ok_or(StoreError::NotFound("post"))
    }
}
