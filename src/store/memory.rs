//! In-memory store. Development mode and test double: same contract as
//! the Postgres store, including email-uniqueness enforcement.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{
    PostStore, ReviewStore, RoomStore, StayStore, StoreError, StoreResult, UserStore,
};
use crate::models::{
    NewPost, NewReview, NewRoom, NewStay, NewUser, PostChanges, PostStatus, Review, ReviewChanges,
    RoomChanges, RoommatePost, SignupRefresh, Stay, StayChanges, StayRoom, User, UserChanges,
};

#[derive(Default)]
struct Tables {
    users: HashMap<i64, User>,
    stays: HashMap<i64, Stay>,
    rooms: HashMap<i64, StayRoom>,
    reviews: HashMap<i64, Review>,
    posts: HashMap<i64, RoommatePost>,
    next_user_id: i64,
    next_stay_id: i64,
    next_room_id: i64,
    next_review_id: i64,
    next_post_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_id<T: Clone>(map: &HashMap<i64, T>, id_of: impl Fn(&T) -> i64) -> Vec<T> {
    let mut rows: Vec<T> = map.values().cloned().collect();
    rows.sort_by_key(|row| id_of(row));
    rows
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(
                "email is already registered to another account".to_string(),
            ));
        }
        tables.next_user_id += 1;
        let row = User {
            id: tables.next_user_id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            password_hash: user.password_hash,
            role: user.role,
            profile_pic: user.profile_pic,
            email_verified: user.email_verified,
            otp: user.otp,
            otp_expiry: user.otp_expiry,
            created_at: Utc::now(),
        };
        tables.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> StoreResult<Option<User>> {
        let tables = self.inner.lock().expect("memory store poisoned");
        Ok(tables.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.inner.lock().expect("memory store poisoned");
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let tables = self.inner.lock().expect("memory store poisoned");
        Ok(sorted_by_id(&tables.users, |u| u.id))
    }

    async fn update(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        if let Some(new_email) = &changes.email {
            if tables
                .users
                .values()
                .any(|u| u.id != id && &u.email == new_email)
            {
                return Err(StoreError::Conflict(
                    "email is already registered to another account".to_string(),
                ));
            }
        }
        let user = tables
            .users
            .get_mut(&id)
            .ok_or(StoreError::NotFound("user"))?;
        changes.apply(user);
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<User> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        let user = tables.users.remove(&id).ok_or(StoreError::NotFound("user"))?;
        // Cascade like the relational schema's ON DELETE CASCADE: the
        // user's stays (with their rooms and attached reviews/posts),
        // plus everything the user authored elsewhere.
        let owned_stays: Vec<i64> = tables
            .stays
            .values()
            .filter(|stay| stay.owner_id == id)
            .map(|stay| stay.id)
            .collect();
        tables.stays.retain(|_, stay| stay.owner_id != id);
        tables
            .rooms
            .retain(|_, room| !owned_stays.contains(&room.stay_id));
        tables
            .reviews
            .retain(|_, review| review.user_id != id && !owned_stays.contains(&review.stay_id));
        tables
            .posts
            .retain(|_, post| post.user_id != id && !owned_stays.contains(&post.stay_id));
        Ok(user)
    }

    async fn reissue_signup(&self, id: i64, signup: SignupRefresh) -> StoreResult<User> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        let user = tables
            .users
            .get_mut(&id)
            .ok_or(StoreError::NotFound("user"))?;
        user.name = signup.name;
        user.phone = signup.phone;
        user.password_hash = Some(signup.password_hash);
        user.otp = Some(signup.otp);
        user.otp_expiry = Some(signup.otp_expiry);
        Ok(user.clone())
    }

    async fn mark_verified(&self, id: i64) -> StoreResult<User> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        let user = tables
            .users
            .get_mut(&id)
            .ok_or(StoreError::NotFound("user"))?;
        user.email_verified = true;
        user.otp = None;
        user.otp_expiry = None;
        Ok(user.clone())
    }
}

#[async_trait]
impl StayStore for MemoryStore {
    async fn create(&self, stay: NewStay) -> StoreResult<Stay> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        tables.next_stay_id += 1;
        let row = Stay {
            id: tables.next_stay_id,
            owner_id: stay.owner_id,
            name: stay.name,
            address: stay.address,
            latitude: stay.latitude,
            longitude: stay.longitude,
            contact: None,
            facilities: stay.facilities,
            photos: stay.photos,
            created_at: Utc::now(),
        };
        tables.stays.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Stay>> {
        let tables = self.inner.lock().expect("memory store poisoned");
        Ok(tables.stays.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Stay>> {
        let tables = self.inner.lock().expect("memory store poisoned");
        Ok(sorted_by_id(&tables.stays, |s| s.id))
    }

    async fn update(&self, id: i64, changes: StayChanges) -> StoreResult<Stay> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        let stay = tables
            .stays
            .get_mut(&id)
            .ok_or(StoreError::NotFound("stay"))?;
        changes.apply(stay);
        Ok(stay.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<Stay> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        let stay = tables.stays.remove(&id).ok_or(StoreError::NotFound("stay"))?;
        // Cascade like the relational schema's ON DELETE CASCADE
        tables.rooms.retain(|_, room| room.stay_id != id);
        tables.reviews.retain(|_, review| review.stay_id != id);
        tables.posts.retain(|_, post| post.stay_id != id);
        Ok(stay)
    }
}

#[async_trait]
impl RoomStore for MemoryStore {
    async fn create(&self, room: NewRoom) -> StoreResult<StayRoom> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        tables.next_room_id += 1;
        let row = StayRoom {
            id: tables.next_room_id,
            stay_id: room.stay_id,
            room_type: room.room_type,
            capacity: room.capacity,
            price: room.price,
            facilities: room.facilities,
            photos: room.photos,
            created_at: Utc::now(),
        };
        tables.rooms.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_in_stay(&self, stay_id: i64, room_id: i64) -> StoreResult<Option<StayRoom>> {
        let tables = self.inner.lock().expect("memory store poisoned");
        Ok(tables
            .rooms
            .get(&room_id)
            .filter(|room| room.stay_id == stay_id)
            .cloned())
    }

    async fn list_for_stay(&self, stay_id: i64) -> StoreResult<Vec<StayRoom>> {
        let tables = self.inner.lock().expect("memory store poisoned");
        let mut rows: Vec<StayRoom> = tables
            .rooms
            .values()
            .filter(|room| room.stay_id == stay_id)
            .cloned()
            .collect();
        rows.sort_by_key(|room| room.id);
        Ok(rows)
    }

    async fn update(&self, id: i64, changes: RoomChanges) -> StoreResult<StayRoom> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        let room = tables
            .rooms
            .get_mut(&id)
            .ok_or(StoreError::NotFound("room"))?;
        changes.apply(room);
        Ok(room.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<StayRoom> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        tables.rooms.remove(&id).ok_or(StoreError::NotFound("room"))
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn create(&self, review: NewReview) -> StoreResult<Review> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        tables.next_review_id += 1;
        let row = Review {
            id: tables.next_review_id,
            stay_id: review.stay_id,
            user_id: review.user_id,
            comment: review.comment,
            rating: review.rating,
            created_at: Utc::now(),
        };
        tables.reviews.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Review>> {
        let tables = self.inner.lock().expect("memory store poisoned");
        Ok(tables.reviews.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Review>> {
        let tables = self.inner.lock().expect("memory store poisoned");
        Ok(sorted_by_id(&tables.reviews, |r| r.id))
    }

    async fn list_for_stay(&self, stay_id: i64) -> StoreResult<Vec<Review>> {
        let tables = self.inner.lock().expect("memory store poisoned");
        let mut rows: Vec<Review> = tables
            .reviews
            .values()
            .filter(|review| review.stay_id == stay_id)
            .cloned()
            .collect();
        rows.sort_by_key(|review| review.id);
        Ok(rows)
    }

    async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<Review>> {
        let tables = self.inner.lock().expect("memory store poisoned");
        let mut rows: Vec<Review> = tables
            .reviews
            .values()
            .filter(|review| review.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|review| review.id);
        Ok(rows)
    }

    async fn update(&self, id: i64, changes: ReviewChanges) -> StoreResult<Review> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        let review = tables
            .reviews
            .get_mut(&id)
            .ok_or(StoreError::NotFound("review"))?;
        changes.apply(review);
        Ok(review.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<Review> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        tables
            .reviews
            .remove(&id)
            .ok_or(StoreError::NotFound("review"))
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create(&self, post: NewPost) -> StoreResult<RoommatePost> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        tables.next_post_id += 1;
        let row = RoommatePost {
            id: tables.next_post_id,
            user_id: post.user_id,
            stay_id: post.stay_id,
            description: post.description,
            status: PostStatus::Opened,
            preferences: post.preferences,
            created_at: Utc::now(),
        };
        tables.posts.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get(&self, id: i64) -> StoreResult<Option<RoommatePost>> {
        let tables = self.inner.lock().expect("memory store poisoned");
        Ok(tables.posts.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<RoommatePost>> {
        let tables = self.inner.lock().expect("memory store poisoned");
        Ok(sorted_by_id(&tables.posts, |p| p.id))
    }

    async fn list_for_stay(&self, stay_id: i64) -> StoreResult<Vec<RoommatePost>> {
        let tables = self.inner.lock().expect("memory store poisoned");
        let mut rows: Vec<RoommatePost> = tables
            .posts
            .values()
            .filter(|post| post.stay_id == stay_id)
            .cloned()
            .collect();
        rows.sort_by_key(|post| post.id);
        Ok(rows)
    }

    async fn list_for_user(&self, user_id: i64) -> StoreResult<Vec<RoommatePost>> {
        let tables = self.inner.lock().expect("memory store poisoned");
        let mut rows: Vec<RoommatePost> = tables
            .posts
            .values()
            .filter(|post| post.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|post| post.id);
        Ok(rows)
    }

    async fn update(&self, id: i64, changes: PostChanges) -> StoreResult<RoommatePost> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        let post = tables
            .posts
            .get_mut(&id)
            .ok_or(StoreError::NotFound("post"))?;
        changes.apply(post);
        Ok(post.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<RoommatePost> {
        let mut tables = self.inner.lock().expect("memory store poisoned");
        tables.posts.remove(&id).ok_or(StoreError::NotFound("post"))
    }
}
