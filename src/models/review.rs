use chrono::{DateTime, Utc};
use serde::Serialize;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// A review of a stay, authored by one user. Rating is within [1, 5].
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub stay_id: i64,
    pub user_id: i64,
    pub comment: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub stay_id: i64,
    pub user_id: i64,
    pub comment: String,
    pub rating: i32,
}

/// Partial review update: present overwrites, absent leaves untouched.
#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub comment: Option<String>,
    pub rating: Option<i32>,
}

impl ReviewChanges {
    pub fn is_empty(&self) -> bool {
        self.comment.is_none() && self.rating.is_none()
    }

    pub fn apply(self, review: &mut Review) {
        if let Some(comment) = self.comment {
            review.comment = comment;
        }
        if let Some(rating) = self.rating {
            review.rating = rating;
        }
    }
}
