use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "post_status", rename_all = "UPPERCASE")]
pub enum PostStatus {
    Opened,
    Closed,
}

impl Default for PostStatus {
    fn default() -> Self {
        PostStatus::Opened
    }
}

/// A roommate-wanted post, authored by one user for one stay.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RoommatePost {
    pub id: i64,
    pub user_id: i64,
    pub stay_id: i64,
    pub description: String,
    pub status: PostStatus,
    /// Open preference map, e.g. {"gender": "ANY", "non_smoker": true}.
    pub preferences: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: i64,
    pub stay_id: i64,
    pub description: String,
    pub preferences: Value,
}

/// Partial post update: present overwrites, absent leaves untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub description: Option<String>,
    pub preferences: Option<Value>,
    pub status: Option<PostStatus>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.preferences.is_none() && self.status.is_none()
    }

    pub fn apply(self, post: &mut RoommatePost) {
        if let Some(description) = self.description {
            post.description = description;
        }
        if let Some(preferences) = self.preferences {
            post.preferences = preferences;
        }
        if let Some(status) = self.status {
            post.status = status;
        }
    }
}
