//! Request payload schemas and their validation rules.
//!
//! Serde gives the typing; `validate()` enforces presence and range
//! constraints, and update payloads additionally require at least one
//! recognized field before any store call is made.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::review::{MAX_RATING, MIN_RATING};
use crate::models::{PostChanges, PostStatus, ReviewChanges, Role, RoomChanges, RoomType,
    StayChanges, UserChanges};
use rust_decimal::Decimal;

/// Coerce a path segment into a positive id; rejects with 400 otherwise.
pub fn parse_id(raw: &str, what: &str) -> Result<i64, ApiError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::bad_request(format!("invalid {what} id"))),
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

/// Minimal well-formedness check: something before and after a single
/// '@', and a dot in the domain part.
fn check_email(email: &str) -> Result<(), ApiError> {
    let mut parts = email.split('@');
    let valid = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None)
            if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    );
    if valid {
        Ok(())
    } else {
        Err(ApiError::field_validation("email", "must be a valid email address"))
    }
}

fn check_rating(rating: i32) -> Result<(), ApiError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(ApiError::field_validation(
            "rating",
            format!("must be between {MIN_RATING} and {MAX_RATING}"),
        ))
    }
}

// -------------------------------------------------------------------------
// Users
// -------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// Optional; USER by default. ADMIN accounts are never self-service.
    pub role: Option<Role>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("phone", &self.phone)?;
        require("password", &self.password)?;
        check_email(&self.email)?;
        if self.role == Some(Role::Admin) {
            return Err(ApiError::validation("admin accounts cannot be self-registered"));
        }
        Ok(())
    }

    pub fn role(&self) -> Role {
        self.role.unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_changes(self) -> Result<UserChanges, ApiError> {
        let changes = UserChanges {
            name: self.name,
            email: self.email,
            phone: self.phone,
        };
        if changes.is_empty() {
            return Err(ApiError::validation(
                "at least one field (name, email, phone) is required to update",
            ));
        }
        if let Some(email) = &changes.email {
            check_email(email)?;
        }
        Ok(changes)
    }
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub otp: String,
}

impl VerifyRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require("email", &self.email)?;
        require("otp", &self.otp)?;
        if !crate::otp::is_well_formed(&self.otp) {
            return Err(ApiError::validation("OTP must be a 6 digit number"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

impl SigninRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require("email", &self.email)?;
        require("password", &self.password)
    }
}

// -------------------------------------------------------------------------
// Stays
// -------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateStayRequest {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub facilities: Option<Value>,
    #[serde(default)]
    pub photos: Option<Vec<String>>,
}

impl CreateStayRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)?;
        require("address", &self.address)?;
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ApiError::field_validation("latitude", "must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ApiError::field_validation("longitude", "must be within [-180, 180]"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStayRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact: Option<Value>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl UpdateStayRequest {
    pub fn into_changes(self) -> Result<StayChanges, ApiError> {
        let changes = StayChanges {
            name: self.name,
            address: self.address,
            contact: self.contact,
            latitude: self.latitude,
            longitude: self.longitude,
        };
        if changes.is_empty() {
            return Err(ApiError::validation(
                "at least one field is required to update the stay",
            ));
        }
        Ok(changes)
    }
}

// -------------------------------------------------------------------------
// Rooms
// -------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub room_type: RoomType,
    pub capacity: i32,
    pub price: Decimal,
    #[serde(default)]
    pub facilities: Option<Value>,
    #[serde(default)]
    pub photos: Option<Vec<String>>,
}

impl CreateRoomRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.capacity <= 0 {
            return Err(ApiError::field_validation("capacity", "must be positive"));
        }
        if self.price <= Decimal::ZERO {
            return Err(ApiError::field_validation("price", "must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoomRequest {
    pub room_type: Option<RoomType>,
    pub capacity: Option<i32>,
    pub price: Option<Decimal>,
    pub facilities: Option<Value>,
    pub photos: Option<Vec<String>>,
}

impl UpdateRoomRequest {
    pub fn into_changes(self) -> Result<RoomChanges, ApiError> {
        let changes = RoomChanges {
            room_type: self.room_type,
            capacity: self.capacity,
            price: self.price,
            facilities: self.facilities,
            photos: self.photos,
        };
        if changes.is_empty() {
            return Err(ApiError::validation(
                "at least one field is required to update the room",
            ));
        }
        if let Some(capacity) = changes.capacity {
            if capacity <= 0 {
                return Err(ApiError::field_validation("capacity", "must be positive"));
            }
        }
        if let Some(price) = changes.price {
            if price <= Decimal::ZERO {
                return Err(ApiError::field_validation("price", "must be positive"));
            }
        }
        Ok(changes)
    }
}

// -------------------------------------------------------------------------
// Reviews
// -------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub stay_id: i64,
    pub comment: String,
    pub rating: i32,
}

impl CreateReviewRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.stay_id <= 0 {
            return Err(ApiError::bad_request("invalid stay id"));
        }
        require("comment", &self.comment)?;
        check_rating(self.rating)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub comment: Option<String>,
    pub rating: Option<i32>,
}

impl UpdateReviewRequest {
    pub fn into_changes(self) -> Result<ReviewChanges, ApiError> {
        let changes = ReviewChanges {
            comment: self.comment,
            rating: self.rating,
        };
        if changes.is_empty() {
            return Err(ApiError::validation(
                "at least one field is required to update the review",
            ));
        }
        if let Some(rating) = changes.rating {
            check_rating(rating)?;
        }
        Ok(changes)
    }
}

// -------------------------------------------------------------------------
// Roommate posts
// -------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub stay_id: i64,
    pub description: String,
    #[serde(default)]
    pub preferences: Option<Value>,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.stay_id <= 0 {
            return Err(ApiError::bad_request("invalid stay id"));
        }
        require("description", &self.description)
    }
}

/// Admin-facing variant: the author is named explicitly in the body.
#[derive(Debug, Deserialize)]
pub struct AdminCreatePostRequest {
    pub user_id: i64,
    pub stay_id: i64,
    pub description: String,
    #[serde(default)]
    pub preferences: Option<Value>,
}

impl AdminCreatePostRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.user_id <= 0 {
            return Err(ApiError::bad_request("invalid user id"));
        }
        if self.stay_id <= 0 {
            return Err(ApiError::bad_request("invalid stay id"));
        }
        require("description", &self.description)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub description: Option<String>,
    pub preferences: Option<Value>,
    pub status: Option<PostStatus>,
}

impl UpdatePostRequest {
    pub fn into_changes(self) -> Result<PostChanges, ApiError> {
        let changes = PostChanges {
            description: self.description,
            preferences: self.preferences,
            status: self.status,
        };
        if changes.is_empty() {
            return Err(ApiError::validation(
                "at least one field is required to update the post",
            ));
        }
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_ids_must_be_positive_numbers() {
        assert_eq!(parse_id("12", "stay").unwrap(), 12);
        assert!(parse_id("0", "stay").is_err());
        assert!(parse_id("-3", "stay").is_err());
        assert!(parse_id("abc", "stay").is_err());
        assert!(parse_id("1.5", "stay").is_err());
    }

    #[test]
    fn email_shape_is_checked() {
        assert!(check_email("a@b.com").is_ok());
        assert!(check_email("a@b").is_err());
        assert!(check_email("@b.com").is_err());
        assert!(check_email("a@@b.com").is_err());
        assert!(check_email("a@.com").is_err());
    }

    #[test]
    fn signup_rejects_admin_role() {
        let req = CreateUserRequest {
            name: "A".into(),
            email: "a@b.com".into(),
            phone: "123".into(),
            password: "secret".into(),
            role: Some(Role::Admin),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn signup_defaults_to_user_role() {
        let req = CreateUserRequest {
            name: "A".into(),
            email: "a@b.com".into(),
            phone: "123".into(),
            password: "secret".into(),
            role: None,
        };
        assert!(req.validate().is_ok());
        assert_eq!(req.role(), Role::User);
    }

    #[test]
    fn empty_user_update_is_rejected() {
        let req = UpdateUserRequest {
            name: None,
            email: None,
            phone: None,
        };
        let err = req.into_changes().unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn review_rating_bounds_are_enforced() {
        let mut req = CreateReviewRequest {
            stay_id: 1,
            comment: "nice".into(),
            rating: 5,
        };
        assert!(req.validate().is_ok());
        req.rating = 0;
        assert!(req.validate().is_err());
        req.rating = 6;
        assert!(req.validate().is_err());

        let update = UpdateReviewRequest {
            comment: None,
            rating: Some(9),
        };
        assert!(update.into_changes().is_err());
    }

    #[test]
    fn otp_payload_requires_six_digits() {
        let req = VerifyRequest {
            email: "a@b.com".into(),
            otp: "12345".into(),
        };
        assert!(req.validate().is_err());
        let req = VerifyRequest {
            email: "a@b.com".into(),
            otp: "123456".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn room_update_requires_a_field_and_valid_ranges() {
        let empty = UpdateRoomRequest {
            room_type: None,
            capacity: None,
            price: None,
            facilities: None,
            photos: None,
        };
        assert!(empty.into_changes().is_err());

        let bad_capacity = UpdateRoomRequest {
            room_type: None,
            capacity: Some(0),
            price: None,
            facilities: None,
            photos: None,
        };
        assert!(bad_capacity.into_changes().is_err());
    }
}
