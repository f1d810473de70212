use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role. Stored as a Postgres enum (`user_role`) and carried in
/// token claims; authorization-sensitive checks re-read it from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Owner,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// A platform account. `password_hash` is None for OAuth-created accounts.
///
/// Credential and verification material never leaves the process: the
/// serialized form (what every envelope carries) skips those fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: Role,
    pub profile_pic: Option<String>,
    pub email_verified: bool,
    #[serde(skip_serializing)]
    pub otp: Option<String>,
    #[serde(skip_serializing)]
    pub otp_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// True while an OTP has been issued and not yet redeemed.
    pub fn verification_pending(&self) -> bool {
        self.otp.is_some() && self.otp_expiry.is_some()
    }
}

/// Data for inserting a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub role: Role,
    pub profile_pic: Option<String>,
    pub email_verified: bool,
    pub otp: Option<String>,
    pub otp_expiry: Option<DateTime<Utc>>,
}

impl NewUser {
    /// A credential signup: unverified until the OTP is redeemed.
    pub fn signup(
        name: String,
        email: String,
        phone: Option<String>,
        password_hash: String,
        role: Role,
        otp: String,
        otp_expiry: DateTime<Utc>,
    ) -> Self {
        Self {
            name,
            email,
            phone,
            password_hash: Some(password_hash),
            role,
            profile_pic: None,
            email_verified: false,
            otp: Some(otp),
            otp_expiry: Some(otp_expiry),
        }
    }

    /// An OAuth-provider signup: the provider already verified the email,
    /// so the account is created verified, with no password and no OTP.
    pub fn oauth(name: String, email: String, profile_pic: Option<String>) -> Self {
        Self {
            name,
            email,
            phone: None,
            password_hash: None,
            role: Role::User,
            profile_pic,
            email_verified: true,
            otp: None,
            otp_expiry: None,
        }
    }
}

/// Partial profile update. Present fields overwrite, absent fields are
/// left untouched on the stored row.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }

    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(phone) = self.phone {
            user.phone = Some(phone);
        }
    }
}

/// Replacement signup data for an existing-but-unverified account.
/// Repeated signups against an unverified email overwrite the pending
/// credentials and reissue the OTP.
#[derive(Debug, Clone)]
pub struct SignupRefresh {
    pub name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub otp: String,
    pub otp_expiry: DateTime<Utc>,
}
