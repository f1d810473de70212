use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::models::{Role, User};

/// Session token claims. The subject id and role are trusted as-is by
/// most endpoints; role-gated endpoints re-read the user row instead.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: Role,
    pub email: String,
    pub email_verified: bool,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn for_user(user: &User) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.token_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user.id,
            role: user.role,
            email: user.email.clone(),
            email_verified: user.email_verified,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum TokenError {
    Generation(String),
    MissingSecret,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Generation(msg) => write!(f, "token generation error: {msg}"),
            TokenError::MissingSecret => write!(f, "session secret not configured"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Issue a signed session token for a user. Called on successful signin.
pub fn generate_token(user: &User) -> Result<String, TokenError> {
    let secret = &config::config().security.session_secret;

    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, &Claims::for_user(user), &encoding_key)
        .map_err(|e| TokenError::Generation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn verified_user() -> User {
        User {
            id: 42,
            name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: None,
            password_hash: Some("$2b$10$x".into()),
            role: Role::Owner,
            profile_pic: None,
            email_verified: true,
            otp: None,
            otp_expiry: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn claims_carry_subject_and_role() {
        let claims = Claims::for_user(&verified_user());
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Owner);
        assert!(claims.email_verified);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn generated_token_has_three_segments() {
        let token = generate_token(&verified_user()).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }
}
