//! One-time codes for email verification.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::Rng;

use crate::config;

pub const OTP_LENGTH: usize = 6;

/// Generate a 6-digit numeric OTP from the OS entropy source.
pub fn generate() -> String {
    OsRng.gen_range(100_000..1_000_000).to_string()
}

/// Expiry timestamp for a freshly issued OTP.
pub fn expiry() -> DateTime<Utc> {
    Utc::now() + Duration::minutes(config::config().security.otp_expiry_minutes)
}

/// Shape check applied before any store lookup.
pub fn is_well_formed(candidate: &str) -> bool {
    candidate.len() == OTP_LENGTH && candidate.bytes().all(|b| b.is_ascii_digit())
}
