//! Authorization checks shared by every mutating endpoint.
//!
//! Reads on public resources are open; writes are always gated through
//! one of these policies.

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::models::Role;
use crate::store::UserStore;

/// Per-operation authorization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Subject's role must be ADMIN.
    AdminOnly,
    /// Subject's role must be OWNER (property hosts).
    OwnerRole,
    /// Subject must be the resource's owner/author.
    OwnerOnly(i64),
}

/// Decide allow/deny for a subject against a policy, using the role the
/// subject presents. Role-sensitive callers should go through
/// [`check_current_role`] instead.
pub fn check(subject: &AuthUser, policy: Policy) -> Result<(), ApiError> {
    match policy {
        Policy::AdminOnly if subject.role == Role::Admin => Ok(()),
        Policy::AdminOnly => Err(ApiError::forbidden("admin access required")),
        Policy::OwnerRole if subject.role == Role::Owner => Ok(()),
        Policy::OwnerRole => Err(ApiError::forbidden("owner role required")),
        Policy::OwnerOnly(owner_id) if subject.id == owner_id => Ok(()),
        Policy::OwnerOnly(_) => Err(ApiError::forbidden("you do not own this resource")),
    }
}

/// Role-gated check against the *stored* role rather than the token
/// claim. Role may have changed since token issuance, so role-gated
/// endpoints re-read the user row before deciding.
pub async fn check_current_role(
    users: &dyn UserStore,
    subject: &AuthUser,
    policy: Policy,
) -> Result<(), ApiError> {
    let user = users
        .get(subject.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("account no longer exists"))?;
    let effective = AuthUser {
        role: user.role,
        ..subject.clone()
    };
    check(&effective, policy)
}
