//! Role guard for the admin surface.

use folio_core::error::AppError;

use crate::extractors::AuthUser;

/// Checks that the caller holds the admin role.
pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    if !auth.0.is_admin() {
        return Err(AppError::authorization("Admin access required"));
    }
    Ok(())
}
