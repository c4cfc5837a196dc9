// handlers/admin/mod.rs - Admin handlers (JWT with admin flag required)
//
// Direct access to the legacy subscription service's queue. There is no
// safe default decision here, so service failures surface as server errors
// instead of being folded into a denial.
//
// Security Level: JWT Authentication + is_admin
// Route Prefix: /subscription*
// Middleware: jwt_auth_middleware; admin flag checked before any network call

pub mod subscription;

pub use subscription::{subscription_approve, subscription_list, subscription_reject};

use crate::auth::Identity;
use crate::error::ApiError;

pub(crate) fn require_admin(identity: &Identity) -> Result<(), ApiError> {
    if identity.is_admin {
        Ok(())
    } else {
        Err(ApiError::unauthorized("Admin access required."))
    }
}
