//! Request bus topics answered by the security module.

/// `()` → `bool`.
pub const ADMIN_EXISTS: &str = "security:admin:exists";

/// [`crate::FirstAdminRequest`] → [`crate::User`].
pub const FIRST_ADMIN_CREATE: &str = "security:first_admin:create";
