//! Authentication and authorization
//!
//! Token issue/verify plus the gate middleware stack.

pub mod gate;
pub mod token;

pub use gate::{CurrentUser, Role, require_admin, require_auth, require_superadmin};
pub use token::{AuthError, Claims, TokenService};
