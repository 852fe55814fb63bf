//! HTTP middleware components.

pub mod logging;
pub mod user_auth;

pub use user_auth::{require_user_auth, UserAuth};
