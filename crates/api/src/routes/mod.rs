//! HTTP route handlers.

pub mod accept;
pub mod health;
pub mod invitations;
pub mod session;
