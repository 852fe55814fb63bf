//! Domain layer for the directory platform backend.
//!
//! This crate contains:
//! - Domain models (Invitation, Membership, Organization, ResolvedRole)
//! - Store and collaborator traits implemented by the persistence layer
//! - The invitation issuer/resender, the acceptance saga, and the role
//!   resolver

pub mod acceptance;
pub mod error;
pub mod issuance;
pub mod models;
pub mod role_resolution;
pub mod stores;
