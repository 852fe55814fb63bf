//! Shared utilities and common types for the directory platform backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (invitation secrets, digests)
//! - Password hashing with Argon2id
//! - JWT access tokens
//! - Common validation logic

pub mod crypto;
pub mod jwt;
pub mod password;
pub mod validation;
