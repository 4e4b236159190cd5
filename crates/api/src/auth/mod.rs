//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access tokens plus hashed refresh and reset tokens.

pub mod jwt;
pub mod password;
