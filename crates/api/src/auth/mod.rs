//! Authentication primitives.
//!
//! - [`jwt`] -- bearer token validation (HS256 shared secret or RS256 public key).

pub mod jwt;
