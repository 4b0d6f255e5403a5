//! Request extractors that guard handlers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`signature::verify_webhook`] -- Checks the HMAC signature on provider webhooks.

pub mod auth;
pub mod signature;
