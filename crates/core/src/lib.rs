//! Shared domain primitives for the photoai backend.
//!
//! This crate has no internal dependencies so it can be used by the
//! repository layer, the provider client, the job pipeline and the HTTP
//! server alike.

pub mod error;
pub mod pagination;
pub mod signing;
pub mod subject;
pub mod types;
