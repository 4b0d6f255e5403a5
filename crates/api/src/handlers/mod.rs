//! Request handlers, one module per resource.
//!
//! Handlers stay thin: extract, call the pipeline or a repository, shape
//! the JSON response.

pub mod ai;
pub mod images;
pub mod models;
pub mod packs;
pub mod uploads;
pub mod webhooks;
