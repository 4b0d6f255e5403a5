//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs (validated with `validator`) used for inserts

pub mod completion;
pub mod model;
pub mod output_image;
pub mod pack;
pub mod status;

use validator::ValidationError;

/// Reject strings that are empty after trimming whitespace.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
