//! Pagination defaults and query-string helpers.

use crate::error::CoreError;
use crate::types::DbId;

/// Default page size for the bulk image listing.
pub const DEFAULT_IMAGE_LIMIT: i64 = 100;

/// Maximum page size for the bulk image listing.
pub const MAX_IMAGE_LIMIT: i64 = 200;

/// Upper bound on the number of ids accepted in one `ids=` filter.
pub const MAX_ID_FILTER: usize = 500;

/// Clamp a requested page size into `1..=max`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a requested offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Parse a comma-separated id list such as `"4,8,15"`.
///
/// Blank segments are skipped so `"4,,8,"` is accepted. Any segment that is
/// not an integer is a validation error.
pub fn parse_id_list(raw: &str) -> Result<Vec<DbId>, CoreError> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<DbId>()
                .map_err(|_| CoreError::Validation(format!("Invalid id '{s}' in ids filter")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ids.len() > MAX_ID_FILTER {
        return Err(CoreError::Validation(format!(
            "At most {MAX_ID_FILTER} ids may be requested at once"
        )));
    }

    Ok(ids)
}
