/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Identifier of an authenticated caller, taken verbatim from the auth
/// provider's `sub` claim.
pub type UserId = String;
