/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque identifier of the staff member performing a mutation, as issued by
/// the external session provider.
pub type ActorId = String;
