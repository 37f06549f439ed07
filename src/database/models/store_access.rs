use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One (staff, store) access relationship. Unique per active pair; revoked
/// grants are soft-deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoreAccessGrant {
    pub id: i64,
    pub staff_id: i64,
    pub store_id: i64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
