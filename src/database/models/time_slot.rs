use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::scheduling::{ExistingSlot, SlotInterval};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimeSlotTemplate {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A single availability window inside a template. Time-of-day only, no
/// date component; pairwise non-overlapping within one template.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimeSlotItem {
    pub id: i64,
    pub template_id: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeSlotItem {
    pub fn interval(&self) -> SlotInterval {
        SlotInterval::new(self.start_time, self.end_time)
    }

    pub fn as_existing_slot(&self) -> ExistingSlot {
        ExistingSlot {
            item_id: self.id,
            interval: self.interval(),
        }
    }
}
