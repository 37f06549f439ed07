// Time-slot conflict validator.
//
// Validates candidate template items against the items already persisted in
// the same template. Intervals are half-open [start, end): back-to-back
// slots sharing a boundary do not conflict.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ItemId = i64;

/// A proposed time-of-day interval, not yet persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SlotInterval {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Half-open overlap test. Strict comparisons on both sides, so
    /// `self.end == other.start` (abutting slots) is not an overlap.
    pub fn overlaps(&self, other: &SlotInterval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// An already-persisted interval, carried with its row id so updates can
/// exclude the item being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExistingSlot {
    pub item_id: ItemId,
    pub interval: SlotInterval,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("end time must be after start time")]
    InvalidRange,

    #[error("time slot overlaps existing item {conflicting_item_id}")]
    Conflict { conflicting_item_id: ItemId },
}

/// Reject candidates with `end <= start`. Callers run this before the
/// overlap check; [`validate_no_overlap`] assumes a well-formed candidate.
pub fn validate_range(candidate: &SlotInterval) -> Result<(), SlotError> {
    if candidate.end > candidate.start {
        Ok(())
    } else {
        Err(SlotError::InvalidRange)
    }
}

/// Check the candidate against every existing item in the template, skipping
/// `exclude_item_id` when set (update-in-place excludes the row being
/// edited). Fails on the first overlapping item.
///
/// This is an admission pre-check against a snapshot; the database exclusion
/// constraint is the final guard against concurrent writers.
pub fn validate_no_overlap(
    candidate: &SlotInterval,
    existing: &[ExistingSlot],
    exclude_item_id: Option<ItemId>,
) -> Result<(), SlotError> {
    for item in existing {
        if exclude_item_id == Some(item.item_id) {
            continue;
        }
        if candidate.overlaps(&item.interval) {
            return Err(SlotError::Conflict {
                conflicting_item_id: item.item_id,
            });
        }
    }
    Ok(())
}
