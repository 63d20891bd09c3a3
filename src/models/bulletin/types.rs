use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflow::BulletinStatus;

/// An audio bulletin — an ordered rundown of stories read on air.
#[derive(Debug, Clone, Serialize)]
pub struct Bulletin {
    pub id: i64,
    pub title: String,
    pub language: String,
    pub status: BulletinStatus,
    pub author_id: i64,
    pub reviewer_id: Option<i64>,
    pub rejection_reason: Option<String>,
    pub airs_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One slot of a bulletin's rundown, joined with story headline data.
#[derive(Debug, Clone, Serialize)]
pub struct RundownEntry {
    pub story_id: i64,
    pub position: i32,
    pub title: String,
    pub slug: String,
}

/// JSON body for creating a bulletin.
#[derive(Debug, Deserialize)]
pub struct BulletinForm {
    pub title: String,
    pub language: Option<String>,
    pub airs_at: Option<DateTime<Utc>>,
}

/// JSON body for updating a bulletin. Absent fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct BulletinUpdateForm {
    pub title: Option<String>,
    pub language: Option<String>,
    pub airs_at: Option<DateTime<Utc>>,
    pub expected_version: Option<i64>,
}

/// JSON body for a bulletin status-change request.
#[derive(Debug, Deserialize)]
pub struct BulletinStatusForm {
    pub status: BulletinStatus,
    pub reviewer_id: Option<i64>,
    pub rejection_reason: Option<String>,
    pub expected_version: Option<i64>,
}

/// One `{ story_id, position }` pair of a reorder request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RundownSlotForm {
    pub story_id: i64,
    pub position: i32,
}

/// JSON body for appending a story to the rundown.
#[derive(Debug, Deserialize)]
pub struct RundownAppendForm {
    pub story_id: i64,
}
