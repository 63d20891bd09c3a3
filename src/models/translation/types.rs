use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflow::TranslationStatus;

/// A translation assignment hanging off an original story.
#[derive(Debug, Clone, Serialize)]
pub struct Translation {
    pub id: i64,
    pub original_story_id: i64,
    pub target_language: String,
    pub status: TranslationStatus,
    pub assigned_to_id: Option<i64>,
    pub translated_story_id: Option<i64>,
    pub rejection_reason: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// JSON body for assigning a new translation.
#[derive(Debug, Deserialize)]
pub struct TranslationForm {
    pub target_language: String,
    pub assigned_to_id: Option<i64>,
}

/// JSON body for a translation status-change request.
#[derive(Debug, Deserialize)]
pub struct TranslationStatusForm {
    pub status: TranslationStatus,
    pub translated_story_id: Option<i64>,
    pub rejection_reason: Option<String>,
    pub expected_version: Option<i64>,
}
