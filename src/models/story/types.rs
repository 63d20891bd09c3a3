use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflow::{ReturnStage, StoryStatus};

/// Full story record as returned to staff endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct Story {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: StoryStatus,
    pub priority: String,
    pub language: String,
    pub author_id: i64,
    pub reviewer_id: Option<i64>,
    pub assigned_to_id: Option<i64>,
    pub category_id: Option<i64>,
    pub original_story_id: Option<i64>,
    pub revision_returns_to: Option<ReturnStage>,
    pub rejection_reason: Option<String>,
    pub translations_skipped: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Story as shown in list views — no body content.
#[derive(Debug, Clone, Serialize)]
pub struct StoryListItem {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub status: StoryStatus,
    pub priority: String,
    pub language: String,
    pub author_id: i64,
    pub author_name: String,
    pub category_id: Option<i64>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// JSON body for creating a story.
#[derive(Debug, Deserialize)]
pub struct StoryForm {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub priority: Option<String>,
    pub language: Option<String>,
    pub category_id: Option<i64>,
    pub original_story_id: Option<i64>,
}

/// JSON body for updating a story. Absent fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct StoryUpdateForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub priority: Option<String>,
    pub language: Option<String>,
    pub category_id: Option<i64>,
    pub translations_skipped: Option<bool>,
    pub expected_version: Option<i64>,
}

/// JSON body for a status-change request.
#[derive(Debug, Deserialize)]
pub struct StoryStatusForm {
    pub status: StoryStatus,
    pub reviewer_id: Option<i64>,
    pub assigned_to_id: Option<i64>,
    pub rejection_reason: Option<String>,
    pub expected_version: Option<i64>,
    #[serde(default)]
    pub content_reviewed: bool,
    #[serde(default)]
    pub audio_quality_checked: bool,
}

/// List filters accepted by the story index endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct StoryFilter {
    pub status: Option<StoryStatus>,
    pub author_id: Option<i64>,
    pub category_id: Option<i64>,
    pub language: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Published story as served to affiliated stations.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedStory {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub language: String,
    pub category: Option<String>,
    pub published_at: DateTime<Utc>,
}
