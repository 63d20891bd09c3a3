use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Staff roles, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffRole {
    Intern,
    Journalist,
    SubEditor,
    Editor,
    Admin,
    Superadmin,
}

impl StaffRole {
    /// SUB_EDITOR and above may approve, publish, and act on any review.
    pub fn is_editor_tier(self) -> bool {
        self >= StaffRole::SubEditor
    }

    /// ADMIN and above manage staff accounts and menus.
    pub fn is_admin_tier(self) -> bool {
        self >= StaffRole::Admin
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StaffRole::Intern => "INTERN",
            StaffRole::Journalist => "JOURNALIST",
            StaffRole::SubEditor => "SUB_EDITOR",
            StaffRole::Editor => "EDITOR",
            StaffRole::Admin => "ADMIN",
            StaffRole::Superadmin => "SUPERADMIN",
        }
    }
}

impl FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INTERN" => Ok(StaffRole::Intern),
            "JOURNALIST" => Ok(StaffRole::Journalist),
            "SUB_EDITOR" => Ok(StaffRole::SubEditor),
            "EDITOR" => Ok(StaffRole::Editor),
            "ADMIN" => Ok(StaffRole::Admin),
            "SUPERADMIN" => Ok(StaffRole::Superadmin),
            other => Err(format!("unknown staff role '{other}'")),
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editorial lifecycle of a text story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoryStatus {
    Draft,
    InReview,
    NeedsRevision,
    PendingApproval,
    Approved,
    Published,
    Archived,
}

impl StoryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StoryStatus::Draft => "DRAFT",
            StoryStatus::InReview => "IN_REVIEW",
            StoryStatus::NeedsRevision => "NEEDS_REVISION",
            StoryStatus::PendingApproval => "PENDING_APPROVAL",
            StoryStatus::Approved => "APPROVED",
            StoryStatus::Published => "PUBLISHED",
            StoryStatus::Archived => "ARCHIVED",
        }
    }
}

impl FromStr for StoryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(StoryStatus::Draft),
            "IN_REVIEW" => Ok(StoryStatus::InReview),
            "NEEDS_REVISION" => Ok(StoryStatus::NeedsRevision),
            "PENDING_APPROVAL" => Ok(StoryStatus::PendingApproval),
            "APPROVED" => Ok(StoryStatus::Approved),
            "PUBLISHED" => Ok(StoryStatus::Published),
            "ARCHIVED" => Ok(StoryStatus::Archived),
            other => Err(format!("unknown story status '{other}'")),
        }
    }
}

impl fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a translation assignment attached to a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TranslationStatus {
    Pending,
    InProgress,
    NeedsReview,
    Rejected,
    Approved,
}

impl TranslationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TranslationStatus::Pending => "PENDING",
            TranslationStatus::InProgress => "IN_PROGRESS",
            TranslationStatus::NeedsReview => "NEEDS_REVIEW",
            TranslationStatus::Rejected => "REJECTED",
            TranslationStatus::Approved => "APPROVED",
        }
    }
}

impl FromStr for TranslationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TranslationStatus::Pending),
            "IN_PROGRESS" => Ok(TranslationStatus::InProgress),
            "NEEDS_REVIEW" => Ok(TranslationStatus::NeedsReview),
            "REJECTED" => Ok(TranslationStatus::Rejected),
            "APPROVED" => Ok(TranslationStatus::Approved),
            other => Err(format!("unknown translation status '{other}'")),
        }
    }
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editorial lifecycle of an audio bulletin. Bulletins have a single review
/// stage, so there is no PENDING_APPROVAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulletinStatus {
    Draft,
    InReview,
    NeedsRevision,
    Approved,
    Published,
    Archived,
}

impl BulletinStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BulletinStatus::Draft => "DRAFT",
            BulletinStatus::InReview => "IN_REVIEW",
            BulletinStatus::NeedsRevision => "NEEDS_REVISION",
            BulletinStatus::Approved => "APPROVED",
            BulletinStatus::Published => "PUBLISHED",
            BulletinStatus::Archived => "ARCHIVED",
        }
    }
}

impl FromStr for BulletinStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(BulletinStatus::Draft),
            "IN_REVIEW" => Ok(BulletinStatus::InReview),
            "NEEDS_REVISION" => Ok(BulletinStatus::NeedsRevision),
            "APPROVED" => Ok(BulletinStatus::Approved),
            "PUBLISHED" => Ok(BulletinStatus::Published),
            "ARCHIVED" => Ok(BulletinStatus::Archived),
            other => Err(format!("unknown bulletin status '{other}'")),
        }
    }
}

impl fmt::Display for BulletinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a story goes back to when its author resubmits after NEEDS_REVISION.
/// Recorded at the moment revision is requested, cleared on resubmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnStage {
    InReview,
    PendingApproval,
}

impl ReturnStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnStage::InReview => "IN_REVIEW",
            ReturnStage::PendingApproval => "PENDING_APPROVAL",
        }
    }

    pub fn as_story_status(self) -> StoryStatus {
        match self {
            ReturnStage::InReview => StoryStatus::InReview,
            ReturnStage::PendingApproval => StoryStatus::PendingApproval,
        }
    }
}

impl FromStr for ReturnStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_REVIEW" => Ok(ReturnStage::InReview),
            "PENDING_APPROVAL" => Ok(ReturnStage::PendingApproval),
            other => Err(format!("unknown return stage '{other}'")),
        }
    }
}
