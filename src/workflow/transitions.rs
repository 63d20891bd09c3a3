//! Static transition tables for the three editorial state machines.
//!
//! Each table maps a current status to the set of outgoing edges. An edge
//! carries the gate the acting user must pass and the companion fields the
//! request must supply. Absent edges mean the transition does not exist;
//! lookups on them return `None` and the executor reports
//! `InvalidTransition`.

use super::permissions::Gate;
use super::status::{BulletinStatus, StoryStatus, TranslationStatus};

/// One directed edge of a status machine.
#[derive(Debug, Clone, Copy)]
pub struct Edge<S> {
    pub to: S,
    pub gate: Gate,
    pub requires_reviewer: bool,
    pub requires_reason: bool,
    pub requires_translated_story: bool,
}

impl<S> Edge<S> {
    const fn new(to: S, gate: Gate) -> Self {
        Self {
            to,
            gate,
            requires_reviewer: false,
            requires_reason: false,
            requires_translated_story: false,
        }
    }

    const fn with_reviewer(mut self) -> Self {
        self.requires_reviewer = true;
        self
    }

    const fn with_reason(mut self) -> Self {
        self.requires_reason = true;
        self
    }

    const fn with_translated_story(mut self) -> Self {
        self.requires_translated_story = true;
        self
    }
}

const STORY_FROM_DRAFT: &[Edge<StoryStatus>] =
    &[Edge::new(StoryStatus::InReview, Gate::AuthorOrEditorTier).with_reviewer()];

const STORY_FROM_IN_REVIEW: &[Edge<StoryStatus>] = &[
    Edge::new(StoryStatus::NeedsRevision, Gate::ReviewerOrEditorTier).with_reason(),
    Edge::new(StoryStatus::PendingApproval, Gate::ReviewerOrEditorTier),
];

// Resubmission targets both review stages; the executor additionally checks
// the recorded return stage and rejects the other one.
const STORY_FROM_NEEDS_REVISION: &[Edge<StoryStatus>] = &[
    Edge::new(StoryStatus::InReview, Gate::Author),
    Edge::new(StoryStatus::PendingApproval, Gate::Author),
];

const STORY_FROM_PENDING_APPROVAL: &[Edge<StoryStatus>] = &[
    Edge::new(StoryStatus::NeedsRevision, Gate::EditorTier).with_reason(),
    Edge::new(StoryStatus::Approved, Gate::EditorTier),
];

const STORY_FROM_APPROVED: &[Edge<StoryStatus>] = &[
    Edge::new(StoryStatus::Published, Gate::EditorTier),
    Edge::new(StoryStatus::NeedsRevision, Gate::EditorTier).with_reason(),
];

const STORY_FROM_PUBLISHED: &[Edge<StoryStatus>] =
    &[Edge::new(StoryStatus::Archived, Gate::EditorTier)];

/// Outgoing story edges for a given status. Terminal statuses return an
/// empty slice.
pub fn story_edges(from: StoryStatus) -> &'static [Edge<StoryStatus>] {
    match from {
        StoryStatus::Draft => STORY_FROM_DRAFT,
        StoryStatus::InReview => STORY_FROM_IN_REVIEW,
        StoryStatus::NeedsRevision => STORY_FROM_NEEDS_REVISION,
        StoryStatus::PendingApproval => STORY_FROM_PENDING_APPROVAL,
        StoryStatus::Approved => STORY_FROM_APPROVED,
        StoryStatus::Published => STORY_FROM_PUBLISHED,
        StoryStatus::Archived => &[],
    }
}

pub fn find_story_edge(from: StoryStatus, to: StoryStatus) -> Option<&'static Edge<StoryStatus>> {
    story_edges(from).iter().find(|e| e.to == to)
}

const TRANSLATION_FROM_PENDING: &[Edge<TranslationStatus>] =
    &[Edge::new(TranslationStatus::InProgress, Gate::AssigneeOrEditorTier)];

const TRANSLATION_FROM_IN_PROGRESS: &[Edge<TranslationStatus>] =
    &[Edge::new(TranslationStatus::NeedsReview, Gate::Assignee).with_translated_story()];

const TRANSLATION_FROM_NEEDS_REVIEW: &[Edge<TranslationStatus>] = &[
    Edge::new(TranslationStatus::Approved, Gate::EditorTier),
    Edge::new(TranslationStatus::Rejected, Gate::EditorTier).with_reason(),
];

const TRANSLATION_FROM_REJECTED: &[Edge<TranslationStatus>] =
    &[Edge::new(TranslationStatus::InProgress, Gate::AssigneeOrEditorTier)];

/// Outgoing translation edges. APPROVED is only reachable from NEEDS_REVIEW,
/// so every approval has passed a reviewer action.
pub fn translation_edges(from: TranslationStatus) -> &'static [Edge<TranslationStatus>] {
    match from {
        TranslationStatus::Pending => TRANSLATION_FROM_PENDING,
        TranslationStatus::InProgress => TRANSLATION_FROM_IN_PROGRESS,
        TranslationStatus::NeedsReview => TRANSLATION_FROM_NEEDS_REVIEW,
        TranslationStatus::Rejected => TRANSLATION_FROM_REJECTED,
        TranslationStatus::Approved => &[],
    }
}

pub fn find_translation_edge(
    from: TranslationStatus,
    to: TranslationStatus,
) -> Option<&'static Edge<TranslationStatus>> {
    translation_edges(from).iter().find(|e| e.to == to)
}

const BULLETIN_FROM_DRAFT: &[Edge<BulletinStatus>] =
    &[Edge::new(BulletinStatus::InReview, Gate::AuthorOrEditorTier).with_reviewer()];

const BULLETIN_FROM_IN_REVIEW: &[Edge<BulletinStatus>] = &[
    Edge::new(BulletinStatus::NeedsRevision, Gate::ReviewerOrEditorTier).with_reason(),
    Edge::new(BulletinStatus::Approved, Gate::EditorTier),
];

const BULLETIN_FROM_NEEDS_REVISION: &[Edge<BulletinStatus>] =
    &[Edge::new(BulletinStatus::InReview, Gate::Author)];

const BULLETIN_FROM_APPROVED: &[Edge<BulletinStatus>] =
    &[Edge::new(BulletinStatus::Published, Gate::EditorTier)];

const BULLETIN_FROM_PUBLISHED: &[Edge<BulletinStatus>] =
    &[Edge::new(BulletinStatus::Archived, Gate::EditorTier)];

/// Outgoing bulletin edges. Bulletins have a single review stage.
pub fn bulletin_edges(from: BulletinStatus) -> &'static [Edge<BulletinStatus>] {
    match from {
        BulletinStatus::Draft => BULLETIN_FROM_DRAFT,
        BulletinStatus::InReview => BULLETIN_FROM_IN_REVIEW,
        BulletinStatus::NeedsRevision => BULLETIN_FROM_NEEDS_REVISION,
        BulletinStatus::Approved => BULLETIN_FROM_APPROVED,
        BulletinStatus::Published => BULLETIN_FROM_PUBLISHED,
        BulletinStatus::Archived => &[],
    }
}

pub fn find_bulletin_edge(
    from: BulletinStatus,
    to: BulletinStatus,
) -> Option<&'static Edge<BulletinStatus>> {
    bulletin_edges(from).iter().find(|e| e.to == to)
}
