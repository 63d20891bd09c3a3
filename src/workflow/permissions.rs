//! Single source of truth for editorial permission rules.
//!
//! Every endpoint and the transition executors consult these predicates
//! instead of doing ad hoc role checks. All functions are pure and
//! side-effect free; any role/action combination not explicitly granted
//! is denied.

use super::status::{BulletinStatus, StaffRole, StoryStatus};

/// Who is acting, and who owns the resource being acted on.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext {
    pub actor_id: i64,
    pub owner_id: Option<i64>,
}

impl ActionContext {
    pub fn new(actor_id: i64, owner_id: Option<i64>) -> Self {
        Self { actor_id, owner_id }
    }

    fn is_owner(&self) -> bool {
        self.owner_id == Some(self.actor_id)
    }
}

/// Non-transition actions gated by role and ownership.
/// Status transitions are gated separately via [`Gate`] in the
/// transition tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateStory,
    EditStory(StoryStatus),
    DeleteStory(StoryStatus),
    CreateBulletin,
    EditBulletin(BulletinStatus),
    DeleteBulletin(BulletinStatus),
    ReorderBulletin(BulletinStatus),
    AssignTranslation,
    SkipTranslations,
    ManageStaff,
    ManageMenu,
    ManageCategories,
    ViewAudit,
}

/// Central permission predicate. Fail closed: anything not granted below
/// is denied.
pub fn can(role: StaffRole, action: Action, ctx: &ActionContext) -> bool {
    match action {
        // Anyone on staff may start a draft, interns included.
        Action::CreateStory => true,

        // Authors may edit their own DRAFT or NEEDS_REVISION stories;
        // editor tier may edit anything not yet archived.
        Action::EditStory(status) => match status {
            StoryStatus::Draft | StoryStatus::NeedsRevision => {
                ctx.is_owner() || role.is_editor_tier()
            }
            StoryStatus::Archived => false,
            _ => role.is_editor_tier(),
        },

        // Published and archived stories are never hard-deleted, and
        // interns cannot delete content under any status.
        Action::DeleteStory(status) => match status {
            StoryStatus::Published | StoryStatus::Archived => false,
            _ => role != StaffRole::Intern && (ctx.is_owner() || role.is_editor_tier()),
        },

        Action::CreateBulletin => role >= StaffRole::Journalist,

        Action::EditBulletin(status) => match status {
            BulletinStatus::Draft | BulletinStatus::NeedsRevision => {
                ctx.is_owner() || role.is_editor_tier()
            }
            BulletinStatus::Archived => false,
            _ => role.is_editor_tier(),
        },

        Action::DeleteBulletin(status) => match status {
            BulletinStatus::Published | BulletinStatus::Archived => false,
            _ => role != StaffRole::Intern && (ctx.is_owner() || role.is_editor_tier()),
        },

        // Rundown order changes follow the same rules as editing, except
        // that aired material is frozen.
        Action::ReorderBulletin(status) => match status {
            BulletinStatus::Draft | BulletinStatus::NeedsRevision => {
                ctx.is_owner() || role.is_editor_tier()
            }
            BulletinStatus::Published | BulletinStatus::Archived => false,
            _ => role.is_editor_tier(),
        },

        // Translation assignments and the skip flag change what publishing
        // requires, so they follow the approval gate.
        Action::AssignTranslation => role.is_editor_tier(),
        Action::SkipTranslations => role.is_editor_tier(),

        Action::ManageStaff => role.is_admin_tier(),
        Action::ManageMenu => role.is_admin_tier(),
        Action::ManageCategories => role.is_editor_tier(),
        Action::ViewAudit => role.is_editor_tier(),
    }
}

/// Gate attached to a transition edge: which relationship to the entity
/// the acting user must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Author,
    AuthorOrEditorTier,
    ReviewerOrEditorTier,
    Assignee,
    AssigneeOrEditorTier,
    EditorTier,
}

/// Relationships of the acting user to the entity under transition.
#[derive(Debug, Clone, Copy)]
pub struct GateContext {
    pub actor_id: i64,
    pub actor_role: StaffRole,
    pub author_id: Option<i64>,
    pub reviewer_id: Option<i64>,
    pub assigned_to_id: Option<i64>,
}

/// Evaluate a gate. Fail closed: missing relationship fields never grant.
pub fn gate_allows(gate: Gate, ctx: &GateContext) -> bool {
    let is_author = ctx.author_id == Some(ctx.actor_id);
    let is_reviewer = ctx.reviewer_id == Some(ctx.actor_id);
    let is_assignee = ctx.assigned_to_id == Some(ctx.actor_id);
    let editor_tier = ctx.actor_role.is_editor_tier();

    match gate {
        Gate::Author => is_author,
        Gate::AuthorOrEditorTier => is_author || editor_tier,
        Gate::ReviewerOrEditorTier => is_reviewer || editor_tier,
        Gate::Assignee => is_assignee,
        Gate::AssigneeOrEditorTier => is_assignee || editor_tier,
        Gate::EditorTier => editor_tier,
    }
}
