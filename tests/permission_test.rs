//! Tests for the centralized permission predicates and transition gates.

use newsdesk::workflow::permissions::{
    Action, ActionContext, Gate, GateContext, can, gate_allows,
};
use newsdesk::workflow::status::{StaffRole, StoryStatus};

const ALL_ROLES: [StaffRole; 6] = [
    StaffRole::Intern,
    StaffRole::Journalist,
    StaffRole::SubEditor,
    StaffRole::Editor,
    StaffRole::Admin,
    StaffRole::Superadmin,
];

fn as_owner() -> ActionContext {
    ActionContext::new(7, Some(7))
}

fn as_other() -> ActionContext {
    ActionContext::new(7, Some(8))
}

#[test]
fn authors_edit_their_own_draft_and_revision_stories() {
    for status in [StoryStatus::Draft, StoryStatus::NeedsRevision] {
        assert!(can(StaffRole::Journalist, Action::EditStory(status), &as_owner()));
        assert!(can(StaffRole::Intern, Action::EditStory(status), &as_owner()));
    }
}

#[test]
fn authors_cannot_edit_once_submitted() {
    for status in [
        StoryStatus::InReview,
        StoryStatus::PendingApproval,
        StoryStatus::Approved,
        StoryStatus::Published,
    ] {
        assert!(!can(StaffRole::Journalist, Action::EditStory(status), &as_owner()));
    }
}

#[test]
fn non_owners_below_editor_tier_cannot_edit_drafts() {
    assert!(!can(StaffRole::Journalist, Action::EditStory(StoryStatus::Draft), &as_other()));
    assert!(can(StaffRole::SubEditor, Action::EditStory(StoryStatus::Draft), &as_other()));
}

#[test]
fn interns_never_delete_content() {
    for status in [
        StoryStatus::Draft,
        StoryStatus::InReview,
        StoryStatus::NeedsRevision,
        StoryStatus::PendingApproval,
        StoryStatus::Approved,
        StoryStatus::Published,
        StoryStatus::Archived,
    ] {
        assert!(
            !can(StaffRole::Intern, Action::DeleteStory(status), &as_owner()),
            "intern deleted a {status} story"
        );
    }
}

#[test]
fn published_stories_are_never_hard_deleted() {
    for role in ALL_ROLES {
        assert!(!can(role, Action::DeleteStory(StoryStatus::Published), &as_owner()));
        assert!(!can(role, Action::DeleteStory(StoryStatus::Archived), &as_owner()));
    }
}

#[test]
fn only_editor_tier_manages_translations_and_audit() {
    let ctx = as_other();
    for role in [StaffRole::Intern, StaffRole::Journalist] {
        assert!(!can(role, Action::AssignTranslation, &ctx));
        assert!(!can(role, Action::SkipTranslations, &ctx));
        assert!(!can(role, Action::ViewAudit, &ctx));
    }
    for role in [StaffRole::SubEditor, StaffRole::Editor, StaffRole::Admin] {
        assert!(can(role, Action::AssignTranslation, &ctx));
        assert!(can(role, Action::ViewAudit, &ctx));
    }
}

#[test]
fn only_admin_tier_manages_staff_and_menu() {
    let ctx = as_other();
    for role in [StaffRole::Intern, StaffRole::Journalist, StaffRole::SubEditor, StaffRole::Editor]
    {
        assert!(!can(role, Action::ManageStaff, &ctx));
        assert!(!can(role, Action::ManageMenu, &ctx));
    }
    for role in [StaffRole::Admin, StaffRole::Superadmin] {
        assert!(can(role, Action::ManageStaff, &ctx));
        assert!(can(role, Action::ManageMenu, &ctx));
    }
}

#[test]
fn editor_tier_starts_at_sub_editor() {
    assert!(!StaffRole::Journalist.is_editor_tier());
    assert!(StaffRole::SubEditor.is_editor_tier());
    assert!(StaffRole::Superadmin.is_editor_tier());
}

fn gate_ctx(role: StaffRole, actor_id: i64) -> GateContext {
    GateContext {
        actor_id,
        actor_role: role,
        author_id: Some(1),
        reviewer_id: Some(2),
        assigned_to_id: Some(3),
    }
}

#[test]
fn reviewer_gate_admits_reviewer_and_editor_tier_only() {
    let gate = Gate::ReviewerOrEditorTier;
    // The assigned reviewer passes.
    assert!(gate_allows(gate, &gate_ctx(StaffRole::Journalist, 2)));
    // An unrelated journalist does not.
    assert!(!gate_allows(gate, &gate_ctx(StaffRole::Journalist, 99)));
    // The author does not.
    assert!(!gate_allows(gate, &gate_ctx(StaffRole::Journalist, 1)));
    // Editor tier always passes.
    assert!(gate_allows(gate, &gate_ctx(StaffRole::Editor, 99)));
}

#[test]
fn author_gate_is_strictly_the_author() {
    assert!(gate_allows(Gate::Author, &gate_ctx(StaffRole::Intern, 1)));
    assert!(!gate_allows(Gate::Author, &gate_ctx(StaffRole::Superadmin, 99)));
}

#[test]
fn assignee_gate_ignores_rank() {
    assert!(gate_allows(Gate::Assignee, &gate_ctx(StaffRole::Intern, 3)));
    assert!(!gate_allows(Gate::Assignee, &gate_ctx(StaffRole::Superadmin, 99)));
}

#[test]
fn gates_fail_closed_without_relationship_fields() {
    let empty = GateContext {
        actor_id: 5,
        actor_role: StaffRole::Journalist,
        author_id: None,
        reviewer_id: None,
        assigned_to_id: None,
    };
    assert!(!gate_allows(Gate::Author, &empty));
    assert!(!gate_allows(Gate::AuthorOrEditorTier, &empty));
    assert!(!gate_allows(Gate::ReviewerOrEditorTier, &empty));
    assert!(!gate_allows(Gate::Assignee, &empty));
    assert!(!gate_allows(Gate::AssigneeOrEditorTier, &empty));
    assert!(!gate_allows(Gate::EditorTier, &empty));
}
