//! Tests for the static transition tables: which edges exist, which
//! companion fields they demand, and that everything else is absent.

use newsdesk::workflow::status::{BulletinStatus, StoryStatus, TranslationStatus};
use newsdesk::workflow::transitions::{
    find_bulletin_edge, find_story_edge, find_translation_edge, story_edges,
};

const ALL_STORY_STATUSES: [StoryStatus; 7] = [
    StoryStatus::Draft,
    StoryStatus::InReview,
    StoryStatus::NeedsRevision,
    StoryStatus::PendingApproval,
    StoryStatus::Approved,
    StoryStatus::Published,
    StoryStatus::Archived,
];

#[test]
fn story_happy_path_edges_exist() {
    assert!(find_story_edge(StoryStatus::Draft, StoryStatus::InReview).is_some());
    assert!(find_story_edge(StoryStatus::InReview, StoryStatus::PendingApproval).is_some());
    assert!(find_story_edge(StoryStatus::PendingApproval, StoryStatus::Approved).is_some());
    assert!(find_story_edge(StoryStatus::Approved, StoryStatus::Published).is_some());
    assert!(find_story_edge(StoryStatus::Published, StoryStatus::Archived).is_some());
}

#[test]
fn story_revision_loop_edges_exist() {
    assert!(find_story_edge(StoryStatus::InReview, StoryStatus::NeedsRevision).is_some());
    assert!(find_story_edge(StoryStatus::PendingApproval, StoryStatus::NeedsRevision).is_some());
    assert!(find_story_edge(StoryStatus::Approved, StoryStatus::NeedsRevision).is_some());
    assert!(find_story_edge(StoryStatus::NeedsRevision, StoryStatus::InReview).is_some());
    assert!(find_story_edge(StoryStatus::NeedsRevision, StoryStatus::PendingApproval).is_some());
}

#[test]
fn story_table_contains_exactly_the_expected_edges() {
    let expected: &[(StoryStatus, StoryStatus)] = &[
        (StoryStatus::Draft, StoryStatus::InReview),
        (StoryStatus::InReview, StoryStatus::NeedsRevision),
        (StoryStatus::InReview, StoryStatus::PendingApproval),
        (StoryStatus::NeedsRevision, StoryStatus::InReview),
        (StoryStatus::NeedsRevision, StoryStatus::PendingApproval),
        (StoryStatus::PendingApproval, StoryStatus::NeedsRevision),
        (StoryStatus::PendingApproval, StoryStatus::Approved),
        (StoryStatus::Approved, StoryStatus::Published),
        (StoryStatus::Approved, StoryStatus::NeedsRevision),
        (StoryStatus::Published, StoryStatus::Archived),
    ];

    for from in ALL_STORY_STATUSES {
        for to in ALL_STORY_STATUSES {
            let should_exist = expected.contains(&(from, to));
            assert_eq!(
                find_story_edge(from, to).is_some(),
                should_exist,
                "edge {from} -> {to}"
            );
        }
    }
}

#[test]
fn no_edges_leave_archived() {
    assert!(story_edges(StoryStatus::Archived).is_empty());
}

#[test]
fn repeating_a_transition_no_longer_matches() {
    // Once a story has moved DRAFT -> IN_REVIEW, replaying the same request
    // finds no IN_REVIEW -> IN_REVIEW edge: the executor reports
    // InvalidTransition instead of applying anything.
    assert!(find_story_edge(StoryStatus::Draft, StoryStatus::InReview).is_some());
    assert!(find_story_edge(StoryStatus::InReview, StoryStatus::InReview).is_none());
}

#[test]
fn submitting_for_review_requires_a_reviewer() {
    let edge = find_story_edge(StoryStatus::Draft, StoryStatus::InReview).unwrap();
    assert!(edge.requires_reviewer);
    assert!(!edge.requires_reason);
}

#[test]
fn sending_back_for_revision_requires_a_reason() {
    for from in [
        StoryStatus::InReview,
        StoryStatus::PendingApproval,
        StoryStatus::Approved,
    ] {
        let edge = find_story_edge(from, StoryStatus::NeedsRevision).unwrap();
        assert!(edge.requires_reason, "from {from}");
    }
}

#[test]
fn translation_approval_only_reachable_from_needs_review() {
    let all = [
        TranslationStatus::Pending,
        TranslationStatus::InProgress,
        TranslationStatus::NeedsReview,
        TranslationStatus::Rejected,
        TranslationStatus::Approved,
    ];
    for from in all {
        let exists = find_translation_edge(from, TranslationStatus::Approved).is_some();
        assert_eq!(exists, from == TranslationStatus::NeedsReview, "from {from}");
    }
}

#[test]
fn submitting_translation_requires_translated_story() {
    let edge =
        find_translation_edge(TranslationStatus::InProgress, TranslationStatus::NeedsReview)
            .unwrap();
    assert!(edge.requires_translated_story);
}

#[test]
fn approved_translation_is_terminal() {
    let all = [
        TranslationStatus::Pending,
        TranslationStatus::InProgress,
        TranslationStatus::NeedsReview,
        TranslationStatus::Rejected,
        TranslationStatus::Approved,
    ];
    for to in all {
        assert!(find_translation_edge(TranslationStatus::Approved, to).is_none());
    }
}

#[test]
fn bulletin_skips_pending_approval() {
    assert!(find_bulletin_edge(BulletinStatus::InReview, BulletinStatus::Approved).is_some());
    assert!(find_bulletin_edge(BulletinStatus::Draft, BulletinStatus::Approved).is_none());
    assert!(find_bulletin_edge(BulletinStatus::Approved, BulletinStatus::Published).is_some());
}

#[test]
fn bulletin_revision_returns_to_review_only() {
    assert!(find_bulletin_edge(BulletinStatus::NeedsRevision, BulletinStatus::InReview).is_some());
    assert!(find_bulletin_edge(BulletinStatus::NeedsRevision, BulletinStatus::Approved).is_none());
}
