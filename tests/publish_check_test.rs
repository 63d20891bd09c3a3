//! Tests for the publish precondition aggregator.

use newsdesk::workflow::publish::{PublishChecklist, TranslationState, evaluate};
use newsdesk::workflow::status::{StoryStatus, TranslationStatus};

fn full_checklist() -> PublishChecklist {
    PublishChecklist {
        content_reviewed: true,
        audio_quality_checked: true,
    }
}

fn translation(lang: &str, status: TranslationStatus) -> TranslationState {
    TranslationState {
        target_language: lang.to_string(),
        status,
    }
}

#[test]
fn approved_story_with_approved_translations_can_publish() {
    let translations = vec![
        translation("xh", TranslationStatus::Approved),
        translation("zu", TranslationStatus::Approved),
    ];
    let result = evaluate(StoryStatus::Approved, false, &translations, &full_checklist());
    assert!(result.can_publish);
    assert!(result.issues.is_empty());
}

#[test]
fn unapproved_translation_blocks_publish_and_is_named() {
    let translations = vec![
        translation("xh", TranslationStatus::NeedsReview),
        translation("zu", TranslationStatus::Approved),
    ];
    let result = evaluate(StoryStatus::Approved, false, &translations, &full_checklist());
    assert!(!result.can_publish);
    assert!(
        result.issues.iter().any(|i| i.contains("xh")),
        "issues should name the unapproved language: {:?}",
        result.issues
    );
}

#[test]
fn zero_translations_block_publish_unless_skipped() {
    let result = evaluate(StoryStatus::Approved, false, &[], &full_checklist());
    assert!(!result.can_publish);
    assert!(result.issues.iter().any(|i| i.contains("no translations")));

    let skipped = evaluate(StoryStatus::Approved, true, &[], &full_checklist());
    assert!(skipped.can_publish);
}

#[test]
fn skip_flag_ignores_translation_states_entirely() {
    let translations = vec![translation("xh", TranslationStatus::Rejected)];
    let result = evaluate(StoryStatus::Approved, true, &translations, &full_checklist());
    assert!(result.can_publish);
}

#[test]
fn missing_audio_check_blocks_then_passes_when_set() {
    let checklist = PublishChecklist {
        content_reviewed: true,
        audio_quality_checked: false,
    };
    let result = evaluate(StoryStatus::Approved, true, &[], &checklist);
    assert!(!result.can_publish);
    assert!(result.issues.iter().any(|i| i.contains("Audio quality")));

    let result = evaluate(StoryStatus::Approved, true, &[], &full_checklist());
    assert!(result.can_publish);
}

#[test]
fn missing_content_review_is_reported() {
    let checklist = PublishChecklist {
        content_reviewed: false,
        audio_quality_checked: true,
    };
    let result = evaluate(StoryStatus::Approved, true, &[], &checklist);
    assert!(!result.can_publish);
    assert!(result.issues.iter().any(|i| i.contains("Content review")));
}

#[test]
fn non_approved_statuses_cannot_publish() {
    for status in [
        StoryStatus::Draft,
        StoryStatus::InReview,
        StoryStatus::NeedsRevision,
        StoryStatus::PendingApproval,
        StoryStatus::Published,
        StoryStatus::Archived,
    ] {
        let result = evaluate(status, true, &[], &full_checklist());
        assert!(!result.can_publish, "published from {status}");
        assert!(!result.issues.is_empty());
    }
}

#[test]
fn all_blocking_reasons_are_collected_not_just_the_first() {
    let translations = vec![translation("xh", TranslationStatus::Pending)];
    let checklist = PublishChecklist {
        content_reviewed: false,
        audio_quality_checked: false,
    };
    let result = evaluate(StoryStatus::Draft, false, &translations, &checklist);
    assert!(!result.can_publish);
    // Status, translation, and both checklist items all appear.
    assert_eq!(result.issues.len(), 4, "issues: {:?}", result.issues);
}
