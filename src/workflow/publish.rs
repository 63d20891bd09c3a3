//! Publish precondition aggregator.
//!
//! Computes the full list of human-readable reasons a story cannot be
//! published right now, rather than a bare boolean. A normal "not ready"
//! never errors; callers handle NotFound before reaching this module.

use serde::{Deserialize, Serialize};

use super::status::{StoryStatus, TranslationStatus};

/// Checklist booleans supplied by the publishing editor.
/// `translations_verified` is not part of this struct: it is auto-satisfied
/// when every non-skipped translation is APPROVED.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PublishChecklist {
    #[serde(default)]
    pub content_reviewed: bool,
    #[serde(default)]
    pub audio_quality_checked: bool,
}

/// A translation row reduced to what the aggregator needs.
#[derive(Debug, Clone)]
pub struct TranslationState {
    pub target_language: String,
    pub status: TranslationStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishReadiness {
    pub can_publish: bool,
    pub issues: Vec<String>,
}

/// Evaluate every publish precondition for a story.
pub fn evaluate(
    status: StoryStatus,
    translations_skipped: bool,
    translations: &[TranslationState],
    checklist: &PublishChecklist,
) -> PublishReadiness {
    let mut issues = Vec::new();

    match status {
        StoryStatus::Approved => {}
        StoryStatus::Published => {
            issues.push("Story is already published".to_string());
        }
        StoryStatus::Archived => {
            issues.push("Story is archived and cannot be published".to_string());
        }
        other => {
            issues.push(format!(
                "Story must be APPROVED before publishing (currently {other})"
            ));
        }
    }

    if !translations_skipped {
        if translations.is_empty() {
            issues.push(
                "Story has no translations and is not marked translation-skipped".to_string(),
            );
        } else {
            for t in translations {
                if t.status != TranslationStatus::Approved {
                    issues.push(format!(
                        "Translation to {} not approved (currently {})",
                        t.target_language, t.status
                    ));
                }
            }
        }
    }

    if !checklist.content_reviewed {
        issues.push("Content review checklist item not confirmed".to_string());
    }
    if !checklist.audio_quality_checked {
        issues.push("Audio quality check not confirmed".to_string());
    }

    PublishReadiness {
        can_publish: issues.is_empty(),
        issues,
    }
}
