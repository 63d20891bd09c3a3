//! Tests for input validation helpers and slug generation.

use newsdesk::auth::validate;
use newsdesk::models::story::slug_from_title;
use newsdesk::workflow::status::{StaffRole, StoryStatus};

#[test]
fn slugs_are_lowercase_dashed_and_stripped() {
    assert_eq!(slug_from_title("Load Shedding Update"), "load-shedding-update");
    assert_eq!(slug_from_title("  Breaking: Port Strike!  "), "breaking-port-strike");
    assert_eq!(slug_from_title("Elections 2026"), "elections-2026");
}

#[test]
fn username_rules() {
    assert!(validate::validate_username("moeketsi_m").is_none());
    assert!(validate::validate_username("").is_some());
    assert!(validate::validate_username("a").is_some());
    assert!(validate::validate_username("has space").is_some());
}

#[test]
fn language_rules() {
    assert!(validate::validate_language("xh").is_none());
    assert!(validate::validate_language("pt-BR").is_none());
    assert!(validate::validate_language("x").is_some());
    assert!(validate::validate_language("12").is_some());
}

#[test]
fn status_round_trips_through_strings() {
    for status in [
        StoryStatus::Draft,
        StoryStatus::InReview,
        StoryStatus::NeedsRevision,
        StoryStatus::PendingApproval,
        StoryStatus::Approved,
        StoryStatus::Published,
        StoryStatus::Archived,
    ] {
        assert_eq!(status.as_str().parse::<StoryStatus>().unwrap(), status);
    }
    assert!("SHIPPED".parse::<StoryStatus>().is_err());
}

#[test]
fn roles_parse_and_order() {
    assert_eq!("SUB_EDITOR".parse::<StaffRole>().unwrap(), StaffRole::SubEditor);
    assert!(StaffRole::Editor > StaffRole::SubEditor);
    assert!("EDITOR_IN_CHIEF".parse::<StaffRole>().is_err());
}
