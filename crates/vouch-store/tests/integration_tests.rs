//! Integration tests for vouch-store
//!
//! These tests verify the full application lifecycle against a database
//! file on disk, including reopening the store.

use vouch_domain::traits::{ApplicationStore, SelectionOutcome};
use vouch_domain::{ApplicationStatus, ExperienceDraft};
use vouch_store::SqliteStore;

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_schema_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vouch.db");

    // Opening the same file twice re-runs the schema without error.
    let first = SqliteStore::new(&path);
    assert!(first.is_ok());
    drop(first);

    let second = SqliteStore::new(&path);
    assert!(second.is_ok(), "Reopening should not fail on existing schema");
}

#[test]
fn test_applications_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vouch.db");

    let application_id = {
        let mut store = SqliteStore::new(&path).unwrap();
        let application = store
            .create_application("a1", "I led a project and improved sales by 20%.")
            .unwrap();
        application.id
    };

    let store = SqliteStore::new(&path).unwrap();
    let application = store.get_application(application_id).unwrap().unwrap();

    assert_eq!(application.applicant_id, "a1");
    assert_eq!(application.status, ApplicationStatus::Submitted);
    assert_eq!(
        application.cover_letter_text,
        "I led a project and improved sales by 20%."
    );
}

#[test]
fn test_committed_selection_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vouch.db");

    let application_id = {
        let mut store = SqliteStore::new(&path).unwrap();
        let application = store
            .create_application("a1", "Hello world, I led a project and improved sales by 20%.")
            .unwrap();

        let drafts = vec![ExperienceDraft {
            title: "led a project".to_string(),
            start_idx: 12,
            end_idx: 25,
            rank_score: 0.9,
        }];
        let outcome = store.commit_selection(application.id, &drafts).unwrap();
        assert!(matches!(outcome, SelectionOutcome::Committed { .. }));

        application.id
    };

    let store = SqliteStore::new(&path).unwrap();

    let application = store.get_application(application_id).unwrap().unwrap();
    assert_eq!(application.status, ApplicationStatus::ExperienceSelected);

    let experiences = store.experiences_for_application(application_id).unwrap();
    assert_eq!(experiences.len(), 1);
    assert!(experiences[0].selected);
    assert_eq!(experiences[0].title, "led a project");
    assert_eq!(experiences[0].rank_score, 0.9);
}

#[test]
fn test_conflict_guard_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vouch.db");

    let drafts = vec![ExperienceDraft {
        title: "span".to_string(),
        start_idx: 0,
        end_idx: 4,
        rank_score: 0.8,
    }];

    let application_id = {
        let mut store = SqliteStore::new(&path).unwrap();
        let application = store.create_application("a1", "Some letter text.").unwrap();
        store.commit_selection(application.id, &drafts).unwrap();
        application.id
    };

    // A second commit from a fresh connection still hits the guard.
    let mut store = SqliteStore::new(&path).unwrap();
    let outcome = store.commit_selection(application_id, &drafts).unwrap();

    assert_eq!(
        outcome,
        SelectionOutcome::Conflict {
            current: ApplicationStatus::ExperienceSelected,
        }
    );
}
