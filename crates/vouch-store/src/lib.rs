//! Vouch Storage Layer
//!
//! Implements the ApplicationStore trait using SQLite.
//!
//! # Architecture
//!
//! - SQLite for applications and their extracted experiences
//! - The selection transition runs under an immediate transaction so
//!   that concurrent attempts serialize on the status guard
//!
//! # Examples
//!
//! ```no_run
//! use vouch_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for application operations
//! ```

#![warn(missing_docs)]

use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use vouch_domain::traits::{ApplicationStore, SelectionOutcome};
use vouch_domain::{
    Application, ApplicationId, ApplicationStatus, Experience, ExperienceDraft, ExperienceId,
};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of ApplicationStore
///
/// Provides persistent storage for applications and the experiences
/// extracted from them.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Callers share a store by
/// wrapping it in a mutex.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vouch_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("vouch.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Current wall-clock time as epoch seconds
    fn now_epoch() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
            .as_secs() as i64
    }

    /// Map an application row in SELECT column order
    fn application_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Application> {
        let status_str: String = row.get(3)?;
        let status = ApplicationStatus::parse(&status_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(format!(
                    "Unknown application status: {}",
                    status_str
                ))),
            )
        })?;

        Ok(Application {
            id: ApplicationId::from_value(row.get(0)?),
            applicant_id: row.get(1)?,
            cover_letter_text: row.get(2)?,
            status,
            interview_recommendations: row.get(4)?,
            created_at: row.get::<_, i64>(5)? as u64,
            updated_at: row.get::<_, i64>(6)? as u64,
        })
    }

    /// Map an experience row in SELECT column order
    fn experience_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Experience> {
        Ok(Experience {
            id: ExperienceId::from_value(row.get(0)?),
            application_id: ApplicationId::from_value(row.get(1)?),
            title: row.get(2)?,
            start_idx: row.get::<_, i64>(3)? as usize,
            end_idx: row.get::<_, i64>(4)? as usize,
            rank_score: row.get(5)?,
            selected: row.get(6)?,
            created_at: row.get::<_, i64>(7)? as u64,
        })
    }

    /// Fetch an application inside an open transaction
    fn get_application_tx(
        tx: &Transaction<'_>,
        id: ApplicationId,
    ) -> Result<Option<Application>, StoreError> {
        let application = tx
            .query_row(
                "SELECT id, applicant_id, cover_letter_text, status,
                        interview_recommendations_json, created_at, updated_at
                 FROM application WHERE id = ?1",
                params![id.value()],
                Self::application_from_row,
            )
            .optional()?;

        Ok(application)
    }

    /// Insert drafts inside an open transaction, unselected
    fn insert_experiences_tx(
        tx: &Transaction<'_>,
        application_id: ApplicationId,
        drafts: &[ExperienceDraft],
    ) -> Result<Vec<Experience>, StoreError> {
        let now = Self::now_epoch();
        let mut experiences = Vec::with_capacity(drafts.len());

        for draft in drafts {
            tx.execute(
                "INSERT INTO experience
                     (application_id, title, start_idx, end_idx, rank_score, is_selected, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
                params![
                    application_id.value(),
                    &draft.title,
                    draft.start_idx as i64,
                    draft.end_idx as i64,
                    draft.rank_score,
                    now,
                ],
            )?;

            experiences.push(Experience {
                id: ExperienceId::from_value(tx.last_insert_rowid()),
                application_id,
                title: draft.title.clone(),
                start_idx: draft.start_idx,
                end_idx: draft.end_idx,
                rank_score: draft.rank_score,
                selected: false,
                created_at: now as u64,
            });
        }

        Ok(experiences)
    }
}

impl ApplicationStore for SqliteStore {
    type Error = StoreError;

    fn create_application(
        &mut self,
        applicant_id: &str,
        cover_letter_text: &str,
    ) -> Result<Application, Self::Error> {
        let now = Self::now_epoch();

        self.conn.execute(
            "INSERT INTO application
                 (applicant_id, cover_letter_text, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                applicant_id,
                cover_letter_text,
                ApplicationStatus::Submitted.as_str(),
                now,
                now,
            ],
        )?;

        let id = ApplicationId::from_value(self.conn.last_insert_rowid());
        self.get_application(id)?
            .ok_or_else(|| StoreError::NotFound(format!("application {}", id)))
    }

    fn get_application(&self, id: ApplicationId) -> Result<Option<Application>, Self::Error> {
        let application = self
            .conn
            .query_row(
                "SELECT id, applicant_id, cover_letter_text, status,
                        interview_recommendations_json, created_at, updated_at
                 FROM application WHERE id = ?1",
                params![id.value()],
                Self::application_from_row,
            )
            .optional()?;

        Ok(application)
    }

    fn update_application_status(
        &mut self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), Self::Error> {
        let updated = self.conn.execute(
            "UPDATE application SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), Self::now_epoch(), id.value()],
        )?;

        if updated == 0 {
            return Err(StoreError::NotFound(format!("application {}", id)));
        }

        Ok(())
    }

    fn insert_experiences(
        &mut self,
        application_id: ApplicationId,
        drafts: &[ExperienceDraft],
    ) -> Result<Vec<Experience>, Self::Error> {
        let tx = self.conn.transaction()?;
        let experiences = Self::insert_experiences_tx(&tx, application_id, drafts)?;
        tx.commit()?;
        Ok(experiences)
    }

    fn experiences_for_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<Experience>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, application_id, title, start_idx, end_idx, rank_score, is_selected, created_at
             FROM experience WHERE application_id = ?1
             ORDER BY rank_score DESC, id ASC",
        )?;

        let experiences = stmt
            .query_map(params![application_id.value()], Self::experience_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(experiences)
    }

    fn commit_selection(
        &mut self,
        application_id: ApplicationId,
        drafts: &[ExperienceDraft],
    ) -> Result<SelectionOutcome, Self::Error> {
        // Immediate mode takes the write lock up front, so the status
        // read below cannot race another commit on the same database.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let application = match Self::get_application_tx(&tx, application_id)? {
            Some(application) => application,
            None => return Ok(SelectionOutcome::NotFound),
        };

        if application.status != ApplicationStatus::Submitted {
            return Ok(SelectionOutcome::Conflict {
                current: application.status,
            });
        }

        let mut inserted = Self::insert_experiences_tx(&tx, application_id, drafts)?;

        if inserted.is_empty() {
            tx.commit()?;
            return Ok(SelectionOutcome::Exhausted);
        }

        let mut selected = inserted.remove(0);
        tx.execute(
            "UPDATE experience SET is_selected = 1 WHERE id = ?1",
            params![selected.id.value()],
        )?;
        selected.selected = true;

        let now = Self::now_epoch();
        tx.execute(
            "UPDATE application SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                ApplicationStatus::ExperienceSelected.as_str(),
                now,
                application_id.value(),
            ],
        )?;

        tx.commit()?;

        Ok(SelectionOutcome::Committed {
            application: Application {
                status: ApplicationStatus::ExperienceSelected,
                updated_at: now as u64,
                ..application
            },
            selected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, start_idx: usize, end_idx: usize, rank_score: f64) -> ExperienceDraft {
        ExperienceDraft {
            title: title.to_string(),
            start_idx,
            end_idx,
            rank_score,
        }
    }

    #[test]
    fn test_create_and_get_application() {
        let mut store = SqliteStore::new(":memory:").unwrap();

        let created = store
            .create_application("a1", "I led a project and improved sales by 20%.")
            .unwrap();

        assert_eq!(created.applicant_id, "a1");
        assert_eq!(created.status, ApplicationStatus::Submitted);
        assert!(created.created_at > 0);
        assert_eq!(created.created_at, created.updated_at);
        assert!(created.interview_recommendations.is_none());

        let fetched = store.get_application(created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_get_nonexistent_application() {
        let store = SqliteStore::new(":memory:").unwrap();

        let result = store
            .get_application(ApplicationId::from_value(99999))
            .unwrap();
        assert!(result.is_none(), "Should return None for unknown id");
    }

    #[test]
    fn test_update_application_status() {
        let mut store = SqliteStore::new(":memory:").unwrap();

        let created = store.create_application("a1", "Some letter.").unwrap();
        store
            .update_application_status(created.id, ApplicationStatus::ExperienceSelected)
            .unwrap();

        let fetched = store.get_application(created.id).unwrap().unwrap();
        assert_eq!(fetched.status, ApplicationStatus::ExperienceSelected);
        assert!(fetched.updated_at >= created.updated_at);
    }

    #[test]
    fn test_update_status_of_missing_application() {
        let mut store = SqliteStore::new(":memory:").unwrap();

        let result = store.update_application_status(
            ApplicationId::from_value(404),
            ApplicationStatus::ExperienceSelected,
        );
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_insert_and_list_experiences() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let application = store.create_application("a1", "Some letter.").unwrap();

        let drafts = vec![
            draft("second best", 0, 5, 0.75),
            draft("best", 6, 10, 0.85),
            draft("weakest", 11, 15, 0.65),
        ];
        let inserted = store.insert_experiences(application.id, &drafts).unwrap();

        assert_eq!(inserted.len(), 3);
        assert!(inserted.iter().all(|e| !e.selected));
        assert_eq!(inserted[0].title, "second best");
        assert!(inserted[0].id < inserted[1].id, "Ids should be assigned in input order");

        let listed = store.experiences_for_application(application.id).unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].rank_score, 0.85, "Best score should come first");
        assert_eq!(listed[1].rank_score, 0.75);
        assert_eq!(listed[2].rank_score, 0.65);
    }

    #[test]
    fn test_commit_selection_promotes_first_draft() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let application = store
            .create_application("a1", "Hello world, I led a project and improved sales by 20%.")
            .unwrap();

        let drafts = vec![draft("led a project", 12, 25, 0.9)];
        let outcome = store.commit_selection(application.id, &drafts).unwrap();

        match outcome {
            SelectionOutcome::Committed {
                application: updated,
                selected,
            } => {
                assert_eq!(updated.id, application.id);
                assert_eq!(updated.status, ApplicationStatus::ExperienceSelected);
                assert_eq!(selected.title, "led a project");
                assert_eq!(selected.start_idx, 12);
                assert_eq!(selected.end_idx, 25);
                assert_eq!(selected.rank_score, 0.9);
                assert!(selected.selected);
            }
            other => panic!("Expected Committed, got {:?}", other),
        }

        let listed = store.experiences_for_application(application.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].selected);

        let fetched = store.get_application(application.id).unwrap().unwrap();
        assert_eq!(fetched.status, ApplicationStatus::ExperienceSelected);
    }

    #[test]
    fn test_commit_selection_missing_application() {
        let mut store = SqliteStore::new(":memory:").unwrap();

        let outcome = store
            .commit_selection(ApplicationId::from_value(42), &[draft("x", 0, 1, 0.5)])
            .unwrap();
        assert_eq!(outcome, SelectionOutcome::NotFound);
    }

    #[test]
    fn test_commit_selection_conflicts_after_first_commit() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let application = store.create_application("a1", "Some letter text.").unwrap();

        let drafts = vec![draft("span", 0, 4, 0.8)];
        let first = store.commit_selection(application.id, &drafts).unwrap();
        assert!(matches!(first, SelectionOutcome::Committed { .. }));

        let second = store.commit_selection(application.id, &drafts).unwrap();
        assert_eq!(
            second,
            SelectionOutcome::Conflict {
                current: ApplicationStatus::ExperienceSelected,
            }
        );

        // The losing attempt must not have written anything.
        let listed = store.experiences_for_application(application.id).unwrap();
        assert_eq!(listed.len(), 1, "Conflicting commit should leave no rows");
    }

    #[test]
    fn test_commit_selection_with_no_drafts() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let application = store.create_application("a1", "Some letter text.").unwrap();

        let outcome = store.commit_selection(application.id, &[]).unwrap();
        assert_eq!(outcome, SelectionOutcome::Exhausted);

        // The application stays submitted so the caller may retry.
        let fetched = store.get_application(application.id).unwrap().unwrap();
        assert_eq!(fetched.status, ApplicationStatus::Submitted);
        assert!(store
            .experiences_for_application(application.id)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_applications_are_isolated() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let first = store.create_application("a1", "First letter.").unwrap();
        let second = store.create_application("a2", "Second letter.").unwrap();

        store
            .insert_experiences(first.id, &[draft("span one", 0, 5, 0.7)])
            .unwrap();
        store
            .insert_experiences(second.id, &[draft("span two", 0, 6, 0.6)])
            .unwrap();

        let first_rows = store.experiences_for_application(first.id).unwrap();
        assert_eq!(first_rows.len(), 1);
        assert_eq!(first_rows[0].title, "span one");

        let second_rows = store.experiences_for_application(second.id).unwrap();
        assert_eq!(second_rows.len(), 1);
        assert_eq!(second_rows[0].title, "span two");
    }
}
