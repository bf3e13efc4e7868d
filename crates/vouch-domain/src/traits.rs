//! Trait contracts implemented by infrastructure crates
//!
//! The domain defines what storage and completion providers must do;
//! concrete SQLite and HTTP implementations live in their own crates.

use crate::application::{Application, ApplicationId};
use crate::experience::{Experience, ExperienceDraft};
use crate::status::ApplicationStatus;

/// Result of an atomic selection commit
///
/// Produced by [`ApplicationStore::commit_selection`]. Exactly one of
/// several concurrent commits for the same application can observe
/// [`Committed`](SelectionOutcome::Committed); every later attempt sees
/// [`Conflict`](SelectionOutcome::Conflict).
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// The selection was written: candidates persisted, the first one
    /// promoted, and the application moved to its terminal status
    Committed {
        /// The application with its updated status
        application: Application,
        /// The promoted experience
        selected: Experience,
    },
    /// The application was not in the status the transition requires
    Conflict {
        /// Status the application was actually in
        current: ApplicationStatus,
    },
    /// No application with the requested id exists
    NotFound,
    /// There were no candidates to persist; nothing was changed
    Exhausted,
}

/// Persistent storage for applications and their experiences
///
/// Write operations take `&mut self`; read operations take `&self`.
pub trait ApplicationStore {
    /// Error type returned by storage operations
    type Error;

    /// Create an application in the submitted status and return it
    fn create_application(
        &mut self,
        applicant_id: &str,
        cover_letter_text: &str,
    ) -> Result<Application, Self::Error>;

    /// Fetch an application by id
    fn get_application(&self, id: ApplicationId) -> Result<Option<Application>, Self::Error>;

    /// Overwrite the status of an existing application
    fn update_application_status(
        &mut self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), Self::Error>;

    /// Persist a batch of candidate drafts for an application
    ///
    /// Returns the stored experiences in input order, none of them
    /// selected.
    fn insert_experiences(
        &mut self,
        application_id: ApplicationId,
        drafts: &[ExperienceDraft],
    ) -> Result<Vec<Experience>, Self::Error>;

    /// All experiences recorded for an application, best score first
    fn experiences_for_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<Experience>, Self::Error>;

    /// Atomically persist candidates and promote the first draft
    ///
    /// The whole transition happens under one exclusive transaction:
    /// re-check that the application is still submitted, persist the
    /// drafts, mark the first one selected, and advance the status.
    /// Callers pass drafts ordered best-first. A guard failure is
    /// reported through [`SelectionOutcome`], not as an error.
    fn commit_selection(
        &mut self,
        application_id: ApplicationId,
        drafts: &[ExperienceDraft],
    ) -> Result<SelectionOutcome, Self::Error>;
}

/// A chat-style completion provider
///
/// One call sends a system framing and a user prompt and returns the
/// model's text reply. Implementations are synchronous; async callers
/// run them on a blocking pool.
pub trait CompletionProvider {
    /// Error type returned by the provider
    type Error;

    /// Request a completion for the given prompt pair
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, Self::Error>;
}
