//! Application lifecycle orchestration
//!
//! Coordinates the store and the extraction pipeline: submissions,
//! reads, and the one-way selection transition.

use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::info;
use vouch_domain::traits::{ApplicationStore, CompletionProvider, SelectionOutcome};
use vouch_domain::{Application, ApplicationId, ApplicationStatus, Experience};
use vouch_extractor::ExperienceExtractor;

/// Errors surfaced by application operations
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or missing caller input
    #[error("{0}")]
    Validation(String),

    /// No application with the requested id
    #[error("Application not found")]
    NotFound,

    /// The application is not in the status the operation requires
    #[error("Experience selection is only allowed for SUBMITTED applications. Current status: {current}")]
    InvalidStatus {
        /// Status the application was actually in
        current: ApplicationStatus,
    },

    /// Extraction produced nothing usable
    #[error("No valid experiences could be extracted from the cover letter")]
    NoUsableExperiences,

    /// Store or infrastructure failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coordinates submissions, extraction, and the selection transition
pub struct ApplicationService<S, P>
where
    S: ApplicationStore,
    P: CompletionProvider,
{
    store: Arc<Mutex<S>>,
    extractor: ExperienceExtractor<P>,
}

impl<S, P> ApplicationService<S, P>
where
    S: ApplicationStore + Send + 'static,
    S::Error: Display,
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Display,
{
    /// Create a service over a store and a completion provider
    pub fn new(store: S, provider: P) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            extractor: ExperienceExtractor::new(provider),
        }
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, S>, ServiceError> {
        self.store
            .lock()
            .map_err(|e| ServiceError::Internal(format!("Store lock error: {}", e)))
    }

    /// Create a submitted application from caller input
    pub fn submit(
        &self,
        applicant_id: &str,
        cover_letter_text: &str,
    ) -> Result<Application, ServiceError> {
        if applicant_id.trim().is_empty() {
            return Err(ServiceError::Validation(
                "applicantId must not be blank".to_string(),
            ));
        }
        if cover_letter_text.trim().is_empty() {
            return Err(ServiceError::Validation(
                "coverLetterText must not be blank".to_string(),
            ));
        }

        let application = {
            let mut store = self.lock_store()?;
            store
                .create_application(applicant_id, cover_letter_text)
                .map_err(|e| ServiceError::Internal(format!("Store error: {}", e)))?
        };

        info!(
            "Application {} submitted for applicant {}",
            application.id, application.applicant_id
        );
        Ok(application)
    }

    /// Run extraction and promote the best candidate
    ///
    /// The status guard is checked twice. The early check avoids paying
    /// for a provider call when the application is missing or already
    /// past selection; the check inside the store's commit is the one
    /// that serializes concurrent attempts, so exactly one of them can
    /// win.
    pub async fn select_experience(
        &self,
        id: ApplicationId,
    ) -> Result<(Application, Experience), ServiceError> {
        let application = {
            let store = self.lock_store()?;
            store
                .get_application(id)
                .map_err(|e| ServiceError::Internal(format!("Store error: {}", e)))?
                .ok_or(ServiceError::NotFound)?
        };

        if application.status != ApplicationStatus::Submitted {
            return Err(ServiceError::InvalidStatus {
                current: application.status,
            });
        }

        let drafts = self
            .extractor
            .extract(id, &application.cover_letter_text)
            .await;

        let outcome = {
            let mut store = self.lock_store()?;
            store
                .commit_selection(id, &drafts)
                .map_err(|e| ServiceError::Internal(format!("Store error: {}", e)))?
        };

        match outcome {
            SelectionOutcome::Committed {
                application,
                selected,
            } => {
                info!(
                    "Application {} advanced to {} with experience {}",
                    application.id, application.status, selected.id
                );
                Ok((application, selected))
            }
            SelectionOutcome::Conflict { current } => {
                Err(ServiceError::InvalidStatus { current })
            }
            SelectionOutcome::NotFound => Err(ServiceError::NotFound),
            SelectionOutcome::Exhausted => Err(ServiceError::NoUsableExperiences),
        }
    }

    /// Fetch a stored application
    pub fn get_application(&self, id: ApplicationId) -> Result<Application, ServiceError> {
        let store = self.lock_store()?;
        store
            .get_application(id)
            .map_err(|e| ServiceError::Internal(format!("Store error: {}", e)))?
            .ok_or(ServiceError::NotFound)
    }

    /// All experiences recorded for an application, best score first
    pub fn list_experiences(&self, id: ApplicationId) -> Result<Vec<Experience>, ServiceError> {
        let store = self.lock_store()?;

        store
            .get_application(id)
            .map_err(|e| ServiceError::Internal(format!("Store error: {}", e)))?
            .ok_or(ServiceError::NotFound)?;

        store
            .experiences_for_application(id)
            .map_err(|e| ServiceError::Internal(format!("Store error: {}", e)))
    }
}
