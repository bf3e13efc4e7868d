//! HTTP handlers and routing
//!
//! Translates between the JSON wire format (camelCase field names) and
//! the service layer, and maps service errors onto status codes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tracing::error;
use vouch_domain::traits::{ApplicationStore, CompletionProvider};
use vouch_domain::ApplicationId;

use crate::service::{ApplicationService, ServiceError};

/// Shared state handed to every handler
pub struct AppState<S, P>
where
    S: ApplicationStore,
    P: CompletionProvider,
{
    /// The application service
    pub service: Arc<ApplicationService<S, P>>,
}

// Derived Clone would demand S: Clone and P: Clone; only the Arc is cloned.
impl<S, P> Clone for AppState<S, P>
where
    S: ApplicationStore,
    P: CompletionProvider,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Request body for submitting an application
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    /// Identifier of the applicant
    #[serde(default)]
    pub applicant_id: Option<String>,
    /// Full cover letter text
    #[serde(default)]
    pub cover_letter_text: Option<String>,
}

/// Response body for a successful submission
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    /// Identifier of the created application
    pub application_id: i64,
    /// Lifecycle status of the application
    pub status: String,
    /// Creation time, seconds since the Unix epoch
    pub created_at: u64,
}

/// The experience promoted by a selection
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedExperience {
    /// Identifier of the experience
    pub experience_id: i64,
    /// Short label for the experience
    pub title: String,
    /// Span start, 0-based character offset
    pub start_idx: usize,
    /// Span end, one past the last character
    pub end_idx: usize,
    /// Relevance score in [0.0, 1.0]
    pub rank_score: f64,
}

/// Response body for a successful selection
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectExperienceResponse {
    /// Identifier of the application
    pub application_id: i64,
    /// Lifecycle status after the selection
    pub status: String,
    /// The experience that was promoted
    pub selected_experience: SelectedExperience,
}

/// Response body describing an application
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    /// Identifier of the application
    pub application_id: i64,
    /// Identifier of the applicant
    pub applicant_id: String,
    /// Lifecycle status of the application
    pub status: String,
    /// Creation time, seconds since the Unix epoch
    pub created_at: u64,
    /// Last update time, seconds since the Unix epoch
    pub updated_at: u64,
}

/// One experience in a listing
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceSummary {
    /// Identifier of the experience
    pub experience_id: i64,
    /// Short label for the experience
    pub title: String,
    /// Span start, 0-based character offset
    pub start_idx: usize,
    /// Span end, one past the last character
    pub end_idx: usize,
    /// Relevance score in [0.0, 1.0]
    pub rank_score: f64,
    /// Whether this experience was promoted
    pub selected: bool,
}

/// Response body listing an application's experiences
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceListResponse {
    /// Identifier of the application
    pub application_id: i64,
    /// Recorded experiences, best score first
    pub experiences: Vec<ExperienceSummary>,
}

/// Response body for the health check
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Health indicator, "healthy" when serving
    pub status: String,
    /// Server version
    pub version: String,
}

/// Error body returned for every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::InvalidStatus { .. } => StatusCode::CONFLICT,
            ServiceError::NoUsableExperiences | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Internal details go to the log, not to the caller.
        let message = match self {
            ServiceError::Internal(detail) => {
                error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Handle POST /api/v1/applications
pub async fn submit_application<S, P>(
    State(state): State<AppState<S, P>>,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), ServiceError>
where
    S: ApplicationStore + Send + 'static,
    S::Error: Display,
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Display,
{
    let applicant_id = request.applicant_id.unwrap_or_default();
    let cover_letter_text = request.cover_letter_text.unwrap_or_default();

    let application = state.service.submit(&applicant_id, &cover_letter_text)?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            application_id: application.id.value(),
            status: application.status.as_str().to_string(),
            created_at: application.created_at,
        }),
    ))
}

/// Handle POST /api/v1/applications/:application_id/select-experience
pub async fn select_experience<S, P>(
    State(state): State<AppState<S, P>>,
    Path(application_id): Path<i64>,
) -> Result<Json<SelectExperienceResponse>, ServiceError>
where
    S: ApplicationStore + Send + 'static,
    S::Error: Display,
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Display,
{
    let id = ApplicationId::from_value(application_id);
    let (application, selected) = state.service.select_experience(id).await?;

    Ok(Json(SelectExperienceResponse {
        application_id: application.id.value(),
        status: application.status.as_str().to_string(),
        selected_experience: SelectedExperience {
            experience_id: selected.id.value(),
            title: selected.title,
            start_idx: selected.start_idx,
            end_idx: selected.end_idx,
            rank_score: selected.rank_score,
        },
    }))
}

/// Handle GET /api/v1/applications/:application_id
pub async fn get_application<S, P>(
    State(state): State<AppState<S, P>>,
    Path(application_id): Path<i64>,
) -> Result<Json<ApplicationResponse>, ServiceError>
where
    S: ApplicationStore + Send + 'static,
    S::Error: Display,
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Display,
{
    let id = ApplicationId::from_value(application_id);
    let application = state.service.get_application(id)?;

    Ok(Json(ApplicationResponse {
        application_id: application.id.value(),
        applicant_id: application.applicant_id,
        status: application.status.as_str().to_string(),
        created_at: application.created_at,
        updated_at: application.updated_at,
    }))
}

/// Handle GET /api/v1/applications/:application_id/experiences
pub async fn list_experiences<S, P>(
    State(state): State<AppState<S, P>>,
    Path(application_id): Path<i64>,
) -> Result<Json<ExperienceListResponse>, ServiceError>
where
    S: ApplicationStore + Send + 'static,
    S::Error: Display,
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Display,
{
    let id = ApplicationId::from_value(application_id);
    let experiences = state.service.list_experiences(id)?;

    Ok(Json(ExperienceListResponse {
        application_id,
        experiences: experiences
            .into_iter()
            .map(|e| ExperienceSummary {
                experience_id: e.id.value(),
                title: e.title,
                start_idx: e.start_idx,
                end_idx: e.end_idx,
                rank_score: e.rank_score,
                selected: e.selected,
            })
            .collect(),
    }))
}

/// Handle GET /health
pub async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the router with all routes bound to the given state
pub fn create_router<S, P>(state: AppState<S, P>) -> Router
where
    S: ApplicationStore + Send + 'static,
    S::Error: Display,
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Display,
{
    Router::new()
        .route("/api/v1/applications", post(submit_application))
        .route(
            "/api/v1/applications/:application_id/select-experience",
            post(select_experience),
        )
        .route("/api/v1/applications/:application_id", get(get_application))
        .route(
            "/api/v1/applications/:application_id/experiences",
            get(list_experiences),
        )
        .route("/health", get(health_check))
        .with_state(state)
}
