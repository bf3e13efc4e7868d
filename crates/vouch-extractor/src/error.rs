//! Error types for experience extraction

use thiserror::Error;

/// Errors that can occur while producing candidate experiences
///
/// These stay distinguishable up to the extraction boundary; the public
/// pipeline entry point collapses all of them into an empty candidate
/// list after logging.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The completion provider call failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// The provider reply could not be read as a JSON array
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}
