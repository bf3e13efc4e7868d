//! Application type and identifier

use crate::status::ApplicationStatus;
use std::fmt;
use std::str::FromStr;

/// Unique identifier for an application
///
/// Wraps the storage layer's row id so application and experience ids
/// cannot be confused with each other or with bare integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApplicationId(i64);

impl ApplicationId {
    /// Create an id from a raw value
    pub fn from_value(value: i64) -> Self {
        ApplicationId(value)
    }

    /// The raw value of this id
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApplicationId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ApplicationId(s.parse()?))
    }
}

/// A submitted cover letter and its lifecycle state
///
/// The cover letter text is immutable once submitted; every experience
/// offset recorded later refers to this exact text.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    /// Unique identifier
    pub id: ApplicationId,
    /// Caller-supplied identifier of the applicant
    pub applicant_id: String,
    /// Full cover letter text as submitted
    pub cover_letter_text: String,
    /// Current lifecycle status
    pub status: ApplicationStatus,
    /// Reviewer-facing notes attached after selection, if any
    ///
    /// Stored verbatim; nothing in the pipeline interprets this value.
    pub interview_recommendations: Option<String>,
    /// Submission time (epoch seconds)
    pub created_at: u64,
    /// Last modification time (epoch seconds)
    pub updated_at: u64,
}
