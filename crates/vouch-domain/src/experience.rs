//! Experience types
//!
//! An experience is a contiguous span of the submitted cover letter,
//! identified by 0-based character offsets into the original text. The
//! span is half-open: `end_idx` points one past the last character, so
//! slicing the letter with `[start_idx, end_idx)` reproduces the span
//! exactly.

use crate::application::ApplicationId;
use std::fmt;

/// Unique identifier for a persisted experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExperienceId(i64);

impl ExperienceId {
    /// Create an id from a raw value
    pub fn from_value(value: i64) -> Self {
        ExperienceId(value)
    }

    /// The raw value of this id
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ExperienceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated candidate experience that has not been persisted yet
///
/// Drafts come out of the extraction pipeline already sanitized: offsets
/// lie inside the letter, the span is non-empty, and the score is within
/// `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceDraft {
    /// Short phrase excerpted from the letter, never empty
    pub title: String,
    /// 0-based character offset of the first character of the span
    pub start_idx: usize,
    /// 0-based character offset one past the last character of the span
    pub end_idx: usize,
    /// Relevance score in `[0.0, 1.0]`, higher is better
    pub rank_score: f64,
}

/// An experience recorded for an application
#[derive(Debug, Clone, PartialEq)]
pub struct Experience {
    /// Unique identifier
    pub id: ExperienceId,
    /// The application this experience was extracted from
    pub application_id: ApplicationId,
    /// Short phrase excerpted from the letter
    pub title: String,
    /// 0-based character offset of the first character of the span
    pub start_idx: usize,
    /// 0-based character offset one past the last character of the span
    pub end_idx: usize,
    /// Relevance score in `[0.0, 1.0]`
    pub rank_score: f64,
    /// Whether this is the promoted experience for its application
    pub selected: bool,
    /// Persistence time (epoch seconds)
    pub created_at: u64,
}
