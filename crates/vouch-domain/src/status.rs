//! Application lifecycle status

use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an application
///
/// An application starts as [`Submitted`](ApplicationStatus::Submitted)
/// and moves to [`ExperienceSelected`](ApplicationStatus::ExperienceSelected)
/// exactly once. There is no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationStatus {
    /// Cover letter received, no experience chosen yet
    Submitted,
    /// A single experience has been promoted; terminal status
    ExperienceSelected,
}

impl ApplicationStatus {
    /// The wire and storage label for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "SUBMITTED",
            ApplicationStatus::ExperienceSelected => "EXPERIENCE_SELECTED",
        }
    }

    /// Parse a status label, returning `None` for anything unknown
    ///
    /// Labels are matched exactly; this is the inverse of [`as_str`](Self::as_str).
    pub fn parse(s: &str) -> Option<ApplicationStatus> {
        match s {
            "SUBMITTED" => Some(ApplicationStatus::Submitted),
            "EXPERIENCE_SELECTED" => Some(ApplicationStatus::ExperienceSelected),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::parse(s).ok_or_else(|| format!("Unknown application status: {}", s))
    }
}
