//! Vouch Domain Layer
//!
//! Core types and trait contracts for the Vouch experience-extraction
//! pipeline. An applicant submits a cover letter, an extraction pass
//! proposes candidate experiences found in the letter text, and exactly
//! one candidate is promoted when the application advances to its final
//! status.
//!
//! ## Key Concepts
//!
//! - **Application**: a submitted cover letter with lifecycle status
//! - **Experience**: a contiguous span of the cover letter describing
//!   something the applicant personally did, with a relevance score
//! - **Selection**: the one-way transition that promotes a single
//!   experience and moves the application to its terminal status
//!
//! ## Design Principles
//!
//! - Zero external dependencies: this crate is pure Rust
//! - All types are plain data: no hidden state or I/O
//! - Storage and provider access are defined as traits here and
//!   implemented in infrastructure crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod experience;
pub mod status;
pub mod traits;

pub use application::{Application, ApplicationId};
pub use experience::{Experience, ExperienceDraft, ExperienceId};
pub use status::ApplicationStatus;
