//! Vouch Extractor
//!
//! Converts cover letter text into ranked candidate experiences using a
//! chat-completion provider.
//!
//! # Overview
//!
//! The extractor owns the untrusted half of the system: it asks the
//! model for experience spans, then parses, clamps, and ranks whatever
//! comes back. Offsets in the output always refer to the original
//! letter; nothing the model returns is trusted before it has passed
//! through the parser.
//!
//! # Architecture
//!
//! ```text
//! Cover letter → PromptBuilder → CompletionProvider → parser → ranked drafts
//! ```
//!
//! # Key Features
//!
//! - **Single-call extraction**: One provider call per extraction, no retries
//! - **Worked example**: Prompts carry one complete input/output pair
//! - **Sanitization**: Offsets and scores are clamped into the letter
//! - **Degrade to empty**: Every failure becomes "no candidates" at one
//!   documented point, after logging
//!
//! # Example Usage
//!
//! ```no_run
//! use vouch_extractor::ExperienceExtractor;
//! use vouch_llm::MockProvider;
//! use vouch_domain::ApplicationId;
//!
//! # async fn example() {
//! let provider = MockProvider::new(
//!     r#"[{"title": "led a project", "startIdx": 12, "endIdx": 25, "rankScore": 0.9}]"#,
//! );
//! let extractor = ExperienceExtractor::new(provider);
//!
//! let drafts = extractor
//!     .extract(
//!         ApplicationId::from_value(1),
//!         "Hello world, I led a project and improved sales by 20%.",
//!     )
//!     .await;
//!
//! assert_eq!(drafts.len(), 1);
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod extractor;
mod oneshot;
mod parser;
mod prompt;

pub use error::ExtractionError;
pub use extractor::ExperienceExtractor;
