//! Experience extraction pipeline

use crate::error::ExtractionError;
use crate::oneshot::OneShotExample;
use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use std::sync::Arc;
use tracing::{error, info, warn};
use vouch_domain::traits::CompletionProvider;
use vouch_domain::{ApplicationId, ExperienceDraft};

/// Number of candidates kept per extraction
///
/// The prompt asks the model for up to 3 spans so weaker passages do
/// not crowd out the strongest one, but only the top-ranked candidate
/// moves on.
const MAX_CANDIDATES: usize = 1;

/// Turns cover letter text into sanitized, ranked candidate experiences
///
/// One extraction is one provider call: build the prompt, send it,
/// parse and clamp the reply, sort by score, and keep the best
/// candidate. There are no retries; a failed call produces no
/// candidates.
pub struct ExperienceExtractor<P>
where
    P: CompletionProvider,
{
    provider: Arc<P>,
    one_shot: Option<OneShotExample>,
}

impl<P> ExperienceExtractor<P>
where
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: std::fmt::Display,
{
    /// Create an extractor around a completion provider
    ///
    /// The worked example for the prompt is derived once here. If its
    /// anchors cannot be resolved the example is omitted from every
    /// prompt; extraction still works without it.
    pub fn new(provider: P) -> Self {
        let one_shot = OneShotExample::bundled();
        if one_shot.is_none() {
            warn!("Prompts will carry no worked example");
        }

        Self {
            provider: Arc::new(provider),
            one_shot,
        }
    }

    /// Extract candidates, reporting failures as typed errors
    ///
    /// Provider failures and malformed replies stay distinguishable
    /// here; [`extract`](Self::extract) is the variant that collapses
    /// them.
    pub async fn try_extract(
        &self,
        application_id: ApplicationId,
        cover_letter_text: &str,
    ) -> Result<Vec<ExperienceDraft>, ExtractionError> {
        info!("Extracting experiences for application {}", application_id);

        let mut builder = PromptBuilder::new(cover_letter_text.to_string());
        if let Some(example) = &self.one_shot {
            builder = builder.with_one_shot(example.clone());
        }
        let user_prompt = builder.build();

        let content = self.call_provider(user_prompt).await?;
        info!("Provider reply received: {} chars", content.chars().count());

        let mut drafts = parse_response(cover_letter_text, &content)?;

        drafts.sort_by(|a, b| {
            b.rank_score
                .partial_cmp(&a.rank_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        drafts.truncate(MAX_CANDIDATES);

        Ok(drafts)
    }

    /// Extract candidates, collapsing every failure to an empty list
    ///
    /// This is the only place where extraction failures turn into "no
    /// candidates"; the reason is logged before it is discarded.
    pub async fn extract(
        &self,
        application_id: ApplicationId,
        cover_letter_text: &str,
    ) -> Vec<ExperienceDraft> {
        match self.try_extract(application_id, cover_letter_text).await {
            Ok(drafts) => drafts,
            Err(e) => {
                error!(
                    "Experience extraction failed for application {}: {}",
                    application_id, e
                );
                Vec::new()
            }
        }
    }

    /// Run the synchronous provider call on the blocking pool
    async fn call_provider(&self, user_prompt: String) -> Result<String, ExtractionError> {
        let provider = Arc::clone(&self.provider);

        tokio::task::spawn_blocking(move || {
            provider
                .complete(PromptBuilder::system_prompt(), &user_prompt)
                .map_err(|e| ExtractionError::Provider(e.to_string()))
        })
        .await
        .map_err(|e| ExtractionError::Provider(format!("Task join error: {}", e)))?
    }
}
