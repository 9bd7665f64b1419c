//! Coarse challenge-type classification.

use std::path::Path;

use crate::config::GeminiConfig;
use crate::error::TriageError;
use crate::genai::schema::response_schema_for;
use crate::genai::wire::{GenerateContentResponse, GenerationConfig, Part};
use crate::model::ResponseMode;
use crate::prompts::{CLASSIFIER_INSTRUCTIONS, CLASSIFIER_USER_PROMPT};
use crate::reasoner::{Reasoner, ReasonerCore};
use crate::retry::RetryPolicy;
use crate::types::{ChallengeType, InvokeOptions};

/// Labels a challenge screenshot with one of the four `ChallengeType` values.
///
/// Structured-output models are constrained to the enum literals directly;
/// the fixed legacy set is steered through the system instruction and must
/// answer with the bare literal.
pub struct ChallengeClassifier {
    core: ReasonerCore,
    retry: RetryPolicy,
}

impl ChallengeClassifier {
    pub fn new(config: GeminiConfig) -> Result<Self, TriageError> {
        Self::new_with_retry(config, RetryPolicy::default())
    }

    pub fn new_with_retry(config: GeminiConfig, retry: RetryPolicy) -> Result<Self, TriageError> {
        Ok(Self {
            core: ReasonerCore::new(config)?,
            retry,
        })
    }

    /// Upload the screenshot, ask the model for a label, parse the reply.
    /// The whole sequence retries as one unit; the model is resolved up front
    /// so a missing model fails before any network traffic.
    pub async fn classify(
        &self,
        screenshot: impl AsRef<Path>,
        opts: Option<InvokeOptions>,
    ) -> Result<ChallengeType, TriageError> {
        let screenshot = screenshot.as_ref();
        let model = self.core.resolve_model(opts.as_ref())?;
        let mode = ResponseMode::for_model(&model);
        let core = &self.core;
        let model = &model;

        self.retry
            .run_logged("challenge classification", || async move {
                let uploaded = core.client().upload_file(screenshot).await?;
                let response = match mode {
                    ResponseMode::PlainText => {
                        core.client()
                            .generate_content(
                                model,
                                vec![Part::from_uri(uploaded.uri, uploaded.mime_type)],
                                Some(CLASSIFIER_INSTRUCTIONS),
                                GenerationConfig::plain_text(),
                            )
                            .await?
                    }
                    ResponseMode::Structured => {
                        let schema = response_schema_for::<ChallengeType>();
                        core.client()
                            .generate_content(
                                model,
                                vec![
                                    Part::from_uri(uploaded.uri, uploaded.mime_type),
                                    Part::from_text(CLASSIFIER_USER_PROMPT),
                                ],
                                None,
                                GenerationConfig::enum_constrained(schema),
                            )
                            .await?
                    }
                };
                core.record_response(response.clone()).await;

                let text = response.text().ok_or_else(|| {
                    TriageError::InvalidResponse("classifier reply carried no text".to_string())
                })?;
                text.parse::<ChallengeType>()
                    .map_err(TriageError::InvalidResponse)
            })
            .await
    }
}

impl Reasoner for ChallengeClassifier {
    type Output = ChallengeType;

    fn model_id(&self) -> Option<&str> {
        self.core.model_id()
    }

    async fn last_response(&self) -> Option<GenerateContentResponse> {
        self.core.last_response().await
    }

    async fn invoke(
        &self,
        screenshot: &Path,
        opts: Option<InvokeOptions>,
    ) -> Result<ChallengeType, TriageError> {
        self.classify(screenshot, opts).await
    }
}
