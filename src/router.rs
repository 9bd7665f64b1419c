//! Structured challenge routing.

use std::path::Path;

use crate::config::GeminiConfig;
use crate::error::TriageError;
use crate::genai::schema::response_schema_for;
use crate::genai::wire::{GenerateContentResponse, GenerationConfig, Part};
use crate::prompts::CLASSIFIER_USER_PROMPT;
use crate::reasoner::{Reasoner, ReasonerCore};
use crate::retry::RetryPolicy;
use crate::shared::extract_first_json_block;
use crate::types::{InvokeOptions, RouterResult};

/// Resolves a challenge screenshot into a `RouterResult` for the solver
/// pipeline. Always requests JSON-schema output, whatever the model.
pub struct ChallengeRouter {
    core: ReasonerCore,
    retry: RetryPolicy,
}

impl ChallengeRouter {
    pub fn new(config: GeminiConfig) -> Result<Self, TriageError> {
        Self::new_with_retry(config, RetryPolicy::default())
    }

    pub fn new_with_retry(config: GeminiConfig, retry: RetryPolicy) -> Result<Self, TriageError> {
        Ok(Self {
            core: ReasonerCore::new(config)?,
            retry,
        })
    }

    pub async fn route(
        &self,
        screenshot: impl AsRef<Path>,
        opts: Option<InvokeOptions>,
    ) -> Result<RouterResult, TriageError> {
        let screenshot = screenshot.as_ref();
        let model = self.core.resolve_model(opts.as_ref())?;
        let core = &self.core;
        let model = &model;

        self.retry
            .run_logged("challenge routing", || async move {
                let uploaded = core.client().upload_file(screenshot).await?;
                let schema = response_schema_for::<RouterResult>();
                let response = core
                    .client()
                    .generate_content(
                        model,
                        vec![
                            Part::from_uri(uploaded.uri, uploaded.mime_type),
                            Part::from_text(CLASSIFIER_USER_PROMPT),
                        ],
                        None,
                        GenerationConfig::json_constrained(schema),
                    )
                    .await?;
                core.record_response(response.clone()).await;

                let text = response.text().ok_or_else(|| {
                    TriageError::InvalidResponse("router reply carried no text".to_string())
                })?;
                parse_router_reply(&text)
            })
            .await
    }
}

impl Reasoner for ChallengeRouter {
    type Output = RouterResult;

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
    ) -> Result<RouterResult, TriageError> {
        self.route(screenshot, opts).await
    }
}

/// Two parse tiers: a reply that honored JSON mode deserializes as a whole
/// document (serde re-validates names and types); anything else is mined for
/// its first JSON object.
fn parse_router_reply(text: &str) -> Result<RouterResult, TriageError> {
    if let Ok(result) = serde_json::from_str::<RouterResult>(text) {
        return Ok(result);
    }

    let value = extract_first_json_block(text).ok_or_else(|| {
        TriageError::InvalidResponse("router reply text contains no JSON object".to_string())
    })?;
    serde_json::from_value(value).map_err(|error| {
        TriageError::InvalidResponse(format!(
            "router reply does not match the result contract: {error}"
        ))
    })
}
