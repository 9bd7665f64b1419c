//! Shared base state and the seam trait for the Gemini-backed reasoners.

use std::path::Path;

use tokio::sync::RwLock;

use crate::config::GeminiConfig;
use crate::error::TriageError;
use crate::genai::wire::GenerateContentResponse;
use crate::genai::GeminiClient;
use crate::types::InvokeOptions;

/// Core trait for screenshot reasoners.
/// Implemented by `ChallengeClassifier` and `ChallengeRouter`.
#[allow(async_fn_in_trait)]
pub trait Reasoner: Send + Sync {
    type Output;

    /// Instance-default model id, when one is configured.
    fn model_id(&self) -> Option<&str>;

    /// Raw reply of the most recent remote call, kept for diagnostics.
    /// Overwritten on every attempt; concurrent calls on one instance see
    /// whichever reply landed last.
    async fn last_response(&self) -> Option<GenerateContentResponse>;

    async fn invoke(
        &self,
        screenshot: &Path,
        opts: Option<InvokeOptions>,
    ) -> Result<Self::Output, TriageError>;
}

#[derive(Debug)]
pub(crate) struct ReasonerCore {
    model: Option<String>,
    client: GeminiClient,
    last_response: RwLock<Option<GenerateContentResponse>>,
}

impl ReasonerCore {
    pub(crate) fn new(config: GeminiConfig) -> Result<Self, TriageError> {
        let api_key = config.effective_api_key().ok_or_else(|| {
            TriageError::Config(
                "api key required (set GeminiConfig.api_key or GEMINI_API_KEY)".to_string(),
            )
        })?;

        let model = config
            .model
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(Self {
            model,
            client: GeminiClient::new(api_key, config.base_url.clone(), config.timeout_ms)?,
            last_response: RwLock::new(None),
        })
    }

    pub(crate) fn model_id(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub(crate) fn client(&self) -> &GeminiClient {
        &self.client
    }

    /// Effective model for one invocation: per-call override first, instance
    /// default second, configuration error when neither exists.
    pub(crate) fn resolve_model(
        &self,
        opts: Option<&InvokeOptions>,
    ) -> Result<String, TriageError> {
        let override_model = opts
            .and_then(|options| options.model.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        override_model
            .map(str::to_string)
            .or_else(|| self.model.clone())
            .ok_or_else(|| {
                TriageError::Config(
                    "model must be provided at construction or via InvokeOptions".to_string(),
                )
            })
    }

    pub(crate) async fn record_response(&self, response: GenerateContentResponse) {
        *self.last_response.write().await = Some(response);
    }

    pub(crate) async fn last_response(&self) -> Option<GenerateContentResponse> {
        self.last_response.read().await.clone()
    }
}
