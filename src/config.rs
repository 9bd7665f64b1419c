//! Gemini access configuration.

use serde::{Deserialize, Serialize};

use crate::error::TriageError;
use crate::model::DEFAULT_FAST_SHOT_MODEL;

/// Connection settings for the Gemini-backed reasoners.
///
/// Deliberately not `Serialize`: the api key must never leave this layer
/// through a config dump. `to_view` is the loggable projection.
#[derive(Clone, Deserialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfigView {
    pub api_key_configured: bool,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_ms: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key_configured", &self.effective_api_key().is_some())
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn apply_env_overrides(&mut self) {
        if self.api_key.as_deref().unwrap_or("").trim().is_empty() {
            if let Ok(value) = std::env::var("GEMINI_API_KEY") {
                if !value.trim().is_empty() {
                    self.api_key = Some(value);
                }
            } else if let Ok(value) = std::env::var("GOOGLE_API_KEY") {
                if !value.trim().is_empty() {
                    self.api_key = Some(value);
                }
            }
        }

        if let Ok(model_override) = std::env::var("CHALLENGE_TRIAGE_MODEL") {
            if !model_override.trim().is_empty() {
                self.model = Some(model_override.trim().to_string());
            }
        }
    }

    pub fn effective_api_key(&self) -> Option<String> {
        let from_config = self.api_key.as_deref().unwrap_or("").trim();
        if !from_config.is_empty() {
            return Some(from_config.to_string());
        }
        if let Ok(value) = std::env::var("GEMINI_API_KEY") {
            if !value.trim().is_empty() {
                return Some(value.trim().to_string());
            }
        }
        if let Ok(value) = std::env::var("GOOGLE_API_KEY") {
            if !value.trim().is_empty() {
                return Some(value.trim().to_string());
            }
        }
        None
    }

    pub fn validate(&self) -> Result<(), TriageError> {
        if self.effective_api_key().is_none() {
            return Err(TriageError::Config(
                "api key required (set GeminiConfig.api_key or GEMINI_API_KEY)".to_string(),
            ));
        }
        if let Some(model) = self.model.as_deref() {
            if model.trim().is_empty() {
                return Err(TriageError::Config(
                    "model cannot be blank; omit it to rely on per-call overrides".to_string(),
                ));
            }
        }
        if self.timeout_ms == 0 {
            return Err(TriageError::Config(
                "timeout must be greater than 0".to_string(),
            ));
        }
        if let Some(base_url) = self.base_url.as_deref() {
            reqwest::Url::parse(base_url.trim()).map_err(|error| {
                TriageError::Config(format!("invalid base_url '{base_url}': {error}"))
            })?;
        }
        Ok(())
    }

    pub fn to_view(&self) -> GeminiConfigView {
        GeminiConfigView {
            api_key_configured: self.effective_api_key().is_some(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

fn default_model() -> Option<String> {
    Some(DEFAULT_FAST_SHOT_MODEL.to_string())
}

fn default_timeout_ms() -> u64 {
    30_000
}
