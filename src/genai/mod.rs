//! Minimal Gemini REST client: media upload plus `generateContent`.

pub(crate) mod schema;
pub mod wire;

use std::path::Path;
use std::time::Duration;

use crate::error::TriageError;
use wire::{
    Content, FileUploadResponse, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, Part, UploadedFile,
};

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug)]
pub(crate) struct GeminiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    timeout_ms: u64,
}

impl GeminiClient {
    pub(crate) fn new(
        api_key: String,
        base_url: Option<String>,
        timeout_ms: u64,
    ) -> Result<Self, TriageError> {
        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(TriageError::Config("api key cannot be empty".to_string()));
        }
        if timeout_ms == 0 {
            return Err(TriageError::Config(
                "timeout must be greater than 0".to_string(),
            ));
        }

        let base_url = base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_GEMINI_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            base_url,
            client: reqwest::Client::builder()
                .timeout(Duration::from_millis(timeout_ms))
                .build()
                .map_err(|error| TriageError::Config(error.to_string()))?,
            timeout_ms,
        })
    }

    /// Single-shot raw upload of one screenshot. Returns the opaque file
    /// handle (URI + MIME type) the generation request references.
    pub(crate) async fn upload_file(&self, path: &Path) -> Result<UploadedFile, TriageError> {
        let bytes = tokio::fs::read(path).await.map_err(|error| {
            TriageError::Request(format!(
                "could not read screenshot {}: {error}",
                path.display()
            ))
        })?;
        let mime_type = mime_for_path(path);

        let endpoint = format!("{}/upload/v1beta/files", self.base_url);
        let response = self
            .client
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .header("X-Goog-Upload-Protocol", "raw")
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await
            .map_err(|error| self.transport_error("file upload", error))?;

        let status = response.status();
        let payload: serde_json::Value = response.json().await.map_err(|error| {
            TriageError::InvalidResponse(format!("failed to parse upload response JSON: {error}"))
        })?;
        self.check_status(status, &payload)?;

        let decoded: FileUploadResponse = serde_json::from_value(payload).map_err(|error| {
            TriageError::InvalidResponse(format!("upload response missing file handle: {error}"))
        })?;
        tracing::debug!(
            "uploaded {} as {} ({})",
            path.display(),
            decoded.file.uri,
            decoded.file.mime_type
        );
        Ok(decoded.file)
    }

    /// One `generateContent` round trip against `model`.
    pub(crate) async fn generate_content(
        &self,
        model: &str,
        parts: Vec<Part>,
        system_instruction: Option<&str>,
        generation_config: GenerationConfig,
    ) -> Result<GenerateContentResponse, TriageError> {
        let endpoint = format!(
            "{}/v1beta/{}:generateContent",
            self.base_url,
            model_resource(model)
        );
        let body = GenerateContentRequest {
            contents: vec![Content::user(parts)],
            system_instruction: system_instruction.map(Content::system),
            generation_config,
        };

        let response = self
            .client
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|error| self.transport_error("generation", error))?;

        let status = response.status();
        let payload: serde_json::Value = response.json().await.map_err(|error| {
            TriageError::InvalidResponse(format!(
                "failed to parse generateContent response JSON: {error}"
            ))
        })?;
        self.check_status(status, &payload)?;

        tracing::debug!("generateContent ok: model={model}, status={status}");
        serde_json::from_value(payload).map_err(|error| {
            TriageError::InvalidResponse(format!("malformed generateContent response: {error}"))
        })
    }

    fn transport_error(&self, operation: &str, error: reqwest::Error) -> TriageError {
        if error.is_connect() {
            return TriageError::Request(format!(
                "could not reach Gemini {operation} endpoint at {}: {}",
                self.base_url,
                error.without_url()
            ));
        }
        if error.is_timeout() {
            return TriageError::Timeout(format!(
                "Gemini {operation} request timed out after {} ms",
                self.timeout_ms
            ));
        }
        error.into()
    }

    fn check_status(
        &self,
        status: reqwest::StatusCode,
        payload: &serde_json::Value,
    ) -> Result<(), TriageError> {
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(TriageError::Auth(
                "Gemini authentication failed. Check GeminiConfig.api_key or GEMINI_API_KEY"
                    .to_string(),
            ));
        }
        if !status.is_success() {
            return Err(TriageError::Request(format!(
                "Gemini API returned {status}: {payload}"
            )));
        }
        Ok(())
    }
}

fn model_resource(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}
