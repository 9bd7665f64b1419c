//! Serde types for the Gemini REST surface.

use serde::{Deserialize, Serialize};

pub const RESPONSE_MIME_ENUM: &str = "text/x.enum";
pub const RESPONSE_MIME_JSON: &str = "application/json";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    pub parts: Vec<Part>,
}

impl Content {
    pub(crate) fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user"),
            parts,
        }
    }

    pub(crate) fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part::from_text(text)],
        }
    }
}

/// One content part: either plain text or a reference to an uploaded file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
}

impl Part {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            file_data: None,
        }
    }

    pub fn from_uri(file_uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            text: None,
            file_data: Some(FileData {
                file_uri: file_uri.into(),
                mime_type: mime_type.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub file_uri: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationConfig {
    /// Deterministic free text, used by legacy models.
    pub fn plain_text() -> Self {
        Self {
            temperature: 0.0,
            response_mime_type: None,
            response_schema: None,
        }
    }

    /// Deterministic reply constrained to one enum literal.
    pub fn enum_constrained(schema: serde_json::Value) -> Self {
        Self {
            temperature: 0.0,
            response_mime_type: Some(RESPONSE_MIME_ENUM),
            response_schema: Some(schema),
        }
    }

    /// Deterministic reply constrained to a JSON document.
    pub fn json_constrained(schema: serde_json::Value) -> Self {
        Self {
            temperature: 0.0,
            response_mime_type: Some(RESPONSE_MIME_JSON),
            response_schema: Some(schema),
        }
    }
}

/// Handle returned by the media upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    #[serde(default)]
    pub name: Option<String>,
    pub uri: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FileUploadResponse {
    pub file: UploadedFile,
}

/// Decoded `generateContent` reply. Also the diagnostic payload kept in the
/// reasoner's last-response slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts, or `None` when the
    /// reply carries no text at all.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let mut out = String::new();
        for part in &content.parts {
            if let Some(text) = part.text.as_deref() {
                out.push_str(text);
            }
        }
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }
}
