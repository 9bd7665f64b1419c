//! Fast-shot model catalog and response-mode dispatch.

pub const DEFAULT_FAST_SHOT_MODEL: &str = "gemini-2.0-flash";

/// Known fast-shot model ids. Advisory only: unrecognized ids are rejected by
/// the service, not by this crate.
pub const FAST_SHOT_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite",
    "gemini-2.0-flash-thinking-exp-01-21",
    "gemini-2.5-flash",
];

/// Models that cannot honor a response schema and must be steered through the
/// system instruction instead.
const LEGACY_TEXT_MODELS: &[&str] = &["gemini-2.0-flash-thinking-exp-01-21"];

/// How the reply of a generation request is constrained and parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Output constrained by a native enum or JSON schema.
    Structured,
    /// Free text, steered only by the system instruction.
    PlainText,
}

impl ResponseMode {
    pub fn for_model(model: &str) -> Self {
        if LEGACY_TEXT_MODELS.contains(&model.trim()) {
            ResponseMode::PlainText
        } else {
            ResponseMode::Structured
        }
    }
}
