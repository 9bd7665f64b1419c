//! Challenge triage over Gemini multimodal models.
//!
//! Two reasoners share one base: [`ChallengeClassifier`] labels a challenge
//! screenshot with a coarse [`ChallengeType`], and [`ChallengeRouter`]
//! resolves the same screenshot into a richer [`RouterResult`] for the solver
//! pipeline. Both upload the screenshot, send one zero-temperature
//! `generateContent` request, parse the constrained reply, and retry
//! transient failures with a fixed wait.
//!
//! # Architecture
//!
//! - `config`: connection settings, env overrides, redacted view
//! - `genai`: the Gemini REST client (media upload + `generateContent`)
//! - `model`: fast-shot model catalog and response-mode dispatch
//! - `reasoner`: shared base state and the `Reasoner` seam
//! - `classifier` / `router`: the two public entry points
//! - `retry`: fixed-wait retry policy
//! - `types` / `shared` / `error`: results, reply-text helpers, error taxonomy

pub mod classifier;
pub mod config;
pub mod error;
pub mod genai;
pub mod model;
pub mod reasoner;
pub mod retry;
pub mod router;
pub mod shared;
pub mod types;

mod prompts;

pub use classifier::ChallengeClassifier;
pub use config::{GeminiConfig, GeminiConfigView};
pub use error::TriageError;
pub use genai::wire::{GenerateContentResponse, UploadedFile};
pub use model::{ResponseMode, DEFAULT_FAST_SHOT_MODEL, FAST_SHOT_MODELS};
pub use reasoner::Reasoner;
pub use retry::RetryPolicy;
pub use router::ChallengeRouter;
pub use types::{ChallengeType, InvokeOptions, RouterResult};

#[cfg(test)]
mod testing;

#[cfg(test)]
mod tests;
