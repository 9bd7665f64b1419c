//! Typed results shared by the classifier and the router.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The four challenge archetypes a screenshot can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeType {
    ImageLabelSingleSelect,
    ImageLabelMultiSelect,
    ImageDragSingle,
    ImageDragMulti,
}

impl ChallengeType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ChallengeType::ImageLabelSingleSelect => "image_label_single_select",
            ChallengeType::ImageLabelMultiSelect => "image_label_multi_select",
            ChallengeType::ImageDragSingle => "image_drag_single",
            ChallengeType::ImageDragMulti => "image_drag_multi",
        }
    }

    pub const fn all() -> &'static [ChallengeType] {
        &[
            ChallengeType::ImageLabelSingleSelect,
            ChallengeType::ImageLabelMultiSelect,
            ChallengeType::ImageDragSingle,
            ChallengeType::ImageDragMulti,
        ]
    }
}

impl fmt::Display for ChallengeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChallengeType {
    type Err = String;

    // Exact match on the wire literal. Model replies that carry extra
    // whitespace or wrapping do not count as a classification.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image_label_single_select" => Ok(ChallengeType::ImageLabelSingleSelect),
            "image_label_multi_select" => Ok(ChallengeType::ImageLabelMultiSelect),
            "image_drag_single" => Ok(ChallengeType::ImageDragSingle),
            "image_drag_multi" => Ok(ChallengeType::ImageDragMulti),
            _ => Err(format!("unknown challenge type: {s}")),
        }
    }
}

/// Routing verdict for one challenge screenshot. Field names are part of the
/// wire contract with the solver pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RouterResult {
    pub challenge_prompt: String,
    pub challenge_type: ChallengeType,
}

/// Per-call overrides accepted by `classify` and `route`.
#[derive(Debug, Clone, Default)]
pub struct InvokeOptions {
    pub model: Option<String>,
}
