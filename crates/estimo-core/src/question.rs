//! Question definitions -- the curated interview library.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// How a question expects to be answered.
///
/// Serialized as a snake_case string. Unknown strings round-trip through the
/// `Custom` variant so curated data from newer deployments is never rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseKind {
    /// Free-form text.
    FreeText,
    /// One of the listed choices.
    Choice,
    /// A numeric value (possibly with a unit, e.g. "120 sq ft").
    Number,
    /// Yes / no.
    YesNo,
    /// Forward-compatible catch-all.
    Custom(String),
}

impl ResponseKind {
    /// Returns the string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::FreeText => "free_text",
            Self::Choice => "choice",
            Self::Number => "number",
            Self::YesNo => "yes_no",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl Default for ResponseKind {
    fn default() -> Self {
        Self::FreeText
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ResponseKind {
    fn from(s: &str) -> Self {
        match s {
            "free_text" => Self::FreeText,
            "choice" => Self::Choice,
            "number" => Self::Number,
            "yes_no" => Self::YesNo,
            other => Self::Custom(other.to_owned()),
        }
    }
}

impl Serialize for ResponseKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResponseKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// A single curated interview question.
///
/// Definitions are immutable at runtime; curation happens through the seed /
/// admin paths. Identity (`id`) is the sole key for answer bookkeeping -- the
/// question text is only ever snapshotted alongside answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDefinition {
    /// Stable identifier (e.g. `q-1k9x2a`).
    pub id: String,

    /// Service category this question belongs to (e.g. "hvac").
    pub category: String,

    /// Subcategory scope. `None` means the question applies to the whole
    /// category regardless of subcategory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// The question text shown to the requester.
    pub text: String,

    /// Expected answer shape.
    #[serde(default)]
    pub response_kind: ResponseKind,

    /// Choices for `ResponseKind::Choice` questions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,

    /// Whether this question must be answered before the interview is
    /// considered complete.
    #[serde(default)]
    pub required_for_completion: bool,

    /// Gating precondition over prior answers (see `estimo-flow`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precondition: Option<String>,

    /// Sort key within a tier; lower asks first.
    #[serde(default)]
    pub display_order: i32,
}
