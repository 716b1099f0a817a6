//! Answers and the per-session answer sheet.
//!
//! The wire shape for an answer is duck-typed: clients historically sent
//! either a bare string or an object `{value, phase}`. Both deserialize into
//! the single tagged [`Answer`] here, exactly once at the boundary -- the rest
//! of the core never sees the wire shape.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Optional metadata carried alongside an answer value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerMetadata {
    /// Which interview phase produced the answer (legacy clients only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
}

/// A normalized answer: the recorded value plus optional metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub value: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AnswerMetadata>,
}

impl Answer {
    /// Creates an answer from a plain value with no metadata.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            metadata: None,
        }
    }
}

impl<'de> Deserialize<'de> for Answer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AnswerVisitor;

        impl<'de> Visitor<'de> for AnswerVisitor {
            type Value = Answer;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or an object with a `value` field")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Answer, E> {
                Ok(Answer::new(v))
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Answer, M::Error> {
                let mut value: Option<String> = None;
                let mut phase: Option<String> = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "value" => value = Some(map.next_value()?),
                        "phase" => phase = map.next_value()?,
                        // Unknown keys from legacy clients are ignored.
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }
                let value = value.ok_or_else(|| de::Error::missing_field("value"))?;
                let metadata = phase.map(|p| AnswerMetadata { phase: Some(p) });
                Ok(Answer { value, metadata })
            }
        }

        deserializer.deserialize_any(AnswerVisitor)
    }
}

/// One recorded answer: the question text as it read at answer time, plus the
/// normalized answer itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Snapshot of the question text when answered. Display only -- identity
    /// lives in the sheet key.
    pub question_text: String,

    pub answer: Answer,
}

/// All answers for one interview session, keyed by question identity.
///
/// A `BTreeMap` keeps iteration deterministic, which keeps detail extraction
/// and quantity extraction deterministic downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSheet {
    records: BTreeMap<String, AnswerRecord>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer for a question. A re-answer replaces the prior value.
    pub fn record(
        &mut self,
        question_id: impl Into<String>,
        question_text: impl Into<String>,
        answer: Answer,
    ) {
        self.records.insert(
            question_id.into(),
            AnswerRecord {
                question_text: question_text.into(),
                answer,
            },
        );
    }

    /// Whether the question identity has a recorded answer.
    pub fn is_answered(&self, question_id: &str) -> bool {
        self.records.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates `(question_id, record)` in deterministic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerRecord)> {
        self.records.iter()
    }

    /// Iterates recorded answer values in deterministic key order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.records.values().map(|r| r.answer.value.as_str())
    }

    /// Case-insensitive substring test over every recorded value.
    ///
    /// This is the semantics behind `answer_contains('...')` preconditions.
    pub fn any_value_contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.records
            .values()
            .any(|r| r.answer.value.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_string_normalizes() {
        let a: Answer = serde_json::from_str("\"in the basement\"").unwrap();
        assert_eq!(a.value, "in the basement");
        assert!(a.metadata.is_none());
    }

    #[test]
    fn object_shape_normalizes() {
        let a: Answer = serde_json::from_str(r#"{"value": "yes", "phase": "followup"}"#).unwrap();
        assert_eq!(a.value, "yes");
        assert_eq!(a.metadata.unwrap().phase.as_deref(), Some("followup"));
    }

    #[test]
    fn object_without_value_is_rejected() {
        let result = serde_json::from_str::<Answer>(r#"{"phase": "initial"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_object_keys_are_ignored() {
        let a: Answer = serde_json::from_str(r#"{"value": "no", "source": "web"}"#).unwrap();
        assert_eq!(a.value, "no");
        assert!(a.metadata.is_none());
    }

    #[test]
    fn contains_is_case_insensitive() {
        let mut sheet = AnswerSheet::new();
        sheet.record("q-1", "Where is it?", Answer::new("The Basement, near the stairs"));
        assert!(sheet.any_value_contains("basement"));
        assert!(sheet.any_value_contains("BASEMENT"));
        assert!(!sheet.any_value_contains("attic"));
    }

    #[test]
    fn reanswer_replaces() {
        let mut sheet = AnswerSheet::new();
        sheet.record("q-1", "How many?", Answer::new("2"));
        sheet.record("q-1", "How many?", Answer::new("3"));
        assert_eq!(sheet.len(), 1);
        assert!(sheet.any_value_contains("3"));
        assert!(!sheet.any_value_contains("2"));
    }
}
