//! The generative-text collaborator: narration and classification ports.
//!
//! Both are best-effort from the core's point of view. A failed narration is
//! omitted (the numeric scope is authoritative); a failed classification
//! degrades to a conservative keyword-based default upstream. Neither is ever
//! allowed to block or fail a quote.

use serde::Deserialize;
use tracing::debug;

use estimo_core::scope::{AssembledScope, Narrative};

/// Errors from the generative-text collaborator. Callers catch these locally
/// and degrade; they are never fatal to assembly.
#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("narration disabled")]
    Disabled,

    #[error("narrative service error: {0}")]
    Http(String),

    #[error("malformed narrative response: {0}")]
    Malformed(String),
}

/// Port for generating narrative documentation sections for a scope.
pub trait Narrator: Send + Sync {
    fn narrate(&self, scope: &AssembledScope) -> Result<Narrative, NarrativeError>;
}

/// Narrator that always declines. Useful default when no endpoint is
/// configured.
pub struct NoopNarrator;

impl Narrator for NoopNarrator {
    fn narrate(&self, _scope: &AssembledScope) -> Result<Narrative, NarrativeError> {
        Err(NarrativeError::Disabled)
    }
}

/// Wire shape of the narration service response.
#[derive(Debug, Deserialize)]
struct NarrativeWire {
    #[serde(default)]
    existing_conditions: String,
    #[serde(default)]
    project_description: String,
    #[serde(default)]
    steps: Vec<String>,
}

/// HTTP adapter for the narration service: POSTs a scope digest as JSON,
/// expects the three narrative sections back.
pub struct HttpNarrator {
    endpoint: String,
}

impl HttpNarrator {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Narrator for HttpNarrator {
    fn narrate(&self, scope: &AssembledScope) -> Result<Narrative, NarrativeError> {
        let payload = serde_json::json!({
            "category": scope.category,
            "subcategory": scope.subcategory,
            "summary": scope.summary,
            "details": scope.details,
            "estimated_hours": scope.estimated_hours,
            "total_cents": scope.costs.total_cents,
        });

        debug!(endpoint = %self.endpoint, "requesting narrative");
        let mut response = ureq::post(&self.endpoint)
            .send_json(&payload)
            .map_err(|e| NarrativeError::Http(e.to_string()))?;

        let wire: NarrativeWire = response
            .body_mut()
            .read_json()
            .map_err(|e| NarrativeError::Malformed(e.to_string()))?;

        Ok(Narrative {
            existing_conditions: wire.existing_conditions,
            project_description: wire.project_description,
            steps: wire.steps,
        })
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Result of classifying a free-text request into the service taxonomy.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: String,
    pub subcategory: Option<String>,
    pub confidence: f64,
    pub reasoning: String,
}

/// Port for free-text request classification (runs upstream of the
/// interview).
pub trait Classifier: Send + Sync {
    fn classify(&self, free_text: &str) -> Result<Classification, NarrativeError>;
}

/// Keyword table for the conservative fallback classifier.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("hvac", &["furnace", "boiler", "heat", "heater", "air condition", "ac ", "cooling", "thermostat", "duct"]),
    ("plumbing", &["leak", "drain", "faucet", "toilet", "pipe", "water heater", "sump", "sewer"]),
    ("electrical", &["outlet", "breaker", "panel", "wiring", "light fixture", "ceiling fan"]),
    ("roofing", &["roof", "shingle", "gutter", "flashing", "skylight"]),
    ("landscaping", &["lawn", "mow", "mulch", "tree", "hedge", "sprinkler", "sod"]),
    ("carpentry", &["deck", "fence", "stairs", "cabinet", "trim", "framing"]),
    ("cleaning", &["clean", "maid", "janitorial", "carpet"]),
];

/// Keyword-based classifier used when the generative service is unreachable.
/// Falls back to a low-confidence "handyman" classification rather than
/// guessing -- the conservative default the error model requires.
pub struct KeywordClassifier;

impl Classifier for KeywordClassifier {
    fn classify(&self, free_text: &str) -> Result<Classification, NarrativeError> {
        let lower = free_text.to_lowercase();

        let mut best: Option<(&str, usize)> = None;
        for (category, keywords) in CATEGORY_KEYWORDS {
            let hits = keywords.iter().filter(|k| lower.contains(*k)).count();
            if hits > 0 && best.is_none_or(|(_, prior)| hits > prior) {
                best = Some((category, hits));
            }
        }

        Ok(match best {
            Some((category, hits)) => Classification {
                category: category.to_owned(),
                subcategory: None,
                confidence: (0.4 + 0.15 * hits as f64).min(0.9),
                reasoning: format!("matched {hits} {category} keyword(s)"),
            },
            None => Classification {
                category: "handyman".to_owned(),
                subcategory: None,
                confidence: 0.2,
                reasoning: "no category keywords matched; conservative default".to_owned(),
            },
        })
    }
}
