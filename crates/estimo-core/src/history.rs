//! Historical jobs -- the read-only corpus used for cost blending.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::money::Cents;

/// Curation quality of a historical job record.
///
/// Serialized as `"curated"`, `"rated:1"`..`"rated:5"`, or `"unrated"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityFlag {
    /// Hand-reviewed by an estimator.
    Curated,
    /// Customer-rated 1-5.
    Rated(u8),
    /// Imported with no review signal.
    Unrated,
}

impl QualityFlag {
    /// Ranking weight for relevance tiebreaks: curated beats any rating,
    /// ratings beat unrated.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Curated => 10,
            Self::Rated(stars) => *stars,
            Self::Unrated => 0,
        }
    }
}

impl Default for QualityFlag {
    fn default() -> Self {
        Self::Unrated
    }
}

impl fmt::Display for QualityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Curated => f.write_str("curated"),
            Self::Rated(stars) => write!(f, "rated:{stars}"),
            Self::Unrated => f.write_str("unrated"),
        }
    }
}

impl From<&str> for QualityFlag {
    fn from(s: &str) -> Self {
        match s {
            "curated" => Self::Curated,
            "unrated" => Self::Unrated,
            other => match other.strip_prefix("rated:").and_then(|n| n.parse::<u8>().ok()) {
                Some(stars) if (1..=5).contains(&stars) => Self::Rated(stars),
                _ => Self::Unrated,
            },
        }
    }
}

impl Serialize for QualityFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for QualityFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// One completed job from the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalJob {
    /// Stable identifier (e.g. `job-8fq21p`).
    pub id: String,

    pub category: String,

    /// Free-text description of the work as recorded at close-out.
    pub description: String,

    /// Final material cost in cents, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_cost_cents: Option<Cents>,

    #[serde(default)]
    pub quality: QualityFlag,

    /// Close-out time; newer jobs win relevance tiebreaks.
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quality_round_trips() {
        for q in [QualityFlag::Curated, QualityFlag::Rated(4), QualityFlag::Unrated] {
            let json = serde_json::to_string(&q).unwrap();
            let back: QualityFlag = serde_json::from_str(&json).unwrap();
            assert_eq!(back, q);
        }
    }

    #[test]
    fn out_of_range_rating_degrades_to_unrated() {
        assert_eq!(QualityFlag::from("rated:9"), QualityFlag::Unrated);
        assert_eq!(QualityFlag::from("rated:0"), QualityFlag::Unrated);
        assert_eq!(QualityFlag::from("gibberish"), QualityFlag::Unrated);
    }

    #[test]
    fn rank_orders_curated_first() {
        assert!(QualityFlag::Curated.rank() > QualityFlag::Rated(5).rank());
        assert!(QualityFlag::Rated(1).rank() > QualityFlag::Unrated.rank());
    }
}
