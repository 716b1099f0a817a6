//! Seed-time validation rules for curated corpus entries.

use crate::history::{HistoricalJob, QualityFlag};
use crate::question::{QuestionDefinition, ResponseKind};
use crate::rate::RateTableEntry;

/// Error type for validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("question text is required")]
    QuestionTextRequired,

    #[error("category is required")]
    CategoryRequired,

    #[error("display_order cannot be negative (got {0})")]
    NegativeDisplayOrder(i32),

    #[error("choice questions must list at least two choices")]
    ChoicesRequired,

    #[error("choices are only valid on choice questions")]
    ChoicesNotAllowed,

    #[error("labor hours per unit cannot be negative")]
    NegativeLaborRate,

    #[error("material cost per unit cannot be negative")]
    NegativeMaterialCost,

    #[error("rate entry must price labor, materials, or both")]
    EmptyRateEntry,

    #[error("material cost cannot be negative")]
    NegativeJobCost,

    #[error("rating must be between 1 and 5 (got {0})")]
    InvalidRating(u8),
}

/// Validates a question definition before it enters the catalog.
pub fn validate_question(def: &QuestionDefinition) -> Result<(), ValidationError> {
    if def.category.trim().is_empty() {
        return Err(ValidationError::CategoryRequired);
    }
    if def.text.trim().is_empty() {
        return Err(ValidationError::QuestionTextRequired);
    }
    if def.display_order < 0 {
        return Err(ValidationError::NegativeDisplayOrder(def.display_order));
    }
    // Choices and kind must agree.
    match def.response_kind {
        ResponseKind::Choice => {
            if def.choices.len() < 2 {
                return Err(ValidationError::ChoicesRequired);
            }
        }
        _ => {
            if !def.choices.is_empty() {
                return Err(ValidationError::ChoicesNotAllowed);
            }
        }
    }
    Ok(())
}

/// Validates a rate-table entry before it enters the catalog.
pub fn validate_rate(entry: &RateTableEntry) -> Result<(), ValidationError> {
    if entry.category.trim().is_empty() {
        return Err(ValidationError::CategoryRequired);
    }
    if let Some(hours) = entry.labor_hours_per_unit {
        if hours < 0.0 {
            return Err(ValidationError::NegativeLaborRate);
        }
    }
    if let Some(cost) = entry.material_cost_per_unit {
        if cost < 0 {
            return Err(ValidationError::NegativeMaterialCost);
        }
    }
    if entry.labor_hours_per_unit.is_none() && entry.material_cost_per_unit.is_none() {
        return Err(ValidationError::EmptyRateEntry);
    }
    Ok(())
}

/// Validates a historical job before it enters the corpus.
pub fn validate_job(job: &HistoricalJob) -> Result<(), ValidationError> {
    if job.category.trim().is_empty() {
        return Err(ValidationError::CategoryRequired);
    }
    if let Some(cost) = job.material_cost_cents {
        if cost < 0 {
            return Err(ValidationError::NegativeJobCost);
        }
    }
    if let QualityFlag::Rated(stars) = job.quality {
        if !(1..=5).contains(&stars) {
            return Err(ValidationError::InvalidRating(stars));
        }
    }
    Ok(())
}
