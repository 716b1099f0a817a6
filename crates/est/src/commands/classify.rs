//! `est classify` -- keyword-fallback classification of a free-text request.

use anyhow::Result;

use estimo_quote::{Classifier, KeywordClassifier};

use crate::cli::ClassifyArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `est classify` command.
pub fn run(ctx: &RuntimeContext, args: &ClassifyArgs) -> Result<()> {
    let classification = KeywordClassifier.classify(&args.text)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "category": classification.category,
            "subcategory": classification.subcategory,
            "confidence": classification.confidence,
            "reasoning": classification.reasoning,
        }));
    } else {
        println!(
            "{} (confidence {:.2}): {}",
            classification.category, classification.confidence, classification.reasoning
        );
    }

    Ok(())
}
