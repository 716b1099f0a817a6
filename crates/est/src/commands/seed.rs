//! `est seed` -- load questions, rates, and historical jobs from YAML.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use estimo_core::history::{HistoricalJob, QualityFlag};
use estimo_core::idgen;
use estimo_core::question::{QuestionDefinition, ResponseKind};
use estimo_core::rate::RateTableEntry;

use crate::cli::SeedArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// A question as written in seed files: the ID is optional and derived from
/// content when absent, so re-seeding the same file never duplicates rows.
#[derive(Debug, Deserialize)]
struct SeedQuestion {
    #[serde(default)]
    id: Option<String>,
    category: String,
    #[serde(default)]
    subcategory: Option<String>,
    text: String,
    #[serde(default)]
    response_kind: ResponseKind,
    #[serde(default)]
    choices: Vec<String>,
    #[serde(default)]
    required_for_completion: bool,
    #[serde(default)]
    precondition: Option<String>,
    #[serde(default)]
    display_order: i32,
}

/// A historical job as written in seed files (optional ID, like questions).
#[derive(Debug, Deserialize)]
struct SeedJob {
    #[serde(default)]
    id: Option<String>,
    category: String,
    description: String,
    #[serde(default)]
    material_cost_cents: Option<i64>,
    #[serde(default)]
    quality: QualityFlag,
    completed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    questions: Vec<SeedQuestion>,
    #[serde(default)]
    rates: Vec<RateTableEntry>,
    #[serde(default)]
    jobs: Vec<SeedJob>,
}

/// Execute the `est seed` command.
pub fn run(ctx: &RuntimeContext, args: &SeedArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading seed file {}", args.file))?;
    let seed: SeedFile = serde_yaml::from_str(&content)
        .with_context(|| format!("parsing seed file {}", args.file))?;

    let store = ctx.open_store()?;

    for question in seed.questions {
        let id = question.id.clone().unwrap_or_else(|| {
            idgen::question_id(
                &question.category,
                question.subcategory.as_deref(),
                &question.text,
            )
        });
        let definition = QuestionDefinition {
            id,
            category: question.category,
            subcategory: question.subcategory,
            text: question.text,
            response_kind: question.response_kind,
            choices: question.choices,
            required_for_completion: question.required_for_completion,
            precondition: question.precondition,
            display_order: question.display_order,
        };
        store
            .upsert_question(&definition)
            .with_context(|| format!("seeding question '{}'", definition.text))?;
    }

    for rate in &seed.rates {
        store
            .insert_rate(rate)
            .with_context(|| format!("seeding rate for {}", rate.category))?;
    }

    for job in seed.jobs {
        let id = job
            .id
            .clone()
            .unwrap_or_else(|| idgen::job_id(&job.category, &job.description, job.completed_at));
        let record = HistoricalJob {
            id,
            category: job.category,
            description: job.description,
            material_cost_cents: job.material_cost_cents,
            quality: job.quality,
            completed_at: job.completed_at,
        };
        store
            .insert_job(&record)
            .with_context(|| format!("seeding job '{}'", record.id))?;
    }

    let questions = store.question_count()?;
    let rates = store.rate_count()?;
    let jobs = store.job_count()?;

    if ctx.json {
        output_json(&serde_json::json!({
            "questions": questions,
            "rates": rates,
            "jobs": jobs,
        }));
    } else if !ctx.quiet {
        println!("catalog now holds {questions} questions, {rates} rates, {jobs} jobs");
    }

    Ok(())
}
