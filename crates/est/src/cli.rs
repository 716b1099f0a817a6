//! Clap CLI definitions for the `est` command.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// est -- service estimation backend.
///
/// Runs the adaptive interview and assembles priced scopes of work from a
/// curated catalog of questions, rates, and historical jobs.
#[derive(Parser, Debug)]
#[command(
    name = "est",
    about = "Service estimation backend",
    long_about = "Runs the adaptive interview and assembles priced scopes of work \
                  from a curated catalog of questions, rates, and historical jobs.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Catalog database path (default: ./estimo.db).
    #[arg(long, global = true, env = "ESTIMO_DB")]
    pub db: Option<String>,

    /// Configuration file path (default: ./estimo.yaml if present).
    #[arg(long, global = true, env = "ESTIMO_CONFIG")]
    pub config: Option<String>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the catalog database (and optionally a starter config).
    Init(InitArgs),

    /// Load questions, rates, and historical jobs from a YAML seed file.
    Seed(SeedArgs),

    /// Show the next interview question for a session.
    Next(NextArgs),

    /// Assemble a priced scope of work from interview answers.
    Quote(QuoteArgs),

    /// Classify a free-text request into the service taxonomy (keyword
    /// fallback; the generative classifier runs upstream in production).
    Classify(ClassifyArgs),

    /// Generate shell completions.
    Completion(CompletionArgs),

    /// Print version and platform info.
    Version,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Also write a starter estimo.yaml with the default configuration.
    #[arg(long)]
    pub write_config: bool,
}

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Path to the YAML seed file.
    pub file: String,
}

#[derive(Args, Debug)]
pub struct NextArgs {
    /// Service category (e.g. "hvac").
    #[arg(long)]
    pub category: String,

    /// Requested subcategory (e.g. "furnace repair").
    #[arg(long)]
    pub subcategory: Option<String>,

    /// Path to a JSON file of answers so far: {"<question-id>": "<value>", ...}.
    /// Values may also be objects {"value": ..., "phase": ...}.
    #[arg(long)]
    pub answers: Option<String>,
}

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Service category (e.g. "hvac").
    #[arg(long)]
    pub category: String,

    /// Subcategory (use the resolved subcategory if the interview reported one).
    #[arg(long)]
    pub subcategory: Option<String>,

    /// Path to a JSON file of interview answers.
    #[arg(long)]
    pub answers: Option<String>,

    /// The original free-text request.
    #[arg(long, default_value = "")]
    pub text: String,

    /// Material-formula spec files (.formula.toml / .formula.json) to consider.
    #[arg(long = "formulas")]
    pub formulas: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// The free-text request to classify.
    #[arg(long)]
    pub text: String,
}

#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}
