//! Output formatting helpers for the `est` CLI.

use owo_colors::OwoColorize;
use serde::Serialize;

use estimo_core::money::format_cents;
use estimo_core::question::QuestionDefinition;
use estimo_core::scope::AssembledScope;

/// Pretty-prints any serializable value as JSON to stdout.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("failed to serialize output: {e}"),
    }
}

/// Human-readable rendering of the next interview question.
pub fn print_question(question: &QuestionDefinition, resolved_subcategory: Option<&str>) {
    if let Some(resolved) = resolved_subcategory {
        println!(
            "{} resolved subcategory: {} (persist this on the session)",
            "note:".yellow().bold(),
            resolved.bold()
        );
    }
    println!("{} {}", question.id.dimmed(), question.text.bold());
    if !question.choices.is_empty() {
        println!("  choices: {}", question.choices.join(" | "));
    }
    if question.required_for_completion {
        println!("  {}", "required for completion".dimmed());
    }
}

/// Human-readable rendering of an assembled scope.
pub fn print_scope(scope: &AssembledScope, quiet: bool) {
    let heading = match &scope.subcategory {
        Some(sub) => format!("{} / {}", scope.category, sub),
        None => scope.category.clone(),
    };
    println!("{}", heading.bold().underline());
    println!(
        "  complexity {} | skill tier {} | {:.2} hours",
        scope.complexity, scope.skill_tier, scope.estimated_hours
    );

    if !scope.materials.is_empty() && !quiet {
        println!("  {}", "materials".bold());
        for line in &scope.materials {
            println!(
                "    {:<18} {:>7.0} {:<8} @ {:>10} = {}",
                line.key,
                line.quantity,
                line.unit,
                format_cents(line.unit_cost_cents),
                format_cents(line.total_cents)
            );
        }
    }

    println!("  labor     {}", format_cents(scope.costs.labor_cents).green());
    println!("  materials {}", format_cents(scope.costs.materials_cents).green());
    for fee in &scope.add_ons {
        println!(
            "  {:<9} {}",
            fee.label,
            format_cents(fee.amount_cents).green()
        );
    }
    println!(
        "  {}     {}",
        "total".bold(),
        format_cents(scope.costs.total_cents).green().bold()
    );

    if !quiet {
        println!();
        println!("{}", scope.summary);
        if let Some(narrative) = &scope.narrative {
            println!();
            println!("{}", "project description".bold());
            println!("{}", narrative.project_description);
        }
    }

    for warning in &scope.warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }
}
