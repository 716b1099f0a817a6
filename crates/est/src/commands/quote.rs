//! `est quote` -- assemble a priced scope of work.

use std::path::Path;

use anyhow::{Context, Result};

use estimo_formula::parser::load_spec;
use estimo_formula::types::MaterialFormulaSpec;
use estimo_quote::{Assembler, HttpNarrator, Narrator};

use crate::cli::QuoteArgs;
use crate::context::RuntimeContext;
use crate::output::{output_json, print_scope};

/// Execute the `est quote` command.
pub fn run(ctx: &RuntimeContext, args: &QuoteArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let answers = ctx.load_answers(&store, args.answers.as_deref())?;

    let mut specs: Vec<MaterialFormulaSpec> = Vec::with_capacity(args.formulas.len());
    for path in &args.formulas {
        let spec =
            load_spec(Path::new(path)).with_context(|| format!("loading formula spec {path}"))?;
        specs.push(spec);
    }

    let http_narrator = ctx
        .config
        .narrative
        .endpoint
        .as_ref()
        .map(|endpoint| HttpNarrator::new(endpoint.clone()));
    let narrator: Option<&dyn Narrator> = http_narrator.as_ref().map(|n| n as &dyn Narrator);

    let assembler = Assembler::new(&store, &specs, narrator, &ctx.config)?;
    let scope = assembler.assemble(
        &args.category,
        args.subcategory.as_deref(),
        &answers,
        &args.text,
    )?;

    if ctx.json {
        output_json(&scope);
    } else {
        print_scope(&scope, ctx.quiet);
    }

    Ok(())
}
