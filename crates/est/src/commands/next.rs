//! `est next` -- show the next interview question for a session.

use anyhow::Result;

use estimo_flow::Resolver;

use crate::cli::NextArgs;
use crate::context::RuntimeContext;
use crate::output::{output_json, print_question};

/// Execute the `est next` command.
pub fn run(ctx: &RuntimeContext, args: &NextArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let answers = ctx.load_answers(&store, args.answers.as_deref())?;

    let resolver = Resolver::new(&store, &ctx.config.flow);
    let resolution =
        resolver.next_question(&args.category, args.subcategory.as_deref(), &answers)?;
    let complete =
        resolver.is_completion_satisfied(&args.category, args.subcategory.as_deref(), &answers)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "question": resolution.as_ref().map(|r| &r.question),
            "resolved_subcategory": resolution.as_ref().and_then(|r| r.resolved_subcategory.clone()),
            "completion_satisfied": complete,
        }));
        return Ok(());
    }

    match resolution {
        Some(resolution) => {
            print_question(&resolution.question, resolution.resolved_subcategory.as_deref());
        }
        None => println!("no further questions"),
    }
    if complete && !ctx.quiet {
        println!("interview is complete enough to assemble a quote");
    }

    Ok(())
}
