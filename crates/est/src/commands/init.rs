//! `est init` -- create the catalog database.

use anyhow::Result;

use estimo_config::config::to_yaml;

use crate::cli::InitArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `est init` command.
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<()> {
    // Opening initializes the schema.
    let _store = ctx.open_store()?;

    if args.write_config {
        let yaml = to_yaml(&ctx.config)?;
        std::fs::write("estimo.yaml", yaml)?;
    }

    if ctx.json {
        output_json(&serde_json::json!({
            "db": ctx.db_path.display().to_string(),
            "config_written": args.write_config,
        }));
    } else if !ctx.quiet {
        println!("initialized catalog at {}", ctx.db_path.display());
        if args.write_config {
            println!("wrote starter configuration to estimo.yaml");
        }
    }

    Ok(())
}
