//! `est` -- service estimation CLI.
//!
//! This is the driver for the estimo system. It parses CLI arguments with
//! clap, resolves the runtime context (catalog path + configuration), and
//! dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;

use cli::{Cli, Commands};
use context::RuntimeContext;

fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity before anything else can warn.
    if cli.global.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("est=debug,estimo_flow=debug,estimo_quote=debug,estimo_storage=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let ctx = match RuntimeContext::from_global_args(&cli.global) {
        Ok(ctx) => ctx,
        Err(e) => {
            report_error(&cli, &e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Init(ref args)) => commands::init::run(&ctx, args),
        Some(Commands::Seed(ref args)) => commands::seed::run(&ctx, args),
        Some(Commands::Next(ref args)) => commands::next::run(&ctx, args),
        Some(Commands::Quote(ref args)) => commands::quote::run(&ctx, args),
        Some(Commands::Classify(ref args)) => commands::classify::run(&ctx, args),
        Some(Commands::Completion(ref args)) => commands::completion::run(&ctx, args),
        Some(Commands::Version) => commands::version::run(&ctx),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    if let Err(e) = result {
        report_error(&cli, &e);
        std::process::exit(1);
    }
}

/// Prints an error in the mode the caller asked for.
fn report_error(cli: &Cli, error: &anyhow::Error) {
    if cli.global.json {
        let err_json = serde_json::json!({
            "error": format!("{error:#}"),
        });
        if let Ok(s) = serde_json::to_string_pretty(&err_json) {
            eprintln!("{s}");
        }
    } else {
        eprintln!("Error: {error:#}");
    }
}
