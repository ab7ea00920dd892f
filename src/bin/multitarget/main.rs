//! Multitarget CLI - inspect a multiplatform build model

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use multitarget::util::diagnostic::emit;
use multitarget::ModelError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("multitarget=debug")
    } else {
        EnvFilter::new("multitarget=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let global = commands::GlobalOpts {
        manifest_path: cli.manifest_path,
        format: cli.format,
        color: !cli.no_color,
    };

    // Execute command
    match cli.command {
        Commands::Init(args) => commands::init::execute(args),
        Commands::Targets(args) => commands::targets::execute(args, &global),
        Commands::Presets => commands::presets::execute(&global),
        Commands::SourceSets => commands::source_sets::execute(&global),
        Commands::Publications => commands::publications::execute(&global),
        Commands::Tasks(args) => commands::tasks::execute(args, &global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Model errors get a full diagnostic; anything else prints its chain.
fn report(e: &anyhow::Error, color: bool) {
    match e.downcast_ref::<ModelError>() {
        Some(model) => {
            let mut diagnostic = model.to_diagnostic();
            for cause in e.chain().take_while(|c| c.downcast_ref::<ModelError>().is_none()) {
                diagnostic = diagnostic.with_context(cause.to_string());
            }
            emit(&diagnostic, color);
        }
        None => eprintln!("error: {:#}", e),
    }
}
