use clap::Parser;
use page_perception::cli::commands::{cmd_active, cmd_snapshot, cmd_suppress};
use page_perception::cli::config::{load_config, Cli, Commands};
use page_perception::trace::logger::TraceLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Resolve trace destination: CLI > config > disabled
    let tracer = match cli.trace.as_deref().or(config.trace.path.as_deref()) {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    match cli.command {
        Commands::Snapshot {
            page,
            output,
            pretty,
            digest,
        } => {
            cmd_snapshot(
                &page,
                output.as_deref(),
                pretty || config.snapshot.pretty,
                digest || config.snapshot.digest,
                cli.verbose,
                &tracer,
            )?;
        }
        Commands::Active { page, output } => {
            cmd_active(&page, output.as_deref(), cli.verbose, &tracer)?;
        }
        Commands::Suppress {
            page,
            selectors,
            output,
        } => {
            // Fall back to configured selectors when none were passed
            let selectors = if selectors.is_empty() {
                config.suppress.selectors.clone()
            } else {
                selectors
            };
            cmd_suppress(&page, &selectors, output.as_deref(), cli.verbose, &tracer)?;
        }
    }

    Ok(())
}
