//! Banker arbiter CLI - replays a scenario file against the kernel.
//!
//! Prints the initial state, then every event with its outcome and the
//! resulting state (text), or all steps as one JSON document.

use std::path::PathBuf;

use banker_arbiter::status::{render_step, StatusTable};
use banker_arbiter::types::OutputFormat;
use banker_arbiter::{Config, Scenario};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "banker", version, about = "Deadlock-avoidance resource arbiter")]
struct Args {
    /// Scenario file: available units, max-demand rows, then events.
    #[arg(long = "fileName", visible_alias = "file-name", env = "BANKER_FILE")]
    file_name: PathBuf,

    /// JSON configuration file.
    #[arg(long, env = "BANKER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured output format.
    #[arg(long, value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// Only print the final state.
    #[arg(long)]
    quiet: bool,
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    match s {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(format!("unknown format `{}` (expected text or json)", other)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(format) = args.format {
        config.output.format = format;
    }

    // Initialize observability
    banker_arbiter::observability::init_tracing(&config.observability);

    let scenario = Scenario::from_file(&args.file_name)?;
    let mut kernel = scenario.build_kernel(config.kernel.clone())?;

    tracing::info!(
        "scenario_loaded: file={}, processes={}, resources={}, events={}",
        args.file_name.display(),
        kernel.process_count(),
        kernel.resource_count(),
        scenario.events.len()
    );

    let width = config.output.column_width;
    match config.output.format {
        OutputFormat::Text => {
            if config.output.print_initial && !args.quiet {
                print!("{}", StatusTable::new(&kernel.snapshot(), width));
            }
            scenario.run(&mut kernel, |step| {
                if !args.quiet {
                    print!("{}", render_step(step, width));
                }
            })?;
            if args.quiet {
                print!("{}", StatusTable::new(&kernel.snapshot(), width));
            }
        }
        OutputFormat::Json => {
            let initial = kernel.snapshot();
            let mut steps = scenario.run(&mut kernel, |_| {})?;
            if args.quiet {
                steps.clear();
            }
            let document = serde_json::json!({
                "initial": initial,
                "steps": steps,
                "final": kernel.snapshot(),
                "safe_sequence": kernel.safe_sequence(),
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    Ok(())
}
