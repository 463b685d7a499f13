//! Command-line driver for the lawnmower simulator.
//!
//! - `mowersim run [FILE]` - run a definition file (or the built-in scenario)
//! - `mowersim check FILE` - validate a definition file without running it

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use mowersim::{Config, Definition, format_report, logging, save_status};

#[derive(Parser)]
#[command(name = "mowersim")]
#[command(about = "Automated robotic lawnmower simulator and path verifier", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./mowersim.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and report the result
    Run {
        /// Definition file; the default scenario runs when omitted
        #[arg(name = "FILE")]
        file: Option<PathBuf>,

        /// Directory for the JSON result file
        #[arg(long)]
        results_dir: Option<PathBuf>,

        /// Do not write a result file
        #[arg(long)]
        no_save: bool,

        /// Print the result record as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Parse and validate a definition file without running it
    Check {
        #[arg(name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = Config::resolve(cli.config.as_deref())?;
    logging::init(&config.logging.level);
    if let Some(e) = config_error {
        warn!("{}; using default configuration", e);
    }

    match cli.command {
        Commands::Run {
            file,
            results_dir,
            no_save,
            json,
        } => run(&config, file, results_dir, no_save, json),
        Commands::Check { file } => check(file),
    }
}

fn load_definition(file: Option<PathBuf>) -> Result<Definition> {
    match file {
        Some(path) => Definition::from_file(&path)
            .with_context(|| format!("Invalid definition file {}", path.display())),
        None => {
            info!("No definition file given, using the default scenario");
            Ok(Definition::default_scenario())
        }
    }
}

fn run(
    config: &Config,
    file: Option<PathBuf>,
    results_dir: Option<PathBuf>,
    no_save: bool,
    json: bool,
) -> Result<()> {
    let definition = load_definition(file)?;
    info!(test_name = %definition.test_name, moves = definition.path.len(), "Starting simulation");

    let status = definition.run();
    for line in format_report(&status) {
        println!("{}", line);
    }

    if config.output.save && !no_save {
        let dir = results_dir.unwrap_or_else(|| PathBuf::from(&config.output.results_dir));
        let path = save_status(&dir, &status, config.output.pretty)
            .with_context(|| format!("Could not save results under {}", dir.display()))?;
        println!("--- {}: Simulation results saved to: {}", status.test_name, path.display());
    }

    if json {
        let out = if config.output.pretty {
            serde_json::to_string_pretty(&status)?
        } else {
            serde_json::to_string(&status)?
        };
        println!("{}", out);
    }
    Ok(())
}

fn check(file: PathBuf) -> Result<()> {
    let definition = load_definition(Some(file))?;
    println!(
        "{}: {} x {} lawn, {} rocks, start {}, {} moves - OK",
        definition.test_name,
        definition.height,
        definition.width,
        definition.rocks.len(),
        definition.start_pos,
        definition.path.len()
    );
    Ok(())
}
