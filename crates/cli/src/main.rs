//! Operating system simulator CLI.
//!
//! This binary provides a single entry point for the simulator. It performs:
//! 1. **Run:** Load a configuration and its meta-data file, then simulate the program.
//! 2. **Show:** Display a configuration and its parsed meta-data without running.
//! 3. **Generate:** Write a random meta-data program for testing.

use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::{fs, process};
use tracing_subscriber::EnvFilter;

use ossim_core::config::Config;
use ossim_core::generator::{Generator, GeneratorConfig};
use ossim_core::sim::loader;
use ossim_core::stats::STATS_SECTIONS;
use ossim_core::{Program, Simulator, metadata};

#[derive(Parser, Debug)]
#[command(
    name = "ossim",
    author,
    version,
    about = "Discrete-event operating system simulator",
    long_about = "Simulate a batch of processes described by a meta-data file.\n\nThe configuration file names the meta-data file, the scheduling code, cycle rates and log target.\n\nExamples:\n  ossim run config1.cnf\n  ossim run config1.cnf --stats\n  ossim show config1.cnf\n  ossim generate test.mdf --programs 5 --ops 10 --seed 7"
)]
struct Cli {
    /// Diagnostic level for stderr output; RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the simulation described by a configuration file.
    Run {
        /// Configuration file.
        config: PathBuf,

        /// Read the configuration as JSON.
        #[arg(long)]
        json: bool,

        /// Print run statistics after the simulation.
        #[arg(long)]
        stats: bool,

        /// Restrict statistics to these sections (repeatable).
        #[arg(long = "stats-section", value_parser = PossibleValuesParser::new(STATS_SECTIONS.iter().copied()))]
        stats_sections: Vec<String>,
    },

    /// Display a configuration and its meta-data without running.
    Show {
        /// Configuration file.
        config: PathBuf,

        /// Read the configuration as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Write a randomly generated meta-data file.
    Generate {
        /// Output file.
        output: PathBuf,

        /// Chance of each operation being processing, in percent.
        #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(0..=100))]
        processing: u32,

        /// Operations per program.
        #[arg(long, default_value_t = 10)]
        ops: usize,

        /// Number of programs.
        #[arg(long, default_value_t = 5)]
        programs: usize,

        /// Seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Run {
            config,
            json,
            stats,
            stats_sections,
        } => cmd_run(&config, json, stats || !stats_sections.is_empty(), &stats_sections),
        Commands::Show { config, json } => cmd_show(&config, json),
        Commands::Generate {
            output,
            processing,
            ops,
            programs,
            seed,
        } => cmd_generate(
            &output,
            GeneratorConfig {
                programs,
                ops_per_program: ops,
                processing_percent: processing,
                seed,
            },
        ),
    }
}

/// Installs the stderr subscriber; `RUST_LOG` overrides `level`.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Loads inputs, runs the simulation and optionally prints statistics.
///
/// Any loader or sink error is fatal and exits with code 1.
fn cmd_run(config_path: &Path, json: bool, print_stats: bool, sections: &[String]) {
    println!("Simulator Program");
    println!("=================");
    println!();

    println!("Uploading Configuration Files");
    println!();
    let config = load_config(config_path, json);

    println!("Uploading Metadata Files");
    println!();
    let program = load_program(&config);

    let report = Simulator::new(config, program)
        .and_then(Simulator::run)
        .unwrap_or_else(|e| fatal(e));

    if print_stats {
        println!();
        report.stats.print_sections(sections);
    }
    println!();
    println!("Simulator Program End.");
}

/// Prints the configuration values and one line per meta-data operation.
fn cmd_show(config_path: &Path, json: bool) {
    let config = load_config(config_path, json);
    println!("Config File Display");
    println!("-------------------");
    for line in config.display_lines() {
        println!("{line}");
    }
    println!();

    let program = load_program(&config);
    println!("Meta-Data File Display");
    println!("----------------------");
    for line in metadata::display_lines(&program) {
        println!("{line}");
    }
}

/// Generates a program and writes it in meta-data format.
fn cmd_generate(output: &Path, config: GeneratorConfig) {
    let program = Generator::new(config)
        .generate()
        .unwrap_or_else(|e| fatal(e));
    let text = metadata::render(&program);
    if let Err(e) = fs::write(output, text) {
        fatal(format!("could not write {}: {e}", output.display()));
    }
    println!(
        "Wrote {} processes ({} operations) to {}",
        program.process_count(),
        program.len(),
        output.display()
    );
}

fn load_config(path: &Path, json: bool) -> Config {
    tracing::debug!(path = %path.display(), json, "loading configuration");
    let loaded = if json {
        loader::load_config_json(path)
    } else {
        loader::load_config(path)
    };
    loaded.unwrap_or_else(|e| fatal(e))
}

fn load_program(config: &Config) -> Program {
    loader::load_program(&config.metadata_path).unwrap_or_else(|e| fatal(e))
}

fn fatal(error: impl Display) -> ! {
    eprintln!("FATAL ERROR: {error}, Program aborted");
    process::exit(1);
}
