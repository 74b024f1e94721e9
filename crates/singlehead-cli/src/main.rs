//! Singlehead CLI
//!
//! Command-line interface for building single-header libraries.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use singlehead_core::Config;
use singlehead_merge::{Amalgamator, FixedClock, ProgressEvent, ProgressPhase};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const BANNER: &str = "****************************************";

#[derive(Parser)]
#[command(name = "singlehead")]
#[command(author, version, about = "Single-header library amalgamator", long_about = None)]
struct Cli {
    /// Directory containing the umbrella header and sources
    #[arg(short = 'C', long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (default: singlehead.yaml in the root, if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Umbrella include file, relative to the root
    #[arg(short, long, global = true)]
    umbrella: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the umbrella header, its headers and their sources
    Build {
        /// Output file, relative to the root
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stamp this date instead of today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Write the merged header to stdout instead of the output file
        #[arg(long)]
        stdout: bool,

        /// Summary format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the headers the umbrella includes
    List {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_config(&cli.root, cli.config.as_deref())?;
    if let Some(umbrella) = cli.umbrella {
        config.umbrella = umbrella;
    }
    debug!("Using config: {:?}", config);

    match cli.command {
        Commands::Build {
            output,
            date,
            stdout,
            format,
        } => {
            if let Some(output) = output {
                config.output = output;
            }
            cmd_build(config, date, stdout, &format)?;
        }
        Commands::List { format } => {
            cmd_list(config, &format)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(root: &Path, explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => {
            let mut config = Config::load(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            if config.source_root.is_relative() {
                config.source_root = root.join(&config.source_root);
            }
            config
        }
        None => Config::discover(root)
            .with_context(|| format!("loading config from {}", root.display()))?,
    };
    Ok(config)
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| format!("{}: {}", value, e))
}

fn cmd_build(config: Config, date: Option<NaiveDate>, stdout: bool, format: &str) -> Result<()> {
    let output_name = config.output.display().to_string();
    let mut amalgamator = Amalgamator::new(config).context("invalid configuration")?;
    if let Some(date) = date {
        amalgamator = amalgamator.with_clock(FixedClock(date));
    }

    if stdout {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        amalgamator.render(&mut lock).context("amalgamation failed")?;
        lock.flush()?;
        return Ok(());
    }

    let quiet = format == "json";
    if !quiet {
        println!("{}", BANNER);
        println!("Compiling Single Header: {}", output_name);
        println!("{}", BANNER);
    }

    let amalgamator = amalgamator.with_progress(move |event: ProgressEvent| {
        if quiet {
            return;
        }
        match event.phase {
            ProgressPhase::Header | ProgressPhase::Implementation => {
                println!("Including {}", event.file);
            }
            ProgressPhase::Complete => {
                println!("Done");
                println!("{}", BANNER);
            }
        }
    });

    let report = amalgamator.run().context("amalgamation failed")?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
        "text" => {}
        _ => {
            println!("Unknown format: {}", format);
        }
    }

    Ok(())
}

fn cmd_list(config: Config, format: &str) -> Result<()> {
    let umbrella = config.umbrella_path();
    let amalgamator = Amalgamator::new(config).context("invalid configuration")?;
    let listing = amalgamator
        .list()
        .with_context(|| format!("scanning {}", umbrella.display()))?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&listing)?;
            println!("{}", json);
        }
        _ => {
            println!("Headers in {}:", umbrella.display());
            println!();
            for entry in &listing {
                match &entry.implementation {
                    Some(source) => println!("  L{:<4} {} + {}", entry.umbrella_line, entry.header, source),
                    None => println!("  L{:<4} {}", entry.umbrella_line, entry.header),
                }
            }
        }
    }

    Ok(())
}
