//! genedl - Main entry point
//!
//! Parses a GenICam XML file and creates EDM screens to go with it. The
//! features screen shows what the driver supports; the summary screen is
//! only created once and is meant to be edited into something more sensible.

mod config;
mod generate;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "genedl")]
#[command(about = "Generate EDM screens from a GenICam feature description")]
#[command(version)]
struct Args {
    /// GenICam XML file
    #[arg(required_unless_present = "init_config")]
    xml_file: Option<PathBuf>,

    /// Output base name: writes <EDL_FILE>.edl and <EDL_FILE>-features.edl
    #[arg(required_unless_present = "init_config")]
    edl_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, default_value = "genedl.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Also write record names, sections and geometry as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Overwrite an existing summary screen
    #[arg(long)]
    force_summary: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if args.init_config {
        config::save_default_config(&args.config)?;
        info!(path = %args.config.display(), "Wrote default configuration");
        return Ok(());
    }

    let config = config::load_config(&args.config)?;

    let (Some(xml_file), Some(edl_file)) = (args.xml_file, args.edl_file) else {
        anyhow::bail!("Both XML_FILE and EDL_FILE are required");
    };
    let job = generate::Job {
        xml_file,
        edl_file,
        json_file: args.json,
        force_summary: args.force_summary,
    };

    let report = generate::run(&job, &config)?;
    for path in &report.written {
        println!("Wrote {}", path.display());
    }
    for path in &report.skipped {
        println!("Kept existing {}", path.display());
    }
    for warning in &report.warnings {
        println!("warning: {}", warning);
    }

    Ok(())
}
