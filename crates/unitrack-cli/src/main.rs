//! unitrack CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "unitrack", version, about = "Academic progress calculator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute grade metrics, category hours and a graduation forecast
    Report {
        /// Transcript file (.toml or .json)
        #[arg(long)]
        transcript: Option<PathBuf>,

        /// Curriculum file (.toml or .json)
        #[arg(long)]
        curriculum: Option<PathBuf>,

        /// Externally approved complementary hours
        #[arg(long)]
        external_hours: Option<u32>,

        /// Output format: table, json
        #[arg(long)]
        format: Option<String>,

        /// Also save the report as JSON to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a transcript for records that would be misread
    Validate {
        /// Transcript file (.toml or .json)
        #[arg(long)]
        transcript: PathBuf,
    },

    /// Create starter config, curriculum and transcript files
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("unitrack=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Report {
            transcript,
            curriculum,
            external_hours,
            format,
            output,
            config,
        } => commands::report::execute(
            transcript,
            curriculum,
            external_hours,
            format,
            output,
            config,
        ),
        Commands::Validate { transcript } => commands::validate::execute(transcript),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
