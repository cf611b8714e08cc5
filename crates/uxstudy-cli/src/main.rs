//! uxstudy CLI: Guided usability-study sessions and reports.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod prompt;

#[derive(Parser)]
#[command(
    name = "uxstudy",
    version,
    about = "Guided usability-study data collection"
)]
struct Cli {
    /// Config file path (default: ./uxstudy.toml, then ~/.config/uxstudy/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the dataset files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and the data directory
    Init,

    /// Run an interactive session for one participant
    Session {
        /// Use this participant id instead of prompting for one
        #[arg(long)]
        participant_id: Option<String>,

        /// Label task notes as participant notes rather than observer notes
        #[arg(long)]
        participant_notes: bool,
    },

    /// Summarize everything collected so far
    Report {
        /// Output format: text, json, html, markdown, all (comma-separated)
        #[arg(long, default_value = "text")]
        format: String,

        /// Output directory for report files
        #[arg(long, default_value = "./uxstudy-report")]
        output: PathBuf,
    },

    /// List the configured tasks
    Tasks,

    /// Check the study config for problems
    Validate,
}

fn main() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "uxstudy=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(cli.config, cli.data_dir),
        Commands::Session {
            participant_id,
            participant_notes,
        } => commands::session::execute(
            cli.config,
            cli.data_dir,
            participant_id,
            participant_notes,
        ),
        Commands::Report { format, output } => {
            commands::report::execute(cli.config, cli.data_dir, format, output)
        }
        Commands::Tasks => commands::tasks::execute(cli.config),
        Commands::Validate => commands::validate::execute(cli.config, cli.data_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
