//! deal-triage: run the triage pipeline from the command line.
//!
//! JSON results go to stdout, logs go to stderr.

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use deal_workflow::TriageConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::RunOptions;

#[derive(Parser, Debug)]
#[command(name = "deal-triage")]
#[command(about = "Triage loan deals: redact, extract, analyze, draft")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a Terms JSON file
    Analyze {
        terms: PathBuf,
    },

    /// Evaluate the draft gate for a terms-update JSON file
    Gate {
        update: PathBuf,
    },

    /// Redact PII from a file, or stdin
    Redact {
        /// Treat input as JSON and redact every string value
        #[arg(long)]
        json: bool,

        file: Option<PathBuf>,
    },

    /// Run a deal from documents to export
    Run {
        /// Deal name
        #[arg(long)]
        name: String,

        /// Document to upload (.txt or .md); repeatable
        #[arg(long = "doc", required = true)]
        docs: Vec<PathBuf>,

        /// Terms-update JSON applied after extraction
        #[arg(long)]
        update: Option<PathBuf>,

        /// Field to mark confirmed; repeatable
        #[arg(long)]
        confirm: Vec<String>,

        /// Actor recorded in the audit trail
        #[arg(long)]
        actor: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = TriageConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    tracing::debug!(provider = %config.llm.provider, "configuration loaded");

    let output = match cli.command {
        Command::Analyze { terms } => {
            serde_json::to_string_pretty(&commands::analyze(&terms, &config)?)?
        }
        Command::Gate { update } => serde_json::to_string_pretty(&commands::gate(&update)?)?,
        Command::Redact { json, file } => {
            let input = commands::read_input(file.as_deref())?;
            commands::redact_input(&input, json)?
        }
        Command::Run {
            name,
            docs,
            update,
            confirm,
            actor,
        } => {
            let options = RunOptions {
                name,
                docs,
                update,
                confirm,
                actor,
            };
            serde_json::to_string_pretty(&commands::run(options, &config).await?)?
        }
    };

    println!("{}", output);
    Ok(())
}
