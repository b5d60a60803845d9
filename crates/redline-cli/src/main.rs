//! Redline - Narrative Compliance Scoring CLI
//!
//! The `redline` command scores research narratives against the compliance
//! rubric and drives refinement loops against a remote generating party.
//!
//! ## Commands
//!
//! - `score`: Evaluate one narrative file and print the evaluation JSON
//! - `validate`: Score a labeled batch and report accuracy, kappa, and a
//!   confidence interval
//! - `refine`: Run a generate→score→critique loop against a remote party

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use agent_wire::{HttpPartyClient, HttpPartyConfig};
use redline_core::{
    init_tracing, render_redline_md, validate_batch, write_evaluation_artifact, Ruleset,
    ScoringEngine, ValidationBatch, METRICS,
};
use redline_refine::{RefinementConfig, RefinementOrchestrator};

#[derive(Parser)]
#[command(name = "redline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Narrative compliance scoring and refinement", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Ruleset JSON file (builtin rules when omitted)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one narrative file
    Score {
        /// Path to the narrative text file
        #[arg(short, long)]
        narrative: PathBuf,

        /// Write the evaluation artifact (JSON + digest) under this directory
        #[arg(long)]
        artifacts_dir: Option<PathBuf>,

        /// Print a markdown redline summary instead of JSON
        #[arg(long)]
        markdown: bool,
    },

    /// Score a labeled batch and report agreement statistics
    Validate {
        /// Path to a ValidationBatch JSON file
        #[arg(short, long)]
        batch: PathBuf,
    },

    /// Run a refinement loop against a remote generating party
    Refine {
        /// Party host base URL
        #[arg(long, env = "REDLINE_PARTY_URL")]
        endpoint: String,

        /// Recipient party name
        #[arg(long, default_value = "drafting-agent")]
        recipient: String,

        /// Path to the task brief text file
        #[arg(long)]
        brief: PathBuf,

        /// Iteration budget
        #[arg(long, default_value_t = 5)]
        max_iterations: u32,

        /// Target risk score (strictly-below wins)
        #[arg(long, default_value_t = 20)]
        target: u32,

        /// Per-call timeout in seconds
        #[arg(long, default_value_t = 300)]
        timeout_secs: u64,
    },
}

fn load_engine(rules: &Option<PathBuf>) -> Result<ScoringEngine> {
    let ruleset = match rules {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading ruleset {}", path.display()))?;
            Ruleset::from_json(&json).context("parsing ruleset")?
        }
        None => Ruleset::builtin(),
    };
    ScoringEngine::new(ruleset).context("compiling ruleset")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    let engine = load_engine(&cli.rules)?;

    match cli.command {
        Commands::Score {
            narrative,
            artifacts_dir,
            markdown,
        } => {
            let text = std::fs::read_to_string(&narrative)
                .with_context(|| format!("reading narrative {}", narrative.display()))?;
            let result = engine.evaluate_text(&text);

            if let Some(dir) = artifacts_dir {
                let path = write_evaluation_artifact(&result, &dir)?;
                info!(path = %path.display(), "evaluation artifact written");
            }

            if markdown {
                println!("{}", render_redline_md(&result));
            } else {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }

        Commands::Validate { batch } => {
            let json = std::fs::read_to_string(&batch)
                .with_context(|| format!("reading batch {}", batch.display()))?;
            let batch: ValidationBatch = serde_json::from_str(&json).context("parsing batch")?;
            let report = validate_batch(&engine, &batch);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Refine {
            endpoint,
            recipient,
            brief,
            max_iterations,
            target,
            timeout_secs,
        } => {
            let brief_text = std::fs::read_to_string(&brief)
                .with_context(|| format!("reading brief {}", brief.display()))?;

            let client = HttpPartyClient::new(HttpPartyConfig::new(&endpoint))
                .context("building party client")?;
            let config = RefinementConfig {
                max_iterations,
                target_risk_score: target,
                per_call_timeout_secs: timeout_secs,
            };
            let orchestrator = RefinementOrchestrator::new(Arc::new(client), engine, config)
                .context("building orchestrator")?;

            let run = orchestrator.run(&recipient, brief_text.trim()).await;
            println!("{}", serde_json::to_string_pretty(&run)?);
        }
    }

    METRICS.flush();
    Ok(())
}
