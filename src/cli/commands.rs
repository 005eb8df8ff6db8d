//! CLI command definitions for quizforge.
//!
//! A single command: generate questions on a theme, save them, enrich them if
//! possible, and optionally merge them into the game's question bank.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use crate::enrich::NodeScriptEnricher;
use crate::error::LlmError;
use crate::llm::ChatCompletionClient;
use crate::pipeline::{
    EnrichmentOutcome, QuizConfig, QuizPipeline, QuizRequest, RunSummary, DEFAULT_QUESTION_COUNT,
};

/// Path the game loads its questions from.
const GAME_QUESTIONS_PATH: &str = "frontend/questions.json";

/// Quiz question generator backed by an LLM.
#[derive(Parser, Debug)]
#[command(name = "quizforge")]
#[command(about = "Generate quiz questions on a theme with an LLM")]
#[command(version)]
#[command(
    long_about = "quizforge asks an LLM for multiple-choice quiz questions on a theme, validates and repairs the reply, saves it, and enriches it with images when the companion enrich_questions.js script is available.\n\nRequires a GROQ_API_KEY (free at https://console.groq.com).\n\nExample usage:\n  quizforge --theme \"histoire de France\" --count 10\n  quizforge --theme \"géographie\" --count 5 --output questions_geo.json"
)]
pub struct Cli {
    /// Theme of the questions (e.g. 'histoire de France', 'géographie', 'cinéma').
    #[arg(short = 't', long)]
    pub theme: String,

    /// Number of questions to generate.
    #[arg(
        short = 'n',
        long,
        default_value_t = DEFAULT_QUESTION_COUNT,
        allow_negative_numbers = true
    )]
    pub count: i64,

    /// Output file (default: questions_<theme>.enriched.json in the tools directory).
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Do not enrich the questions.
    #[arg(long)]
    pub no_enrich: bool,

    /// LLM model to use for generation.
    #[arg(short = 'm', long, env = "QUIZFORGE_MODEL")]
    pub model: Option<String>,

    /// API key for the completion endpoint.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory holding enrich_questions.js and the generated files
    /// (default: the directory of the quizforge executable).
    #[arg(long, env = "QUIZFORGE_TOOLS_DIR")]
    pub tools_dir: Option<PathBuf>,

    /// Append the final questions to this question bank, skipping duplicates.
    #[arg(long)]
    pub merge_into: Option<PathBuf>,

    /// Output a JSON summary to stdout.
    #[arg(short = 'j', long)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

/// Parse CLI arguments and return the Cli struct.
///
/// This allows main.rs to access CLI arguments (like log_level) before running.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
///
/// Any error returned here is fatal; `main` exits with status 1.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    let api_key = cli
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or(LlmError::MissingApiKey)?;

    let mut config = QuizConfig::from_env()?;
    if let Some(model) = &cli.model {
        config = config.with_model(model.clone());
    }
    config.validate()?;

    let tools_dir = match &cli.tools_dir {
        Some(dir) => dir.clone(),
        None => default_tools_dir()?,
    };
    debug!(tools_dir = %tools_dir.display(), "Resolved tools directory");

    let client = ChatCompletionClient::new(&config.api_base, api_key, &config.model)?;
    let mut pipeline = QuizPipeline::new(Arc::new(client), config);
    if !cli.no_enrich {
        pipeline = pipeline.with_enricher(Arc::new(NodeScriptEnricher::in_dir(&tools_dir)));
    }

    let request = build_request(&cli, tools_dir);
    let summary = pipeline.run(&request).await?;

    if cli.json {
        let json_output = serde_json::to_string_pretty(&summary)
            .map_err(|e| anyhow::anyhow!("Failed to serialize JSON output: {}", e))?;
        println!("{}", json_output);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn build_request(cli: &Cli, tools_dir: PathBuf) -> QuizRequest {
    let mut request =
        QuizRequest::new(cli.theme.clone(), cli.count, tools_dir).with_enrichment(!cli.no_enrich);
    if let Some(output) = &cli.output {
        request = request.with_output(output.clone());
    }
    if let Some(bank) = &cli.merge_into {
        request = request.with_merge_into(bank.clone());
    }
    request
}

/// Directory containing the running executable.
fn default_tools_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the quizforge executable")?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

fn print_summary(summary: &RunSummary) {
    println!("✓ {} questions generated successfully", summary.generated);
    if !summary.repairs.is_empty() {
        println!("  Repaired answers: {}", summary.repairs.len());
    }
    println!("✓ Raw questions saved: {}", summary.raw_path.display());

    match &summary.enrichment {
        EnrichmentOutcome::Enriched => {
            println!("✓ Enriched questions saved: {}", summary.final_path.display());
        }
        EnrichmentOutcome::Fallback { .. } => {
            println!(
                "✓ Questions (not enriched) saved: {}",
                summary.final_path.display()
            );
        }
        EnrichmentOutcome::Disabled => {
            println!("✓ Questions saved: {}", summary.final_path.display());
        }
    }

    if let Some(merge) = &summary.merge {
        println!(
            "✓ Merged into question bank: {} added, {} already present, {} total",
            merge.added, merge.skipped, merge.total
        );
    }

    println!("\nTo use these questions in the game:");
    println!(
        "  1. Copy {} to {}",
        summary.final_path.display(),
        GAME_QUESTIONS_PATH
    );
    println!(
        "  2. Or merge them with the existing questions (--merge-into {})",
        GAME_QUESTIONS_PATH
    );
}
