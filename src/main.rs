//! Procedure-code inference CLI.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mimalloc::MiMalloc;

use codeinfer::config::Config;
use codeinfer::constants::ALLOWED_METHODS;
use codeinfer::pipeline::{build_orchestrator, parse_methods, run_documents};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Infers procedure codes from a policy document.
#[derive(Parser, Debug)]
#[command(name = "codeinfer")]
#[command(version)]
struct Args {
    /// Policy text file to analyse
    #[arg(long, env = "CODEINFER_INPUT", default_value = "./data/sample_policy.txt")]
    input: PathBuf,

    /// Where to write the JSON results
    #[arg(long, env = "CODEINFER_OUTPUT", default_value = "./output/results.json")]
    output: PathBuf,

    /// Comma-separated inference methods (lexical, regex, llm, rag)
    #[arg(long, env = "CODEINFER_METHODS", default_value = "lexical")]
    methods: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = Config::from_env()?;
    config.validate()?;

    let methods = parse_methods(&args.methods)?;

    tracing::info!(
        input = %args.input.display(),
        output = %args.output.display(),
        methods = ?methods,
        allowed = ?ALLOWED_METHODS,
        cache = %config.cache_path.display(),
        "Inference pipeline starting"
    );

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read input {}", args.input.display()))?;

    let orchestrator = build_orchestrator(&config, methods.as_slice())?;
    let runs = run_documents(&orchestrator, [text]).await?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(&runs)?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("failed to write output {}", args.output.display()))?;

    tracing::info!(
        documents = runs.len(),
        output = %args.output.display(),
        "Inference results saved"
    );
    Ok(())
}
