//! CLI entrypoint for agent-ensemble
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use ensemble_application::{EnsembleConfig, RunEnsembleInput, RunEnsembleUseCase};
use ensemble_domain::{EnsembleOutcome, Question};
use ensemble_infrastructure::{ConfigLoader, OpenAiGateway};
use ensemble_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(ExitCode::SUCCESS);
    }

    let question = match &cli.question {
        Some(q) => match Question::try_new(q.clone()) {
            Some(question) => question,
            None => bail!("Question cannot be empty."),
        },
        None => bail!("Question is required."),
    };

    let config = resolve_config(&cli)?;

    info!(
        "Starting agent-ensemble: {} agents on model {}",
        config.num_agents, config.model
    );

    // === Dependency Injection ===
    // Create infrastructure adapter (OpenAI-compatible gateway)
    let gateway = Arc::new(
        OpenAiGateway::from_env(config.model.as_str()).context("gateway setup failed")?,
    );

    // Print header
    if !cli.quiet {
        println!();
        println!(
            "Asking {} agents (max {} concurrent): {}",
            config.num_agents, config.max_concurrent, question
        );
        println!();
    }

    let mut input = RunEnsembleInput::new(question, config);
    if let Some(system_prompt) = &cli.system_prompt {
        input = input.with_system_prompt(system_prompt.clone());
    }

    // Create use case with injected gateway
    let use_case = RunEnsembleUseCase::new(gateway);

    // Execute with or without progress reporting; plain text when logging
    // is on so the progress bar does not fight the log output
    let outcome = if cli.quiet {
        use_case.execute(input).await?
    } else if cli.verbose > 0 {
        use_case.execute_with_progress(input, &SimpleProgress).await?
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    };

    // Output results
    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&outcome),
        OutputFormat::Answer => ConsoleFormatter::format_answer_only(&outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(&outcome),
    };

    println!("{}", output);

    // A quorum shortfall is data, not a crash; signal it through the exit code
    Ok(match outcome {
        EnsembleOutcome::Completed(_) => ExitCode::SUCCESS,
        EnsembleOutcome::Insufficient(_) => ExitCode::FAILURE,
    })
}

/// Load file config, select the profile, and apply CLI overrides
fn resolve_config(cli: &Cli) -> Result<EnsembleConfig> {
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };

    let mut config = file_config.resolve(cli.profile.as_deref())?;

    // CLI flags override file values last
    if let Some(agents) = cli.agents {
        config.num_agents = agents;
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(max_concurrent) = cli.max_concurrent {
        config.max_concurrent = max_concurrent;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_seconds = timeout;
    }
    if cli.sequential {
        config.parallel_execution = false;
    }
    if cli.no_early_stop {
        config.early_stopping = false;
    }

    Ok(config)
}
