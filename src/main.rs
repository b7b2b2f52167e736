use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use thumbgen::batch::{
    BatchSummary, CancelHandle, GenerationResult, ThumbnailGenerator, cancellation,
};
use thumbgen::cli::CliOptions;
use thumbgen::config::{GeneratorConfig, setup_logging};
use thumbgen::topics::load_topics;
use tracing::{debug, error, info, warn};

/// Exit status used when a second Ctrl-C kills the run outright.
const INTERRUPTED_EXIT_CODE: i32 = 130;

fn print_report(results: &[GenerationResult]) {
    println!("\nResults:");
    for (index, result) in results.iter().enumerate() {
        match result {
            GenerationResult::Success { topic, file_path } => {
                println!("OK   {}. {topic}", index + 1);
                println!("     Saved to: {}", file_path.display());
            }
            GenerationResult::Failure { topic, error } => {
                println!("FAIL {}. {topic}", index + 1);
                println!("     Error: {error}");
            }
        }
    }
}

/// First interrupt stops the batch between items. Returns `true` once a
/// second interrupt arrives, meaning the caller should abort at once.
async fn watch_interrupts<F, Fut>(cancel_handle: CancelHandle, mut interrupt: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if let Err(err) = interrupt().await {
        error!("Failed to listen for Ctrl-C: {err}");
        return false;
    }
    warn!("Interrupted, finishing the current item and stopping. Press Ctrl-C again to abort");
    cancel_handle.cancel();

    interrupt().await.is_ok()
}

async fn run(cli: &CliOptions) -> Result<BatchSummary> {
    let config = GeneratorConfig::from_cli(cli)?;
    let loaded = load_topics(&cli.topics, cli.file.as_deref())?;
    if let Some(file) = &loaded.file {
        println!("Found {} courses in '{}':", loaded.topics.len(), file.display());
        for (index, topic) in loaded.topics.iter().enumerate() {
            println!("{}. {topic}", index + 1);
        }
    }
    let output_dir = config.output_dir.clone();

    let mut generator =
        ThumbnailGenerator::new(config).context("Failed to set up thumbnail generator")?;

    let (cancel_handle, cancel_signal) = cancellation();
    tokio::spawn(async move {
        if watch_interrupts(cancel_handle, tokio::signal::ctrl_c).await {
            error!("Interrupted again, aborting");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    });

    info!(
        "Starting thumbnail generation for {} topics",
        loaded.topics.len()
    );
    let results = generator.generate_all(&loaded.topics, &cancel_signal).await;

    print_report(&results);
    let summary = BatchSummary::from_results(&results);
    println!("\nSummary: {summary}");
    if summary.succeeded > 0 {
        println!("Check {} for your generated images", output_dir.display());
    }
    Ok(summary)
}

#[tokio::main]
async fn main() -> ExitCode {
    // has to happen before parsing so clap's env fallbacks see the values
    let dotenv = dotenvy::dotenv();
    let cli = CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return ExitCode::FAILURE;
    }
    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => warn!("Failed to load .env file: {err}"),
    }

    match run(&cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
