//! # Paroles Vocab
//!
//! Finds French song lyrics on the web and builds a vocabulary study list
//! from them.
//!
//! ## Usage
//!
//! ```sh
//! paroles_vocab "Alors On Danse by Stromae"
//! ```
//!
//! ## Architecture
//!
//! The application is a sequential pipeline per request:
//! 1. **Search**: derive candidate URLs from a table of known lyrics sites
//! 2. **Fetch**: download each candidate with a timeout and an
//!    inter-request delay, in priority order
//! 3. **Extract**: pull lyric text out of the HTML via site-specific
//!    selectors with a generic largest-text-block fallback
//! 4. **Normalize**: strip boilerplate, annotations, and noise lines
//! 5. **Vocabulary**: ask an Ollama-compatible model for study words and
//!    parse its reply with a strict line grammar

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod extractor;
mod fetcher;
mod llm;
mod models;
mod normalizer;
mod output;
mod pipeline;
mod search;
mod vocab;

use cli::Cli;
use config::PipelineConfig;
use llm::OllamaClient;
use models::LyricsReport;
use pipeline::Pipeline;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("paroles_vocab starting up");

    let args = Cli::parse();
    debug!(?args.request, ?args.max_candidates, "Parsed CLI arguments");

    let config = PipelineConfig {
        max_candidates: args.max_candidates,
        fetch_timeout: Duration::from_secs(args.fetch_timeout_secs),
        fetch_delay: Duration::from_secs(args.fetch_delay_secs),
        ..PipelineConfig::default()
    };

    let llm = if args.no_vocabulary {
        None
    } else {
        Some(OllamaClient::new(&args.ollama_url, &args.model)?)
    };

    let pipeline = Pipeline::new(config, llm)?;
    let result = match pipeline.run(&args.request).await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "pipeline failed");
            return Err(e.into());
        }
    };

    info!(
        song = %result.lyrics.song,
        artist = %result.lyrics.artist,
        source = %result.source_url,
        vocabulary_count = result.vocabulary.len(),
        "lyrics found"
    );

    println!("{}", result.lyrics.text);
    if !result.vocabulary.is_empty() {
        println!("\n--- Vocabulary ---");
        for entry in &result.vocabulary {
            println!("{} | {} | {}", entry.word, entry.translation, entry.context);
        }
    }

    if let Some(ref dir) = args.json_output_dir {
        let report = LyricsReport::from(&result);
        if let Err(e) = output::write_report(&report, dir).await {
            error!(error = %e, "Failed to write JSON report");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
