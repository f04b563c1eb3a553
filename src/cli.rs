//! Command-line interface definitions.
//!
//! All options can be passed as flags; the Ollama endpoint and model also
//! fall back to environment variables.

use clap::Parser;

/// Find French song lyrics and build a vocabulary study list from them.
///
/// # Examples
///
/// ```sh
/// paroles_vocab "Alors On Danse by Stromae"
/// paroles_vocab --no-vocabulary "Dernière Danse - Indila"
/// paroles_vocab -j ./reports '"Formidable" by "Stromae"'
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Free-text request naming a song, e.g. "Alors On Danse by Stromae"
    pub request: String,

    /// Maximum number of candidate URLs to try
    #[arg(short = 'n', long, default_value_t = 3)]
    pub max_candidates: usize,

    /// Directory to write a JSON report into (optional)
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Base URL of the Ollama-compatible completion endpoint
    #[arg(long, env = "OLLAMA_URL", default_value = "http://localhost:11434")]
    pub ollama_url: String,

    /// Model name for vocabulary extraction
    #[arg(long, env = "OLLAMA_MODEL", default_value = "mistral")]
    pub model: String,

    /// Per-fetch HTTP timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub fetch_timeout_secs: u64,

    /// Minimum delay between fetches in seconds
    #[arg(long, default_value_t = 2)]
    pub fetch_delay_secs: u64,

    /// Skip the vocabulary stage entirely
    #[arg(long)]
    pub no_vocabulary: bool,
}
