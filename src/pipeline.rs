//! The lyrics pipeline orchestrator.
//!
//! Candidates are tried strictly in priority order, one fetch in flight at
//! a time: lyric sites are rate-limit-sensitive, and extraction on
//! candidate *n* is pointless once candidate *n-1* succeeds. Every
//! per-candidate failure is logged with site, URL, and failure kind, then
//! skipped; the request only fails once the candidate list is exhausted.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::extractor::ContentExtractor;
use crate::fetcher::PageFetcher;
use crate::llm::{OllamaClient, ask_with_backoff, vocabulary_prompt};
use crate::models::{NormalizedLyrics, SongVocabulary, VocabularyEntry};
use crate::normalizer::normalize;
use crate::search;
use crate::vocab::parse_vocabulary;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error, info, instrument, warn};

static QUOTED_BY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]+)"\s+by\s+"([^"]+)""#).unwrap());
static PLAIN_BY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(.+?)\s+by\s+(.+)$").unwrap());
static DASHED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^-]+)-([^-]+)$").unwrap());

/// Split a free-text request into `(song, artist)`.
///
/// Patterns tried in order, first match wins: `"<song>" by "<artist>"`,
/// `<song> by <artist>`, `<song> - <artist>`. With no match the whole
/// request is the song and the artist is left empty.
pub fn parse_song_request(message: &str) -> (String, String) {
    for pattern in [&*QUOTED_BY, &*PLAIN_BY, &*DASHED] {
        if let Some(caps) = pattern.captures(message) {
            let song = caps[1].trim().to_string();
            let artist = caps[2].trim().to_string();
            if !song.is_empty() && !artist.is_empty() {
                return (song, artist);
            }
        }
    }
    (message.trim().to_string(), String::new())
}

/// One pipeline instance: owns its fetcher, extractor, and optional LLM
/// client. Independent instances share nothing and may run concurrently.
pub struct Pipeline {
    config: PipelineConfig,
    fetcher: PageFetcher,
    extractor: ContentExtractor,
    llm: Option<OllamaClient>,
}

impl Pipeline {
    /// Build a pipeline. `llm` of `None` skips the vocabulary stage.
    pub fn new(config: PipelineConfig, llm: Option<OllamaClient>) -> Result<Self, reqwest::Error> {
        let fetcher = PageFetcher::new(&config)?;
        let extractor = ContentExtractor::new(&config);
        Ok(Self {
            config,
            fetcher,
            extractor,
            llm,
        })
    }

    /// Run the full pipeline for one request.
    #[instrument(level = "info", skip(self))]
    pub async fn run(&self, request: &str) -> Result<SongVocabulary, PipelineError> {
        let (song, artist) = parse_song_request(request);
        info!(%song, %artist, "searching for lyrics");

        let candidates =
            search::generate(&self.config, &artist, &song, self.config.max_candidates);
        if candidates.is_empty() {
            return Err(PipelineError::AllCandidatesExhausted { attempts: 0 });
        }

        for candidate in &candidates {
            info!(site = %candidate.site_name, url = %candidate.url, title = %candidate.display_title, "trying candidate");

            let page = match self.fetcher.fetch(&candidate.url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(site = %candidate.site_name, url = %candidate.url, error = %e, "fetch failed; trying next candidate");
                    continue;
                }
            };
            debug!(
                status = page.status_code,
                fetched_at = %page.fetched_at,
                bytes = page.raw_html.len(),
                "candidate page fetched"
            );

            let extracted = match self.extractor.extract(&page.raw_html, &page.source_url) {
                Ok(extracted) => extracted,
                Err(e) => {
                    warn!(site = %candidate.site_name, url = %candidate.url, error = %e, "extraction failed; trying next candidate");
                    continue;
                }
            };

            info!(
                site = %candidate.site_name,
                extractor = ?extracted.extractor_used,
                lines = extracted.line_count,
                title = extracted.page_title.as_deref().unwrap_or(""),
                lang = extracted.language.as_deref().unwrap_or(""),
                "extracted lyrics"
            );

            let text = normalize(&extracted.raw_text);
            let line_count = text.lines().count();
            if line_count < self.config.min_line_count {
                warn!(site = %candidate.site_name, lines = line_count, "normalization left too little text; trying next candidate");
                continue;
            }

            let lyrics = NormalizedLyrics {
                text,
                artist: artist.clone(),
                song: song.clone(),
            };
            let vocabulary = self.build_vocabulary(&lyrics.text).await;

            return Ok(SongVocabulary {
                lyrics,
                vocabulary,
                source_url: extracted.source_url,
            });
        }

        Err(PipelineError::AllCandidatesExhausted {
            attempts: candidates.len(),
        })
    }

    /// Ask the model for vocabulary and parse its reply.
    ///
    /// A model failure degrades to an empty list: once lyrics are in hand
    /// the request no longer fails.
    async fn build_vocabulary(&self, lyrics: &str) -> Vec<VocabularyEntry> {
        let Some(client) = &self.llm else {
            info!("vocabulary stage disabled");
            return Vec::new();
        };

        match ask_with_backoff(client, &vocabulary_prompt(lyrics)).await {
            Ok(response) => {
                let entries = parse_vocabulary(&response);
                if entries.is_empty() {
                    warn!("model reply contained no parsable vocabulary lines");
                }
                entries
            }
            Err(e) => {
                error!(error = %e, "vocabulary extraction failed; continuing without vocabulary");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quoted_by_pattern() {
        let (song, artist) = parse_song_request(r#""Alors On Danse" by "Stromae""#);
        assert_eq!(song, "Alors On Danse");
        assert_eq!(artist, "Stromae");
    }

    #[test]
    fn test_parse_plain_by_pattern() {
        let (song, artist) = parse_song_request("Alors On Danse by Stromae");
        assert_eq!(song, "Alors On Danse");
        assert_eq!(artist, "Stromae");
    }

    #[test]
    fn test_parse_dashed_pattern() {
        let (song, artist) = parse_song_request("Alors On Danse - Stromae");
        assert_eq!(song, "Alors On Danse");
        assert_eq!(artist, "Stromae");
    }

    #[test]
    fn test_parse_fallback_whole_message_is_song() {
        let (song, artist) = parse_song_request("  Dernière Danse  ");
        assert_eq!(song, "Dernière Danse");
        assert_eq!(artist, "");
    }

    #[test]
    fn test_parse_first_pattern_wins() {
        // Quoted form takes priority over the bare "by" that also matches.
        let (song, artist) = parse_song_request(r#"find "La Vie En Rose" by "Edith Piaf" please"#);
        assert_eq!(song, "La Vie En Rose");
        assert_eq!(artist, "Edith Piaf");
    }

    #[tokio::test]
    async fn test_no_candidates_is_exhausted_immediately() {
        let config = PipelineConfig {
            sites: Vec::new(),
            ..PipelineConfig::default()
        };
        let pipeline = Pipeline::new(config, None).unwrap();
        let err = pipeline.run("Alors On Danse by Stromae").await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::AllCandidatesExhausted { attempts: 0 }
        ));
    }

    #[test]
    fn test_candidate_list_for_stromae_is_ordered_and_non_empty() {
        let config = PipelineConfig::default();
        let (song, artist) = parse_song_request("Alors On Danse by Stromae");
        let candidates = search::generate(&config, &artist, &song, config.max_candidates);

        assert!(!candidates.is_empty());
        // Declared configuration order, not computed.
        let names: Vec<_> = candidates.iter().map(|c| c.site_name.as_str()).collect();
        let configured: Vec<_> = config.sites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, &configured[..names.len()]);
    }
}
