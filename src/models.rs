//! Data models for each stage of the lyrics pipeline.
//!
//! The pipeline hands a small set of owned structs from stage to stage:
//! - [`SearchCandidate`]: a URL worth trying, produced by the generator
//! - [`FetchedPage`]: raw HTML from one fetch attempt, discarded after extraction
//! - [`ExtractedText`]: lyric text that passed the extractor's quality gate
//! - [`NormalizedLyrics`]: the final cleaned lyrics
//! - [`VocabularyEntry`]: one parsed `word | translation | context` line
//! - [`LyricsReport`]: the serialized response handed to the caller

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A candidate lyrics-page URL on a known site.
///
/// Immutable once produced; consumed exactly once by the fetcher.
#[derive(Debug, Clone)]
pub struct SearchCandidate {
    pub url: String,
    pub site_name: String,
    pub display_title: String,
}

/// Raw HTML from a single fetch attempt. Never persisted.
#[derive(Debug)]
pub struct FetchedPage {
    pub source_url: String,
    pub raw_html: String,
    pub status_code: u16,
    pub fetched_at: DateTime<Local>,
}

/// Which extraction strategy produced the accepted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorUsed {
    /// A dedicated per-site selector list matched.
    SiteSpecific(String),
    /// The largest-text-block fallback matched.
    GenericHeuristic,
}

/// Lyric text that passed the extractor's quality gate.
///
/// `raw_text` contains no HTML tags and splits into at least the configured
/// minimum number of non-empty lines. Title and language are advisory
/// metadata and play no part in acceptance.
#[derive(Debug)]
pub struct ExtractedText {
    pub raw_text: String,
    pub source_url: String,
    pub extractor_used: ExtractorUsed,
    pub line_count: usize,
    pub page_title: Option<String>,
    pub language: Option<String>,
}

/// The final pipeline artifact: cleaned lyrics tied to the request.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedLyrics {
    pub text: String,
    pub artist: String,
    pub song: String,
}

/// One vocabulary study item parsed from the model's reply.
///
/// All three fields are non-empty by construction; duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub word: String,
    pub translation: String,
    pub context: String,
}

/// A successful pipeline run: lyrics plus the vocabulary built from them.
#[derive(Debug)]
pub struct SongVocabulary {
    pub lyrics: NormalizedLyrics,
    pub vocabulary: Vec<VocabularyEntry>,
    pub source_url: String,
}

/// The JSON payload written for a successful request.
#[derive(Debug, Serialize)]
pub struct LyricsReport {
    pub artist: String,
    pub song: String,
    pub source_url: String,
    pub lyrics: String,
    pub vocabulary: Vec<VocabularyEntry>,
}

impl From<&SongVocabulary> for LyricsReport {
    fn from(result: &SongVocabulary) -> Self {
        Self {
            artist: result.lyrics.artist.clone(),
            song: result.lyrics.song.clone(),
            source_url: result.source_url.clone(),
            lyrics: result.lyrics.text.clone(),
            vocabulary: result.vocabulary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_entry_round_trips_through_json() {
        let entry = VocabularyEntry {
            word: "coeur".to_string(),
            translation: "heart".to_string(),
            context: "Mon coeur bat pour toi".to_string(),
        };

        let json = serde_json::to_string(&entry).unwrap();
        let back: VocabularyEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_report_from_song_vocabulary() {
        let result = SongVocabulary {
            lyrics: NormalizedLyrics {
                text: "Qui dit etude dit travail".to_string(),
                artist: "Stromae".to_string(),
                song: "Alors On Danse".to_string(),
            },
            vocabulary: vec![VocabularyEntry {
                word: "danser".to_string(),
                translation: "to dance".to_string(),
                context: "Alors on danse".to_string(),
            }],
            source_url: "https://www.paroles.net/stromae/paroles-alors-on-danse".to_string(),
        };

        let report = LyricsReport::from(&result);
        assert_eq!(report.artist, "Stromae");
        assert_eq!(report.song, "Alors On Danse");
        assert_eq!(report.vocabulary.len(), 1);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"lyrics\""));
        assert!(json.contains("\"vocabulary\""));
    }

    #[test]
    fn test_extractor_used_distinguishes_strategies() {
        let site = ExtractorUsed::SiteSpecific("paroles.net".to_string());
        let generic = ExtractorUsed::GenericHeuristic;
        assert_ne!(site, generic);
    }
}
