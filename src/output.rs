//! JSON report output.
//!
//! On request, a successful run is written to disk as
//! `{dir}/{artist-slug}_{song-slug}.json` so results can be consumed by
//! other tooling.

use crate::models::LyricsReport;
use crate::search::slugify;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`LyricsReport`] under `output_dir`, creating the directory if
/// needed.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir))]
pub async fn write_report(report: &LyricsReport, output_dir: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    let dir = output_dir.trim_end_matches('/');
    if let Err(e) = fs::create_dir_all(dir).await {
        error!(%dir, error = %e, "failed to create output dir");
        return Err(e.into());
    }

    let artist_slug = match slugify(&report.artist) {
        s if s.is_empty() => "unknown".to_string(),
        s => s,
    };
    let song_slug = match slugify(&report.song) {
        s if s.is_empty() => "untitled".to_string(),
        s => s,
    };
    let path = format!("{dir}/{artist_slug}_{song_slug}.json");

    fs::write(&path, json).await?;
    info!(%path, "wrote lyrics report");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VocabularyEntry;

    fn report() -> LyricsReport {
        LyricsReport {
            artist: "Stromae".to_string(),
            song: "Alors On Danse".to_string(),
            source_url: "https://www.paroles.net/stromae/paroles-alors-on-danse".to_string(),
            lyrics: "Alors on danse\nQui dit etude dit travail".to_string(),
            vocabulary: vec![VocabularyEntry {
                word: "danser".to_string(),
                translation: "to dance".to_string(),
                context: "Alors on danse".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn test_write_report_creates_slugged_file() {
        let dir = std::env::temp_dir().join("paroles_vocab_test_output");
        let dir = dir.to_str().unwrap().to_string();
        let _ = tokio::fs::remove_dir_all(&dir).await;

        write_report(&report(), &dir).await.unwrap();

        let path = format!("{dir}/stromae_alors-on-danse.json");
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["artist"], "Stromae");
        assert_eq!(parsed["vocabulary"][0]["word"], "danser");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
