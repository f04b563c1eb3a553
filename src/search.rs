//! Candidate URL generation from artist and song names.
//!
//! Turns `(artist, song)` into an ordered list of [`SearchCandidate`]s by
//! slugifying both names and substituting them into each configured site
//! template in priority order. Generation never fails: an unparseable
//! substitution is logged and skipped, and an empty artist falls back to a
//! configured default token.

use crate::config::PipelineConfig;
use crate::models::SearchCandidate;
use tracing::{debug, instrument, warn};
use url::Url;

/// Convert free text to a lowercase, accent-stripped, hyphen-joined slug
/// safe for embedding in a URL path.
///
/// French diacritics are transliterated through an explicit table; anything
/// outside `[a-z0-9 -]` is dropped; whitespace runs collapse to single
/// hyphens.
pub fn slugify(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        let c = match c {
            'é' | 'è' | 'ê' => 'e',
            'à' | 'â' => 'a',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'û' | 'ù' => 'u',
            'ç' => 'c',
            c => c,
        };
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            cleaned.push(c);
        } else if c.is_whitespace() {
            cleaned.push(' ');
        }
        // everything else is dropped
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Generate up to `max_results` candidate URLs, walking the configured site
/// templates in declared priority order.
#[instrument(level = "debug", skip(config))]
pub fn generate(
    config: &PipelineConfig,
    artist: &str,
    song: &str,
    max_results: usize,
) -> Vec<SearchCandidate> {
    let artist_slug = match slugify(artist) {
        s if s.is_empty() => config.default_artist.clone(),
        s => s,
    };
    let song_slug = slugify(song);

    let mut candidates = Vec::new();
    for site in &config.sites {
        if candidates.len() >= max_results {
            break;
        }

        let url = site
            .url_pattern
            .replace("{artist}", &site.artist_transform.apply(&artist_slug))
            .replace("{song}", &site.song_transform.apply(&song_slug));

        // Malformed substitution is a skip, never fatal.
        if Url::parse(&url).is_err() {
            warn!(site = %site.name, %url, "candidate URL did not parse; skipping site");
            continue;
        }

        debug!(site = %site.name, %url, "generated candidate URL");
        candidates.push(SearchCandidate {
            url,
            site_name: site.name.clone(),
            display_title: format!(
                "Lyrics for {} by {} on {}",
                song.trim(),
                artist.trim(),
                site.name
            ),
        });
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteTemplate;

    fn config() -> PipelineConfig {
        PipelineConfig::default()
    }

    #[test]
    fn test_slugify_transliterates_french_diacritics() {
        assert_eq!(slugify("Dernière Danse"), "derniere-danse");
        assert_eq!(slugify("Ça va"), "ca-va");
        assert_eq!(slugify("Père Noël"), "pere-nol");
        assert_eq!(slugify("Âme Sœur"), "ame-sur");
    }

    #[test]
    fn test_slugify_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(slugify("Alors   On  Danse"), "alors-on-danse");
        assert_eq!(slugify("Formidable!"), "formidable");
        assert_eq!(slugify("Qu'est-ce qu'on attend?"), "quest-ce-quon-attend");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slug_charset_property() {
        // Every slug stays inside [a-z0-9-], whatever the input.
        let inputs = [
            "Stromae",
            "Édith Piaf",
            "MC Solaar & IAM",
            "  l'été indien  ",
            "99 Luftballons",
            "!!!",
        ];
        for input in inputs {
            let slug = slugify(input);
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "slug {slug:?} from {input:?} contains invalid characters"
            );
        }
    }

    #[test]
    fn test_generate_walks_sites_in_priority_order() {
        let config = config();
        let candidates = generate(&config, "Stromae", "Alors On Danse", 10);

        assert!(!candidates.is_empty());
        assert_eq!(candidates[0].site_name, "paroles.net");
        assert_eq!(
            candidates[0].url,
            "https://www.paroles.net/stromae/paroles-alors-on-danse"
        );
        assert!(candidates[0].display_title.contains("Alors On Danse"));
        assert!(candidates[0].display_title.contains("Stromae"));
    }

    #[test]
    fn test_generate_respects_max_results() {
        let config = config();
        let candidates = generate(&config, "Stromae", "Papaoutai", 1);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_generate_empty_artist_falls_back_to_default() {
        let config = config();
        let candidates = generate(&config, "", "Derniere Danse", 10);
        assert!(!candidates.is_empty());
        assert!(
            candidates[0].url.contains(&config.default_artist),
            "expected default artist in {}",
            candidates[0].url
        );
    }

    #[test]
    fn test_generate_skips_unparseable_pattern() {
        let mut config = config();
        config.sites.insert(
            0,
            SiteTemplate::new("broken", "not a url at all {artist} {song}"),
        );
        let candidates = generate(&config, "Stromae", "Papaoutai", 10);
        assert!(candidates.iter().all(|c| c.site_name != "broken"));
        assert!(!candidates.is_empty());
    }
}
