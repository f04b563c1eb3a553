//! Pipeline configuration: known lyrics sites, fetch behavior, quality gates.
//!
//! Everything tunable lives in [`PipelineConfig`], which is built once in
//! `main` and handed to each component. Site templates are data: adding a
//! lyrics site means appending a [`SiteTemplate`] entry, not touching
//! pipeline logic.

use std::time::Duration;

/// How a cleaned slug is shaped before substitution into a URL pattern.
///
/// Slugs arrive hyphen-joined (see `search::slugify`); sites disagree on the
/// separator they expect in paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTransform {
    /// Keep the hyphen-joined slug as-is (`alors-on-danse`).
    HyphenSlug,
    /// Replace hyphens with underscores (`alors_on_danse`).
    UnderscoreSlug,
    /// Drop separators entirely (`alorsondanse`).
    Joined,
}

impl FieldTransform {
    pub fn apply(&self, slug: &str) -> String {
        match self {
            FieldTransform::HyphenSlug => slug.to_string(),
            FieldTransform::UnderscoreSlug => slug.replace('-', "_"),
            FieldTransform::Joined => slug.replace('-', ""),
        }
    }
}

/// A known lyrics site: URL pattern with `{artist}` / `{song}` placeholders
/// plus per-field slug transforms.
#[derive(Debug, Clone)]
pub struct SiteTemplate {
    pub name: String,
    pub url_pattern: String,
    pub artist_transform: FieldTransform,
    pub song_transform: FieldTransform,
}

impl SiteTemplate {
    pub fn new(name: &str, url_pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            url_pattern: url_pattern.to_string(),
            artist_transform: FieldTransform::HyphenSlug,
            song_transform: FieldTransform::HyphenSlug,
        }
    }
}

/// The full configuration for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Lyrics sites to try, in priority order.
    pub sites: Vec<SiteTemplate>,
    /// Artist slug used when the request names no artist.
    pub default_artist: String,
    /// Upper bound on generated candidates per request.
    pub max_candidates: usize,
    /// Browser-like user agent sent with every fetch.
    pub user_agent: String,
    /// Per-request HTTP timeout.
    pub fetch_timeout: Duration,
    /// Minimum pause between successive fetches within one run.
    pub fetch_delay: Duration,
    /// Bodies shorter than this cannot plausibly contain lyrics.
    pub min_body_len: usize,
    /// Quality gate: accepted lyrics need at least this many non-empty lines.
    pub min_line_count: usize,
    /// Generic heuristic: a text block must exceed this length to qualify.
    pub min_block_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sites: default_sites(),
            default_artist: "indila".to_string(),
            max_candidates: 3,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            fetch_timeout: Duration::from_secs(10),
            fetch_delay: Duration::from_secs(2),
            min_body_len: 100,
            min_line_count: 5,
            min_block_len: 100,
        }
    }
}

/// The shipped site table, highest priority first.
///
/// These URL shapes track third-party markup and drift without notice; treat
/// this list as replaceable configuration, not gospel.
pub fn default_sites() -> Vec<SiteTemplate> {
    vec![
        SiteTemplate::new("paroles.net", "https://www.paroles.net/{artist}/paroles-{song}"),
        SiteTemplate::new(
            "paroles2chansons.com",
            "https://paroles2chansons.lemonde.fr/paroles-{artist}/paroles-{song}.html",
        ),
        SiteTemplate::new(
            "greatsong.net",
            "https://www.greatsong.net/paroles/{artist}/{song}",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_transforms() {
        assert_eq!(FieldTransform::HyphenSlug.apply("alors-on-danse"), "alors-on-danse");
        assert_eq!(FieldTransform::UnderscoreSlug.apply("alors-on-danse"), "alors_on_danse");
        assert_eq!(FieldTransform::Joined.apply("alors-on-danse"), "alorsondanse");
    }

    #[test]
    fn test_default_sites_have_both_placeholders() {
        for site in default_sites() {
            assert!(site.url_pattern.contains("{artist}"), "{}", site.name);
            assert!(site.url_pattern.contains("{song}"), "{}", site.name);
        }
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.fetch_delay, Duration::from_secs(2));
        assert_eq!(config.min_line_count, 5);
        assert!(!config.sites.is_empty());
    }
}
