//! Lyric text extraction from heterogeneous lyrics-site HTML.
//!
//! Extraction is an ordered cascade, first success wins:
//!
//! 1. If the source URL belongs to a known site, try that site's dedicated
//!    selector list ([`SiteExtractor`]), skipping nested ad/share/banner
//!    elements inside the matched container.
//! 2. Otherwise (or if the site selectors yield nothing usable), fall back
//!    to a generic heuristic: the single longest `p`/`div` block whose text
//!    is multi-line and longer than a threshold, then a loose scan for
//!    containers whose class or id looks lyrics-shaped.
//! 3. Gate the result on a minimum count of non-empty lines.
//!
//! Site-specific and generic results are never mixed for one page. The
//! per-site selector lists track third-party markup that drifts without
//! notice; they are data in one place, and adding a site is one enum arm
//! plus one list.
//!
//! Non-content tags (scripts, navigation, page furniture) are skipped
//! during text collection, so no extracted text ever contains markup.

use crate::config::PipelineConfig;
use crate::error::ExtractError;
use crate::models::{ExtractedText, ExtractorUsed};
use scraper::node::{Element, Node};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

/// Tags whose subtrees never contain lyrics.
const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "iframe", "meta", "link", "aside",
];

/// Elements nested inside a lyrics container are dropped when their class
/// or id carries one of these markers.
const NOISE_MARKERS: &[&str] = &["banner", "ad", "share", "social", "copyright", "translation"];

/// Elements that imply a line break after their text.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6",
    "blockquote", "pre", "tr",
];

/// Class/id substrings that mark a container as probably holding lyrics,
/// used by the loose fallback scan.
const LYRICS_CONTAINER_MARKERS: &[&str] =
    &["lyrics", "paroles", "song-text", "text-center", "main-text"];

/// Known lyrics sites with dedicated selector lists.
///
/// Closed set dispatched through exhaustive matches: adding a site means a
/// new arm in each method, nothing dynamic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteExtractor {
    ParolesNet,
    Paroles2Chansons,
    Greatsong,
    Genius,
    Musixmatch,
}

impl SiteExtractor {
    /// Map a source URL to its dedicated extractor, if any.
    pub fn for_url(source_url: &str) -> Option<Self> {
        let host = Url::parse(source_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))?;

        if host.contains("paroles.net") {
            Some(SiteExtractor::ParolesNet)
        } else if host.contains("paroles2chansons") {
            Some(SiteExtractor::Paroles2Chansons)
        } else if host.contains("greatsong") {
            Some(SiteExtractor::Greatsong)
        } else if host.contains("genius.com") {
            Some(SiteExtractor::Genius)
        } else if host.contains("musixmatch") {
            Some(SiteExtractor::Musixmatch)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SiteExtractor::ParolesNet => "paroles.net",
            SiteExtractor::Paroles2Chansons => "paroles2chansons.com",
            SiteExtractor::Greatsong => "greatsong.net",
            SiteExtractor::Genius => "genius.com",
            SiteExtractor::Musixmatch => "musixmatch.com",
        }
    }

    /// Prioritized selectors for this site's lyrics container.
    fn selectors(&self) -> &'static [&'static str] {
        match self {
            SiteExtractor::ParolesNet => &[
                "div.song-text",
                "#lyrics",
                "div.content-text",
                "div.text-center",
                "div.lyrics-body",
            ],
            SiteExtractor::Paroles2Chansons => &["div.content-lyrics", "div.song-text"],
            SiteExtractor::Greatsong => &["div.lyrics-body", "div.paroles"],
            SiteExtractor::Genius => &[
                r#"div[data-lyrics-container="true"]"#,
                "div.Lyrics__Container-sc-1ynbvzw-6",
                "div.lyrics",
            ],
            SiteExtractor::Musixmatch => &["span.lyrics__content__ok"],
        }
    }

    /// Run this site's selector list against the document; first selector
    /// with non-empty text wins. Noise elements inside the container are
    /// skipped.
    fn extract(&self, document: &Html) -> Option<String> {
        for &selector_str in self.selectors() {
            let Ok(selector) = Selector::parse(selector_str) else {
                warn!(site = self.name(), selector = selector_str, "unparseable selector");
                continue;
            };
            if let Some(container) = document.select(&selector).next() {
                let text = collect_text(container, true);
                let text = text.trim();
                if !text.is_empty() {
                    debug!(site = self.name(), selector = selector_str, "site selector matched");
                    return Some(text.to_string());
                }
            }
        }
        None
    }
}

/// The extraction stage: cascade of site-specific selectors falling back to
/// a generic largest-text-block heuristic, then a quality gate.
#[derive(Debug)]
pub struct ContentExtractor {
    min_block_len: usize,
    min_line_count: usize,
}

impl ContentExtractor {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            min_block_len: config.min_block_len,
            min_line_count: config.min_line_count,
        }
    }

    /// Extract lyric text from `html`, using `source_url` to pick a
    /// site-specific strategy when the domain is known.
    #[instrument(level = "debug", skip(self, html), fields(%source_url))]
    pub fn extract(&self, html: &str, source_url: &str) -> Result<ExtractedText, ExtractError> {
        let document = Html::parse_document(html);

        let page_title = page_title(&document);
        let language = document
            .root_element()
            .value()
            .attr("lang")
            .map(str::to_string);

        let mut text = None;
        let mut extractor_used = None;

        if let Some(site) = SiteExtractor::for_url(source_url) {
            if let Some(site_text) = site.extract(&document) {
                // A container that matched but holds almost nothing is
                // treated the same as no match: fall through to generic.
                if site_text.len() > self.min_block_len {
                    extractor_used = Some(ExtractorUsed::SiteSpecific(site.name().to_string()));
                    text = Some(site_text);
                } else {
                    debug!(site = site.name(), len = site_text.len(), "site selector text too short; falling back to generic heuristic");
                }
            }
        }

        if text.is_none() {
            if let Some(generic_text) = self.generic_extract(&document) {
                extractor_used = Some(ExtractorUsed::GenericHeuristic);
                text = Some(generic_text);
            }
        }

        let (Some(raw_text), Some(extractor_used)) = (text, extractor_used) else {
            return Err(ExtractError::NoContainerFound);
        };

        let line_count = raw_text.lines().filter(|l| !l.trim().is_empty()).count();
        if line_count < self.min_line_count {
            return Err(ExtractError::TooShort(line_count));
        }

        Ok(ExtractedText {
            raw_text,
            source_url: source_url.to_string(),
            extractor_used,
            line_count,
            page_title,
            language,
        })
    }

    /// Generic heuristic: the longest multi-line `p`/`div` text block over
    /// the length threshold, then a loose class/id scan for lyrics-shaped
    /// containers.
    fn generic_extract(&self, document: &Html) -> Option<String> {
        let block_selector = Selector::parse("p, div").ok()?;

        let mut best: Option<String> = None;
        for element in document.select(&block_selector) {
            let text = collect_text(element, false);
            let text = text.trim();
            if text.contains('\n') && text.len() > self.min_block_len {
                if best.as_ref().is_none_or(|b| text.len() > b.len()) {
                    best = Some(text.to_string());
                }
            }
        }
        if best.is_some() {
            debug!("generic heuristic: longest text block matched");
            return best;
        }

        // Loose pass: anything whose class or id looks like a lyrics
        // container, longest text wins.
        let any_selector = Selector::parse("*").ok()?;
        for element in document.select(&any_selector) {
            if !has_marker(element.value(), LYRICS_CONTAINER_MARKERS) {
                continue;
            }
            let text = collect_text(element, false);
            let text = text.trim();
            if !text.is_empty() && best.as_ref().is_none_or(|b| text.len() > b.len()) {
                best = Some(text.to_string());
            }
        }
        if best.is_some() {
            debug!("generic heuristic: loose container scan matched");
        }
        best
    }
}

/// Collect the visible text under `element`, skipping non-content tags
/// (and, when `skip_noise` is set, elements marked as ads/banners/etc).
/// Block-level elements and `<br>` contribute newlines.
fn collect_text(element: ElementRef<'_>, skip_noise: bool) -> String {
    let mut out = String::new();
    collect_text_into(element, skip_noise, &mut out);
    out
}

fn collect_text_into(element: ElementRef<'_>, skip_noise: bool, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let text: &str = text.as_ref();
                out.push_str(text);
            }
            Node::Element(_) => {
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = child_element.value().name();
                if NON_CONTENT_TAGS.contains(&name) {
                    continue;
                }
                if skip_noise && has_marker(child_element.value(), NOISE_MARKERS) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                collect_text_into(child_element, skip_noise, out);
                if BLOCK_TAGS.contains(&name) {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn has_marker(element: &Element, markers: &[&str]) -> bool {
    ["class", "id"].into_iter().any(|attr| {
        element.attr(attr).is_some_and(|value| {
            let value = value.to_lowercase();
            markers.iter().any(|marker| value.contains(marker))
        })
    })
}

fn page_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}
