//! Lyric text normalization.
//!
//! [`normalize`] is a pure, deterministic, idempotent function applied to
//! extractor output before it becomes [`crate::models::NormalizedLyrics`].
//! Stages, in order:
//!
//! 1. Collapse whitespace around newlines; squeeze 3+ blank lines to one.
//! 2. Strip `[Verse]`/`[Chorus]`/`[Bridge]` markers and remaining
//!    bracketed or parenthesized annotation spans inline.
//! 3. Per trimmed line, drop boilerplate: "Paroles de la chanson ..."
//!    headers, bare `verse:`-style labels, site chrome (cookie banners,
//!    social links, ...), and empties.
//! 4. Re-join the survivors with single newlines.
//!
//! Span stripping runs before the per-line checks: removing an annotation
//! can expose a boilerplate line (`verse[1]:` becomes `verse:`) that the
//! same application must still drop, or idempotence breaks.

use once_cell::sync::Lazy;
use regex::Regex;

static WS_AROUND_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*\n[ \t]*").unwrap());
static EXCESS_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
// Matched against individual, already-trimmed lines.
static PAROLES_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^paroles de la chanson").unwrap());
static SECTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[(?:verse|chorus|bridge)[^\]]*\]").unwrap());
static SECTION_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:verse\s*\d*|chorus|bridge)\s*:$").unwrap());
static BRACKETED_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static PARENTHESIZED_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());

/// Lines containing any of these (lowercased) are site chrome, not lyrics.
const BOILERPLATE_TOKENS: &[&str] = &[
    "cookie",
    "privacy",
    "copyright",
    "newsletter",
    "subscribe",
    "sign up",
    "facebook",
    "twitter",
    "conditions",
    "terms",
    "contact",
    "about",
    "advertising",
    "policy",
];

/// Clean raw extracted lyric text. Idempotent: `normalize(normalize(x))`
/// always equals `normalize(x)`.
pub fn normalize(raw_text: &str) -> String {
    // Stage 1: whitespace discipline around newlines.
    let text = WS_AROUND_NEWLINE.replace_all(raw_text, "\n");
    let text = EXCESS_BLANK_LINES.replace_all(&text, "\n\n");

    // Stage 2: section markers and inline annotation spans.
    let text = SECTION_MARKER.replace_all(&text, "");
    let text = BRACKETED_SPAN.replace_all(&text, "");
    let text = PARENTHESIZED_SPAN.replace_all(&text, "");

    // Stages 3 and 4: per-line boilerplate checks on trimmed lines, then
    // re-join the survivors.
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !PAROLES_HEADER.is_match(line))
        .filter(|line| !SECTION_LABEL.is_match(line))
        .filter(|line| {
            let lowered = line.to_lowercase();
            !BOILERPLATE_TOKENS.iter().any(|tok| lowered.contains(tok))
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
