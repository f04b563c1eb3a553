//! Error kinds for the lyrics pipeline.
//!
//! Each stage owns a small enum describing the ways it can fail. Per-candidate
//! failures ([`FetchError`], [`ExtractError`]) are logged and skipped by the
//! orchestrator; only [`PipelineError`] is surfaced to the caller.

use std::time::Duration;
use thiserror::Error;

/// Failures while fetching a candidate page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP request itself failed (DNS, TLS, connection reset, ...).
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The response arrived but cannot plausibly contain lyrics: non-2xx
    /// status, or a body too short to hold a song.
    #[error("invalid response: status {status}, body of {body_len} bytes")]
    Invalid { status: u16, body_len: usize },
}

/// Failures while extracting lyric text out of fetched HTML.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Text was found but fell below the minimum-line quality gate.
    #[error("extracted text too short: {0} non-empty lines")]
    TooShort(usize),

    /// No selector and no generic heuristic produced any text at all.
    #[error("no lyrics container found in page")]
    NoContainerFound,
}

/// Fatal, caller-facing pipeline failures.
///
/// Individual candidate failures never abort a request; the only way a
/// request fails is running out of candidates.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not extract lyrics from any of the {attempts} candidate pages")]
    AllCandidatesExhausted { attempts: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_fetch_error_mentions_status_and_length() {
        let e = FetchError::Invalid {
            status: 404,
            body_len: 12,
        };
        let msg = e.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn test_too_short_carries_line_count() {
        let e = ExtractError::TooShort(3);
        assert!(e.to_string().contains("3 non-empty lines"));
    }

    #[test]
    fn test_exhausted_reports_attempts() {
        let e = PipelineError::AllCandidatesExhausted { attempts: 4 };
        assert!(e.to_string().contains("4 candidate pages"));
    }
}
