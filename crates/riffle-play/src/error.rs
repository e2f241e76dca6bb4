#![forbid(unsafe_code)]

use riffle_net::NetError;
use thiserror::Error;

/// Errors surfaced by the feed pager and session.
///
/// Notes:
/// - `Fetch` covers both startup fetches; either failing leaves the feed in
///   a terminal error state with no items shown.
/// - `Empty` is the defensive zero-items-after-startup case.
/// - `Cancelled` means the owning session ended before startup resolved;
///   late results were discarded without touching feed state.
/// - Media failures are not represented here: they are per-item, per-channel
///   state on the playback driver, never fatal to the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FeedError {
    #[error("content fetch failed: {0}")]
    Fetch(#[from] NetError),

    #[error("no content available")]
    Empty,

    #[error("session cancelled")]
    Cancelled,
}

pub type FeedResult<T> = Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::fetch(
        FeedError::Fetch(NetError::http_status(502, "http://feed.test/next-content")),
        "content fetch failed: HTTP 502 for URL: http://feed.test/next-content"
    )]
    #[case::empty(FeedError::Empty, "no content available")]
    #[case::cancelled(FeedError::Cancelled, "session cancelled")]
    fn error_display(#[case] error: FeedError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn net_error_converts() {
        let err: FeedError = NetError::Timeout.into();
        assert!(matches!(err, FeedError::Fetch(NetError::Timeout)));
    }
}
