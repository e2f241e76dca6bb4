#![forbid(unsafe_code)]

/// Events published by the feed pager.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum FeedEvent {
    /// Startup fetches completed; the feed is ready.
    Initialized { items: usize },
    /// The current position moved forward.
    Advanced { index: usize },
    /// A background prefetch appended a new item to the tail.
    ItemAppended { items: usize },
    /// A background prefetch failed. Navigation is unaffected; the feed
    /// simply cannot grow past its current tail until a later retry.
    PrefetchFailed { reason: String },
}
