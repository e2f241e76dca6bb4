#![forbid(unsafe_code)]

use crate::{FeedEvent, PlaybackEvent};

/// Unified event for the whole feed engine.
///
/// Hierarchical: each subsystem has its own variant with a sub-enum.
#[derive(Clone, Debug)]
pub enum Event {
    /// Feed pager event.
    Feed(FeedEvent),
    /// Per-item playback event.
    Playback(PlaybackEvent),
}

impl From<FeedEvent> for Event {
    fn from(e: FeedEvent) -> Self {
        Self::Feed(e)
    }
}

impl From<PlaybackEvent> for Event {
    fn from(e: PlaybackEvent) -> Self {
        Self::Playback(e)
    }
}
