#![forbid(unsafe_code)]

//! Session: composes the feed pager with a playback driver.

use std::sync::Arc;

use riffle_events::{Event, EventBus};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::{
    config::SessionConfig,
    error::{FeedError, FeedResult},
    feed::Feed,
    http::HttpContentSource,
    playback::Playback,
    traits::{media::MediaElement, source::ContentSource},
    types::Intent,
};

/// One viewing session: a feed of items, a current position, and a playback
/// driver for whichever item is current.
///
/// Control flow: user input, reduced to an [`Intent`], moves the pager; the
/// pager hands the newly current item to the driver; the driver runs that
/// item's autoplay/chunk cycle until the user advances again.
pub struct FeedSession {
    feed: Arc<Feed>,
    playback: Playback,
    bus: EventBus,
    cancel: CancellationToken,
}

impl std::fmt::Debug for FeedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSession").finish_non_exhaustive()
    }
}

impl FeedSession {
    /// Initialize the feed (two sequential fetches) and start playback of
    /// the first item.
    ///
    /// # Errors
    ///
    /// Fails with [`FeedError::Fetch`] when either startup fetch fails (the
    /// host shows a full-screen error; no items are rendered), with
    /// [`FeedError::Empty`] when startup produced no items, and with
    /// [`FeedError::Cancelled`] when the session token was cancelled before
    /// startup finished.
    pub async fn start<V: MediaElement, A: MediaElement>(
        config: SessionConfig,
        source: Arc<dyn ContentSource>,
        video: V,
        audio: A,
    ) -> FeedResult<Self> {
        let cancel = config.cancel.clone().unwrap_or_default();
        let bus = EventBus::new(config.event_capacity);

        let feed = Arc::new(Feed::new(source, bus.clone(), cancel.clone()));
        feed.initialize().await?;
        let first = feed.current_item().ok_or(FeedError::Empty)?;

        let playback = Playback::spawn(
            video,
            audio,
            config.playback_options(),
            bus.clone(),
            cancel.child_token(),
        );
        playback.set_item(first);

        Ok(Self {
            feed,
            playback,
            bus,
            cancel,
        })
    }

    /// Like [`FeedSession::start`], with content fetched over HTTP from the
    /// configured endpoint.
    ///
    /// # Errors
    ///
    /// See [`FeedSession::start`]; additionally fails when the endpoint URL
    /// cannot address the content service.
    pub async fn start_http<V: MediaElement, A: MediaElement>(
        config: SessionConfig,
        video: V,
        audio: A,
    ) -> FeedResult<Self> {
        let source = HttpContentSource::new(&config.endpoint, config.net.clone())?;
        Self::start(config, Arc::new(source), video, audio).await
    }

    /// Move to the next item and hand it to the playback driver. The driver
    /// compares identity keys, so an advance that lands on the same content
    /// never restarts playback.
    pub fn advance(&self) {
        if self.feed.advance() {
            if let Some(item) = self.feed.current_item() {
                self.playback.set_item(item);
            }
        }
    }

    /// Dispatch a reduced user gesture.
    pub fn handle_intent(&self, intent: Intent) {
        match intent {
            Intent::Advance => self.advance(),
            Intent::ToggleMute => self.playback.toggle_mute(),
            Intent::FollowLink => {
                // Outbound attribution links must navigate; the engine
                // stays out of the way.
                trace!("link tap passed through to the host");
            }
        }
    }

    /// End the session: cancels startup fetches, prefetches, and the
    /// playback driver. Late completions are discarded.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Subscribe to every event the session publishes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    #[must_use]
    pub fn feed(&self) -> &Arc<Feed> {
        &self.feed
    }

    #[must_use]
    pub fn playback(&self) -> &Playback {
        &self.playback
    }
}
