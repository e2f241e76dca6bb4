use async_trait::async_trait;
use tokio::sync::broadcast;
use url::Url;

/// Failure starting playback on a media element.
#[derive(Clone, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MediaError {
    /// The platform declined to start playback without a preceding user
    /// gesture. Expected for unsolicited video autoplay; not a fault.
    #[error("playback not allowed without a user gesture")]
    NotAllowed,

    /// The element failed outright (bad resource, decoder error).
    #[error("media element failure: {0}")]
    Element(String),
}

/// Notifications a media element pushes back to the driver.
///
/// The driver registers interest in exactly these categories per item and
/// drops the subscription on teardown, so a torn-down item's callbacks can
/// never touch a newer item's state.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum MediaEvent {
    /// Enough data is buffered to begin playback.
    ReadyToPlay,
    /// The current track played to its natural end.
    Ended,
    /// The element failed to load or decode its resource.
    Failed { message: String },
}

/// One native-like media element (a video or audio channel), owned by the
/// rendering host and driven by exactly one playback driver at a time.
///
/// Mutators are fire-and-forget; only `play()` reports back, because
/// platforms reject play calls that lack a user gesture. Everything else the
/// driver learns through the event subscription.
#[async_trait]
pub trait MediaElement: Send + Sync + 'static {
    /// Point the element at a new resource. Implicitly stops playback of
    /// the previous one.
    fn set_source(&self, src: Url);

    /// Attempt to start playback.
    async fn play(&self) -> Result<(), MediaError>;

    /// Pause playback. Always succeeds.
    fn pause(&self);

    /// Whether the element restarts from the top when the track ends.
    fn set_looping(&self, looping: bool);

    /// Element-level (hardware) mute, independent of the engine's
    /// user-facing mute flag.
    fn set_element_muted(&self, muted: bool);

    /// Reset the play position to the start of the track.
    fn rewind(&self);

    /// Subscribe to this element's event stream.
    fn subscribe(&self) -> broadcast::Receiver<MediaEvent>;
}
