#![forbid(unsafe_code)]

//! Per-item playback driver.
//!
//! Keeps a looping, element-muted video playing continuously while a second
//! audio channel plays the item's narration chunk by chunk, and keeps the
//! visible subtitle in lockstep with the chunk currently in the audio
//! element. Audio end-of-track events are the only narration clock; the
//! video loops on its own and is explicitly rewound once per full narration
//! cycle so both boundaries stay visually aligned.

use std::sync::Arc;

use parking_lot::Mutex;
use riffle_events::{EventBus, PlaybackEvent};
use riffle_net::resolve;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::{
    config::PlaybackOptions,
    item::FeedItem,
    traits::media::{MediaElement, MediaEvent},
    types::MutePolicy,
};

#[derive(Debug, Default)]
struct PlaybackState {
    item: Option<Arc<FeedItem>>,
    chunk_index: usize,
    muted: bool,
    video_ready: bool,
    video_error: Option<String>,
    audio_error: Option<String>,
}

type Shared = Arc<Mutex<PlaybackState>>;

enum PlaybackCmd {
    SetItem(Arc<FeedItem>),
    ToggleMute,
}

/// Handle to a running playback driver.
///
/// The driver task exclusively owns one video and one audio element; this
/// handle sends it commands and reads its state for rendering. Dropping the
/// handle does not stop the driver; cancel the token via [`Playback::shutdown`].
pub struct Playback {
    shared: Shared,
    cmd_tx: mpsc::UnboundedSender<PlaybackCmd>,
    cancel: CancellationToken,
}

impl Playback {
    /// Start a driver task over the two media elements.
    ///
    /// The element subscriptions are taken before the task starts, so no
    /// event emitted after this call can be missed.
    #[must_use]
    pub fn spawn<V: MediaElement, A: MediaElement>(
        video: V,
        audio: A,
        options: PlaybackOptions,
        bus: EventBus,
        cancel: CancellationToken,
    ) -> Self {
        let shared: Shared = Arc::new(Mutex::new(PlaybackState {
            muted: options.start_muted,
            ..PlaybackState::default()
        }));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let driver = Driver {
            video_rx: video.subscribe(),
            audio_rx: audio.subscribe(),
            video,
            audio,
            options,
            bus,
            shared: Arc::clone(&shared),
            cancel: cancel.clone(),
            cmd_rx,
        };
        tokio::spawn(driver.run());

        Self {
            shared,
            cmd_tx,
            cancel,
        }
    }

    /// Hand the driver the item to display.
    ///
    /// An item carrying the same identity key as the one already playing
    /// keeps all progress (incidental re-assignments never restart
    /// playback); a different key resets chunk position and errors and
    /// reloads both channels.
    pub fn set_item(&self, item: Arc<FeedItem>) {
        let _ = self.cmd_tx.send(PlaybackCmd::SetItem(item));
    }

    /// Toggle narration mute. The single entry point for the user's
    /// hear/silence intent; also serves as the user gesture that unlocks
    /// platform playback.
    pub fn toggle_mute(&self) {
        let _ = self.cmd_tx.send(PlaybackCmd::ToggleMute);
    }

    /// Stop the driver. Pending media events and commands are dropped
    /// without touching state.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    // -- State for the rendering host -------------------------------------

    #[must_use]
    pub fn item(&self) -> Option<Arc<FeedItem>> {
        self.shared.lock().item.clone()
    }

    /// The subtitle for the chunk currently in the audio element.
    #[must_use]
    pub fn subtitle(&self) -> Option<String> {
        let state = self.shared.lock();
        let item = state.item.as_ref()?;
        item.chunk(state.chunk_index).map(|c| c.text.clone())
    }

    #[must_use]
    pub fn chunk_index(&self) -> usize {
        self.shared.lock().chunk_index
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.shared.lock().muted
    }

    #[must_use]
    pub fn is_video_ready(&self) -> bool {
        self.shared.lock().video_ready
    }

    #[must_use]
    pub fn video_error(&self) -> Option<String> {
        self.shared.lock().video_error.clone()
    }

    #[must_use]
    pub fn audio_error(&self) -> Option<String> {
        self.shared.lock().audio_error.clone()
    }
}

enum Step {
    Cancelled,
    Cmd(Option<PlaybackCmd>),
    Video(Result<MediaEvent, broadcast::error::RecvError>),
    Audio(Result<MediaEvent, broadcast::error::RecvError>),
}

struct Driver<V, A> {
    video: V,
    audio: A,
    video_rx: broadcast::Receiver<MediaEvent>,
    audio_rx: broadcast::Receiver<MediaEvent>,
    options: PlaybackOptions,
    bus: EventBus,
    shared: Shared,
    cancel: CancellationToken,
    cmd_rx: mpsc::UnboundedReceiver<PlaybackCmd>,
}

impl<V: MediaElement, A: MediaElement> Driver<V, A> {
    /// Single event loop serializing commands and media events. Chunk
    /// transitions cannot overlap: the next chunk's audio is not loaded
    /// until the previous one's end-of-track has been handled here.
    async fn run(mut self) {
        trace!("playback driver started");
        loop {
            let step = tokio::select! {
                biased;
                () = self.cancel.cancelled() => Step::Cancelled,
                cmd = self.cmd_rx.recv() => Step::Cmd(cmd),
                event = self.video_rx.recv() => Step::Video(event),
                event = self.audio_rx.recv() => Step::Audio(event),
            };

            match step {
                Step::Cancelled | Step::Cmd(None) => break,
                Step::Cmd(Some(PlaybackCmd::SetItem(item))) => self.assign_item(item).await,
                Step::Cmd(Some(PlaybackCmd::ToggleMute)) => self.toggle_mute().await,
                Step::Video(Ok(event)) => self.on_video_event(event).await,
                Step::Audio(Ok(event)) => self.on_audio_event(event).await,
                Step::Video(Err(broadcast::error::RecvError::Lagged(missed))) => {
                    warn!(missed, "video event stream lagged");
                }
                Step::Audio(Err(broadcast::error::RecvError::Lagged(missed))) => {
                    warn!(missed, "audio event stream lagged");
                }
                Step::Video(Err(broadcast::error::RecvError::Closed))
                | Step::Audio(Err(broadcast::error::RecvError::Closed)) => break,
            }
        }
        trace!("playback driver stopped");
    }

    async fn assign_item(&mut self, item: Arc<FeedItem>) {
        let same_identity = {
            let state = self.shared.lock();
            state
                .item
                .as_ref()
                .is_some_and(|current| current.identity_key() == item.identity_key())
        };
        if same_identity {
            // Same item, possibly with enriched metadata. Keep chunk
            // position and error state untouched.
            trace!(key = item.identity_key(), "item identity unchanged");
            self.shared.lock().item = Some(item);
            return;
        }

        debug!(key = item.identity_key(), "item changed");
        let remuted = {
            let mut state = self.shared.lock();
            // Re-muting is a transition policy; the first item keeps the
            // configured starting state.
            let is_transition = state.item.is_some();
            state.item = Some(Arc::clone(&item));
            state.chunk_index = 0;
            state.video_ready = false;
            state.video_error = None;
            state.audio_error = None;
            if is_transition
                && self.options.mute_policy == MutePolicy::RemuteOnAdvance
                && !state.muted
            {
                state.muted = true;
                true
            } else {
                false
            }
        };
        if remuted {
            self.audio.pause();
            self.bus.publish(PlaybackEvent::MuteChanged { muted: true });
        }

        // The video element stays hardware-muted and looping at all times;
        // narration sound is carried entirely by the audio channel.
        self.video.set_element_muted(true);
        self.video.set_looping(true);
        match resolve(&self.options.media_base, &item.video_ref) {
            Ok(src) => self.video.set_source(src),
            Err(e) => self.fail_video(&item.video_ref, &e.to_string()),
        }

        self.load_current_chunk().await;
    }

    /// (Re)load the audio element with the current chunk and auto-start it
    /// when unmuted.
    async fn load_current_chunk(&mut self) {
        let Some((chunk, index, muted)) = ({
            let state = self.shared.lock();
            state.item.as_ref().and_then(|item| {
                item.chunk(state.chunk_index)
                    .map(|chunk| (chunk.clone(), state.chunk_index, state.muted))
            })
        }) else {
            return;
        };

        let src = match resolve(&self.options.media_base, &chunk.audio_ref) {
            Ok(src) => src,
            Err(e) => {
                self.fail_audio(&chunk.audio_ref, &e.to_string());
                return;
            }
        };

        trace!(index, src = %src, "loading narration chunk");
        self.audio.set_source(src);
        self.bus.publish(PlaybackEvent::ChunkStarted { index });

        if !muted {
            if let Err(e) = self.audio.play().await {
                self.fail_audio(&chunk.audio_ref, &e.to_string());
            }
        }
    }

    /// Audio end-of-track: select the next chunk, wrapping to the start of
    /// the cycle. On wraparound the video position is rewound so the loop
    /// boundary and the narration cycle re-align.
    async fn advance_chunk(&mut self) {
        let wrapped = {
            let mut state = self.shared.lock();
            let Some(item) = state.item.as_ref() else {
                return;
            };
            if state.chunk_index + 1 < item.chunks.len() {
                state.chunk_index += 1;
                false
            } else {
                state.chunk_index = 0;
                true
            }
        };

        if wrapped {
            self.video.rewind();
            self.bus.publish(PlaybackEvent::CycleRestarted);
        }
        self.load_current_chunk().await;
    }

    async fn toggle_mute(&mut self) {
        let muted = self.shared.lock().muted;
        if muted {
            // The toggle itself is the user gesture the platform wants, so
            // start the audio first and only expose the flip on success.
            match self.audio.play().await {
                Ok(()) => {
                    self.shared.lock().muted = false;
                    self.bus.publish(PlaybackEvent::MuteChanged { muted: false });
                }
                Err(e) => {
                    if let Some(audio_ref) = self.current_audio_ref() {
                        self.fail_audio(&audio_ref, &e.to_string());
                    }
                }
            }
        } else {
            self.audio.pause();
            self.shared.lock().muted = true;
            self.bus.publish(PlaybackEvent::MuteChanged { muted: true });
        }
    }

    async fn on_video_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::ReadyToPlay => {
                {
                    let mut state = self.shared.lock();
                    state.video_ready = true;
                    state.video_error = None;
                }
                self.bus.publish(PlaybackEvent::VideoReady);
                if let Err(e) = self.video.play().await {
                    // Normal on mobile: autoplay needs a gesture, and the
                    // next tap provides one. Not an error state.
                    debug!(error = %e, "video autoplay blocked");
                    self.bus.publish(PlaybackEvent::AutoplayBlocked);
                }
            }
            MediaEvent::Ended => {
                trace!("video loop ended");
            }
            MediaEvent::Failed { message } => {
                let video_ref = self
                    .shared
                    .lock()
                    .item
                    .as_ref()
                    .map(|item| item.video_ref.clone())
                    .unwrap_or_default();
                self.fail_video(&video_ref, &message);
            }
        }
    }

    async fn on_audio_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::Ended => self.advance_chunk().await,
            MediaEvent::Failed { message } => {
                if let Some(audio_ref) = self.current_audio_ref() {
                    self.fail_audio(&audio_ref, &message);
                }
            }
            MediaEvent::ReadyToPlay => {
                trace!("audio ready");
            }
        }
    }

    fn current_audio_ref(&self) -> Option<String> {
        let state = self.shared.lock();
        let item = state.item.as_ref()?;
        item.chunk(state.chunk_index).map(|c| c.audio_ref.clone())
    }

    fn fail_video(&self, video_ref: &str, message: &str) {
        warn!(src = video_ref, message, "video failed");
        {
            let mut state = self.shared.lock();
            state.video_ready = false;
            state.video_error = Some(format!("failed to load video {video_ref}: {message}"));
        }
        self.bus.publish(PlaybackEvent::VideoFailed {
            src: video_ref.to_string(),
        });
    }

    fn fail_audio(&self, audio_ref: &str, message: &str) {
        warn!(src = audio_ref, message, "audio failed");
        self.shared.lock().audio_error =
            Some(format!("failed to play audio {audio_ref}: {message}"));
        self.bus.publish(PlaybackEvent::AudioFailed {
            src: audio_ref.to_string(),
        });
    }
}
