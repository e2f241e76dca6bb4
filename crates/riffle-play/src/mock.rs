#![forbid(unsafe_code)]

//! Scripted stand-ins for the two external seams: the content service and
//! the host's media elements.

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use parking_lot::Mutex;
use riffle_net::{NetError, NetResult};
use tokio::sync::{Semaphore, broadcast};
use url::Url;

use crate::{
    item::FeedItem,
    traits::{
        media::{MediaElement, MediaError, MediaEvent},
        source::ContentSource,
    },
};

// -- ScriptedSource -------------------------------------------------------

/// Content source that replays a queue of scripted responses.
///
/// Optionally gated: with a gate installed, each fetch blocks until the test
/// releases one permit, which is how in-flight fetches are held open to
/// observe guards and cancellation. Call counts and the high-water mark of
/// concurrent fetches are recorded for sequencing assertions.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<NetResult<FeedItem>>>,
    gate: Option<Arc<Semaphore>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a gate. Each fetch then waits for one permit from the
    /// returned handle before resolving.
    #[must_use]
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn push_item(&self, item: FeedItem) {
        self.responses.lock().push_back(Ok(item));
    }

    pub fn push_error(&self, error: NetError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Total fetch calls seen.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of fetches that were ever in flight at once.
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for ScriptedSource {
    async fn fetch_next_item(&self) -> NetResult<FeedItem> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(NetError::http("scripted responses exhausted")))
    }
}

// -- MockMediaElement -----------------------------------------------------

/// Calls a driver makes against a media element, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaCall {
    SetSource(Url),
    Play,
    Pause,
    SetLooping(bool),
    SetElementMuted(bool),
    Rewind,
}

struct MockMediaInner {
    events: broadcast::Sender<MediaEvent>,
    calls: Mutex<Vec<MediaCall>>,
    play_results: Mutex<VecDeque<Result<(), MediaError>>>,
}

/// Recording media element. Clones share state, so a test can keep one
/// handle for emitting events and assertions while the driver owns another.
#[derive(Clone)]
pub struct MockMediaElement {
    inner: Arc<MockMediaInner>,
}

impl Default for MockMediaElement {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMediaElement {
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            inner: Arc::new(MockMediaInner {
                events,
                calls: Mutex::new(Vec::new()),
                play_results: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// Emit a platform event toward the driver.
    pub fn emit(&self, event: MediaEvent) {
        let _ = self.inner.events.send(event);
    }

    /// Queue the outcome of the next `play()` call. Unqueued calls succeed.
    pub fn push_play_result(&self, result: Result<(), MediaError>) {
        self.inner.play_results.lock().push_back(result);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<MediaCall> {
        self.inner.calls.lock().clone()
    }

    #[must_use]
    pub fn last_source(&self) -> Option<Url> {
        self.inner
            .calls
            .lock()
            .iter()
            .rev()
            .find_map(|call| match call {
                MediaCall::SetSource(url) => Some(url.clone()),
                _ => None,
            })
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.inner
            .calls
            .lock()
            .iter()
            .filter(|call| matches!(call, MediaCall::Play))
            .count()
    }

    fn record(&self, call: MediaCall) {
        self.inner.calls.lock().push(call);
    }
}

#[async_trait]
impl MediaElement for MockMediaElement {
    fn set_source(&self, src: Url) {
        self.record(MediaCall::SetSource(src));
    }

    async fn play(&self) -> Result<(), MediaError> {
        self.record(MediaCall::Play);
        self.inner.play_results.lock().pop_front().unwrap_or(Ok(()))
    }

    fn pause(&self) {
        self.record(MediaCall::Pause);
    }

    fn set_looping(&self, looping: bool) {
        self.record(MediaCall::SetLooping(looping));
    }

    fn set_element_muted(&self, muted: bool) {
        self.record(MediaCall::SetElementMuted(muted));
    }

    fn rewind(&self) {
        self.record(MediaCall::Rewind);
    }

    fn subscribe(&self) -> broadcast::Receiver<MediaEvent> {
        self.inner.events.subscribe()
    }
}
