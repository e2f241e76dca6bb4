#![forbid(unsafe_code)]

//! Feed pager: the ordered, growing list of items and the current position.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use parking_lot::Mutex;
use riffle_events::{EventBus, FeedEvent};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::{
    error::{FeedError, FeedResult},
    item::FeedItem,
    traits::source::ContentSource,
    types::FeedPhase,
};

/// Feed pager.
///
/// Owns the append-only item list and the current index; mediates every
/// content fetch so navigation never blocks on the network when avoidable.
/// The playback driver only ever reads the single current item.
pub struct Feed {
    source: Arc<dyn ContentSource>,
    bus: EventBus,
    cancel: CancellationToken,

    phase: Mutex<FeedPhase>,
    items: Mutex<Vec<Arc<FeedItem>>>,
    current: AtomicUsize,
    fetching_next: AtomicBool,
}

impl Feed {
    #[must_use]
    pub fn new(source: Arc<dyn ContentSource>, bus: EventBus, cancel: CancellationToken) -> Self {
        Self {
            source,
            bus,
            cancel,
            phase: Mutex::new(FeedPhase::Uninitialized),
            items: Mutex::new(Vec::new()),
            current: AtomicUsize::new(0),
            fetching_next: AtomicBool::new(false),
        }
    }

    /// Fetch the first two items, strictly one after the other (the content
    /// service is not assumed to tolerate concurrent calls), and move to
    /// `Ready` at index 0.
    ///
    /// # Errors
    ///
    /// Either fetch failing puts the feed into the terminal `Error` phase
    /// and propagates the failure; no partial feed is kept. Cancellation of
    /// the session token aborts with [`FeedError::Cancelled`] without
    /// mutating feed state.
    pub async fn initialize(&self) -> FeedResult<()> {
        *self.phase.lock() = FeedPhase::Loading;
        debug!("loading initial items");

        let first = self.startup_fetch().await?;
        let second = self.startup_fetch().await?;

        if self.cancel.is_cancelled() {
            return Err(FeedError::Cancelled);
        }

        {
            let mut items = self.items.lock();
            items.push(Arc::new(first));
            items.push(Arc::new(second));
        }
        self.current.store(0, Ordering::SeqCst);
        *self.phase.lock() = FeedPhase::Ready;
        debug!("feed ready");
        self.bus.publish(FeedEvent::Initialized { items: 2 });
        Ok(())
    }

    async fn startup_fetch(&self) -> FeedResult<FeedItem> {
        tokio::select! {
            () = self.cancel.cancelled() => Err(FeedError::Cancelled),
            result = self.source.fetch_next_item() => match result {
                Ok(item) => Ok(item),
                Err(e) => {
                    *self.phase.lock() = FeedPhase::Error;
                    Err(FeedError::Fetch(e))
                }
            },
        }
    }

    /// Move to the next item, if there is one. Safe to call anytime.
    ///
    /// Returns whether the position moved. Landing within one position of
    /// the known tail triggers a look-ahead prefetch unless one is already
    /// outstanding; advancing from the last known item is a complete no-op
    /// until a successful prefetch grows the list.
    pub fn advance(self: &Arc<Self>) -> bool {
        let len = self.items.lock().len();
        let current = self.current.load(Ordering::SeqCst);
        if len == 0 || current + 1 >= len {
            trace!(current, len, "advance past tail ignored");
            return false;
        }

        let next = current + 1;
        self.current.store(next, Ordering::SeqCst);
        debug!(index = next, "advanced");
        self.bus.publish(FeedEvent::Advanced { index: next });

        if next + 2 >= len {
            self.prefetch_next();
        }
        true
    }

    /// Start a background fetch of one more item.
    ///
    /// At most one prefetch is in flight at a time; a losing caller returns
    /// immediately. Failure never rolls back navigation: it is logged,
    /// published, and the guard cleared so a later trigger can retry.
    pub fn prefetch_next(self: &Arc<Self>) {
        if self
            .fetching_next
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            trace!("prefetch already in flight");
            return;
        }

        let feed = Arc::clone(self);
        tokio::spawn(async move {
            feed.run_prefetch().await;
            feed.fetching_next.store(false, Ordering::SeqCst);
        });
    }

    async fn run_prefetch(&self) {
        debug!("prefetching next item");
        tokio::select! {
            () = self.cancel.cancelled() => {
                trace!("prefetch cancelled");
            }
            result = self.source.fetch_next_item() => match result {
                Ok(item) => {
                    if self.cancel.is_cancelled() {
                        trace!("discarding prefetch result after cancellation");
                        return;
                    }
                    let count = {
                        let mut items = self.items.lock();
                        items.push(Arc::new(item));
                        items.len()
                    };
                    debug!(items = count, "item appended");
                    self.bus.publish(FeedEvent::ItemAppended { items: count });
                }
                Err(e) => {
                    warn!(error = %e, "prefetch failed");
                    self.bus.publish(FeedEvent::PrefetchFailed {
                        reason: e.to_string(),
                    });
                }
            },
        }
    }

    // -- Accessors --------------------------------------------------------

    #[must_use]
    pub fn phase(&self) -> FeedPhase {
        *self.phase.lock()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    /// The item at the current position, shared by reference.
    #[must_use]
    pub fn current_item(&self) -> Option<Arc<FeedItem>> {
        let items = self.items.lock();
        items.get(self.current.load(Ordering::SeqCst)).cloned()
    }

    #[must_use]
    pub fn is_fetching_next(&self) -> bool {
        self.fetching_next.load(Ordering::SeqCst)
    }
}
