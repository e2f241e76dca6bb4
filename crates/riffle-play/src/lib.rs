#![forbid(unsafe_code)]

mod config;
mod error;
mod feed;
mod http;
mod item;
mod playback;
mod session;
mod types;

pub mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use config::{PlaybackOptions, SessionConfig};
pub use error::{FeedError, FeedResult};
pub use feed::Feed;
pub use http::HttpContentSource;
pub use item::{Chunk, FeedItem};
pub use playback::Playback;
pub use session::FeedSession;
pub use traits::{
    media::{MediaElement, MediaError, MediaEvent},
    source::ContentSource,
};
pub use types::{FeedPhase, Intent, MutePolicy};
