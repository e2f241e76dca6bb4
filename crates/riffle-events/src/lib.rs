#![forbid(unsafe_code)]

mod bus;
mod event;
mod feed;
mod playback;

pub use bus::EventBus;
pub use event::Event;
pub use feed::FeedEvent;
pub use playback::PlaybackEvent;
