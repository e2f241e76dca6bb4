#![allow(dead_code)]

//! Shared fixtures for the riffle-play integration suites.

use std::time::Duration;

use riffle_events::{Event, FeedEvent, PlaybackEvent};
use riffle_play::{Chunk, FeedItem};
use tokio::sync::broadcast;
use url::Url;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::default()
                .add_directive("warn".parse().expect("valid directive")),
        )
        .with_test_writer()
        .try_init();
}

pub fn media_base() -> Url {
    Url::parse("http://media.test/").unwrap()
}

/// Item named after `key`: video `{key}.mp4`, chunk `i` with text
/// `"{key} chunk {i}"` and audio `{key}-{i}.mp3`, attributed to a wiki page.
pub fn item(key: &str, chunks: usize) -> FeedItem {
    let chunks = (0..chunks)
        .map(|i| Chunk::new(format!("{key} chunk {i}"), format!("{key}-{i}.mp3")))
        .collect();
    FeedItem::new(format!("{key}.mp4"), chunks)
        .with_article_ref(format!("https://en.wikipedia.org/wiki/{key}"))
        .with_title(key)
}

/// Poll until `cond` holds, failing the test after two seconds.
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if cond() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

/// Receive events until one matches `pred`, failing the test after two
/// seconds. Non-playback events are skipped.
pub async fn wait_for_playback(
    rx: &mut broadcast::Receiver<Event>,
    pred: impl Fn(&PlaybackEvent) -> bool,
) -> PlaybackEvent {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let Event::Playback(event) = rx.recv().await.expect("event bus closed") {
                if pred(&event) {
                    return event;
                }
            }
        }
    })
    .await
    .expect("timed out waiting for playback event")
}

/// Receive events until one matches `pred`, failing the test after two
/// seconds. Non-feed events are skipped.
pub async fn wait_for_feed(
    rx: &mut broadcast::Receiver<Event>,
    pred: impl Fn(&FeedEvent) -> bool,
) -> FeedEvent {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let Event::Feed(event) = rx.recv().await.expect("event bus closed") {
                if pred(&event) {
                    return event;
                }
            }
        }
    })
    .await
    .expect("timed out waiting for feed event")
}
