mod common;

use std::sync::Arc;

use riffle_play::{
    FeedError, Intent, MutePolicy, SessionConfig, FeedSession,
    mock::{MockMediaElement, ScriptedSource},
};
use riffle_net::NetError;
use url::Url;

use common::{item, wait_until};

fn config() -> SessionConfig {
    SessionConfig::new(Url::parse("http://feed.test/").unwrap())
        .with_media_base(common::media_base())
}

#[tokio::test]
async fn session_plays_first_item_then_advances_and_prefetches() {
    common::init_tracing();
    let source = Arc::new(ScriptedSource::new());
    source.push_item(item("A", 2));
    source.push_item(item("B", 2));
    source.push_item(item("C", 2));
    let video = MockMediaElement::new();
    let audio = MockMediaElement::new();

    let session = FeedSession::start(config(), source.clone(), video.clone(), audio.clone())
        .await
        .unwrap();

    wait_until(|| session.playback().subtitle().as_deref() == Some("A chunk 0")).await;
    assert!(session.playback().is_muted());
    assert_eq!(session.feed().len(), 2);

    session.handle_intent(Intent::Advance);
    wait_until(|| session.playback().subtitle().as_deref() == Some("B chunk 0")).await;
    assert_eq!(session.feed().current_index(), 1);

    // Landing next to the tail grew the feed in the background.
    wait_until(|| session.feed().len() == 3).await;
    assert_eq!(session.feed().current_index(), 1);
    assert_eq!(source.calls(), 3);
}

#[tokio::test]
async fn startup_failure_surfaces_with_no_items() {
    let source = Arc::new(ScriptedSource::new());
    source.push_item(item("A", 2));
    source.push_error(NetError::http_status(502, "http://feed.test/next-content"));

    let err = FeedSession::start(
        config(),
        source,
        MockMediaElement::new(),
        MockMediaElement::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, FeedError::Fetch(_)));
    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn mute_intent_toggles_and_link_intent_is_passed_through() {
    let source = Arc::new(ScriptedSource::new());
    source.push_item(item("A", 1));
    source.push_item(item("B", 1));
    let session = FeedSession::start(
        config(),
        source,
        MockMediaElement::new(),
        MockMediaElement::new(),
    )
    .await
    .unwrap();
    wait_until(|| session.playback().subtitle().is_some()).await;

    session.handle_intent(Intent::ToggleMute);
    wait_until(|| !session.playback().is_muted()).await;

    // A tap on an attribution link never changes engine state.
    session.handle_intent(Intent::FollowLink);
    tokio::time::sleep(std::time::Duration::from_millis(30)).await;
    assert!(!session.playback().is_muted());
    assert_eq!(session.feed().current_index(), 0);
    assert_eq!(session.playback().subtitle().as_deref(), Some("A chunk 0"));
}

#[tokio::test]
async fn advancing_onto_the_same_identity_does_not_restart_playback() {
    // Two distinct feed entries that share an identity key: moving between
    // them must keep narration progress.
    let source = Arc::new(ScriptedSource::new());
    source.push_item(item("A", 3));
    source.push_item(item("A", 3).with_title("A, enriched"));
    source.push_item(item("C", 1));
    let audio = MockMediaElement::new();
    let session = FeedSession::start(
        config(),
        source,
        MockMediaElement::new(),
        audio.clone(),
    )
    .await
    .unwrap();
    wait_until(|| session.playback().subtitle().is_some()).await;

    audio.emit(riffle_play::MediaEvent::Ended);
    wait_until(|| session.playback().chunk_index() == 1).await;

    session.handle_intent(Intent::Advance);
    wait_until(|| {
        session.playback().item().map(|i| i.title.clone())
            == Some(Some("A, enriched".to_string()))
    })
    .await;
    assert_eq!(session.playback().chunk_index(), 1, "progress must survive");
}

#[tokio::test]
async fn shutdown_stops_background_work() {
    let source = Arc::new(ScriptedSource::new());
    source.push_item(item("A", 2));
    source.push_item(item("B", 2));
    let audio = MockMediaElement::new();
    let session = FeedSession::start(
        config().with_mute_policy(MutePolicy::Preserve),
        source,
        MockMediaElement::new(),
        audio.clone(),
    )
    .await
    .unwrap();
    wait_until(|| session.playback().subtitle().is_some()).await;

    session.shutdown();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    audio.emit(riffle_play::MediaEvent::Ended);
    tokio::time::sleep(std::time::Duration::from_millis(30)).await;
    assert_eq!(session.playback().chunk_index(), 0);
}
