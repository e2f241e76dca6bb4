use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use riffle_net::{NetError, NetOptions};
use riffle_play::{ContentSource, HttpContentSource};
use tokio::net::TcpListener;
use url::Url;

async fn serve(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}/", addr.port()).parse().unwrap()
}

async fn full_payload() -> &'static str {
    r#"{
        "videoUrl": "Skytrain.mp4",
        "chunks": [
            { "text": "The Kusanagi Athletic Stadium is in Shizuoka, Japan.", "audioUrl": "audio/tts_1.mp3" },
            { "text": "Its main stand seats 8,000.", "audioUrl": "audio/tts_2.mp3" }
        ],
        "articleUrl": "https://en.wikipedia.org/wiki/Kusanagi_Stadium",
        "title": "Kusanagi Stadium"
    }"#
}

#[tokio::test]
async fn fetches_and_decodes_an_item() {
    let endpoint = serve(Router::new().route("/next-content", get(full_payload))).await;
    let source = HttpContentSource::new(&endpoint, NetOptions::default()).unwrap();

    let item = source.fetch_next_item().await.unwrap();
    assert_eq!(item.video_ref, "Skytrain.mp4");
    assert_eq!(item.chunks.len(), 2);
    assert_eq!(item.chunks[0].audio_ref, "audio/tts_1.mp3");
    assert_eq!(
        item.identity_key(),
        "https://en.wikipedia.org/wiki/Kusanagi_Stadium"
    );
    assert_eq!(item.title.as_deref(), Some("Kusanagi Stadium"));
}

#[tokio::test]
async fn zero_chunk_item_is_rejected() {
    async fn empty_chunks() -> &'static str {
        r#"{ "videoUrl": "v.mp4", "chunks": [] }"#
    }
    let endpoint = serve(Router::new().route("/next-content", get(empty_chunks))).await;
    let source = HttpContentSource::new(&endpoint, NetOptions::default()).unwrap();

    let err = source.fetch_next_item().await.unwrap_err();
    assert!(matches!(err, NetError::Payload(_)));
    assert!(err.to_string().contains("no narration chunks"));
}

#[tokio::test]
async fn undecodable_body_is_rejected() {
    async fn garbage() -> &'static str {
        "<html>definitely not json</html>"
    }
    let endpoint = serve(Router::new().route("/next-content", get(garbage))).await;
    let source = HttpContentSource::new(&endpoint, NetOptions::default()).unwrap();

    let err = source.fetch_next_item().await.unwrap_err();
    assert!(matches!(err, NetError::Payload(_)));
}

#[tokio::test]
async fn non_success_status_propagates() {
    async fn unavailable() -> impl IntoResponse {
        StatusCode::SERVICE_UNAVAILABLE
    }
    let endpoint = serve(Router::new().route("/next-content", get(unavailable))).await;
    let source = HttpContentSource::new(&endpoint, NetOptions::default()).unwrap();

    let err = source.fetch_next_item().await.unwrap_err();
    assert!(matches!(err, NetError::HttpStatus { status: 503, .. }));
}
