#![forbid(unsafe_code)]

//! HTTP-backed [`ContentSource`] speaking the `next-content` wire contract.

use async_trait::async_trait;
use riffle_net::{HttpClient, NetError, NetOptions, NetResult};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::{
    item::{Chunk, FeedItem},
    traits::source::ContentSource,
};

/// Wire payload for one feed item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemPayload {
    video_url: String,
    chunks: Vec<ChunkPayload>,
    article_url: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChunkPayload {
    text: String,
    audio_url: String,
}

/// Fetches feed items from `GET {endpoint}next-content`.
#[derive(Clone, Debug)]
pub struct HttpContentSource {
    client: HttpClient,
    url: Url,
}

impl HttpContentSource {
    /// # Errors
    ///
    /// Returns [`NetError::InvalidUrl`] when `next-content` cannot be joined
    /// onto the endpoint.
    pub fn new(endpoint: &Url, options: NetOptions) -> NetResult<Self> {
        let url = endpoint.join("next-content").map_err(|e| {
            NetError::invalid_url(format!("bad content endpoint {endpoint}: {e}"))
        })?;
        Ok(Self {
            client: HttpClient::new(options),
            url,
        })
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_next_item(&self) -> NetResult<FeedItem> {
        let bytes = self.client.get_bytes(self.url.clone()).await?;
        let item = parse_item(&bytes, &self.url)?;
        debug!(chunks = item.chunks.len(), key = item.identity_key(), "fetched item");
        Ok(item)
    }
}

fn parse_item(bytes: &[u8], origin: &Url) -> NetResult<FeedItem> {
    let payload: ItemPayload = serde_json::from_slice(bytes)
        .map_err(|e| NetError::payload(format!("undecodable item from {origin}: {e}")))?;

    // A zero-chunk item is a contract violation, not a renderable state.
    if payload.chunks.is_empty() {
        return Err(NetError::payload(format!(
            "item from {origin} has no narration chunks"
        )));
    }

    let chunks = payload
        .chunks
        .into_iter()
        .map(|c| Chunk::new(c.text, c.audio_url))
        .collect();

    let mut item = FeedItem::new(payload.video_url, chunks);
    if let Some(article_url) = payload.article_url {
        item = item.with_article_ref(article_url);
    }
    if let Some(title) = payload.title {
        item = item.with_title(title);
    }
    Ok(item)
}
