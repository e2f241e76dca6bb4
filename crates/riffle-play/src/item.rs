#![forbid(unsafe_code)]

/// One narration segment: subtitle text plus its audio resource.
///
/// Chunks are immutable once received; vector order is playback order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub audio_ref: String,
}

impl Chunk {
    #[must_use]
    pub fn new(text: impl Into<String>, audio_ref: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            audio_ref: audio_ref.into(),
        }
    }
}

/// One feed entry: a silently looping video plus its ordered narration
/// chunks and optional attribution metadata.
///
/// Immutable after creation. The pager owns items for as long as they sit in
/// the feed list and hands the current one to the playback driver behind an
/// `Arc`, never by copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedItem {
    pub video_ref: String,
    pub chunks: Vec<Chunk>,
    pub article_ref: Option<String>,
    pub title: Option<String>,
}

impl FeedItem {
    #[must_use]
    pub fn new(video_ref: impl Into<String>, chunks: Vec<Chunk>) -> Self {
        Self {
            video_ref: video_ref.into(),
            chunks,
            article_ref: None,
            title: None,
        }
    }

    /// Set the attribution article locator.
    #[must_use]
    pub fn with_article_ref(mut self, article_ref: impl Into<String>) -> Self {
        self.article_ref = Some(article_ref.into());
        self
    }

    /// Set the attribution title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Stable identity used to decide whether a newly assigned item is
    /// conceptually the same one (keep playback progress) or a different
    /// one (reset). The article locator when present, else the video
    /// locator.
    #[must_use]
    pub fn identity_key(&self) -> &str {
        self.article_ref.as_deref().unwrap_or(&self.video_ref)
    }

    #[must_use]
    pub fn chunk(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }
}
