#![forbid(unsafe_code)]

//! Configuration for [`FeedSession`](crate::FeedSession).

use riffle_net::NetOptions;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::types::MutePolicy;

/// Unified configuration for a feed session.
///
/// # Example
///
/// ```ignore
/// use riffle_play::SessionConfig;
/// use url::Url;
///
/// let endpoint = Url::parse("https://feed.example.com/")?;
/// let config = SessionConfig::new(endpoint)
///     .with_mute_policy(riffle_play::MutePolicy::RemuteOnAdvance);
/// ```
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Root URL of the content service (`next-content` lives under it).
    pub endpoint: Url,
    /// Base URL for resolving relative media locators. Defaults to
    /// `endpoint` when unset.
    pub media_base: Option<Url>,
    /// What happens to the mute flag on item transitions.
    pub mute_policy: MutePolicy,
    /// Whether narration starts muted. Default: true, since the platform
    /// only reliably autoplays muted media and the first unmute is a user
    /// gesture anyway.
    pub start_muted: bool,
    /// Event bus channel capacity. Default: 64.
    pub event_capacity: usize,
    /// Network configuration (timeouts, pooling).
    pub net: NetOptions,
    /// Cancellation token for session teardown. A fresh token is created
    /// when unset.
    pub cancel: Option<CancellationToken>,
}

impl SessionConfig {
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            media_base: None,
            mute_policy: MutePolicy::default(),
            start_muted: true,
            event_capacity: 64,
            net: NetOptions::default(),
            cancel: None,
        }
    }

    /// Set the base URL for resolving relative media locators.
    #[must_use]
    pub fn with_media_base(mut self, media_base: Url) -> Self {
        self.media_base = Some(media_base);
        self
    }

    /// Set the mute persistence policy.
    #[must_use]
    pub fn with_mute_policy(mut self, policy: MutePolicy) -> Self {
        self.mute_policy = policy;
        self
    }

    /// Set whether narration starts muted.
    #[must_use]
    pub fn with_start_muted(mut self, start_muted: bool) -> Self {
        self.start_muted = start_muted;
        self
    }

    /// Set the event bus channel capacity.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Set network options.
    #[must_use]
    pub fn with_net(mut self, net: NetOptions) -> Self {
        self.net = net;
        self
    }

    /// Set the cancellation token.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// The effective base for media locator resolution.
    #[must_use]
    pub fn media_base(&self) -> &Url {
        self.media_base.as_ref().unwrap_or(&self.endpoint)
    }

    /// The slice of this configuration the playback driver needs.
    #[must_use]
    pub fn playback_options(&self) -> PlaybackOptions {
        PlaybackOptions {
            media_base: self.media_base().clone(),
            mute_policy: self.mute_policy,
            start_muted: self.start_muted,
        }
    }
}

/// Configuration for a [`Playback`](crate::Playback) driver.
#[derive(Clone, Debug)]
pub struct PlaybackOptions {
    /// Base URL for resolving relative media locators.
    pub media_base: Url,
    /// What happens to the mute flag on item transitions.
    pub mute_policy: MutePolicy,
    /// Whether narration starts muted.
    pub start_muted: bool,
}
