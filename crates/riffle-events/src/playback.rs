#![forbid(unsafe_code)]

/// Events published by the per-item playback driver.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum PlaybackEvent {
    /// The video element reported it can play.
    VideoReady,
    /// The platform declined an unsolicited video play call. Expected on
    /// mobile; the next user gesture satisfies the policy.
    AutoplayBlocked,
    /// A narration chunk was loaded into the audio element.
    ChunkStarted { index: usize },
    /// The last chunk finished; narration wrapped to the start and the
    /// video position was rewound to keep both cycles aligned.
    CycleRestarted,
    /// The externally visible mute flag flipped.
    MuteChanged { muted: bool },
    /// The video resource failed to load or decode.
    VideoFailed { src: String },
    /// A narration audio resource failed to load or play.
    AudioFailed { src: String },
}
