#![forbid(unsafe_code)]

/// Top-level feed lifecycle.
///
/// `Error` is terminal: re-initialization is the host's decision, not the
/// pager's. Within `Ready` only the current index changes; the prefetch
/// guard is an orthogonal flag, not a phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FeedPhase {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    Error,
}

/// What happens to the mute flag when the displayed item changes identity.
///
/// Both behaviors shipped at different times in the original product, so the
/// choice is a named option rather than a hard-coded default buried in the
/// driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MutePolicy {
    /// The mute flag survives item transitions.
    #[default]
    Preserve,
    /// Every item transition forces the muted state.
    RemuteOnAdvance,
}

/// User input, already reduced by the gesture host to discrete intents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Intent {
    /// Move to the next feed item.
    Advance,
    /// Full-surface tap: toggle narration mute.
    ToggleMute,
    /// Tap landed on an outbound attribution link. The engine must not
    /// intercept it; navigation belongs to the host.
    FollowLink,
}
