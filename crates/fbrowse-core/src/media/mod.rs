//! Media helpers for listing items.
//!
//! Currently only [`subtitles`]: gating and delegating subtitle discovery
//! for video items to an injected [`subtitles::MediaProbe`].

pub mod subtitles;

pub use subtitles::{ExtendedItemMetadata, MediaProbe, SubtitleOrchestrator, SubtitleTrack};
