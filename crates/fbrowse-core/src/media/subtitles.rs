//! Subtitle discovery for video items.
//!
//! The actual probing (container streams, sidecar `.srt`/`.vtt` files) lives
//! behind the [`MediaProbe`] trait. [`SubtitleOrchestrator`] only checks that
//! an item is a video before handing it to the probe.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::config::settings::SubtitleConfig;
use crate::fs::resolve::parent_dir;

/// Media-type prefix that makes an item eligible for subtitle detection.
pub const VIDEO_MEDIA_PREFIX: &str = "video";

/// One subtitle track, either a sidecar file or a stream inside the container.
///
/// Serialized with the field names the listing API exposes (`index`,
/// `isFile`); empty optional fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    /// File name for external tracks, a descriptive label for embedded ones.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Stream index inside the container. `None` for external files.
    #[serde(rename = "index", default, skip_serializing_if = "Option::is_none")]
    pub stream_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    #[serde(rename = "isFile")]
    pub is_external_file: bool,
}

impl SubtitleTrack {
    /// A sidecar subtitle file next to the video.
    pub fn external(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: None,
            title: None,
            stream_index: None,
            codec: None,
            is_external_file: true,
        }
    }

    /// A subtitle stream embedded in the container at `stream_index`.
    pub fn embedded(stream_index: u32, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: None,
            title: None,
            stream_index: Some(stream_index),
            codec: None,
            is_external_file: false,
        }
    }

    pub fn with_language(self, language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..self
        }
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..self
        }
    }

    pub fn with_codec(self, codec: impl Into<String>) -> Self {
        Self {
            codec: Some(codec.into()),
            ..self
        }
    }

    /// `true` for tracks that live inside the media container.
    pub fn is_embedded(&self) -> bool {
        self.stream_index.is_some()
    }
}

/// Extended metadata for a single listing item.
///
/// Subtitle detection reads `media_type`, `real_path` and `modified`, and
/// writes `subtitles`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedItemMetadata {
    pub name: String,
    /// MIME-like classification such as `"video/mp4"` or `"audio"`.
    pub media_type: String,
    /// Symlink-free path of the item.
    pub real_path: PathBuf,
    pub modified: SystemTime,
    pub subtitles: Vec<SubtitleTrack>,
}

impl ExtendedItemMetadata {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        real_path: PathBuf,
        modified: SystemTime,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            real_path,
            modified,
            subtitles: Vec::new(),
        }
    }

    /// `true` if the media type starts with `"video"`.
    pub fn is_video(&self) -> bool {
        self.media_type.starts_with(VIDEO_MEDIA_PREFIX)
    }
}

/// External media-probing engine.
///
/// Implementations own the stream-probe format and any caching; the
/// orchestrator treats both operations as opaque.
pub trait MediaProbe {
    /// Error returned when subtitle content cannot be loaded.
    type Error;

    /// Finds embedded and sidecar subtitles for the video at `real_path`.
    fn detect_all_subtitles(
        &self,
        real_path: &Path,
        parent_dir: &Path,
        modified: SystemTime,
    ) -> Vec<SubtitleTrack>;

    /// Loads the content of every track in `subtitles`.
    fn load_all_subtitle_content(
        &self,
        real_path: &Path,
        subtitles: &[SubtitleTrack],
        modified: SystemTime,
    ) -> Result<(), Self::Error>;
}

/// Gates subtitle work on the item being a video, then delegates to a probe.
#[derive(Debug, Clone)]
pub struct SubtitleOrchestrator<P> {
    probe: P,
    enabled: bool,
}

impl<P: MediaProbe> SubtitleOrchestrator<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            enabled: true,
        }
    }

    /// Builds an orchestrator honouring the `[subtitles]` config section.
    pub fn from_config(probe: P, config: &SubtitleConfig) -> Self {
        Self {
            probe,
            enabled: config.enabled,
        }
    }

    /// Returns the wrapped probe.
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Detects subtitles for `item` and stores them on it.
    ///
    /// Non-video items (and every item when detection is disabled) are left
    /// untouched.
    pub fn detect_subtitles(&self, item: &mut ExtendedItemMetadata) {
        if !self.enabled || !item.is_video() {
            tracing::debug!(
                name = %item.name,
                media_type = %item.media_type,
                "subtitles are not supported for this file"
            );
            return;
        }
        let parent = parent_dir(&item.real_path);
        item.subtitles = self
            .probe
            .detect_all_subtitles(&item.real_path, parent, item.modified);
    }

    /// Loads content for the subtitles already detected on `item`.
    ///
    /// # Errors
    ///
    /// Returns the probe's error unchanged.
    pub fn load_subtitle_content(&self, item: &ExtendedItemMetadata) -> Result<(), P::Error> {
        self.probe
            .load_all_subtitle_content(&item.real_path, &item.subtitles, item.modified)
    }
}
