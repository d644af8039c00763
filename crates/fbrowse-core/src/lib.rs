//! fbrowse core library: listing primitives for a file-browsing backend.
//!
//! `fbrowse-core` resolves symlinks to canonical, classified paths, orders
//! directory listings naturally, and gates subtitle discovery for video
//! items. Directory traversal and media probing stay with the caller.
//!
//! # Modules
//!
//! - [`fs`] — [`FileEntry`] and symlink resolution ([`SymlinkResolver`]).
//! - [`nav`] — natural ordering of listings ([`DirectoryListing`]).
//! - [`media`] — subtitle detection over an injected [`MediaProbe`].
//! - [`config`] — TOML-based settings ([`Config`]).
//! - [`error`] — [`CoreError`], [`CoreResult`] and [`ResolveError`].

pub mod config;
pub mod error;
pub mod fs;
pub mod media;
pub mod nav;

pub use config::settings::{Config, ListingConfig, ResolveConfig, SubtitleConfig};
pub use error::{CoreError, CoreResult, ResolveError, ResolveErrorKind};
pub use fs::entry::{FileEntry, Named};
pub use fs::resolve::{
    resolve_symlinks, resolve_symlinks_async, ResolvedPath, SymlinkResolver, MAX_SYMLINK_HOPS,
};
pub use media::subtitles::{
    ExtendedItemMetadata, MediaProbe, SubtitleOrchestrator, SubtitleTrack, VIDEO_MEDIA_PREFIX,
};
pub use nav::sort::{compare_names, sort_natural, DirectoryListing};

/// Normalises a string to NFC (composed) form.
///
/// macOS stores filenames in NFD (decomposed), so accented and Hangul names
/// read from disk would otherwise compare differently from typed ones.
pub fn nfc_string(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    s.nfc().collect()
}
