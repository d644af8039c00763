//! Error types for `fbrowse-core`.
//!
//! Fallible operations return [`CoreResult<T>`], an alias for
//! `Result<T, CoreError>`. Symlink resolution has its own
//! [`ResolveError`], which converts into [`CoreError::Resolve`].

use std::path::{Path, PathBuf};

/// Unified error type for core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Symlink resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `fbrowse-core`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Why a symlink resolution stopped.
///
/// Every variant is terminal: the resolver never retries and never hands
/// back a partial path.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// A path on the chain could not be stat'd.
    #[error("could not stat path: {}", path.display())]
    StatFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A symlink's target could not be read.
    #[error("could not read symlink: {}", path.display())]
    ReadlinkFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The chain revisited a path it had already followed.
    #[error("symlink cycle detected at: {}", path.display())]
    CycleDetected { path: PathBuf },

    /// The chain did not end within the hop budget.
    #[error("too many symlink hops resolving: {}", path.display())]
    TooManyHops { path: PathBuf },
}

/// Field-less discriminant of [`ResolveError`], handy for matching in callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveErrorKind {
    StatFailed,
    ReadlinkFailed,
    CycleDetected,
    TooManyHops,
}

impl ResolveError {
    /// Returns the kind of failure.
    pub fn kind(&self) -> ResolveErrorKind {
        match self {
            Self::StatFailed { .. } => ResolveErrorKind::StatFailed,
            Self::ReadlinkFailed { .. } => ResolveErrorKind::ReadlinkFailed,
            Self::CycleDetected { .. } => ResolveErrorKind::CycleDetected,
            Self::TooManyHops { .. } => ResolveErrorKind::TooManyHops,
        }
    }

    /// Returns the path the failure is reported against.
    ///
    /// For [`ResolveError::TooManyHops`] this is the original input; for the
    /// other variants it is the hop that failed. It is never canonical.
    pub fn path(&self) -> &Path {
        match self {
            Self::StatFailed { path, .. }
            | Self::ReadlinkFailed { path, .. }
            | Self::CycleDetected { path }
            | Self::TooManyHops { path } => path,
        }
    }
}
