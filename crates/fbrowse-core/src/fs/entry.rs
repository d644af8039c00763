//! Listing entries and the [`Named`] trait the orderer sorts by.

use std::path::{Path, PathBuf};

use crate::error::ResolveError;
use crate::fs::resolve::SymlinkResolver;
use crate::nfc_string;

/// Anything that can be ordered in a directory listing by its name.
pub trait Named {
    /// The entry's display name (last path component).
    fn name(&self) -> &str;
}

impl Named for String {
    fn name(&self) -> &str {
        self
    }
}

impl Named for &str {
    fn name(&self) -> &str {
        self
    }
}

/// One item of a directory listing: where it lives, what it is called, and
/// whether it lists as a folder.
///
/// A symlink keeps its own path and name but takes its folder/file
/// classification from the resolved target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

impl FileEntry {
    /// Builds an entry for `path`, classifying it through `resolver`.
    ///
    /// # Errors
    ///
    /// Any [`ResolveError`] from resolving `path`, e.g. a dangling or cyclic link.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fbrowse_core::{FileEntry, SymlinkResolver};
    ///
    /// let entry = FileEntry::classify("/srv/media/latest".into(), &SymlinkResolver::default()).unwrap();
    /// println!("{} folder={}", entry.name(), entry.is_dir());
    /// ```
    pub fn classify(path: PathBuf, resolver: &SymlinkResolver) -> Result<Self, ResolveError> {
        let is_dir = resolver.resolve(&path)?.is_dir();
        Ok(Self::from_parts(path, is_dir))
    }

    /// Builds an entry from an already-known classification.
    ///
    /// The name is the last path component, normalised to NFC.
    pub fn from_parts(path: PathBuf, is_dir: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| nfc_string(&n.to_string_lossy()))
            .unwrap_or_default();
        Self { path, name, is_dir }
    }

    /// The path as listed, not resolved.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` if the entry lists under folders.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

impl Named for FileEntry {
    fn name(&self) -> &str {
        &self.name
    }
}
