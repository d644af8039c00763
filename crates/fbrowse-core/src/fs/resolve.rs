//! Symlink resolution.
//!
//! [`SymlinkResolver::resolve`] turns any path into its canonical form plus a
//! file/directory classification. It first asks the platform to canonicalize
//! the whole path; if that fails it walks the chain one hop at a time with a
//! visited set and a hop budget, so it always terminates.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::config::settings::ResolveConfig;
use crate::error::{CoreError, CoreResult, ResolveError};

/// Hop budget used when none is configured.
pub const MAX_SYMLINK_HOPS: usize = 64;

/// A canonical path and whether it names a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    canonical_path: PathBuf,
    is_dir: bool,
}

impl ResolvedPath {
    /// The fully resolved path.
    pub fn canonical_path(&self) -> &Path {
        &self.canonical_path
    }

    /// `true` if the canonical path is a directory.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Consumes the value, returning the canonical path.
    pub fn into_path(self) -> PathBuf {
        self.canonical_path
    }
}

/// Resolves symlinks with a bounded hop budget.
///
/// Holds no state between calls and is safe to share across threads.
///
/// # Examples
///
/// ```no_run
/// use fbrowse_core::SymlinkResolver;
/// use std::path::Path;
///
/// let resolved = SymlinkResolver::default()
///     .resolve(Path::new("/var/media/latest"))
///     .unwrap();
/// println!("{} (dir: {})", resolved.canonical_path().display(), resolved.is_dir());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymlinkResolver {
    max_hops: usize,
    canonicalize_first: bool,
}

impl Default for SymlinkResolver {
    fn default() -> Self {
        Self {
            max_hops: MAX_SYMLINK_HOPS,
            canonicalize_first: true,
        }
    }
}

impl SymlinkResolver {
    /// Builds a resolver from the `[resolve]` config section.
    pub fn from_config(config: &ResolveConfig) -> Self {
        Self {
            max_hops: config.max_hops,
            canonicalize_first: config.canonicalize_first,
        }
    }

    /// Returns a resolver with a different hop budget.
    pub fn with_max_hops(self, max_hops: usize) -> Self {
        Self { max_hops, ..self }
    }

    /// Returns a resolver that skips platform canonicalization and always
    /// walks the chain manually.
    pub fn manual_only(self) -> Self {
        Self {
            canonicalize_first: false,
            ..self
        }
    }

    /// The configured hop budget.
    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    /// Resolves `path` to its canonical form.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::StatFailed`] — a path on the chain could not be stat'd.
    /// - [`ResolveError::ReadlinkFailed`] — a symlink target could not be read.
    /// - [`ResolveError::CycleDetected`] — the chain loops back on itself.
    /// - [`ResolveError::TooManyHops`] — the chain is longer than the budget.
    pub fn resolve(&self, path: &Path) -> Result<ResolvedPath, ResolveError> {
        if self.canonicalize_first {
            match std::fs::canonicalize(path) {
                Ok(canonical) => return classify(canonical),
                Err(e) => {
                    tracing::debug!(
                        path = %path.display(),
                        error = %e,
                        "canonicalize failed, walking symlinks manually"
                    );
                }
            }
        }
        self.walk(path)
    }

    fn walk(&self, path: &Path) -> Result<ResolvedPath, ResolveError> {
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut current = clean_path(path);

        for hop in 0..self.max_hops {
            if seen.contains(&current) {
                return Err(ResolveError::CycleDetected { path: current });
            }
            seen.insert(current.clone());

            let meta = match std::fs::symlink_metadata(&current) {
                Ok(m) => m,
                Err(source) => {
                    return Err(ResolveError::StatFailed {
                        path: current,
                        source,
                    })
                }
            };
            if !meta.file_type().is_symlink() {
                return Ok(ResolvedPath {
                    canonical_path: current,
                    is_dir: meta.is_dir(),
                });
            }

            let target = match std::fs::read_link(&current) {
                Ok(t) => t,
                Err(source) => {
                    return Err(ResolveError::ReadlinkFailed {
                        path: current,
                        source,
                    })
                }
            };
            tracing::trace!(hop, from = %current.display(), to = %target.display(), "following symlink");

            // Absolute targets replace the path; relative ones hang off the link's directory.
            current = clean_path(&parent_dir(&current).join(target));
        }

        Err(ResolveError::TooManyHops {
            path: path.to_path_buf(),
        })
    }
}

/// Directory containing `path`; `.` for a bare file name.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => path,
    }
}

/// Lexically normalises `path`: drops `.` and folds `name/..` pairs.
///
/// `..` directly under the root is dropped; leading `..` of a relative path
/// is kept. An empty result becomes `.`.
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

fn classify(canonical: PathBuf) -> Result<ResolvedPath, ResolveError> {
    match std::fs::metadata(&canonical) {
        Ok(meta) => Ok(ResolvedPath {
            is_dir: meta.is_dir(),
            canonical_path: canonical,
        }),
        Err(source) => Err(ResolveError::StatFailed {
            path: canonical,
            source,
        }),
    }
}

/// Resolves `path` with the default resolver (64 hops, canonicalize first).
///
/// See [`SymlinkResolver::resolve`] for the error cases.
pub fn resolve_symlinks(path: &Path) -> Result<ResolvedPath, ResolveError> {
    SymlinkResolver::default().resolve(path)
}

/// Runs [`SymlinkResolver::resolve`] on tokio's blocking pool.
///
/// Lets async backends resolve many paths concurrently without stalling
/// the runtime on stat/readlink calls.
///
/// # Errors
///
/// - [`CoreError::Resolve`] — resolution failed.
/// - [`CoreError::Io`] — the blocking task panicked or was cancelled.
pub async fn resolve_symlinks_async(
    resolver: SymlinkResolver,
    path: PathBuf,
) -> CoreResult<ResolvedPath> {
    let resolved = tokio::task::spawn_blocking(move || resolver.resolve(&path))
        .await
        .map_err(|e| CoreError::Io(std::io::Error::other(e)))??;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveErrorKind;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    use std::os::unix::fs::symlink;

    #[test]
    fn plain_file_resolves_to_itself() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "hello").unwrap();
        let canonical = fs::canonicalize(&file).unwrap();

        let resolved = resolve_symlinks(&canonical).unwrap();

        assert_eq!(resolved.canonical_path(), canonical);
        assert!(!resolved.is_dir());
    }

    #[test]
    fn plain_directory_resolves_to_itself() {
        let tmp = TempDir::new().unwrap();
        let canonical = fs::canonicalize(tmp.path()).unwrap();

        let resolved = resolve_symlinks(&canonical).unwrap();

        assert_eq!(resolved.canonical_path(), canonical);
        assert!(resolved.is_dir());
    }

    #[test]
    fn manual_walk_on_plain_path_is_identity() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        let resolved = SymlinkResolver::default()
            .manual_only()
            .resolve(&file)
            .unwrap();

        assert_eq!(resolved.canonical_path(), file);
        assert!(!resolved.is_dir());
    }

    #[test]
    fn missing_path_is_stat_failed() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");

        let err = resolve_symlinks(&missing).unwrap_err();

        assert_eq!(err.kind(), ResolveErrorKind::StatFailed);
        assert_eq!(err.path(), missing);
    }

    #[cfg(unix)]
    #[test]
    fn file_symlink_resolves_to_target() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "hello").unwrap();
        let link = tmp.path().join("file.link");
        symlink("file.txt", &link).unwrap();

        let resolved = resolve_symlinks(&link).unwrap();

        assert_eq!(resolved.canonical_path(), fs::canonicalize(&file).unwrap());
        assert!(!resolved.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn directory_symlink_resolves_to_target() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("sub");
        fs::create_dir_all(&dir).unwrap();
        let link = tmp.path().join("dir.link");
        symlink("sub", &link).unwrap();

        let resolved = resolve_symlinks(&link).unwrap();

        assert_eq!(resolved.canonical_path(), fs::canonicalize(&dir).unwrap());
        assert!(resolved.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn two_node_cycle_is_detected() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        symlink("b", &a).unwrap();
        symlink("a", &b).unwrap();

        let err = resolve_symlinks(&a).unwrap_err();

        assert_eq!(err.kind(), ResolveErrorKind::CycleDetected);
        assert_eq!(err.path(), a);
    }

    #[cfg(unix)]
    #[test]
    fn self_loop_is_detected_by_manual_walk() {
        let tmp = TempDir::new().unwrap();
        let me = tmp.path().join("me");
        symlink("me", &me).unwrap();

        let err = SymlinkResolver::default()
            .manual_only()
            .resolve(&me)
            .unwrap_err();

        assert_eq!(err.kind(), ResolveErrorKind::CycleDetected);
    }

    #[cfg(unix)]
    #[test]
    fn long_chain_exceeds_hop_budget() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("end.txt"), "").unwrap();
        symlink("end.txt", tmp.path().join("l5")).unwrap();
        for i in (0..5).rev() {
            symlink(format!("l{}", i + 1), tmp.path().join(format!("l{i}"))).unwrap();
        }
        let start = tmp.path().join("l0");

        let err = SymlinkResolver::default()
            .manual_only()
            .with_max_hops(3)
            .resolve(&start)
            .unwrap_err();

        assert_eq!(err.kind(), ResolveErrorKind::TooManyHops);
        assert_eq!(err.path(), start);
    }

    #[cfg(unix)]
    #[test]
    fn chain_within_budget_resolves_manually() {
        let tmp = TempDir::new().unwrap();
        let end = tmp.path().join("end.txt");
        fs::write(&end, "").unwrap();
        symlink("end.txt", tmp.path().join("l2")).unwrap();
        symlink("l2", tmp.path().join("l1")).unwrap();
        symlink("l1", tmp.path().join("l0")).unwrap();

        let resolved = SymlinkResolver::default()
            .manual_only()
            .resolve(&tmp.path().join("l0"))
            .unwrap();

        assert_eq!(resolved.canonical_path(), end);
        assert!(!resolved.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn relative_target_climbs_directories() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("media").join("show");
        fs::create_dir_all(&target).unwrap();
        let nested = tmp.path().join("links").join("deep");
        fs::create_dir_all(&nested).unwrap();
        let link = nested.join("show.link");
        symlink("../../media/show", &link).unwrap();

        let resolved = resolve_symlinks(&link).unwrap();

        assert_eq!(resolved.canonical_path(), fs::canonicalize(&target).unwrap());
        assert!(resolved.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn absolute_target_replaces_path() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("real");
        fs::create_dir(&dir).unwrap();
        let link = tmp.path().join("abs.link");
        symlink(&dir, &link).unwrap();

        let resolved = SymlinkResolver::default()
            .manual_only()
            .resolve(&link)
            .unwrap();

        assert_eq!(resolved.canonical_path(), dir);
        assert!(resolved.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_is_stat_failed() {
        let tmp = TempDir::new().unwrap();
        let link = tmp.path().join("broken");
        symlink("does-not-exist", &link).unwrap();

        let err = resolve_symlinks(&link).unwrap_err();

        assert_eq!(err.kind(), ResolveErrorKind::StatFailed);
        assert_eq!(err.path(), tmp.path().join("does-not-exist"));
    }

    #[cfg(unix)]
    #[test]
    fn cycle_through_parent_dir_targets_is_detected() {
        let tmp = TempDir::new().unwrap();
        let d = tmp.path().join("d");
        fs::create_dir(&d).unwrap();
        symlink("../d/b", d.join("a")).unwrap();
        symlink("../d/a", d.join("b")).unwrap();

        let err = SymlinkResolver::default()
            .manual_only()
            .resolve(&d.join("a"))
            .unwrap_err();

        assert_eq!(err.kind(), ResolveErrorKind::CycleDetected);
        assert_eq!(err.path(), d.join("a"));
    }

    #[cfg(unix)]
    #[test]
    fn manual_walk_cleans_parent_dir_components() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("media").join("show");
        fs::create_dir_all(&target).unwrap();
        let nested = tmp.path().join("links").join("deep");
        fs::create_dir_all(&nested).unwrap();
        let link = nested.join("show.link");
        symlink("../../media/./show", &link).unwrap();

        let resolved = SymlinkResolver::default()
            .manual_only()
            .resolve(&link)
            .unwrap();

        assert_eq!(resolved.canonical_path(), target);
        assert!(resolved.is_dir());
    }

    #[test]
    fn clean_path_folds_dots() {
        assert_eq!(clean_path(Path::new("/srv/d/../d/./b")), PathBuf::from("/srv/d/b"));
        assert_eq!(clean_path(Path::new("/../etc")), PathBuf::from("/etc"));
        assert_eq!(clean_path(Path::new("../a/../../b")), PathBuf::from("../../b"));
        assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(clean_path(Path::new("")), PathBuf::from("."));
    }

    #[test]
    fn parent_dir_of_bare_name_is_current_dir() {
        assert_eq!(parent_dir(Path::new("movie.mkv")), Path::new("."));
        assert_eq!(parent_dir(Path::new("/srv/movie.mkv")), Path::new("/srv"));
        assert_eq!(parent_dir(Path::new("/")), Path::new("/"));
    }

    #[test]
    fn from_config_copies_settings() {
        let config = ResolveConfig {
            max_hops: 8,
            canonicalize_first: false,
        };
        let resolver = SymlinkResolver::from_config(&config);
        assert_eq!(resolver.max_hops(), 8);
        assert_eq!(resolver, SymlinkResolver::default().with_max_hops(8).manual_only());
    }

    #[test]
    fn zero_hop_budget_fails_immediately() {
        let tmp = TempDir::new().unwrap();
        let err = SymlinkResolver::default()
            .manual_only()
            .with_max_hops(0)
            .resolve(tmp.path())
            .unwrap_err();
        assert_eq!(err.kind(), ResolveErrorKind::TooManyHops);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn async_resolve_matches_sync() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        let link = tmp.path().join("dir.link");
        symlink("sub", &link).unwrap();

        let resolved = resolve_symlinks_async(SymlinkResolver::default(), link.clone())
            .await
            .unwrap();

        assert_eq!(resolved, resolve_symlinks(&link).unwrap());
        assert!(resolved.is_dir());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn async_resolve_surfaces_cycle() {
        let tmp = TempDir::new().unwrap();
        symlink("y", tmp.path().join("x")).unwrap();
        symlink("x", tmp.path().join("y")).unwrap();

        let err = resolve_symlinks_async(SymlinkResolver::default(), tmp.path().join("x"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Resolve(ResolveError::CycleDetected { .. })
        ));
    }
}
