//! Natural ordering for directory listings.
//!
//! Names whose part before the first `.` is an integer compare numerically
//! against each other, so `2.mp4` sorts before `10.mp4`. Every other pair
//! falls back to a case-insensitive comparison of the full names.

use std::cmp::Ordering;

use crate::config::settings::ListingConfig;
use crate::fs::entry::{FileEntry, Named};

/// The folders and files of one directory, each kept in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing<T> {
    pub folders: Vec<T>,
    pub files: Vec<T>,
}

impl<T: Named> DirectoryListing<T> {
    /// Creates a listing from already-separated folders and files.
    pub fn new(folders: Vec<T>, files: Vec<T>) -> Self {
        Self { folders, files }
    }

    /// Sorts folders and files in place using [`compare_names`].
    pub fn sort_items(&mut self) {
        sort_natural(&mut self.folders);
        sort_natural(&mut self.files);
    }

    /// Sorts according to the `[listing]` config section.
    ///
    /// With `natural_sort` off, only the case-insensitive comparison is used.
    pub fn sort_items_with(&mut self, config: &ListingConfig) {
        if config.natural_sort {
            self.sort_items();
        } else {
            sort_by_key_stable(&mut self.folders, |e| SortKey::lexical(e.name()));
            sort_by_key_stable(&mut self.files, |e| SortKey::lexical(e.name()));
        }
    }
}

impl DirectoryListing<FileEntry> {
    /// Splits an unsorted directory read into folders and files.
    pub fn from_entries(entries: Vec<FileEntry>) -> Self {
        let (folders, files) = entries.into_iter().partition(|e| e.is_dir());
        Self { folders, files }
    }
}

/// Compares two entry names the way listings are ordered.
///
/// This is a pairwise rule: numeric comparison only applies when *both*
/// keys are integers. Equal numbers compare `Equal` even if the names differ.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    SortKey::natural(a).cmp_with(&SortKey::natural(b))
}

/// Sorts entries in place by [`compare_names`]. Ties keep their input order.
pub fn sort_natural<T: Named>(entries: &mut Vec<T>) {
    sort_by_key_stable(entries, |e| SortKey::natural(e.name()));
}

struct SortKey {
    number: Option<i64>,
    folded: String,
}

impl SortKey {
    fn natural(name: &str) -> Self {
        let stem = name.split('.').next().unwrap_or_default();
        Self {
            number: stem.parse().ok(),
            folded: name.to_lowercase(),
        }
    }

    fn lexical(name: &str) -> Self {
        Self {
            number: None,
            folded: name.to_lowercase(),
        }
    }

    fn cmp_with(&self, other: &Self) -> Ordering {
        match (self.number, other.number) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => self.folded.cmp(&other.folded),
        }
    }
}

/// Stable merge sort on keys computed once per entry.
///
/// Never panics on non-transitive keys; the same input always yields the same order.
fn sort_by_key_stable<T>(entries: &mut Vec<T>, key: impl Fn(&T) -> SortKey) {
    if entries.len() < 2 {
        return;
    }
    let keyed: Vec<(SortKey, T)> = entries.drain(..).map(|e| (key(&e), e)).collect();
    entries.extend(merge_sort(keyed).into_iter().map(|(_, e)| e));
}

fn merge_sort<T>(mut items: Vec<(SortKey, T)>) -> Vec<(SortKey, T)> {
    if items.len() < 2 {
        return items;
    }
    let right = merge_sort(items.split_off(items.len() / 2));
    let left = merge_sort(items);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        // Left wins ties to keep the sort stable.
        let next = if l.0.cmp_with(&r.0) == Ordering::Greater {
            right.next()
        } else {
            left.next()
        };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);
    merged
}
