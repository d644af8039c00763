//! File system abstractions.
//!
//! [`entry::FileEntry`] represents one listing entry and [`resolve`] turns
//! arbitrary paths into canonical, classified [`resolve::ResolvedPath`]s.

pub mod entry;
pub mod resolve;

pub use entry::{FileEntry, Named};
pub use resolve::{resolve_symlinks, resolve_symlinks_async, ResolvedPath, SymlinkResolver};
