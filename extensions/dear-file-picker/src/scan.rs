use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

use crate::core::DialogMode;
use crate::filter::ExtensionSet;
use crate::fs::{FileSystem, FsEntry};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// Snapshot of one directory child, captured at scan time.
///
/// Not refreshed when the filesystem changes; only a rescan replaces it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Full path.
    pub path: PathBuf,
    /// Base name (no parent path).
    pub name: String,
    /// Whether this entry is a directory.
    pub is_dir: bool,
    /// File size in bytes (0 for directories).
    pub size_bytes: u64,
    /// Last modified timestamp, when the backend reports one.
    pub last_modified: Option<SystemTime>,
}

impl Entry {
    /// Extension including the leading dot, or `""` when there is none.
    ///
    /// Dotfiles such as `.bashrc` have no extension.
    pub fn extension(&self) -> String {
        extension_of(Path::new(&self.name))
    }
}

impl From<FsEntry> for Entry {
    fn from(e: FsEntry) -> Self {
        Self {
            path: e.path,
            name: e.name,
            is_dir: e.is_dir,
            size_bytes: if e.is_dir { 0 } else { e.size },
            last_modified: e.modified,
        }
    }
}

/// Result of one directory scan: files and subdirectories in enumeration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Listing {
    /// Files that passed the active filter.
    pub files: Vec<Entry>,
    /// Immediate subdirectories (never filtered).
    pub directories: Vec<Entry>,
}

/// A directory could not be enumerated.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Permission denied, path removed, not a directory, ...
    #[error("cannot enumerate {}: {source}", path.display())]
    Unreadable {
        /// Directory that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Directory that failed to enumerate.
    pub fn path(&self) -> &Path {
        match self {
            ScanError::Unreadable { path, .. } => path,
        }
    }
}

/// Extension of a path with the leading dot, `""` when there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// List the immediate children of `directory`.
///
/// Directories are always listed. Files are skipped entirely in
/// [`DialogMode::SelectFolder`]; otherwise a file is kept when there is no
/// active filter or when its extension passes `active_filter`.
pub fn scan(
    fs: &dyn FileSystem,
    directory: &Path,
    mode: DialogMode,
    active_filter: Option<&ExtensionSet>,
) -> Result<Listing, ScanError> {
    trace_scan_requested(directory, mode);

    let children = fs
        .read_dir(directory)
        .map_err(|source| ScanError::Unreadable {
            path: directory.to_path_buf(),
            source,
        })
        .inspect_err(trace_scan_failed)?;

    let mut listing = Listing::default();
    for child in children {
        let Some(child) = sanitize_child(child, directory) else {
            continue;
        };
        if child.is_dir {
            listing.directories.push(child.into());
            continue;
        }
        if matches!(mode, DialogMode::SelectFolder) {
            continue;
        }
        let keep = match active_filter {
            None => true,
            Some(set) => set.matches(&extension_of(Path::new(&child.name))),
        };
        if keep {
            listing.files.push(child.into());
        }
    }

    trace_scan_completed(directory, &listing);
    Ok(listing)
}

/// Backends may report a child with only a name or only a path; fill in the
/// missing half, or drop the child when neither is usable.
fn sanitize_child(mut entry: FsEntry, dir: &Path) -> Option<FsEntry> {
    let has_name = !entry.name.trim().is_empty();
    let has_path = !entry.path.as_os_str().is_empty();
    match (has_name, has_path) {
        (true, true) => {}
        (true, false) => entry.path = dir.join(&entry.name),
        (false, true) => entry.name = entry.path.file_name()?.to_string_lossy().into_owned(),
        (false, false) => return None,
    }
    Some(entry)
}

#[cfg(feature = "tracing")]
fn trace_scan_requested(dir: &Path, mode: DialogMode) {
    trace!(event = "scan.requested", dir = %dir.display(), ?mode, "scan requested");
}

#[cfg(not(feature = "tracing"))]
fn trace_scan_requested(_dir: &Path, _mode: DialogMode) {}

#[cfg(feature = "tracing")]
fn trace_scan_completed(dir: &Path, listing: &Listing) {
    trace!(
        event = "scan.completed",
        dir = %dir.display(),
        files = listing.files.len(),
        directories = listing.directories.len(),
        "scan completed"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_scan_completed(_dir: &Path, _listing: &Listing) {}

#[cfg(feature = "tracing")]
fn trace_scan_failed(err: &ScanError) {
    debug!(event = "scan.failed", dir = %err.path().display(), error = %err, "scan failed");
}

#[cfg(not(feature = "tracing"))]
fn trace_scan_failed(_err: &ScanError) {}
