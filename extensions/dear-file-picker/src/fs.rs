use std::path::{Path, PathBuf};

/// Minimal file metadata used by the picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FsMetadata {
    /// Whether the path refers to a directory (symlinks followed).
    pub is_dir: bool,
    /// Whether the path refers to a regular file (symlinks followed).
    pub is_file: bool,
}

/// Directory child returned by [`FileSystem::read_dir`].
#[derive(Clone, Debug)]
pub struct FsEntry {
    /// File name as listed.
    pub name: String,
    /// `dir` joined with `name`.
    pub path: PathBuf,
    /// Whether this entry is a directory.
    pub is_dir: bool,
    /// File size in bytes (0 for directories or when unavailable).
    pub size: u64,
    /// Modification time, when the platform reports one.
    pub modified: Option<std::time::SystemTime>,
}

/// Filesystem boundary consumed by the scanner and the submit logic.
///
/// Implement this to drive the picker from something other than `std::fs`
/// (tests use an in-memory tree).
pub trait FileSystem {
    /// List immediate children of a directory.
    fn read_dir(&self, dir: &Path) -> std::io::Result<Vec<FsEntry>>;
    /// Resolve `path` to an absolute path without `..` or symlinks.
    fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf>;
    /// Kind of the object at `path`, symlinks followed.
    fn metadata(&self, path: &Path) -> std::io::Result<FsMetadata>;

    /// Returns whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool {
        self.metadata(path).is_ok()
    }
    /// Returns whether `path` is a regular file.
    fn is_regular_file(&self, path: &Path) -> bool {
        self.metadata(path).map(|m| m.is_file).unwrap_or(false)
    }
    /// Returns whether `path` is a directory.
    fn is_directory(&self, path: &Path) -> bool {
        self.metadata(path).map(|m| m.is_dir).unwrap_or(false)
    }
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read_dir(&self, dir: &Path) -> std::io::Result<Vec<FsEntry>> {
        let children = std::fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|child| {
                let path = child.path();
                // Follow symlinks so a link to a folder lists as a folder.
                let meta = std::fs::metadata(&path).or_else(|_| child.metadata()).ok();
                let is_dir = meta.as_ref().is_some_and(std::fs::Metadata::is_dir);
                FsEntry {
                    name: child.file_name().to_string_lossy().into_owned(),
                    size: match &meta {
                        Some(m) if !is_dir => m.len(),
                        _ => 0,
                    },
                    modified: meta.as_ref().and_then(|m| m.modified().ok()),
                    is_dir,
                    path,
                }
            })
            .collect();
        Ok(children)
    }

    fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }

    fn metadata(&self, path: &Path) -> std::io::Result<FsMetadata> {
        std::fs::metadata(path).map(|m| FsMetadata {
            is_dir: m.is_dir(),
            is_file: m.is_file(),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashSet;
    use std::time::{Duration, SystemTime};

    #[derive(Clone, Debug)]
    struct Node {
        path: PathBuf,
        is_dir: bool,
        size: u64,
        modified: Option<SystemTime>,
    }

    /// In-memory tree; children list in insertion order.
    #[derive(Debug, Default)]
    pub(crate) struct TestFs {
        nodes: Vec<Node>,
        unreadable: HashSet<PathBuf>,
        raw: Vec<(PathBuf, FsEntry)>,
        pub(crate) read_dir_calls: Cell<usize>,
    }

    impl TestFs {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn dir(mut self, path: &str) -> Self {
            self.nodes.push(Node {
                path: PathBuf::from(path),
                is_dir: true,
                size: 0,
                modified: None,
            });
            self
        }

        pub(crate) fn dir_at(mut self, path: &str, secs: u64) -> Self {
            self.nodes.push(Node {
                path: PathBuf::from(path),
                is_dir: true,
                size: 0,
                modified: Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs)),
            });
            self
        }

        pub(crate) fn file(self, path: &str, size: u64) -> Self {
            self.file_at(path, size, 0)
        }

        pub(crate) fn file_at(mut self, path: &str, size: u64, secs: u64) -> Self {
            self.nodes.push(Node {
                path: PathBuf::from(path),
                is_dir: false,
                size,
                modified: Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs)),
            });
            self
        }

        /// Child of `dir` listed exactly as given, name and path untouched.
        pub(crate) fn raw_child(mut self, dir: &str, name: &str, path: &str) -> Self {
            self.raw.push((
                PathBuf::from(dir),
                FsEntry {
                    name: name.to_string(),
                    path: PathBuf::from(path),
                    is_dir: false,
                    size: 0,
                    modified: None,
                },
            ));
            self
        }

        pub(crate) fn unreadable(mut self, path: &str) -> Self {
            self.unreadable.insert(PathBuf::from(path));
            self
        }

        pub(crate) fn set_unreadable(&mut self, path: &str) {
            self.unreadable.insert(PathBuf::from(path));
        }
    }

    impl FileSystem for TestFs {
        fn read_dir(&self, dir: &Path) -> std::io::Result<Vec<FsEntry>> {
            self.read_dir_calls.set(self.read_dir_calls.get() + 1);
            if self.unreadable.contains(dir) {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "permission denied",
                ));
            }
            if !self.is_directory(dir) && dir != Path::new("/") {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no such directory",
                ));
            }
            Ok(self
                .nodes
                .iter()
                .filter(|n| n.path.parent() == Some(dir))
                .map(|n| FsEntry {
                    name: n
                        .path
                        .file_name()
                        .map(|s| s.to_string_lossy().to_string())
                        .unwrap_or_default(),
                    path: n.path.clone(),
                    is_dir: n.is_dir,
                    size: n.size,
                    modified: n.modified,
                })
                .chain(
                    self.raw
                        .iter()
                        .filter(|(parent, _)| parent == dir)
                        .map(|(_, entry)| entry.clone()),
                )
                .collect())
        }

        fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf> {
            Ok(path.to_path_buf())
        }

        fn metadata(&self, path: &Path) -> std::io::Result<FsMetadata> {
            if path == Path::new("/") {
                return Ok(FsMetadata {
                    is_dir: true,
                    is_file: false,
                });
            }
            self.nodes
                .iter()
                .find(|n| n.path == path)
                .map(|n| FsMetadata {
                    is_dir: n.is_dir,
                    is_file: !n.is_dir,
                })
                .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "not found"))
        }
    }
}
