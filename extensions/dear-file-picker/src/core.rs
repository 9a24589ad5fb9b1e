use std::path::PathBuf;
use thiserror::Error;

use crate::dialog_core::DialogSession;
use crate::fs::FileSystem;

/// Dialog mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DialogMode {
    /// Pick an existing regular file
    OpenFile,
    /// Pick a file name to save to (may or may not exist)
    SaveFile,
    /// Pick a directory
    SelectFolder,
}

impl DialogMode {
    /// Label of the confirm button for this mode.
    pub fn confirm_label(self) -> &'static str {
        match self {
            DialogMode::OpenFile => "Open",
            DialogMode::SaveFile => "Save",
            DialogMode::SelectFolder => "Select",
        }
    }

    /// Default window title for this mode.
    pub fn default_title(self) -> &'static str {
        match self {
            DialogMode::OpenFile => "Open File",
            DialogMode::SaveFile => "Save File",
            DialogMode::SelectFolder => "Select Folder",
        }
    }
}

/// User-visible, non-fatal error kept on the session (`last_error`).
///
/// These are never returned across the caller boundary; the presenter shows
/// them inline next to the confirm button.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum DialogError {
    /// Open was submitted on something that exists but is not a regular file.
    #[error("The selected item is not a regular file")]
    NotARegularFile,
    /// Select was submitted on something that exists but is not a directory.
    #[error("The selected item is not a folder")]
    NotADirectory,
    /// The current directory could not be listed; the previous listing is kept.
    #[error("cannot read {}: {message}", path.display())]
    Scan {
        /// Directory that failed to enumerate.
        path: PathBuf,
        /// Message captured from the filesystem backend.
        message: String,
    },
}

/// Error half of the result handed to callers by [`crate::DialogManager`]
/// and the ImGui entry points.
///
/// Filesystem failures never get here; they stay on the session as
/// [`DialogError`].
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum FileDialogError {
    /// User cancelled the dialog
    #[error("cancelled")]
    Cancelled,
}

/// Builder for opening a picker session.
///
/// Filters use the raw `label|ext|ext` form, one string per group, e.g.
/// `"Images|.png|.jpg"` or `"All Files|.*"`. Order is preserved.
#[derive(Clone, Debug)]
pub struct FileDialog {
    pub(crate) mode: DialogMode,
    pub(crate) title: Option<String>,
    pub(crate) start_dir: Option<PathBuf>,
    pub(crate) default_name: Option<String>,
    pub(crate) filters: Vec<String>,
}

impl FileDialog {
    /// Create a new builder with the given mode
    pub fn new(mode: DialogMode) -> Self {
        Self {
            mode,
            title: None,
            start_dir: None,
            default_name: None,
            filters: Vec::new(),
        }
    }

    /// Set the window title (defaults to one derived from the mode)
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
    /// Set initial directory
    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }
    /// Pre-fill the file name field (mostly useful for SaveFile)
    pub fn default_file_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = Some(name.into());
        self
    }
    /// Add a raw filter group.
    ///
    /// Examples
    /// ```
    /// use dear_file_picker::{FileDialog, DialogMode};
    /// let d = FileDialog::new(DialogMode::OpenFile)
    ///     .filter("Images|.png|.jpg")
    ///     .filter("All Files|.*");
    /// ```
    pub fn filter(mut self, raw: impl Into<String>) -> Self {
        self.filters.push(raw.into());
        self
    }
    /// Add multiple raw filter groups, appended after any previous ones.
    pub fn filters<I, S>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.extend(filters.into_iter().map(Into::into));
        self
    }

    /// Resolve the title shown by the presenter.
    pub(crate) fn effective_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| self.mode.default_title().to_string())
    }

    /// Resolve the starting directory.
    pub(crate) fn effective_directory(&self) -> PathBuf {
        match &self.start_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Open a session. The first listing is produced on the next refresh.
    pub fn open(self, fs: &dyn FileSystem) -> DialogSession {
        DialogSession::from_config(self, fs)
    }
}
