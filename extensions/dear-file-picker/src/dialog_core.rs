use std::path::{Path, PathBuf};

use crate::core::{DialogError, DialogMode, FileDialog};
use crate::filter::{ExtensionSet, FilterSet, parse_filters};
use crate::fs::FileSystem;
use crate::scan::{Entry, scan};
use crate::sort::{SortColumn, SortState, order_directories, order_files};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// Lifecycle state of a [`DialogSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogState {
    /// Navigating, selecting and typing.
    Browsing,
    /// SaveFile only: the submitted target exists and awaits a yes/no.
    SaveConfirmPending,
    /// Terminal: a path was confirmed.
    Completed,
    /// Terminal: the user cancelled.
    Cancelled,
}

impl DialogState {
    /// Returns `true` for `Completed` and `Cancelled`.
    pub fn is_terminal(self) -> bool {
        matches!(self, DialogState::Completed | DialogState::Cancelled)
    }
}

/// Discrete user action fed to [`DialogSession::handle_action`].
///
/// Row indices address the display list: the parent row (when the current
/// directory has a parent), then directories, then files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogAction {
    /// Single click on a row.
    SelectRow(usize),
    /// Double click on a row: enter directories, pick files.
    ActivateRow(usize),
    /// The file name field was edited.
    EditTypedName(String),
    /// Another filter group was picked.
    ChangeFilter(usize),
    /// A column header was clicked.
    ToggleSort(SortColumn),
    /// Force a rescan of the current directory.
    Refresh,
    /// The Open/Save/Select button was pressed.
    Submit,
    /// Answer to the overwrite prompt.
    ConfirmOverwrite(bool),
    /// The Cancel button was pressed.
    Cancel,
}

/// Whether an action was interpreted in the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action was interpreted (possibly as a deliberate no-op).
    Applied,
    /// The action is not valid in the current state or addresses a missing row.
    Ignored,
}

/// One row of the display list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Row<'a> {
    /// The `..` pseudo-row.
    Parent,
    /// A subdirectory.
    Directory(&'a Entry),
    /// A file that passed the active filter.
    File(&'a Entry),
}

enum RowTarget {
    Enter(PathBuf),
    Pick(String),
}

/// Mutable state of one open picker, from open to completion/cancellation.
///
/// Holds no UI types; drive it with [`DialogAction`]s and a [`FileSystem`].
/// Each session owns its own sort and error state, so several dialogs can be
/// embedded side by side.
#[derive(Clone, Debug)]
pub struct DialogSession {
    mode: DialogMode,
    title: String,
    current_directory: PathBuf,
    filters: FilterSet,
    active_filter_index: usize,
    typed_name: String,
    selected_index: Option<usize>,
    needs_rescan: bool,
    files: Vec<Entry>,
    directories: Vec<Entry>,
    sort: SortState,
    pending_overwrite: Option<PathBuf>,
    last_error: Option<DialogError>,
    result: Option<PathBuf>,
    state: DialogState,
}

impl DialogSession {
    /// Open a session in `start_directory` with raw `label|ext|...` filters.
    ///
    /// The directory is canonicalized when possible. The first listing is
    /// produced by the next [`refresh_if_needed`](Self::refresh_if_needed).
    pub fn new<I, S>(
        fs: &dyn FileSystem,
        title: impl Into<String>,
        mode: DialogMode,
        filters: I,
        start_directory: impl Into<PathBuf>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let start_directory = start_directory.into();
        let current_directory = fs
            .canonicalize(&start_directory)
            .unwrap_or(start_directory);
        let session = Self {
            mode,
            title: title.into(),
            current_directory,
            filters: parse_filters(filters),
            active_filter_index: 0,
            typed_name: String::new(),
            selected_index: None,
            needs_rescan: true,
            files: Vec::new(),
            directories: Vec::new(),
            sort: SortState::default(),
            pending_overwrite: None,
            last_error: None,
            result: None,
            state: DialogState::Browsing,
        };
        trace_session_opened(&session);
        session
    }

    pub(crate) fn from_config(cfg: FileDialog, fs: &dyn FileSystem) -> Self {
        let title = cfg.effective_title();
        let dir = cfg.effective_directory();
        let mut session = Self::new(fs, title, cfg.mode, &cfg.filters, dir);
        if let Some(name) = cfg.default_name {
            session.typed_name = name;
        }
        session
    }

    /// Mode, fixed at creation.
    pub fn mode(&self) -> DialogMode {
        self.mode
    }

    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Directory currently listed.
    pub fn current_directory(&self) -> &Path {
        &self.current_directory
    }

    /// Parsed filter groups in caller order.
    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Index of the active filter group.
    pub fn active_filter_index(&self) -> usize {
        self.active_filter_index
    }

    /// Active filter group, or `None` when no groups survived parsing.
    pub fn active_filter(&self) -> Option<(&str, &ExtensionSet)> {
        self.filters.get_index(self.active_filter_index)
    }

    /// Content of the file name field.
    pub fn typed_name(&self) -> &str {
        &self.typed_name
    }

    /// Selected display row.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Whether the next refresh will rescan the directory.
    pub fn needs_rescan(&self) -> bool {
        self.needs_rescan
    }

    /// Files of the current listing, in display order.
    pub fn files(&self) -> &[Entry] {
        &self.files
    }

    /// Subdirectories of the current listing, in display order.
    pub fn directories(&self) -> &[Entry] {
        &self.directories
    }

    /// Column sort state.
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Target awaiting overwrite confirmation.
    pub fn pending_overwrite(&self) -> Option<&Path> {
        self.pending_overwrite.as_deref()
    }

    /// Last user-visible error.
    pub fn last_error(&self) -> Option<&DialogError> {
        self.last_error.as_ref()
    }

    /// Confirmed path; only set once the session is `Completed`.
    pub fn result(&self) -> Option<&Path> {
        self.result.as_deref()
    }

    /// Lifecycle state.
    pub fn state(&self) -> DialogState {
        self.state
    }

    /// Returns `true` once completed or cancelled.
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Parent of the current directory, when it has one.
    pub fn parent_directory(&self) -> Option<&Path> {
        self.current_directory
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Number of display rows (parent row included).
    pub fn row_count(&self) -> usize {
        usize::from(self.parent_directory().is_some()) + self.directories.len() + self.files.len()
    }

    /// Resolve one display row.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        let mut index = index;
        if self.parent_directory().is_some() {
            if index == 0 {
                return Some(Row::Parent);
            }
            index -= 1;
        }
        if let Some(dir) = self.directories.get(index) {
            return Some(Row::Directory(dir));
        }
        self.files
            .get(index - self.directories.len())
            .map(Row::File)
    }

    /// All display rows: parent (if any), directories, files.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.parent_directory()
            .map(|_| Row::Parent)
            .into_iter()
            .chain(self.directories.iter().map(Row::Directory))
            .chain(self.files.iter().map(Row::File))
    }

    /// Ask for a rescan on the next refresh.
    pub fn request_rescan(&mut self) {
        if !self.is_finished() {
            self.needs_rescan = true;
        }
    }

    /// Rescan the current directory if a rescan was requested.
    ///
    /// Returns `true` when a new listing was installed. On failure the
    /// previous listing is kept and `last_error` reports the scan error; the
    /// request is consumed either way so a broken directory is not polled
    /// every frame.
    pub fn refresh_if_needed(&mut self, fs: &dyn FileSystem) -> bool {
        if !self.needs_rescan || self.is_finished() {
            return false;
        }
        self.needs_rescan = false;

        let filter = self.active_filter().map(|(_, set)| set);
        match scan(fs, &self.current_directory, self.mode, filter) {
            Ok(listing) => {
                self.files = listing.files;
                self.directories = listing.directories;
                self.apply_sort();
                if matches!(self.last_error, Some(DialogError::Scan { .. })) {
                    self.last_error = None;
                }
                if self.selected_index.is_some_and(|i| i >= self.row_count()) {
                    self.selected_index = None;
                }
                true
            }
            Err(err) => {
                self.last_error = Some(DialogError::Scan {
                    path: err.path().to_path_buf(),
                    message: err.to_string(),
                });
                false
            }
        }
    }

    /// Apply one user action.
    ///
    /// Finished sessions ignore everything. While the overwrite prompt is
    /// open only `ConfirmOverwrite` and `Cancel` are accepted.
    pub fn handle_action(&mut self, fs: &dyn FileSystem, action: DialogAction) -> ActionOutcome {
        let outcome = match self.state {
            DialogState::Completed | DialogState::Cancelled => ActionOutcome::Ignored,
            DialogState::SaveConfirmPending => match action {
                DialogAction::ConfirmOverwrite(yes) => {
                    self.confirm_overwrite(yes);
                    ActionOutcome::Applied
                }
                DialogAction::Cancel => {
                    self.cancel();
                    ActionOutcome::Applied
                }
                _ => ActionOutcome::Ignored,
            },
            DialogState::Browsing => self.handle_browsing(fs, &action),
        };
        trace_action(&action, outcome, self.state);
        outcome
    }

    fn handle_browsing(&mut self, fs: &dyn FileSystem, action: &DialogAction) -> ActionOutcome {
        match action {
            DialogAction::SelectRow(index) => self.select_row(*index),
            DialogAction::ActivateRow(index) => self.activate_row(*index),
            DialogAction::EditTypedName(text) => {
                self.typed_name.clone_from(text);
                self.selected_index = None;
                ActionOutcome::Applied
            }
            DialogAction::ChangeFilter(index) => {
                if *index >= self.filters.len() {
                    return ActionOutcome::Ignored;
                }
                self.active_filter_index = *index;
                self.selected_index = Some(0);
                self.needs_rescan = true;
                trace_filter_changed(self.filters.label_at(*index).unwrap_or_default());
                ActionOutcome::Applied
            }
            DialogAction::ToggleSort(column) => {
                self.sort.toggle(*column);
                trace_sort_changed(&self.sort);
                self.apply_sort();
                ActionOutcome::Applied
            }
            DialogAction::Refresh => {
                self.needs_rescan = true;
                ActionOutcome::Applied
            }
            DialogAction::Submit => {
                self.submit(fs);
                ActionOutcome::Applied
            }
            // Only meaningful while the overwrite prompt is open.
            DialogAction::ConfirmOverwrite(_) => ActionOutcome::Ignored,
            DialogAction::Cancel => {
                self.cancel();
                ActionOutcome::Applied
            }
        }
    }

    fn select_row(&mut self, index: usize) -> ActionOutcome {
        let name = match self.row(index) {
            None => return ActionOutcome::Ignored,
            Some(Row::Parent) => None,
            Some(Row::Directory(dir)) => {
                matches!(self.mode, DialogMode::SelectFolder).then(|| dir.name.clone())
            }
            Some(Row::File(file)) => Some(file.name.clone()),
        };
        self.selected_index = Some(index);
        if let Some(name) = name {
            self.typed_name = name;
        }
        ActionOutcome::Applied
    }

    fn activate_row(&mut self, index: usize) -> ActionOutcome {
        let target = match self.row(index) {
            None => return ActionOutcome::Ignored,
            Some(Row::Parent) => match self.parent_directory() {
                Some(parent) => RowTarget::Enter(parent.to_path_buf()),
                None => return ActionOutcome::Ignored,
            },
            Some(Row::Directory(dir)) => RowTarget::Enter(dir.path.clone()),
            Some(Row::File(file)) => RowTarget::Pick(file.name.clone()),
        };
        match target {
            RowTarget::Enter(dir) => self.navigate(dir),
            RowTarget::Pick(name) => {
                self.typed_name = name;
                self.selected_index = Some(index);
            }
        }
        ActionOutcome::Applied
    }

    fn navigate(&mut self, dir: PathBuf) {
        trace_navigate(&self.current_directory, &dir);
        self.current_directory = dir;
        self.files.clear();
        self.directories.clear();
        self.needs_rescan = true;
        self.selected_index = Some(0);
        self.sort.reset();
    }

    /// Path the submit button targets.
    ///
    /// An empty name targets the current directory. In SaveFile mode any
    /// existing target goes through the overwrite prompt, directories
    /// included, so a confirmed save can yield a directory path.
    pub fn candidate(&self) -> PathBuf {
        if self.typed_name.is_empty() {
            self.current_directory.clone()
        } else {
            self.current_directory.join(&self.typed_name)
        }
    }

    fn submit(&mut self, fs: &dyn FileSystem) {
        let candidate = self.candidate();
        match self.mode {
            DialogMode::OpenFile => {
                if !fs.exists(&candidate) {
                    return;
                }
                if fs.is_regular_file(&candidate) {
                    self.complete(candidate);
                } else {
                    self.last_error = Some(DialogError::NotARegularFile);
                }
            }
            DialogMode::SaveFile => {
                if fs.exists(&candidate) {
                    self.last_error = None;
                    self.pending_overwrite = Some(candidate);
                    self.transition(DialogState::SaveConfirmPending);
                } else {
                    self.complete(candidate);
                }
            }
            DialogMode::SelectFolder => {
                if !fs.exists(&candidate) {
                    return;
                }
                if fs.is_directory(&candidate) {
                    self.complete(candidate);
                } else {
                    self.last_error = Some(DialogError::NotADirectory);
                }
            }
        }
    }

    fn confirm_overwrite(&mut self, yes: bool) {
        let Some(candidate) = self.pending_overwrite.take() else {
            self.transition(DialogState::Browsing);
            return;
        };
        if yes {
            self.complete(candidate);
        } else {
            self.transition(DialogState::Browsing);
        }
    }

    fn complete(&mut self, path: PathBuf) {
        self.last_error = None;
        self.pending_overwrite = None;
        self.result = Some(path);
        self.clear_transient();
        self.transition(DialogState::Completed);
    }

    fn cancel(&mut self) {
        self.pending_overwrite = None;
        self.clear_transient();
        self.transition(DialogState::Cancelled);
    }

    fn clear_transient(&mut self) {
        self.files.clear();
        self.directories.clear();
        self.selected_index = None;
        self.needs_rescan = false;
        self.sort.reset();
    }

    fn apply_sort(&mut self) {
        order_files(&mut self.files, &self.sort);
        order_directories(&mut self.directories, &self.sort);
    }

    fn transition(&mut self, next: DialogState) {
        trace_transition(self.state, next);
        self.state = next;
    }
}

#[cfg(feature = "tracing")]
fn trace_session_opened(session: &DialogSession) {
    debug!(
        event = "session.opened",
        mode = ?session.mode,
        dir = %session.current_directory.display(),
        filters = session.filters.len(),
        "picker session opened"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_session_opened(_session: &DialogSession) {}

#[cfg(feature = "tracing")]
fn trace_action(action: &DialogAction, outcome: ActionOutcome, state: DialogState) {
    trace!(event = "session.action", ?action, ?outcome, ?state, "action handled");
}

#[cfg(not(feature = "tracing"))]
fn trace_action(_action: &DialogAction, _outcome: ActionOutcome, _state: DialogState) {}

#[cfg(feature = "tracing")]
fn trace_navigate(from: &Path, to: &Path) {
    debug!(
        event = "session.navigate",
        from = %from.display(),
        to = %to.display(),
        "navigate"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_navigate(_from: &Path, _to: &Path) {}

#[cfg(feature = "tracing")]
fn trace_filter_changed(label: &str) {
    trace!(event = "session.filter_changed", label, "filter changed");
}

#[cfg(not(feature = "tracing"))]
fn trace_filter_changed(_label: &str) {}

#[cfg(feature = "tracing")]
fn trace_sort_changed(sort: &SortState) {
    trace!(event = "session.sort_changed", active = ?sort.active(), "sort changed");
}

#[cfg(not(feature = "tracing"))]
fn trace_sort_changed(_sort: &SortState) {}

#[cfg(feature = "tracing")]
fn trace_transition(from: DialogState, to: DialogState) {
    if from != to {
        debug!(event = "session.transition", ?from, ?to, "state transition");
    }
}

#[cfg(not(feature = "tracing"))]
fn trace_transition(_from: DialogState, _to: DialogState) {}
