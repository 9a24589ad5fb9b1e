//! Presentation boundary: turn a [`DialogSession`] into abstract draw calls
//! and collect the user's actions.
//!
//! A frame is split in two phases. [`present`] only reads the session and
//! returns the actions the user produced; [`poll`] then applies them. Drawing
//! never mutates the session, so the state machine stays testable without a
//! GUI.

use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::core::DialogMode;
use crate::dialog_core::{DialogAction, DialogSession, DialogState, Row};
use crate::fs::FileSystem;
use crate::sort::{SortColumn, SortDirection};

/// Id of the overwrite confirmation modal.
pub const OVERWRITE_MODAL_ID: &str = "File Exists";

/// Body of the overwrite confirmation modal.
pub const OVERWRITE_MODAL_MESSAGE: &str = "The file already exists.\nDo you want to overwrite it?";

/// How a row reacted this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowResponse {
    /// Not interacted with.
    #[default]
    None,
    /// Single click.
    Clicked,
    /// Double click.
    DoubleClicked,
}

/// Text of the four columns of one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowCells {
    /// Name column.
    pub name: String,
    /// Size column (`-` for directories).
    pub size: String,
    /// Type column (extension, `<directory>` or `<parent>`).
    pub kind: String,
    /// Date column (`-` when unknown).
    pub date: String,
}

/// Primitive widgets the picker needs from its host GUI.
///
/// Every method is called once per frame per widget, immediate-mode style,
/// and reports what happened to that widget during this frame.
pub trait Presenter {
    /// Plain text line.
    fn text(&mut self, text: &str);
    /// Clickable column header; returns `true` when clicked.
    fn sort_header(&mut self, column: SortColumn, direction: SortDirection) -> bool;
    /// Selectable row spanning the four columns.
    fn row(&mut self, cells: &RowCells, selected: bool) -> RowResponse;
    /// Single-line text editor; returns `true` when `buf` changed.
    fn text_input(&mut self, label: &str, buf: &mut String) -> bool;
    /// Push button; returns `true` when pressed.
    fn button(&mut self, label: &str) -> bool;
    /// Keep the next widget on the current line.
    fn same_line(&mut self);
    /// Inline error message.
    fn error_text(&mut self, text: &str);
    /// Drop-down; returns the newly picked index, if any.
    fn combo(&mut self, label: &str, items: &[&str], current: usize) -> Option<usize>;
    /// Yes/No modal. `open` is `true` while the prompt should be shown;
    /// returns the answer on the frame the user gives it.
    fn confirm_modal(&mut self, id: &str, message: &str, open: bool) -> Option<bool>;
}

/// What the caller learns from one [`poll`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// The dialog should keep being drawn.
    pub still_open: bool,
    /// The user confirmed a path.
    pub completed: bool,
    /// Confirmed path (only with `completed`).
    pub result_path: Option<PathBuf>,
}

impl PollOutcome {
    /// Snapshot the terminal status of a session.
    pub fn of(session: &DialogSession) -> Self {
        let completed = session.state() == DialogState::Completed;
        Self {
            still_open: !session.is_finished(),
            completed,
            result_path: if completed {
                session.result().map(|p| p.to_path_buf())
            } else {
                None
            },
        }
    }
}

/// Drive one frame: refresh, draw, then apply the collected actions.
///
/// Actions produced after the session finished in the same frame are dropped.
pub fn poll(
    session: &mut DialogSession,
    fs: &dyn FileSystem,
    presenter: &mut dyn Presenter,
) -> PollOutcome {
    if session.is_finished() {
        return PollOutcome::of(session);
    }
    session.refresh_if_needed(fs);

    for action in present(session, presenter) {
        if session.is_finished() {
            break;
        }
        session.handle_action(fs, action);
    }

    // Navigation and filter changes list the new directory before the next draw.
    session.refresh_if_needed(fs);
    PollOutcome::of(session)
}

/// Draw the session and return the user's actions in widget order.
pub fn present(session: &DialogSession, presenter: &mut dyn Presenter) -> Vec<DialogAction> {
    let mut actions = Vec::new();

    presenter.text(&format!("Path: {}", session.current_directory().display()));

    for column in SortColumn::ALL {
        if presenter.sort_header(column, session.sort().direction(column)) {
            actions.push(DialogAction::ToggleSort(column));
        }
    }

    for (index, row) in session.rows().enumerate() {
        let selected = session.selected_index() == Some(index);
        match presenter.row(&row_cells(row), selected) {
            RowResponse::None => {}
            RowResponse::Clicked => actions.push(DialogAction::SelectRow(index)),
            RowResponse::DoubleClicked => {
                actions.push(DialogAction::SelectRow(index));
                actions.push(DialogAction::ActivateRow(index));
            }
        }
    }

    let mut name = session.typed_name().to_string();
    if presenter.text_input("File Name:", &mut name) {
        actions.push(DialogAction::EditTypedName(name));
    }

    if presenter.button("Cancel") {
        actions.push(DialogAction::Cancel);
    }
    presenter.same_line();
    if presenter.button(session.mode().confirm_label()) {
        actions.push(DialogAction::Submit);
    }
    if let Some(err) = session.last_error() {
        presenter.same_line();
        presenter.error_text(&err.to_string());
    }

    let filters = session.filters();
    if !filters.is_empty() && session.mode() != DialogMode::SelectFolder {
        let labels: Vec<&str> = filters.labels().collect();
        let current = session.active_filter_index();
        presenter.same_line();
        if let Some(index) = presenter.combo("Filter:", &labels, current) {
            if index != current {
                actions.push(DialogAction::ChangeFilter(index));
            }
        }
    }

    if session.mode() == DialogMode::SaveFile {
        let open = session.state() == DialogState::SaveConfirmPending;
        if let Some(yes) = presenter.confirm_modal(OVERWRITE_MODAL_ID, OVERWRITE_MODAL_MESSAGE, open)
        {
            actions.push(DialogAction::ConfirmOverwrite(yes));
        }
    }

    actions
}

/// Column texts for one display row.
pub fn row_cells(row: Row<'_>) -> RowCells {
    match row {
        Row::Parent => RowCells {
            name: "..".into(),
            size: "-".into(),
            kind: "<parent>".into(),
            date: "-".into(),
        },
        Row::Directory(dir) => RowCells {
            name: dir.name.clone(),
            size: "-".into(),
            kind: "<directory>".into(),
            date: format_date(dir.last_modified),
        },
        Row::File(file) => RowCells {
            name: file.name.clone(),
            size: file.size_bytes.to_string(),
            kind: file.extension(),
            date: format_date(file.last_modified),
        },
    }
}

/// Local `YYYY-MM-DD HH:MM`, or `-` when unknown.
pub fn format_date(time: Option<SystemTime>) -> String {
    match time {
        Some(t) => DateTime::<Local>::from(t).format("%F %R").to_string(),
        None => "-".to_string(),
    }
}
