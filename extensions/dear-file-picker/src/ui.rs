use std::path::PathBuf;

use dear_imgui_rs::input::MouseButton;
use dear_imgui_rs::{Condition, Ui};

use crate::core::FileDialogError;
use crate::dialog_core::DialogSession;
use crate::dialog_manager::session_result;
use crate::fs::{FileSystem, StdFileSystem};
use crate::present::{Presenter, RowCells, RowResponse, poll};
use crate::sort::{SortColumn, SortDirection};

const ERROR_COLOR: [f32; 4] = [1.0, 0.3, 0.3, 1.0];
const TABLE_ID: &str = "##picker_columns";

/// [`Presenter`] drawing with Dear ImGui.
///
/// Headers and rows share one four-column layout; the first non-table widget
/// closes it again.
pub struct ImguiPresenter<'ui> {
    ui: &'ui Ui,
    in_table: bool,
}

impl<'ui> ImguiPresenter<'ui> {
    /// Wrap a frame's `Ui`.
    pub fn new(ui: &'ui Ui) -> Self {
        Self {
            ui,
            in_table: false,
        }
    }

    fn enter_table(&mut self) {
        if !self.in_table {
            self.ui.columns(4, TABLE_ID, false);
            self.in_table = true;
        }
    }

    fn leave_table(&mut self) {
        if self.in_table {
            self.ui.columns(1, TABLE_ID, false);
            self.ui.separator();
            self.in_table = false;
        }
    }
}

impl Drop for ImguiPresenter<'_> {
    fn drop(&mut self) {
        self.leave_table();
    }
}

impl Presenter for ImguiPresenter<'_> {
    fn text(&mut self, text: &str) {
        self.leave_table();
        self.ui.text(text);
    }

    fn sort_header(&mut self, column: SortColumn, direction: SortDirection) -> bool {
        self.enter_table();
        let arrow = match direction {
            SortDirection::Ascending => " (^)",
            SortDirection::Descending => " (v)",
            SortDirection::Unset => "",
        };
        let clicked = self
            .ui
            .button(format!("{}{arrow}##sort_{}", column.label(), column.label()));
        self.ui.next_column();
        clicked
    }

    fn row(&mut self, cells: &RowCells, selected: bool) -> RowResponse {
        self.enter_table();
        let clicked = self
            .ui
            .selectable_config(cells.name.as_str())
            .selected(selected)
            .span_all_columns(true)
            .allow_double_click(true)
            .build();
        let double = self.ui.is_item_hovered() && self.ui.is_mouse_double_clicked(MouseButton::Left);
        self.ui.next_column();
        for cell in [&cells.size, &cells.kind, &cells.date] {
            self.ui.text(cell);
            self.ui.next_column();
        }
        if double {
            RowResponse::DoubleClicked
        } else if clicked {
            RowResponse::Clicked
        } else {
            RowResponse::None
        }
    }

    fn text_input(&mut self, label: &str, buf: &mut String) -> bool {
        self.leave_table();
        self.ui.text(label);
        self.ui.same_line();
        self.ui.input_text("##picker_file_name", buf).build()
    }

    fn button(&mut self, label: &str) -> bool {
        self.leave_table();
        self.ui.button(label)
    }

    fn same_line(&mut self) {
        self.ui.same_line();
    }

    fn error_text(&mut self, text: &str) {
        self.ui.text_colored(ERROR_COLOR, text);
    }

    fn combo(&mut self, label: &str, items: &[&str], current: usize) -> Option<usize> {
        self.leave_table();
        let preview = items.get(current).copied().unwrap_or_default();
        let mut picked = None;
        if let Some(_c) = self.ui.begin_combo(label, preview) {
            for (i, item) in items.iter().enumerate() {
                if self.ui.selectable_config(*item).selected(i == current).build() {
                    picked = Some(i);
                }
            }
        }
        picked
    }

    fn confirm_modal(&mut self, id: &str, message: &str, open: bool) -> Option<bool> {
        self.leave_table();
        if open && !self.ui.is_popup_open(id) {
            self.ui.open_popup(id);
        }
        let _popup = self.ui.begin_modal_popup(id)?;
        self.ui.text(message);
        self.ui.separator();
        let mut answer = None;
        if self.ui.button("Yes") {
            answer = Some(true);
        }
        self.ui.same_line();
        if self.ui.button("No") {
            answer = Some(false);
        }
        if answer.is_some() || !open {
            self.ui.close_current_popup();
        }
        answer
    }
}

/// UI handle for the picker.
pub struct FilePicker<'ui> {
    ui: &'ui Ui,
}

/// Extend `Ui` with a file picker entry point.
pub trait FilePickerExt {
    /// Entry point for drawing a picker session.
    fn file_picker(&self) -> FilePicker<'_>;
}

impl FilePickerExt for Ui {
    fn file_picker(&self) -> FilePicker<'_> {
        FilePicker { ui: self }
    }
}

impl FilePicker<'_> {
    /// Draw the session in its own window against the real filesystem.
    ///
    /// Returns `Some(result)` once the user confirms or cancels.
    ///
    /// ```no_run
    /// use dear_file_picker::{DialogMode, FileDialog, FilePickerExt, StdFileSystem};
    /// # use dear_imgui_rs::*;
    /// # let mut ctx = Context::create();
    /// # let ui = ctx.frame();
    /// let mut session = FileDialog::new(DialogMode::OpenFile)
    ///     .filter("Images|.png|.jpg")
    ///     .open(&StdFileSystem);
    /// if let Some(res) = ui.file_picker().show(&mut session) {
    ///     match res {
    ///         Ok(path) => eprintln!("{}", path.display()),
    ///         Err(e) => eprintln!("{e}"),
    ///     }
    /// }
    /// ```
    pub fn show(&self, session: &mut DialogSession) -> Option<Result<PathBuf, FileDialogError>> {
        self.show_with_fs(session, &StdFileSystem)
    }

    /// Same as [`show`](Self::show) with a custom filesystem.
    pub fn show_with_fs(
        &self,
        session: &mut DialogSession,
        fs: &dyn FileSystem,
    ) -> Option<Result<PathBuf, FileDialogError>> {
        if session.is_finished() {
            return Some(session_result(session));
        }
        let title = session.title().to_string();
        let outcome = self
            .ui
            .window(title)
            .size([740.0, 410.0], Condition::FirstUseEver)
            .build(|| poll(session, fs, &mut ImguiPresenter::new(self.ui)))?;
        if outcome.still_open {
            None
        } else {
            Some(session_result(session))
        }
    }

    /// Draw only the picker contents, for embedding in a caller-owned window.
    pub fn draw_contents(
        &self,
        session: &mut DialogSession,
        fs: &dyn FileSystem,
    ) -> Option<Result<PathBuf, FileDialogError>> {
        let outcome = poll(session, fs, &mut ImguiPresenter::new(self.ui));
        if outcome.still_open {
            None
        } else {
            Some(session_result(session))
        }
    }
}
