#![deny(missing_docs)]
//! Embeddable open/save/select-folder picker for `dear-imgui-rs`.
//!
//! The crate is split in two layers:
//! - a GUI-free core: filter parsing, directory scanning, column sorting and
//!   the [`DialogSession`] state machine that consumes [`DialogAction`]s;
//! - a presentation boundary ([`Presenter`] plus [`poll`]) that any
//!   immediate-mode GUI can implement. The `imgui` feature ships one for
//!   Dear ImGui ([`FilePickerExt`]).
//!
//! ```
//! use dear_file_picker::{DialogAction, DialogMode, FileDialog, StdFileSystem};
//!
//! let fs = StdFileSystem;
//! let mut session = FileDialog::new(DialogMode::SelectFolder)
//!     .directory(std::env::temp_dir())
//!     .open(&fs);
//! session.refresh_if_needed(&fs);
//! session.handle_action(&fs, DialogAction::Submit);
//! assert!(session.result().is_some());
//! ```
//!
//! Note on UTF-8/CJK: Dear ImGui's default font does not include CJK glyphs.
//! Load a font that contains them if your file names need them.

mod core;
mod dialog_core;
mod dialog_manager;
mod filter;
mod fs;
mod present;
mod scan;
mod sort;
#[cfg(feature = "imgui")]
mod ui;

pub use core::{DialogError, DialogMode, FileDialog, FileDialogError};
pub use dialog_core::{ActionOutcome, DialogAction, DialogSession, DialogState, Row};
pub use dialog_manager::{DialogId, DialogManager};
pub use filter::{
    DEFAULT_FILTER_LABEL, ExtensionSet, FilterSet, WILDCARD_TOKEN, parse_filters,
};
pub use fs::{FileSystem, FsEntry, FsMetadata, StdFileSystem};
pub use present::{
    OVERWRITE_MODAL_ID, OVERWRITE_MODAL_MESSAGE, PollOutcome, Presenter, RowCells, RowResponse,
    format_date, poll, present, row_cells,
};
pub use scan::{Entry, Listing, ScanError, extension_of, scan};
pub use sort::{SortColumn, SortDirection, SortState, order, order_directories, order_files};
#[cfg(feature = "imgui")]
pub use ui::{FilePicker, FilePickerExt, ImguiPresenter};
