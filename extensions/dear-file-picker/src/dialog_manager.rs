use std::collections::HashMap;
use std::path::PathBuf;

use crate::core::{DialogMode, FileDialog, FileDialogError};
use crate::dialog_core::{DialogSession, DialogState};
use crate::fs::FileSystem;
use crate::present::{Presenter, poll};

/// Opaque identifier for a dialog owned by a [`DialogManager`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DialogId(u64);

/// Keeps several picker sessions alive at once, keyed by [`DialogId`].
///
/// The caller opens a dialog once and later drives it every frame with
/// [`poll`](Self::poll). A dialog is dropped from the manager as soon as it
/// produces a result.
#[derive(Debug, Default)]
pub struct DialogManager {
    next_id: u64,
    sessions: HashMap<DialogId, DialogSession>,
}

impl DialogManager {
    /// Create a new manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a dialog with default settings for `mode`.
    pub fn open(&mut self, mode: DialogMode, fs: &dyn FileSystem) -> DialogId {
        self.open_with(FileDialog::new(mode), fs)
    }

    /// Open a dialog from a configured builder.
    pub fn open_with(&mut self, dialog: FileDialog, fs: &dyn FileSystem) -> DialogId {
        self.open_session(dialog.open(fs))
    }

    /// Adopt an already constructed session.
    pub fn open_session(&mut self, session: DialogSession) -> DialogId {
        self.next_id = self.next_id.wrapping_add(1);
        let id = DialogId(self.next_id);
        self.sessions.insert(id, session);
        id
    }

    /// Close a dialog and hand back its session (if any).
    pub fn close(&mut self, id: DialogId) -> Option<DialogSession> {
        self.sessions.remove(&id)
    }

    /// Returns `true` if the dialog exists in the manager.
    pub fn contains(&self, id: DialogId) -> bool {
        self.sessions.contains_key(&id)
    }

    /// Number of live dialogs.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` when no dialog is open.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Immutable access to a session.
    pub fn session(&self, id: DialogId) -> Option<&DialogSession> {
        self.sessions.get(&id)
    }

    /// Mutable access to a session.
    pub fn session_mut(&mut self, id: DialogId) -> Option<&mut DialogSession> {
        self.sessions.get_mut(&id)
    }

    /// Drive one frame of a dialog.
    ///
    /// If a result is produced (confirm/cancel), the dialog is removed from the
    /// manager and the result is returned.
    pub fn poll(
        &mut self,
        id: DialogId,
        fs: &dyn FileSystem,
        presenter: &mut dyn Presenter,
    ) -> Option<Result<PathBuf, FileDialogError>> {
        let session = self.sessions.get_mut(&id)?;
        let outcome = poll(session, fs, presenter);
        if outcome.still_open {
            return None;
        }
        let session = self.sessions.remove(&id)?;
        Some(session_result(&session))
    }
}

/// Map a finished session onto the caller-facing result.
pub(crate) fn session_result(session: &DialogSession) -> Result<PathBuf, FileDialogError> {
    match (session.state(), session.result()) {
        (DialogState::Completed, Some(path)) => Ok(path.to_path_buf()),
        _ => Err(FileDialogError::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::test_support::TestFs;
    use crate::present::{RowCells, RowResponse};
    use crate::sort::{SortColumn, SortDirection};

    /// Presses the listed buttons every frame, nothing else.
    struct Buttons(Vec<&'static str>);

    impl Presenter for Buttons {
        fn text(&mut self, _text: &str) {}
        fn sort_header(&mut self, _column: SortColumn, _direction: SortDirection) -> bool {
            false
        }
        fn row(&mut self, _cells: &RowCells, _selected: bool) -> RowResponse {
            RowResponse::None
        }
        fn text_input(&mut self, _label: &str, _buf: &mut String) -> bool {
            false
        }
        fn button(&mut self, label: &str) -> bool {
            self.0.iter().any(|b| *b == label)
        }
        fn same_line(&mut self) {}
        fn error_text(&mut self, _text: &str) {}
        fn combo(&mut self, _label: &str, _items: &[&str], _current: usize) -> Option<usize> {
            None
        }
        fn confirm_modal(&mut self, _id: &str, _message: &str, _open: bool) -> Option<bool> {
            None
        }
    }

    fn fs() -> TestFs {
        TestFs::new().dir("/w").file("/w/a.txt", 1)
    }

    #[test]
    fn open_close_roundtrip() {
        let fs = fs();
        let mut mgr = DialogManager::new();
        let id1 = mgr.open_with(FileDialog::new(DialogMode::OpenFile).directory("/w"), &fs);
        let id2 = mgr.open_with(FileDialog::new(DialogMode::SaveFile).directory("/w"), &fs);
        assert_ne!(id1, id2);
        assert_eq!(mgr.len(), 2);

        let s1 = mgr.close(id1).unwrap();
        assert_eq!(s1.mode(), DialogMode::OpenFile);
        assert!(!mgr.contains(id1));
        assert!(mgr.contains(id2));
    }

    #[test]
    fn poll_removes_dialog_once_finished() {
        let fs = fs();
        let mut mgr = DialogManager::new();
        let id = mgr.open_with(
            FileDialog::new(DialogMode::OpenFile)
                .directory("/w")
                .default_file_name("a.txt"),
            &fs,
        );

        assert!(mgr.poll(id, &fs, &mut Buttons(vec![])).is_none());
        assert!(mgr.contains(id));

        let res = mgr.poll(id, &fs, &mut Buttons(vec!["Open"]));
        assert_eq!(res.unwrap().unwrap(), PathBuf::from("/w/a.txt"));
        assert!(!mgr.contains(id));
        assert!(mgr.poll(id, &fs, &mut Buttons(vec![])).is_none());
    }

    #[test]
    fn cancel_reports_cancelled() {
        let fs = fs();
        let mut mgr = DialogManager::new();
        let id = mgr.open_with(FileDialog::new(DialogMode::SelectFolder).directory("/w"), &fs);
        let res = mgr.poll(id, &fs, &mut Buttons(vec!["Cancel"]));
        assert_eq!(res, Some(Err(FileDialogError::Cancelled)));
        assert_eq!(FileDialogError::Cancelled.to_string(), "cancelled");
        assert!(mgr.is_empty());
    }
}
