use std::collections::VecDeque;
use std::path::PathBuf;

use dear_file_picker::{
    DialogManager, DialogMode, FileDialog, FileDialogError, OVERWRITE_MODAL_ID, Presenter,
    RowCells, RowResponse, SortColumn, SortDirection, StdFileSystem, poll,
};

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dear_file_picker=trace".into());
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    p.push(format!("dear-file-picker-{prefix}-{pid}-{t}"));
    p
}

/// One scripted user gesture per frame.
enum Gesture {
    Idle,
    DoubleClick(&'static str),
    Click(&'static str),
    Type(&'static str),
    Press(&'static str),
    Answer(bool),
}

/// Replays gestures frame by frame and records what was drawn last.
struct Replay {
    frames: VecDeque<Gesture>,
    current: Gesture,
    rows: Vec<String>,
    texts: Vec<String>,
    modal_seen: bool,
}

impl Replay {
    fn new(frames: impl IntoIterator<Item = Gesture>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            current: Gesture::Idle,
            rows: Vec::new(),
            texts: Vec::new(),
            modal_seen: false,
        }
    }

    fn next_frame(&mut self) {
        self.current = self.frames.pop_front().unwrap_or(Gesture::Idle);
        self.rows.clear();
        self.texts.clear();
    }
}

impl Presenter for Replay {
    fn text(&mut self, text: &str) {
        self.texts.push(text.to_string());
    }

    fn sort_header(&mut self, _column: SortColumn, _direction: SortDirection) -> bool {
        false
    }

    fn row(&mut self, cells: &RowCells, _selected: bool) -> RowResponse {
        self.rows.push(cells.name.clone());
        match self.current {
            Gesture::DoubleClick(name) if name == cells.name => RowResponse::DoubleClicked,
            Gesture::Click(name) if name == cells.name => RowResponse::Clicked,
            _ => RowResponse::None,
        }
    }

    fn text_input(&mut self, _label: &str, buf: &mut String) -> bool {
        match self.current {
            Gesture::Type(text) => {
                *buf = text.to_string();
                true
            }
            _ => false,
        }
    }

    fn button(&mut self, label: &str) -> bool {
        matches!(self.current, Gesture::Press(b) if b == label)
    }

    fn same_line(&mut self) {}

    fn error_text(&mut self, text: &str) {
        self.texts.push(text.to_string());
    }

    fn combo(&mut self, _label: &str, _items: &[&str], _current: usize) -> Option<usize> {
        None
    }

    fn confirm_modal(&mut self, id: &str, _message: &str, open: bool) -> Option<bool> {
        assert_eq!(id, OVERWRITE_MODAL_ID);
        if !open {
            return None;
        }
        self.modal_seen = true;
        match self.current {
            Gesture::Answer(yes) => Some(yes),
            _ => None,
        }
    }
}

#[test]
fn browse_into_folder_and_open_file() {
    init_tracing();
    let fs = StdFileSystem;
    let dir = unique_temp_dir("poll_open");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("docs")).unwrap();
    std::fs::write(dir.join("docs").join("readme.md"), b"# hi").unwrap();
    std::fs::write(dir.join("top.md"), b"top").unwrap();
    let dir = std::fs::canonicalize(&dir).unwrap();

    let mut session = FileDialog::new(DialogMode::OpenFile)
        .directory(&dir)
        .filter("Markdown|.md")
        .open(&fs);
    let mut ui = Replay::new([
        Gesture::Idle,
        Gesture::DoubleClick("docs"),
        Gesture::Click("readme.md"),
        Gesture::Press("Open"),
    ]);

    let mut outcome = None;
    for _ in 0..10 {
        ui.next_frame();
        let out = poll(&mut session, &fs, &mut ui);
        if !out.still_open {
            outcome = Some(out);
            break;
        }
    }

    let outcome = outcome.unwrap();
    assert!(outcome.completed);
    assert_eq!(outcome.result_path, Some(dir.join("docs").join("readme.md")));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn manager_save_with_overwrite_prompt() {
    init_tracing();
    let fs = StdFileSystem;
    let dir = unique_temp_dir("poll_save");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("out.txt"), b"old").unwrap();
    let dir = std::fs::canonicalize(&dir).unwrap();

    let mut mgr = DialogManager::new();
    let id = mgr.open_with(FileDialog::new(DialogMode::SaveFile).directory(&dir), &fs);
    let mut ui = Replay::new([
        Gesture::Type("out.txt"),
        Gesture::Press("Save"),
        Gesture::Answer(false),
        Gesture::Press("Save"),
        Gesture::Answer(true),
    ]);

    let mut result = None;
    for _ in 0..10 {
        ui.next_frame();
        if let Some(res) = mgr.poll(id, &fs, &mut ui) {
            result = Some(res);
            break;
        }
    }

    assert!(ui.modal_seen);
    assert_eq!(result.unwrap().unwrap(), dir.join("out.txt"));
    assert!(!mgr.contains(id));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn manager_cancel() {
    init_tracing();
    let fs = StdFileSystem;
    let mut mgr = DialogManager::new();
    let id = mgr.open_with(
        FileDialog::new(DialogMode::SelectFolder).directory(std::env::temp_dir()),
        &fs,
    );
    let mut ui = Replay::new([Gesture::Idle, Gesture::Press("Cancel")]);

    ui.next_frame();
    assert!(mgr.poll(id, &fs, &mut ui).is_none());
    assert!(ui.texts.iter().any(|t| t.starts_with("Path: ")));
    assert_eq!(ui.rows.first().map(String::as_str), Some(".."));

    ui.next_frame();
    let res = mgr.poll(id, &fs, &mut ui);
    assert!(matches!(res, Some(Err(FileDialogError::Cancelled))));
}
