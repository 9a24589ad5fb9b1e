use std::cmp::Ordering;

use crate::scan::Entry;

/// Columns of the file list that can drive ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortColumn {
    /// File or directory name
    Name,
    /// Size in bytes (files only)
    Size,
    /// Extension string (files only)
    Type,
    /// Last modified time
    Date,
}

impl SortColumn {
    /// All columns in display order.
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Name,
        SortColumn::Size,
        SortColumn::Type,
        SortColumn::Date,
    ];

    /// Header label.
    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Name => "Name",
            SortColumn::Size => "Size",
            SortColumn::Type => "Type",
            SortColumn::Date => "Date",
        }
    }
}

/// Direction of a column. Inactive columns report `Unset`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
    /// Column not active
    #[default]
    Unset,
}

/// Sort state of one session: at most one active column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    active: Option<(SortColumn, SortDirection)>,
}

impl SortState {
    /// Returns the active column and its direction, if any.
    pub fn active(&self) -> Option<(SortColumn, SortDirection)> {
        self.active
    }

    /// Direction of `column`; `Unset` unless it is the active one.
    pub fn direction(&self, column: SortColumn) -> SortDirection {
        match self.active {
            Some((c, dir)) if c == column => dir,
            _ => SortDirection::Unset,
        }
    }

    /// Header click: a new column starts ascending and clears the others,
    /// the active column flips between ascending and descending.
    pub fn toggle(&mut self, column: SortColumn) {
        let next = match self.direction(column) {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending | SortDirection::Unset => SortDirection::Ascending,
        };
        self.active = Some((column, next));
    }

    /// Back to all columns unset.
    pub fn reset(&mut self) {
        self.active = None;
    }
}

/// Stable sort of `entries` by one column.
///
/// `Unset` keeps the incoming order.
pub fn order(entries: &[Entry], column: SortColumn, direction: SortDirection) -> Vec<Entry> {
    let mut out = entries.to_vec();
    sort_in_place(&mut out, column, direction);
    out
}

/// Reorder files in place according to the active column.
pub fn order_files(files: &mut [Entry], state: &SortState) {
    if let Some((column, direction)) = state.active() {
        sort_in_place(files, column, direction);
    }
}

/// Reorder directories in place.
///
/// Directories have no size or type, so those columns fall back to name
/// ascending regardless of their direction.
pub fn order_directories(directories: &mut [Entry], state: &SortState) {
    match state.active() {
        Some((SortColumn::Date, direction)) => {
            sort_in_place(directories, SortColumn::Date, direction)
        }
        Some((SortColumn::Name, direction)) => {
            sort_in_place(directories, SortColumn::Name, direction)
        }
        Some((SortColumn::Size | SortColumn::Type, _)) => {
            sort_in_place(directories, SortColumn::Name, SortDirection::Ascending)
        }
        None => {}
    }
}

fn sort_in_place(entries: &mut [Entry], column: SortColumn, direction: SortDirection) {
    let descending = match direction {
        SortDirection::Ascending => false,
        SortDirection::Descending => true,
        SortDirection::Unset => return,
    };
    entries.sort_by(|a, b| {
        let ord = compare(a, b, column);
        if descending { ord.reverse() } else { ord }
    });
}

fn compare(a: &Entry, b: &Entry, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Name => a.name.cmp(&b.name),
        SortColumn::Size => a.size_bytes.cmp(&b.size_bytes),
        SortColumn::Type => a.extension().cmp(&b.extension()),
        SortColumn::Date => a.last_modified.cmp(&b.last_modified),
    }
}
