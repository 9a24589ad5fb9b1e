//! Filter groups: raw `label|ext|ext` strings parsed into an ordered set.

use indexmap::IndexMap;

/// Token that turns a filter group into a wildcard.
pub const WILDCARD_TOKEN: &str = ".*";

/// Label of the filter synthesized when no filters are supplied.
pub const DEFAULT_FILTER_LABEL: &str = "All Files";

/// Extensions accepted by one filter group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtensionSet {
    /// Accept every file regardless of extension.
    Wildcard,
    /// Accept files whose extension (with leading dot) equals one of these.
    Extensions(Vec<String>),
}

impl ExtensionSet {
    /// Returns whether a file extension passes this set.
    ///
    /// `extension` includes the leading dot (`".png"`), or is empty for files
    /// without one. Comparison is exact and case-sensitive.
    pub fn matches(&self, extension: &str) -> bool {
        match self {
            ExtensionSet::Wildcard => true,
            ExtensionSet::Extensions(exts) => exts.iter().any(|e| e == extension),
        }
    }

    /// Returns `true` for [`ExtensionSet::Wildcard`].
    pub fn is_wildcard(&self) -> bool {
        matches!(self, ExtensionSet::Wildcard)
    }
}

/// Insertion-ordered mapping from filter label to [`ExtensionSet`].
///
/// Inserting an existing label replaces its value but keeps the position of
/// the first insertion, so the combo box order follows the caller's order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterSet {
    map: IndexMap<String, ExtensionSet>,
}

impl FilterSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a label.
    pub fn insert(&mut self, label: impl Into<String>, set: ExtensionSet) {
        self.map.insert(label.into(), set);
    }

    /// Returns whether `label` is present.
    pub fn contains(&self, label: &str) -> bool {
        self.map.contains_key(label)
    }

    /// Look up a set by label.
    pub fn get(&self, label: &str) -> Option<&ExtensionSet> {
        self.map.get(label)
    }

    /// Entry at a position in insertion order.
    pub fn get_index(&self, index: usize) -> Option<(&str, &ExtensionSet)> {
        self.map
            .get_index(index)
            .map(|(label, set)| (label.as_str(), set))
    }

    /// Label at a position in insertion order.
    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.get_index(index).map(|(label, _)| label)
    }

    /// Remove a label, keeping the relative order of the rest.
    pub fn remove(&mut self, label: &str) -> Option<ExtensionSet> {
        self.map.shift_remove(label)
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Number of filter groups.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` when no groups are present.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate `(label, set)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtensionSet)> {
        self.map.iter().map(|(label, set)| (label.as_str(), set))
    }

    /// Iterate labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }
}

/// Parse raw filter strings into a [`FilterSet`].
///
/// Never fails: groups that yield no usable extension are left out. An empty
/// input produces the single wildcard group `"All Files"`.
///
/// ```
/// use dear_file_picker::{parse_filters, ExtensionSet};
/// let set = parse_filters(["Images|.png|.jpg", "All Files|.*"]);
/// assert_eq!(set.label_at(0), Some("Images"));
/// assert_eq!(set.get("All Files"), Some(&ExtensionSet::Wildcard));
/// ```
pub fn parse_filters<I, S>(raw: I) -> FilterSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = FilterSet::new();
    let mut seen_any = false;

    for entry in raw {
        seen_any = true;
        let entry = entry.as_ref();
        let Some((label, rest)) = entry.split_once('|') else {
            // No extension part at all.
            continue;
        };

        match parse_extensions(rest) {
            Some(set) => out.insert(label, set),
            None => {
                // A later empty duplicate wins over the earlier value.
                out.remove(label);
            }
        }
    }

    if !seen_any {
        out.insert(DEFAULT_FILTER_LABEL, ExtensionSet::Wildcard);
    }
    out
}

fn parse_extensions(rest: &str) -> Option<ExtensionSet> {
    let mut tokens: Vec<&str> = rest.split('|').collect();
    // The piece after the last separator only counts when non-empty; interior
    // empty tokens stand for "no extension".
    if tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    if tokens.contains(&WILDCARD_TOKEN) {
        return Some(ExtensionSet::Wildcard);
    }
    if tokens.is_empty() {
        None
    } else {
        Some(ExtensionSet::Extensions(
            tokens.into_iter().map(str::to_string).collect(),
        ))
    }
}
