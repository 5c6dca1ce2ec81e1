pub mod dispatcher;
pub mod file_ops;
pub mod router;
pub mod selection;

pub use dispatcher::{ActionDispatcher, Step};
pub use file_ops::{DeleteMode, FileOps, TransferMode};
pub use router::{Action, Direction, InputRouter, Key, Pending, Tier};
pub use selection::SelectionState;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions listed when no explicit filter is given
pub const DEFAULT_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "tiff", "bmp"];

/// Default number of characters a file name may occupy in the list
pub const DEFAULT_MAX_DISPLAY_LEN: usize = 24;

/// Characters kept back for `~` plus the suffix when truncating
const SUFFIX_BUDGET: usize = 4;

/// A single file shown in the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub display_name: String,
    pub truncated: bool,
}

impl Entry {
    pub fn new(path: PathBuf, max_display_len: usize) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let (display_name, truncated) = truncate_display_name(&name, &suffix, max_display_len);

        Entry {
            path,
            display_name,
            truncated,
        }
    }

    /// Full file name, independent of display truncation
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Shortens `name` to `max_len - 4` characters followed by `~` and `suffix`.
///
/// Names that already fit are returned unchanged. Two long names sharing a
/// prefix can end up with the same label.
pub fn truncate_display_name(name: &str, suffix: &str, max_len: usize) -> (String, bool) {
    if name.chars().count() <= max_len {
        return (name.to_string(), false);
    }

    let keep = max_len.saturating_sub(SUFFIX_BUDGET);
    let head: String = name.chars().take(keep).collect();
    (format!("{}~{}", head, suffix), true)
}

/// Which files a scan accepts and how they are labelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Lowercase extensions without the leading dot
    pub extensions: HashSet<String>,
    pub max_display_len: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_display_len: DEFAULT_MAX_DISPLAY_LEN,
        }
    }
}

impl ScanOptions {
    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }
}

/// The directories a session draws its files from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub root: PathBuf,
    /// Aggregate the root's immediate subdirectories as well
    pub tree: bool,
}

impl Sources {
    pub fn flat(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tree: false,
        }
    }

    pub fn tree(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tree: true,
        }
    }

    /// Directories to scan, in enumeration order.
    ///
    /// Tree mode lists every immediate subdirectory followed by the root.
    pub fn directories(&self) -> Vec<PathBuf> {
        if !self.tree {
            return vec![self.root.clone()];
        }

        let mut dirs: Vec<PathBuf> = match fs::read_dir(&self.root) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
                .map(|e| e.path())
                .collect(),
            Err(_) => Vec::new(),
        };
        dirs.push(self.root.clone());
        dirs
    }
}

/// Ordered listing of the files available for triage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIndex {
    pub entries: Vec<Entry>,
}

impl FileIndex {
    /// Scans `directories` in order and concatenates their matching files.
    ///
    /// Missing or non-directory paths contribute nothing. Entries keep
    /// directory-scan order; no sorting and no de-duplication.
    pub fn load(directories: &[PathBuf], options: &ScanOptions) -> Self {
        let entries = directories
            .iter()
            .flat_map(|dir| scan_directory(dir, options))
            .collect();
        FileIndex { entries }
    }

    pub fn from_sources(sources: &Sources, options: &ScanOptions) -> Self {
        Self::load(&sources.directories(), options)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn handles(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|e| e.path.as_path())
    }

    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.display_name.as_str())
    }
}

fn scan_directory(dir: &Path, options: &ScanOptions) -> Vec<Entry> {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for entry_result in read_dir {
        // Skip entries that cannot be read (permission errors, races)
        let Ok(entry) = entry_result else { continue };
        let path = entry.path();

        // Follows symlinks so linked images are listed too
        let is_file = fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
        if !is_file || !options.accepts(&path) {
            continue;
        }

        entries.push(Entry::new(path, options.max_display_len));
    }
    entries
}

/// Everything the event loop renders: the index and the selection over it.
///
/// Rebuilt as a whole after each mutating action and swapped in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub index: FileIndex,
    pub selection: SelectionState,
}

impl Session {
    pub fn load(
        sources: &Sources,
        options: &ScanOptions,
        viewport_height: usize,
        scroll_margin: usize,
    ) -> Self {
        let index = FileIndex::from_sources(sources, options);
        let selection = SelectionState::new(index.len(), viewport_height, scroll_margin);
        Session { index, selection }
    }

    /// Rescans and keeps the cursor at the same position, clamped
    pub fn reload(&self, sources: &Sources, options: &ScanOptions) -> Self {
        let index = FileIndex::from_sources(sources, options);
        let selection = self.selection.with_count(index.len());
        Session { index, selection }
    }

    pub fn current(&self) -> Option<&Entry> {
        self.selection.cursor.and_then(|i| self.index.get(i))
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
