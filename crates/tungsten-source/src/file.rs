use rustc_hash::FxHashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identifier of a file registered in a [`SourceMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FileId(u32);

impl FileId {
    /// Builds an id from a raw index. Mostly useful for tests that never touch a `SourceMap`.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A location inside a source file.
///
/// `line` and `column` are 1-based and meant for humans, `offset` is the
/// 0-based byte offset into the file contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    pub file: FileId,
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl SourcePosition {
    pub const fn new(file: FileId, line: u32, column: u32, offset: u32) -> Self {
        Self { file, line, column, offset }
    }

    /// The first character of `file`.
    pub const fn start(file: FileId) -> Self {
        Self::new(file, 1, 1, 0)
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Registry of every input path seen during a run.
///
/// Registering the same path twice returns the id handed out the first time,
/// so diagnostics for one file always agree on its `FileId`. Contents are
/// recorded once a file has been read, for rendering source snippets.
#[derive(Debug, Default, Clone)]
pub struct SourceMap {
    paths: Vec<PathBuf>,
    contents: Vec<Option<Arc<str>>>,
    ids: FxHashMap<PathBuf, FileId>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: impl Into<PathBuf>) -> FileId {
        let path = path.into();
        if let Some(id) = self.ids.get(&path) {
            return *id;
        }
        let id = FileId(self.paths.len() as u32);
        self.paths.push(path.clone());
        self.contents.push(None);
        self.ids.insert(path, id);
        id
    }

    pub fn set_contents(&mut self, file: FileId, text: Arc<str>) {
        if let Some(slot) = self.contents.get_mut(file.index()) {
            *slot = Some(text);
        }
    }

    pub fn contents(&self, file: FileId) -> Option<&str> {
        self.contents.get(file.index())?.as_deref()
    }

    pub fn path(&self, file: FileId) -> Option<&Path> {
        self.paths.get(file.index()).map(PathBuf::as_path)
    }

    /// Human readable name of `file`, `<unknown>` when the id was never registered.
    pub fn display_name(&self, file: FileId) -> String {
        self.path(file)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unknown>".to_string())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
