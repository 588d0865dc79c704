use crate::error::CompileError;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tungsten_source::{CompilerConfig, Diagnostic, FileId};
use tungsten_syntax::{parse, tokenize, Program, TokenStream};

/// Largest source whose byte offsets fit a `SourcePosition`.
const MAX_SOURCE_LEN: u64 = u32::MAX as u64;

/// One input file and everything the front end produced for it.
///
/// A unit owns its text, tokens, tree and diagnostics; units never share
/// mutable state. `tree` is present exactly when the file could be read,
/// since lexing and parsing themselves never fail.
#[derive(Debug)]
pub struct TranslationUnit {
    file: FileId,
    path: PathBuf,
    source: Option<Arc<str>>,
    tokens: Option<TokenStream>,
    tree: Option<Program>,
    diagnostics: Vec<Diagnostic>,
}

impl TranslationUnit {
    pub fn new(file: FileId, path: impl Into<PathBuf>) -> Self {
        Self {
            file,
            path: path.into(),
            source: None,
            tokens: None,
            tree: None,
            diagnostics: Vec::new(),
        }
    }

    /// Reads the file from disk and runs the lexer and parser over it.
    ///
    /// A read failure becomes a diagnostic and leaves the unit without
    /// tokens or tree. Invalid UTF-8 is replaced and reported as a warning.
    pub fn compile(&mut self, config: &CompilerConfig) {
        self.reset();
        debug!("reading {}", self.path.display());

        if let Ok(metadata) = fs::metadata(&self.path) {
            if let Err(err) = self.check_size(metadata.len()) {
                self.diagnostics.push(Diagnostic::from_error(&err));
                return;
            }
        }

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(source) => {
                let err = CompileError::Read {
                    path: self.path.display().to_string(),
                    source,
                };
                self.diagnostics.push(Diagnostic::from_error(&err));
                return;
            }
        };

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                warn!("{} contains invalid UTF-8", self.path.display());
                let warning = CompileError::InvalidUtf8(self.path.display().to_string());
                self.diagnostics.push(Diagnostic::from_error(&warning));
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };

        self.run(Arc::from(text), config);
    }

    /// Runs the lexer and parser over in-memory text instead of the file.
    pub fn compile_source(&mut self, text: impl Into<Arc<str>>, config: &CompilerConfig) {
        self.reset();
        self.run(text.into(), config);
    }

    fn run(&mut self, text: Arc<str>, config: &CompilerConfig) {
        if let Err(err) = self.check_size(text.len() as u64) {
            self.diagnostics.push(Diagnostic::from_error(&err));
            return;
        }

        let tokens = tokenize(&text, self.file, &config.lexer, &mut self.diagnostics);
        debug!("{}: {} tokens", self.path.display(), tokens.len());

        let tree = parse(&tokens, &config.parser, &mut self.diagnostics);
        debug!(
            "{}: {} top-level items, {} diagnostics",
            self.path.display(),
            tree.items.len(),
            self.diagnostics.len()
        );

        self.source = Some(text);
        self.tokens = Some(tokens);
        self.tree = Some(tree);
    }

    fn check_size(&self, len: u64) -> Result<(), CompileError> {
        if len > MAX_SOURCE_LEN {
            warn!("{} is {len} bytes, too large to compile", self.path.display());
            return Err(CompileError::TooLarge {
                path: self.path.display().to_string(),
                len,
                limit: MAX_SOURCE_LEN,
            });
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.source = None;
        self.tokens = None;
        self.tree = None;
        self.diagnostics.clear();
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Shared handle to the text, for registering it in a `SourceMap`.
    pub fn source_text(&self) -> Option<Arc<str>> {
        self.source.clone()
    }

    pub fn tokens(&self) -> Option<&TokenStream> {
        self.tokens.as_ref()
    }

    pub fn tree(&self) -> Option<&Program> {
        self.tree.as_ref()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}
