//! Diagnostic types for error reporting in the Tungsten compiler
//!
//! Every stage of the pipeline (I/O, lexing, parsing) reports problems as
//! [`Diagnostic`] records pushed into a [`DiagnosticSink`]. Nothing is printed
//! while files are being processed: the driver merges the per-file buffers
//! into a [`DiagnosticAggregator`] in input order and prints the whole batch
//! once the run is over.
//!
//! ## Miette Integration
//!
//! Stage-specific errors are `thiserror` + `miette::Diagnostic` enums. They are
//! flattened into a `Diagnostic` with [`Diagnostic::from_error`], which keeps
//! the code, help text and severity. A `Diagnostic` is itself a
//! `miette::Diagnostic`, and [`Report`] pairs it with the file contents so the
//! graphical handler can draw a labelled snippet.

use crate::config::DiagnosticFormat;
use crate::file::{SourceMap, SourcePosition};
use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, SourceSpan};
use std::fmt;
use std::io::{self, Write};

const COLOR_RED: &str = "\x1B[91m";
const COLOR_YELLOW: &str = "\x1B[93m";
const COLOR_WHITE: &str = "\x1B[97m";
const COLOR_RESET: &str = "\x1B[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported problem.
///
/// # Fields
///
/// * `severity` - Whether this is an error or a warning
/// * `code` - Stable machine-readable code, e.g. `tungsten::lex::unterminated_string`
/// * `message` - The formatted, human-readable message
/// * `position` - Where the problem starts, `None` for file-level or run-level problems
/// * `len` - Length in bytes of the offending source text, used for labels
/// * `help` - Optional hint shown by the rich renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    pub position: Option<SourcePosition>,
    pub len: usize,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            position: None,
            len: 0,
            help: None,
        }
    }

    /// Flattens a `miette::Diagnostic` error into a record, keeping its code,
    /// help and severity.
    pub fn from_error<E: miette::Diagnostic + ?Sized>(err: &E) -> Self {
        let severity = match err.severity() {
            Some(miette::Severity::Warning) | Some(miette::Severity::Advice) => Severity::Warning,
            _ => Severity::Error,
        };
        Self {
            severity,
            code: err.code().map(|c| c.to_string()),
            message: err.to_string(),
            position: None,
            len: 0,
            help: err.help().map(|h| h.to_string()),
        }
    }

    pub fn at(mut self, position: SourcePosition, len: usize) -> Self {
        self.position = Some(position);
        self.len = len;
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Renders the one-line form `tungsten: error: <path>:<line>:<col>: <message>`.
    pub fn render_plain(&self, sources: &SourceMap, color: bool) -> String {
        let location = match self.position {
            Some(pos) => format!("{}:{}: ", sources.display_name(pos.file), pos),
            None => String::new(),
        };
        if color {
            let severity_color = match self.severity {
                Severity::Error => COLOR_RED,
                Severity::Warning => COLOR_YELLOW,
            };
            format!(
                "tungsten: {severity_color}{}: {COLOR_WHITE}{location}{}{COLOR_RESET}",
                self.severity, self.message
            )
        } else {
            format!("tungsten: {}: {location}{}", self.severity, self.message)
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Diagnostic {}

impl miette::Diagnostic for Diagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .as_ref()
            .map(|c| Box::new(c) as Box<dyn fmt::Display + 'a>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let pos = self.position?;
        let span = SourceSpan::new((pos.offset as usize).into(), self.len);
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some("here".to_string()),
            span,
        ))))
    }
}

/// A diagnostic paired with the contents of its file, for miette's graphical
/// rendering.
#[derive(Debug)]
pub struct Report {
    /// Named source text, absent for diagnostics without a position
    pub source_code: Option<NamedSource<String>>,

    /// The diagnostic being reported
    pub diagnostic: Diagnostic,
}

impl Report {
    pub fn new(diagnostic: Diagnostic, sources: &SourceMap) -> Self {
        let source_code = diagnostic.position.and_then(|pos| {
            let text = sources.contents(pos.file)?;
            Some(NamedSource::new(sources.display_name(pos.file), text.to_string()))
        });
        Self { source_code, diagnostic }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.diagnostic.fmt(f)
    }
}

impl std::error::Error for Report {}

/// Delegates to the wrapped diagnostic and supplies the source text.
impl miette::Diagnostic for Report {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        miette::Diagnostic::code(&self.diagnostic)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        miette::Diagnostic::help(&self.diagnostic)
    }

    fn severity(&self) -> Option<miette::Severity> {
        miette::Diagnostic::severity(&self.diagnostic)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        // Labels without source text cannot be drawn.
        self.source_code.as_ref()?;
        miette::Diagnostic::labels(&self.diagnostic)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source_code
            .as_ref()
            .map(|s| s as &dyn miette::SourceCode)
    }
}

/// Anything diagnostics can be pushed into.
pub trait DiagnosticSink {
    fn push(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn push(&mut self, diagnostic: Diagnostic) {
        Vec::push(self, diagnostic);
    }
}

/// How [`DiagnosticAggregator::emit`] formats its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStyle {
    pub format: DiagnosticFormat,
    pub color: bool,
}

/// Run-scoped, append-only collection of diagnostics.
///
/// Printing does not clear the buffer, so a caller can print and then still
/// inspect counts to choose an exit status. [`DiagnosticAggregator::drain`]
/// is the only operation that empties it.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticAggregator {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.len() - self.error_count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Renders one diagnostic in the requested style.
    pub fn render(diagnostic: &Diagnostic, sources: &SourceMap, style: RenderStyle) -> String {
        match style.format {
            DiagnosticFormat::Plain => diagnostic.render_plain(sources, style.color),
            DiagnosticFormat::Rich => {
                let theme = if style.color {
                    GraphicalTheme::unicode()
                } else {
                    GraphicalTheme::unicode_nocolor()
                };
                let handler = GraphicalReportHandler::new_themed(theme);
                let report = Report::new(diagnostic.clone(), sources);
                let mut out = String::new();
                match handler.render_report(&mut out, &report) {
                    Ok(()) => out.trim_end().to_string(),
                    Err(_) => diagnostic.render_plain(sources, style.color),
                }
            }
        }
    }

    /// Writes every collected diagnostic, in insertion order, to `out`.
    pub fn emit(&self, sources: &SourceMap, out: &mut impl Write, style: RenderStyle) -> io::Result<()> {
        for diagnostic in &self.diagnostics {
            writeln!(out, "{}", Self::render(diagnostic, sources, style))?;
        }
        out.flush()
    }

    /// Writes every collected diagnostic to standard error. The buffer is kept.
    pub fn print_all(&self, sources: &SourceMap, style: RenderStyle) -> io::Result<()> {
        let stderr = io::stderr();
        let mut lock = stderr.lock();
        self.emit(sources, &mut lock, style)
    }

    /// Removes and returns every collected diagnostic.
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

impl DiagnosticSink for DiagnosticAggregator {
    fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

impl<'a> IntoIterator for &'a DiagnosticAggregator {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
