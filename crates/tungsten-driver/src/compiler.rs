use crate::error::CompileError;
use crate::unit::TranslationUnit;
use log::{debug, info};
use std::path::Path;
use tungsten_source::{CompilerConfig, Diagnostic, DiagnosticAggregator, DiagnosticSink, SourceMap};

/// Drives a whole run: classifies input paths, compiles each file into its
/// own [`TranslationUnit`] and collects every diagnostic in input order.
///
/// Nothing is printed here; the caller decides how and when to emit the
/// collected diagnostics.
#[derive(Debug)]
pub struct Compiler {
    config: CompilerConfig,
    sources: SourceMap,
    units: Vec<TranslationUnit>,
    diagnostics: DiagnosticAggregator,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            sources: SourceMap::new(),
            units: Vec::new(),
            diagnostics: DiagnosticAggregator::new(),
        }
    }

    /// Compiles every path in order.
    ///
    /// Missing paths and directories are reported and skipped. When none of
    /// the paths was a compilable file, `no input files` is reported.
    pub fn compile_paths<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let before = self.units.len();
        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                self.report(CompileError::MissingFile(path.display().to_string()));
            } else if path.is_dir() {
                self.report(CompileError::Directory(path.display().to_string()));
            } else {
                self.compile_file(path);
            }
        }

        if self.units.len() == before {
            self.report(CompileError::NoInputFiles);
        }

        info!(
            "processed {} file(s): {} error(s), {} warning(s)",
            self.units.len() - before,
            self.diagnostics.error_count(),
            self.diagnostics.warning_count()
        );
    }

    /// Compiles one file without classifying the path first.
    pub fn compile_file(&mut self, path: &Path) -> &TranslationUnit {
        let file = self.sources.add(path);
        debug!("compiling {} as {:?}", path.display(), file);

        let mut unit = TranslationUnit::new(file, path);
        unit.compile(&self.config);
        if let Some(text) = unit.source_text() {
            self.sources.set_contents(file, text);
        }
        self.diagnostics.extend(unit.diagnostics().iter().cloned());

        self.units.push(unit);
        &self.units[self.units.len() - 1]
    }

    fn report(&mut self, err: CompileError) {
        debug!("{err}");
        self.diagnostics.push(Diagnostic::from_error(&err));
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    pub fn units(&self) -> &[TranslationUnit] {
        &self.units
    }

    pub fn diagnostics(&self) -> &DiagnosticAggregator {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticAggregator {
        &mut self.diagnostics
    }

    /// Number of files that were actually compiled.
    pub fn files_processed(&self) -> usize {
        self.units.len()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Process exit status for the run: always 0 unless `deny_errors` is set
    /// and an error was reported.
    pub fn exit_code(&self) -> i32 {
        if self.config.diagnostics.deny_errors && self.has_errors() {
            1
        } else {
            0
        }
    }
}
