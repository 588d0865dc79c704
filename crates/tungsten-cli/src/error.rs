use miette::Diagnostic;
use thiserror::Error;
use tungsten_source::ConfigError;

/// Failures of the command line itself. Problems in the compiled sources are
/// diagnostics, never `CliError`s.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write diagnostics: {0}")]
    #[diagnostic(code(tungsten::cli::output))]
    Output(#[source] std::io::Error),
}
