use miette::Diagnostic;
use std::io;
use thiserror::Error;

/// Problems with the inputs of a run, as opposed to their contents.
#[derive(Debug, Error, Diagnostic)]
pub enum CompileError {
    #[error("no such file: '{0}'")]
    #[diagnostic(code(tungsten::driver::missing_file))]
    MissingFile(String),

    #[error("'{0}' is a directory")]
    #[diagnostic(code(tungsten::driver::directory), help("pass the source files inside it instead"))]
    Directory(String),

    #[error("no input files")]
    #[diagnostic(code(tungsten::driver::no_input))]
    NoInputFiles,

    #[error("cannot read '{path}': {source}")]
    #[diagnostic(code(tungsten::driver::read))]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("'{path}' is too large: {len} bytes, the limit is {limit}")]
    #[diagnostic(code(tungsten::driver::too_large))]
    TooLarge { path: String, len: u64, limit: u64 },

    #[error("'{0}' is not valid UTF-8; invalid bytes were replaced")]
    #[diagnostic(code(tungsten::driver::invalid_utf8), severity(Warning))]
    InvalidUtf8(String),
}
