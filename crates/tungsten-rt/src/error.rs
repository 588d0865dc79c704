use thiserror::Error;

/// Errors raised by a [`crate::Host`] implementation.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("cannot run an empty command")]
    EmptyCommand,

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{0}` was terminated by a signal")]
    Terminated(String),

    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("end of input")]
    EndOfInput,
}
