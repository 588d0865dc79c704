use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a `tungsten.toml` configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Error reading configuration file {path}: {source}")]
    #[diagnostic(
        code(tungsten::config::read),
        help("Check that the file exists and has proper permissions")
    )]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has unknown fields
    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(tungsten::config::parse),
        help("Check your tungsten.toml syntax; known sections are [lexer], [parser] and [diagnostics]")
    )]
    Parse(String),

    /// The configuration parsed but a value is out of range
    #[error("Invalid configuration value for `{field}`: {reason}")]
    #[diagnostic(code(tungsten::config::invalid))]
    Invalid { field: &'static str, reason: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
