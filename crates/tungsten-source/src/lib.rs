//! Source file management for the Tungsten compiler.
//!
//! This crate is responsible for:
//! - Registering input files and handing out stable [`FileId`]s
//! - Describing locations inside a file through [`SourcePosition`]
//! - Collecting diagnostics from every compiler stage in a [`DiagnosticAggregator`]
//! - Loading the compiler configuration from `tungsten.toml`
//!
//! ## Diagnostics
//!
//! Compiler stages never abort on a user error. They convert the error into a
//! [`Diagnostic`] and push it into a [`DiagnosticSink`]. The driver merges the
//! per-file buffers into one aggregator and prints everything once at the end
//! of the run, either as plain `tungsten: error: ...` lines or through miette's
//! graphical report handler.

mod config;
mod diagnostic;
mod error;
mod file;

pub use config::{
    ColorChoice, CompilerConfig, DiagnosticFormat, DiagnosticsConfig, LexerConfig, ParserConfig,
    DEFAULT_CONFIG_FILE, MAX_PARSER_DEPTH,
};
pub use diagnostic::{
    Diagnostic, DiagnosticAggregator, DiagnosticSink, Report, RenderStyle, Severity,
};
pub use error::ConfigError;
pub use file::{FileId, SourceMap, SourcePosition};
