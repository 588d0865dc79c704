//! Compile driver for the Tungsten front end.
//!
//! A [`TranslationUnit`] runs one file through the lexer and parser and keeps
//! everything produced along the way. The [`Compiler`] classifies the paths
//! of a run, compiles each file into its own unit and merges every unit's
//! diagnostics, in input order, into one
//! [`tungsten_source::DiagnosticAggregator`].

mod compiler;
mod error;
mod unit;

pub use compiler::Compiler;
pub use error::CompileError;
pub use unit::TranslationUnit;
