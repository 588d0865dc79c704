//! Lexer and parser for the Tungsten language.
//!
//! [`lexer::tokenize`] turns source text into a lossless [`TokenStream`] and
//! [`parser::parse`] builds a [`Program`] from it. Neither stage stops at the
//! first problem: each reports into a [`tungsten_source::DiagnosticSink`] and
//! keeps going, so one run surfaces every error in a file.
//!
//! ```
//! use tungsten_source::{CompilerConfig, FileId};
//!
//! let config = CompilerConfig::default();
//! let mut diagnostics = Vec::new();
//! let program = tungsten_syntax::parse_source("let x = 1;", FileId::default(), &config, &mut diagnostics);
//! assert_eq!(program.items.len(), 1);
//! assert!(diagnostics.is_empty());
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod visitor;

pub use ast::Program;
pub use error::{LexError, SyntaxError};
pub use lexer::{tokenize, Token, TokenKind, TokenStream};
pub use parser::parse;
pub use visitor::Visitor;

use tungsten_source::{CompilerConfig, DiagnosticSink, FileId};

/// Tokenizes and parses `source` in one go.
pub fn parse_source(
    source: &str,
    file: FileId,
    config: &CompilerConfig,
    sink: &mut dyn DiagnosticSink,
) -> Program {
    let tokens = tokenize(source, file, &config.lexer, sink);
    parse(&tokens, &config.parser, sink)
}
