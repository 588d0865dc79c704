use miette::Diagnostic;
use thiserror::Error;

/// Problems found while scanning characters into tokens.
///
/// The lexer never returns these; each one is turned into a diagnostic and
/// scanning continues with a placeholder token.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum LexError {
    #[error("invalid character {0:?}")]
    #[diagnostic(code(tungsten::lex::invalid_character))]
    InvalidCharacter(char),

    #[error("unterminated string literal")]
    #[diagnostic(
        code(tungsten::lex::unterminated_string),
        help("add a closing `\"` before the end of the file")
    )]
    UnterminatedString,

    #[error("unterminated block comment")]
    #[diagnostic(
        code(tungsten::lex::unterminated_comment),
        help("every `/*` needs a matching `*/`")
    )]
    UnterminatedComment,

    #[error("unknown escape sequence `\\{0}`")]
    #[diagnostic(
        code(tungsten::lex::unknown_escape),
        help("valid escapes are \\n \\t \\r \\0 \\\\ \\\" \\' and \\u{{...}}")
    )]
    UnknownEscape(char),

    #[error("malformed unicode escape")]
    #[diagnostic(
        code(tungsten::lex::unicode_escape),
        help("write unicode escapes as `\\u{{1F600}}` with one to six hex digits")
    )]
    MalformedUnicodeEscape,

    #[error("malformed number literal `{literal}`: {reason}")]
    #[diagnostic(code(tungsten::lex::malformed_number))]
    MalformedNumber { literal: String, reason: String },

    #[error("integer literal `{0}` is too large")]
    #[diagnostic(
        code(tungsten::lex::integer_overflow),
        help("integer literals must fit in 64 bits")
    )]
    IntegerOverflow(String),
}

/// Grammar violations found by the parser.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(tungsten::parse::expected))]
    Expected { expected: String, found: String },

    #[error("invalid assignment target")]
    #[diagnostic(
        code(tungsten::parse::assignment_target),
        help("only variables, fields and indexed elements can be assigned to")
    )]
    InvalidAssignmentTarget,

    #[error("unclosed block opened at {opened}, found end of file")]
    #[diagnostic(code(tungsten::parse::unclosed_block), help("add the missing `}}`"))]
    UnclosedBlock { opened: String },

    /// Raised when nesting exceeds the configured limit. Not a grammar error:
    /// the rest of the file is abandoned.
    #[error("nesting limit of {limit} exceeded")]
    #[diagnostic(
        code(tungsten::parse::too_deep),
        help("reduce nesting or raise `parser.max_depth` in tungsten.toml")
    )]
    TooDeep { limit: u32 },
}
