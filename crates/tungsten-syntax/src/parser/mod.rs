//! Hand-written recursive descent parser.
//!
//! The parser never gives up on a file. A production that hits a grammar
//! violation reports it and fails with [`ParseFailure::Syntax`]; the
//! enclosing statement or item loop then skips tokens up to a
//! synchronization point and records the skipped region as an
//! [`ErrorNode`]. Only the nesting guard ([`ParseFailure::TooDeep`]) unwinds
//! all the way to the top, where the rest of the file is abandoned.

mod expr;
mod items;
mod stmt;

use crate::ast::{ErrorNode, Ident, Item, Program};
use crate::error::SyntaxError;
use crate::lexer::{Keyword, Token, TokenKind, TokenStream};
use miette::SourceSpan;
use tungsten_source::{Diagnostic, DiagnosticSink, ParserConfig, SourcePosition, MAX_PARSER_DEPTH};

/// Why a production gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseFailure {
    /// A grammar violation, already reported (or deliberately suppressed)
    Syntax,
    /// The nesting limit was exceeded
    TooDeep,
}

pub(crate) type ParseResult<T> = Result<T, ParseFailure>;

/// Parses a token stream into a [`Program`].
///
/// Always returns exactly one program; problems are pushed into `sink`.
pub fn parse(tokens: &TokenStream, config: &ParserConfig, sink: &mut dyn DiagnosticSink) -> Program {
    Parser::new(tokens, config, sink).parse_program()
}

pub struct Parser<'t, 's> {
    /// Significant tokens only; the last one is always `Eof`
    tokens: Vec<&'t Token>,
    pos: usize,
    depth: u32,
    max_depth: u32,
    too_deep_reported: bool,
    unclosed_reported: bool,
    /// The lexer already reported a token that end of file cut off
    eof_after_unterminated: bool,
    file_start: SourcePosition,
    sink: &'s mut dyn DiagnosticSink,
}

impl<'t, 's> Parser<'t, 's> {
    pub fn new(stream: &'t TokenStream, config: &ParserConfig, sink: &'s mut dyn DiagnosticSink) -> Self {
        let all = stream.as_slice();
        let eof_after_unterminated = all.len() >= 2 && all[all.len() - 2].is_unterminated();
        Self {
            tokens: stream.significant().collect(),
            pos: 0,
            depth: 0,
            max_depth: config.max_depth.clamp(1, MAX_PARSER_DEPTH),
            too_deep_reported: false,
            unclosed_reported: false,
            eof_after_unterminated,
            file_start: SourcePosition::start(stream.eof().position.file),
            sink,
        }
    }

    pub fn parse_program(mut self) -> Program {
        let mut items = Vec::new();
        while !self.at_eof() {
            let start = self.pos;
            match self.parse_item() {
                Ok(item) => items.push(item),
                Err(ParseFailure::Syntax) => {
                    let node = self.recover(start, false);
                    items.push(Item::from_error(node));
                }
                Err(ParseFailure::TooDeep) => {
                    while !self.at_eof() {
                        self.advance();
                    }
                    let node = self.error_node(start);
                    items.push(Item::from_error(node));
                }
            }
        }
        Program {
            items,
            position: self.file_start,
        }
    }

    // ---------------------------------------------------------------------
    // Cursor
    // ---------------------------------------------------------------------

    fn peek(&self) -> &'t Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// Consumes the current token. Stays on `Eof` once it is reached.
    fn advance(&mut self) -> &'t Token {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn at_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.check(TokenKind::Keyword(keyword))
    }

    fn eat(&mut self, kind: TokenKind) -> Option<&'t Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<&'t Token> {
        match self.eat(kind) {
            Some(token) => Ok(token),
            None => self.error_expected(&kind.describe()),
        }
    }

    fn expect_ident(&mut self) -> ParseResult<Ident> {
        let token = self.expect(TokenKind::Ident)?;
        Ok(Ident {
            name: token.lexeme.clone(),
            position: token.position,
            span: token.span(),
        })
    }

    /// End offset of the last consumed token.
    fn prev_end(&self) -> usize {
        match self.pos.checked_sub(1) {
            Some(prev) => self.tokens[prev].end_offset(),
            None => self.peek().position.offset as usize,
        }
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: SourcePosition) -> SourceSpan {
        let offset = start.offset as usize;
        SourceSpan::new(offset.into(), self.prev_end().saturating_sub(offset))
    }

    // ---------------------------------------------------------------------
    // Diagnostics
    // ---------------------------------------------------------------------

    /// Reports `expected <what>, found <current token>` and fails.
    fn error_expected<T>(&mut self, what: &str) -> ParseResult<T> {
        let token = self.peek();
        let err = SyntaxError::Expected {
            expected: what.to_string(),
            found: token.describe(),
        };
        self.report_at(err, token);
        Err(ParseFailure::Syntax)
    }

    /// Pushes `err` anchored at `token`, unless the lexer already reported it.
    fn report_at(&mut self, err: SyntaxError, token: &Token) {
        if self.already_reported(token) {
            return;
        }
        self.report(err, token.position, token.len());
    }

    fn report(&mut self, err: SyntaxError, position: SourcePosition, len: usize) {
        self.sink.push(Diagnostic::from_error(&err).at(position, len));
    }

    fn already_reported(&self, token: &Token) -> bool {
        match token.kind {
            TokenKind::Invalid(_) => true,
            TokenKind::Eof => self.eof_after_unterminated,
            _ => false,
        }
    }

    // ---------------------------------------------------------------------
    // Nesting guard
    // ---------------------------------------------------------------------

    /// Runs `f` one nesting level deeper, failing with `TooDeep` past the limit.
    fn descend<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.restoring_depth(|p| {
            p.deepen()?;
            f(p)
        })
    }

    /// Runs `f` and resets the depth afterwards, so levels charged with
    /// [`Parser::deepen`] inside `f` are released when it returns.
    fn restoring_depth<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let depth = self.depth;
        let result = f(self);
        self.depth = depth;
        result
    }

    /// Charges one nesting level. Left-associative folds charge one per operator.
    fn deepen(&mut self) -> ParseResult<()> {
        if self.depth >= self.max_depth {
            if !self.too_deep_reported {
                self.too_deep_reported = true;
                let token = self.peek();
                let err = SyntaxError::TooDeep { limit: self.max_depth };
                self.report(err, token.position, token.len());
            }
            return Err(ParseFailure::TooDeep);
        }
        self.depth += 1;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Recovery
    // ---------------------------------------------------------------------

    /// Skips to the next synchronization point after a failed production
    /// that started at token index `start`, and returns the skipped region.
    fn recover(&mut self, start: usize, in_block: bool) -> ErrorNode {
        self.synchronize(start, in_block);
        if self.pos == start && !self.at_eof() && !(in_block && self.check(TokenKind::RBrace)) {
            self.advance();
        }
        self.error_node(start)
    }

    /// Stops after `;`, before a `}` closing the enclosing block, before a
    /// statement or item keyword, or at end of file. Nested braces are skipped
    /// as a unit.
    fn synchronize(&mut self, start: usize, in_block: bool) {
        let mut braces = 0usize;
        loop {
            match self.peek_kind() {
                TokenKind::Eof => return,
                TokenKind::Semi if braces == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::LBrace => {
                    braces += 1;
                    self.advance();
                }
                TokenKind::RBrace if braces == 0 => {
                    if !in_block {
                        self.advance();
                    }
                    return;
                }
                TokenKind::RBrace => {
                    braces -= 1;
                    self.advance();
                    if braces == 0 {
                        return;
                    }
                }
                TokenKind::Keyword(kw) if braces == 0 && kw.starts_statement() && self.pos > start => {
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn error_node(&self, start: usize) -> ErrorNode {
        let position = self.tokens[start.min(self.tokens.len() - 1)].position;
        ErrorNode {
            position,
            span: self.span_from(position),
            skipped: self.pos.saturating_sub(start),
        }
    }
}
