pub mod token;

pub use token::{Keyword, Token, TokenKind, TokenStream};

use crate::error::LexError;
use std::str::Chars;
use token::PUNCTUATION;
use tungsten_source::{Diagnostic, DiagnosticSink, FileId, LexerConfig, SourcePosition};

/// Lexes `source` into a token stream.
///
/// Never fails: invalid input yields `Invalid` or best-effort tokens plus a
/// diagnostic in `sink`, and the stream always ends with one end-of-file token.
pub fn tokenize(
    source: &str,
    file: FileId,
    config: &LexerConfig,
    sink: &mut dyn DiagnosticSink,
) -> TokenStream {
    Lexer::new(source, file, config, sink).run()
}

/// Decodes the escapes of a string literal lexeme, quotes included.
///
/// Lenient: problems were already reported by the lexer, so an unknown escape
/// keeps its character and a missing closing quote is tolerated.
pub fn unescape(lexeme: &str) -> String {
    let body = lexeme.strip_prefix('"').unwrap_or(lexeme);
    let body = match body.strip_suffix('"') {
        // A lone `\"` at the end is an escaped quote of an unterminated literal.
        Some(inner) if !ends_with_escape(inner) => inner,
        _ => body,
    };

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('u') if chars.peek() == Some(&'{') => {
                chars.next();
                let hex: String = chars.by_ref().take_while(|c| *c != '}').collect();
                if let Some(decoded) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    out.push(decoded);
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn ends_with_escape(text: &str) -> bool {
    text.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

struct Lexer<'src, 'sink> {
    source: &'src str,
    chars: Chars<'src>,
    file: FileId,
    tab_width: u32,
    offset: usize,
    line: u32,
    column: u32,
    sink: &'sink mut dyn DiagnosticSink,
}

impl<'src, 'sink> Lexer<'src, 'sink> {
    fn new(
        source: &'src str,
        file: FileId,
        config: &LexerConfig,
        sink: &'sink mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            source,
            chars: source.chars(),
            file,
            tab_width: config.tab_width.max(1),
            offset: 0,
            line: 1,
            column: 1,
            sink,
        }
    }

    fn run(mut self) -> TokenStream {
        let mut tokens = Vec::new();
        loop {
            let start = self.position();
            let Some(c) = self.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    lexeme: String::new(),
                    position: start,
                    recovered: false,
                });
                break;
            };
            let (kind, recovered) = self.scan(c, start);
            tokens.push(Token {
                kind,
                lexeme: self.source[start.offset as usize..self.offset].to_string(),
                position: start,
                recovered,
            });
        }
        TokenStream::from_tokens(tokens)
    }

    /// Scans one token starting with `c`. Always consumes at least one character.
    fn scan(&mut self, c: char, start: SourcePosition) -> (TokenKind, bool) {
        match c {
            c if c.is_whitespace() => {
                self.eat_while(char::is_whitespace);
                (TokenKind::Whitespace, false)
            }
            '/' if self.peek_nth(1) == Some('/') => {
                self.eat_while(|c| c != '\n');
                (TokenKind::LineComment, false)
            }
            '/' if self.peek_nth(1) == Some('*') => self.block_comment(start),
            c if c == '_' || c.is_alphabetic() => (self.ident(), false),
            c if c.is_ascii_digit() => self.number(start),
            '"' => self.string(start),
            _ => self.punctuation(c, start),
        }
    }

    fn ident(&mut self) -> TokenKind {
        let begin = self.offset;
        self.eat_while(|c| c == '_' || c.is_alphanumeric());
        match Keyword::lookup(&self.source[begin..self.offset]) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Ident,
        }
    }

    fn punctuation(&mut self, c: char, start: SourcePosition) -> (TokenKind, bool) {
        let rest = self.chars.as_str();
        for (text, kind) in PUNCTUATION {
            if rest.starts_with(text) {
                for _ in text.chars() {
                    self.bump();
                }
                return (*kind, false);
            }
        }
        self.bump();
        self.report(LexError::InvalidCharacter(c), start, c.len_utf8());
        (TokenKind::Invalid(c), true)
    }

    /// Block comments nest; the token runs to end of file when unterminated.
    fn block_comment(&mut self, start: SourcePosition) -> (TokenKind, bool) {
        self.bump();
        self.bump();
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump() {
                None => {
                    self.report(LexError::UnterminatedComment, start, 2);
                    return (TokenKind::BlockComment, true);
                }
                Some('/') if self.peek() == Some('*') => {
                    self.bump();
                    depth += 1;
                }
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    depth -= 1;
                }
                Some(_) => {}
            }
        }
        (TokenKind::BlockComment, false)
    }

    fn string(&mut self, start: SourcePosition) -> (TokenKind, bool) {
        self.bump();
        let mut recovered = false;
        loop {
            let escape_start = self.position();
            match self.bump() {
                None => {
                    let len = self.offset - start.offset as usize;
                    self.report(LexError::UnterminatedString, start, len);
                    return (TokenKind::Str, true);
                }
                Some('"') => return (TokenKind::Str, recovered),
                Some('\\') => match self.peek() {
                    // End of file right after the backslash: reported as unterminated.
                    None => {}
                    Some('n' | 't' | 'r' | '0' | '\\' | '"' | '\'') => {
                        self.bump();
                    }
                    Some('u') => {
                        self.bump();
                        // Cut off by end of file: reported once as unterminated.
                        if !self.unicode_escape() && self.peek().is_some() {
                            let len = self.offset - escape_start.offset as usize;
                            self.report(LexError::MalformedUnicodeEscape, escape_start, len);
                            recovered = true;
                        }
                    }
                    Some(other) => {
                        self.bump();
                        self.report(LexError::UnknownEscape(other), escape_start, 1 + other.len_utf8());
                        recovered = true;
                    }
                },
                Some(_) => {}
            }
        }
    }

    /// Scans `{XXXX}` after `\u`. Stops before anything that is not part of the escape.
    fn unicode_escape(&mut self) -> bool {
        if self.peek() != Some('{') {
            return false;
        }
        self.bump();
        let source = self.source;
        let begin = self.offset;
        self.eat_while(|c| c.is_ascii_hexdigit());
        let digits = &source[begin..self.offset];
        if self.peek() != Some('}') {
            return false;
        }
        self.bump();
        !digits.is_empty()
            && digits.len() <= 6
            && u32::from_str_radix(digits, 16)
                .ok()
                .and_then(char::from_u32)
                .is_some()
    }

    fn number(&mut self, start: SourcePosition) -> (TokenKind, bool) {
        let radix = match (self.peek(), self.peek_nth(1)) {
            (Some('0'), Some('x' | 'X')) => 16,
            (Some('0'), Some('o' | 'O')) => 8,
            (Some('0'), Some('b' | 'B')) => 2,
            _ => 10,
        };

        if radix != 10 {
            self.bump();
            self.bump();
            let digits_start = self.offset;
            self.eat_while(|c| c == '_' || c.is_alphanumeric());
            let digits: String = self.source[digits_start..self.offset]
                .chars()
                .filter(|c| *c != '_')
                .collect();
            let problem = if digits.is_empty() {
                Some(format!("missing digits after the base {radix} prefix"))
            } else {
                digits
                    .chars()
                    .find(|c| !c.is_digit(radix))
                    .map(|bad| format!("invalid digit {bad:?} for a base {radix} literal"))
            };
            return match problem {
                Some(reason) => (self.malformed_number(start, reason), true),
                None => self.check_int(&digits, radix, start),
            };
        }

        self.eat_while(|c| c == '_' || c.is_ascii_digit());
        let mut is_float = false;
        let mut problem = None;

        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.eat_while(|c| c == '_' || c.is_ascii_digit());
            is_float = true;
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.eat_while(|c| c == '_' || c.is_ascii_digit());
            } else {
                problem = Some("exponent has no digits".to_string());
            }
            is_float = true;
        }

        // Identifier characters glued to the literal belong to it.
        let suffix_start = self.offset;
        self.eat_while(|c| c == '_' || c.is_alphanumeric());
        if problem.is_none() && self.offset > suffix_start {
            problem = Some(format!(
                "invalid suffix `{}`",
                &self.source[suffix_start..self.offset]
            ));
        }

        let kind = if is_float { TokenKind::Float } else { TokenKind::Int };
        if let Some(reason) = problem {
            self.malformed_number(start, reason);
            return (kind, true);
        }
        if is_float {
            return (TokenKind::Float, false);
        }
        let digits: String = self.source[start.offset as usize..self.offset]
            .chars()
            .filter(|c| *c != '_')
            .collect();
        self.check_int(&digits, 10, start)
    }

    fn check_int(&mut self, digits: &str, radix: u32, start: SourcePosition) -> (TokenKind, bool) {
        if u64::from_str_radix(digits, radix).is_ok() {
            return (TokenKind::Int, false);
        }
        let literal = self.source[start.offset as usize..self.offset].to_string();
        let len = literal.len();
        self.report(LexError::IntegerOverflow(literal), start, len);
        (TokenKind::Int, true)
    }

    fn malformed_number(&mut self, start: SourcePosition, reason: String) -> TokenKind {
        let literal = self.source[start.offset as usize..self.offset].to_string();
        let len = literal.len();
        self.report(LexError::MalformedNumber { literal, reason }, start, len);
        TokenKind::Int
    }

    fn report(&mut self, err: LexError, position: SourcePosition, len: usize) {
        self.sink.push(Diagnostic::from_error(&err).at(position, len));
    }

    fn position(&self) -> SourcePosition {
        SourcePosition::new(self.file, self.line, self.column, self.offset as u32)
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.offset += c.len_utf8();
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\t' => self.column += self.tab_width,
            _ => self.column += 1,
        }
        Some(c)
    }

    fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while self.peek().is_some_and(&mut predicate) {
            self.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tungsten_source::Severity;

    fn lex(input: &str) -> (TokenStream, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let tokens = tokenize(input, FileId::default(), &LexerConfig::default(), &mut diagnostics);
        (tokens, diagnostics)
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        let (tokens, _) = lex(input);
        tokens.significant().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_empty_input() {
        let (tokens, diagnostics) = lex("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens.eof().kind, TokenKind::Eof);
        assert_eq!(tokens.eof().position, SourcePosition::start(FileId::default()));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_lex_simple_statement() {
        assert_eq!(
            kinds("let x = 42;"),
            vec![
                TokenKind::Keyword(Keyword::Let),
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::Int,
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_keywords_and_identifiers() {
        assert_eq!(
            kinds("fn fnord _x iffy if"),
            vec![
                TokenKind::Keyword(Keyword::Fn),
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Keyword(Keyword::If),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_maximal_munch() {
        assert_eq!(kinds("=="), vec![TokenKind::EqEq, TokenKind::Eof]);
        assert_eq!(kinds("= ="), vec![TokenKind::Eq, TokenKind::Eq, TokenKind::Eof]);
        assert_eq!(kinds("==="), vec![TokenKind::EqEq, TokenKind::Eq, TokenKind::Eof]);
        assert_eq!(kinds("<<="), vec![TokenKind::ShlEq, TokenKind::Eof]);
        assert_eq!(
            kinds("a->b::c..d"),
            vec![
                TokenKind::Ident,
                TokenKind::Arrow,
                TokenKind::Ident,
                TokenKind::ColonColon,
                TokenKind::Ident,
                TokenKind::DotDot,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lex_numbers() {
        let (tokens, diagnostics) = lex("0 12 1_000 3.14 1e10 2.5E-3 0xFF 0b1010 0o17");
        let numbers: Vec<_> = tokens
            .significant()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| (t.kind, t.lexeme.as_str()))
            .collect();
        assert_eq!(
            numbers,
            vec![
                (TokenKind::Int, "0"),
                (TokenKind::Int, "12"),
                (TokenKind::Int, "1_000"),
                (TokenKind::Float, "3.14"),
                (TokenKind::Float, "1e10"),
                (TokenKind::Float, "2.5E-3"),
                (TokenKind::Int, "0xFF"),
                (TokenKind::Int, "0b1010"),
                (TokenKind::Int, "0o17"),
            ]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_range_is_not_a_float() {
        assert_eq!(
            kinds("0..10"),
            vec![TokenKind::Int, TokenKind::DotDot, TokenKind::Int, TokenKind::Eof]
        );
    }

    #[test]
    fn test_malformed_numbers_report_once() {
        for input in ["0x", "1e", "0b102", "12abc", "1.5e+"] {
            let (tokens, diagnostics) = lex(input);
            assert_eq!(diagnostics.len(), 1, "input {input:?}: {diagnostics:?}");
            let first = tokens.iter().next().unwrap();
            assert_eq!(first.lexeme, input, "input {input:?}");
            assert!(first.recovered);
        }
    }

    #[test]
    fn test_integer_overflow() {
        let (tokens, diagnostics) = lex("99999999999999999999999");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code.as_deref(), Some("tungsten::lex::integer_overflow"));
        assert!(tokens.iter().next().unwrap().recovered);
    }

    #[test]
    fn test_lex_string_with_escapes() {
        let (tokens, diagnostics) = lex(r#""a\n\"b\"\u{41}""#);
        assert!(diagnostics.is_empty());
        let token = tokens.iter().next().unwrap();
        assert_eq!(token.kind, TokenKind::Str);
        assert_eq!(unescape(&token.lexeme), "a\n\"b\"A");
    }

    #[test]
    fn test_unknown_escape_continues() {
        let (tokens, diagnostics) = lex(r#""a\qb"; x"#);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "unknown escape sequence `\\q`");
        assert_eq!(diagnostics[0].position.unwrap().column, 3);
        let kinds: Vec<_> = tokens.significant().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Str, TokenKind::Semi, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string_at_eof() {
        let source = "let s = \"abc\ndef";
        let (tokens, diagnostics) = lex(source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "unterminated string literal");
        let pos = diagnostics[0].position.unwrap();
        assert_eq!((pos.line, pos.column, pos.offset), (1, 9, 8));

        let string = tokens.iter().find(|t| t.kind == TokenKind::Str).unwrap();
        assert_eq!(string.lexeme, "\"abc\ndef");
        assert_eq!(string.end_offset(), source.len());
        assert_eq!(tokens.eof().position.offset as usize, source.len());
        assert_eq!(unescape(&string.lexeme), "abc\ndef");

        for source in ["\"\\u{12", "\"\\u{", "\"\\u"] {
            let (tokens, diagnostics) = lex(source);
            assert_eq!(diagnostics.len(), 1, "input {source:?}: {diagnostics:?}");
            assert_eq!(diagnostics[0].message, "unterminated string literal");
            assert_eq!(tokens.iter().next().unwrap().lexeme, source);
        }
    }

    #[test]
    fn test_unterminated_tokens() {
        let unterminated = ["\"abc", "\"abc\\\"", "\"", "/* open", "\"a\\q"];
        for source in unterminated {
            let (tokens, _) = lex(source);
            assert!(tokens.iter().next().unwrap().is_unterminated(), "input {source:?}");
        }

        let complete = ["\"abc\"", "\"a\\q\"", "\"\\\\\"", "/* closed */", "12abc", "0xZZ"];
        for source in complete {
            let (tokens, _) = lex(source);
            assert!(!tokens.iter().next().unwrap().is_unterminated(), "input {source:?}");
        }
    }

    #[test]
    fn test_trailing_backslash_is_unterminated() {
        let (tokens, diagnostics) = lex("\"abc\\");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_invalid_character() {
        let (tokens, diagnostics) = lex("a $ b");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].message, "invalid character '$'");
        let invalid = tokens.iter().find(|t| t.kind == TokenKind::Invalid('$')).unwrap();
        assert_eq!(invalid.lexeme, "$");
        assert_eq!(invalid.position.column, 3);
    }

    #[test]
    fn test_invalid_multibyte_character_advances() {
        let (tokens, diagnostics) = lex("€€");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Invalid('€'), TokenKind::Invalid('€'), TokenKind::Eof]
        );
        assert_eq!(tokens.as_slice()[1].position.offset, 3);
    }

    #[test]
    fn test_comments_are_trivia() {
        let (tokens, diagnostics) = lex("a // line\n/* block /* nested */ */ b");
        assert!(diagnostics.is_empty());
        let all: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert!(all.contains(&TokenKind::LineComment));
        assert!(all.contains(&TokenKind::BlockComment));
        assert_eq!(
            kinds("a // line\n/* block /* nested */ */ b"),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let (tokens, diagnostics) = lex("a /* never closed");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "unterminated block comment");
        let comment = tokens.iter().find(|t| t.kind == TokenKind::BlockComment).unwrap();
        assert_eq!(comment.lexeme, "/* never closed");
    }

    #[test]
    fn test_positions_track_lines_and_columns() {
        let (tokens, _) = lex("a\n  bb\n\tc");
        let idents: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Ident)
            .map(|t| (t.position.line, t.position.column, t.position.offset))
            .collect();
        assert_eq!(idents, vec![(1, 1, 0), (2, 3, 4), (3, 2, 8)]);
    }

    #[test]
    fn test_tab_width_policy() {
        let mut diagnostics = Vec::new();
        let config = LexerConfig { tab_width: 4 };
        let tokens = tokenize("\tx", FileId::default(), &config, &mut diagnostics);
        let x = tokens.iter().find(|t| t.kind == TokenKind::Ident).unwrap();
        assert_eq!(x.position.column, 5);
        assert_eq!(x.position.offset, 1);
    }

    #[test]
    fn test_round_trip() {
        let source = "fn main() {\r\n\tlet s = \"hi\\n\"; // c\n  /* b */ x += 0x1F $ 1.5e3;\n}";
        let (tokens, _) = lex(source);
        assert_eq!(tokens.reconstruct(), source);
    }

    #[test]
    fn test_idempotent() {
        let source = "let a = [1, 2.0, \"x\"]; € a.b(c)[0] >>= 2";
        let (first, first_diags) = lex(source);
        let (second, second_diags) = lex(source);
        assert_eq!(first, second);
        assert_eq!(first_diags, second_diags);
    }

    #[test]
    fn test_arbitrary_input_terminates_with_one_eof() {
        let inputs = [
            "\"",
            "/*",
            "0x_",
            "\\u{",
            "\"\\u{110000}\"",
            "'''",
            "#!@`",
            "\u{0}\u{7f}\u{feff}",
            "1.2.3.4",
            "/* /* */",
        ];
        for input in inputs {
            let (tokens, _) = lex(input);
            let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
            assert_eq!(eofs, 1, "input {input:?}");
            assert_eq!(tokens.eof().kind, TokenKind::Eof);
            assert_eq!(tokens.reconstruct(), input);
        }
    }
}
