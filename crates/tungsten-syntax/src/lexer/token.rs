use miette::SourceSpan;
use std::fmt;
use tungsten_source::SourcePosition;

/// A token with the exact source text it was scanned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: SourcePosition,
    /// Set when the lexer already reported a problem for this token.
    pub recovered: bool,
}

impl Token {
    pub fn len(&self) -> usize {
        self.lexeme.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexeme.is_empty()
    }

    pub fn end_offset(&self) -> usize {
        self.position.offset as usize + self.lexeme.len()
    }

    pub fn span(&self) -> SourceSpan {
        SourceSpan::new((self.position.offset as usize).into(), self.lexeme.len())
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    /// A string literal or block comment that end of file cut off.
    pub fn is_unterminated(&self) -> bool {
        match self.kind {
            TokenKind::BlockComment => self.recovered,
            TokenKind::Str => {
                let body = self.lexeme.strip_prefix('"').unwrap_or(&self.lexeme);
                match body.strip_suffix('"') {
                    Some(inner) => super::ends_with_escape(inner),
                    None => true,
                }
            }
            _ => false,
        }
    }

    /// Describes the token for "found ..." messages, including its text when
    /// the kind alone is ambiguous.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Ident => format!("identifier `{}`", self.lexeme),
            TokenKind::Int | TokenKind::Float | TokenKind::Str => {
                format!("{} `{}`", self.kind.describe(), self.lexeme)
            }
            _ => self.kind.describe(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Fn,
    Let,
    Const,
    Mut,
    If,
    Else,
    While,
    For,
    In,
    Return,
    Break,
    Continue,
    Struct,
    Import,
    True,
    False,
}

impl Keyword {
    pub fn lookup(ident: &str) -> Option<Keyword> {
        Some(match ident {
            "fn" => Keyword::Fn,
            "let" => Keyword::Let,
            "const" => Keyword::Const,
            "mut" => Keyword::Mut,
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "while" => Keyword::While,
            "for" => Keyword::For,
            "in" => Keyword::In,
            "return" => Keyword::Return,
            "break" => Keyword::Break,
            "continue" => Keyword::Continue,
            "struct" => Keyword::Struct,
            "import" => Keyword::Import,
            "true" => Keyword::True,
            "false" => Keyword::False,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Fn => "fn",
            Keyword::Let => "let",
            Keyword::Const => "const",
            Keyword::Mut => "mut",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::For => "for",
            Keyword::In => "in",
            Keyword::Return => "return",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
            Keyword::Struct => "struct",
            Keyword::Import => "import",
            Keyword::True => "true",
            Keyword::False => "false",
        }
    }

    /// Keywords that begin a statement or an item; the parser resynchronizes on them.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            Keyword::Fn
                | Keyword::Let
                | Keyword::Const
                | Keyword::If
                | Keyword::While
                | Keyword::For
                | Keyword::Return
                | Keyword::Break
                | Keyword::Continue
                | Keyword::Struct
                | Keyword::Import
        )
    }
}

/// All possible tokens we can encounter in our grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    Keyword(Keyword),
    Int,
    Float,
    Str,

    // Multi-character operators
    ShlEq,
    ShrEq,
    EqEq,
    NotEq,
    Le,
    Ge,
    AndAnd,
    OrOr,
    Shl,
    Shr,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    Arrow,
    ColonColon,
    DotDot,

    // Single-character operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    Lt,
    Gt,
    Bang,
    Amp,
    Pipe,
    Caret,
    Tilde,

    // Punctuation
    Dot,
    Comma,
    Semi,
    Colon,
    Question,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Trivia
    Whitespace,
    LineComment,
    BlockComment,

    /// A character that starts no token
    Invalid(char),
    Eof,
}

/// Operator and punctuation spellings, longest first so the first match is
/// the maximal munch.
pub(crate) const PUNCTUATION: &[(&str, TokenKind)] = &[
    ("<<=", TokenKind::ShlEq),
    (">>=", TokenKind::ShrEq),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
    ("<<", TokenKind::Shl),
    (">>", TokenKind::Shr),
    ("+=", TokenKind::PlusEq),
    ("-=", TokenKind::MinusEq),
    ("*=", TokenKind::StarEq),
    ("/=", TokenKind::SlashEq),
    ("%=", TokenKind::PercentEq),
    ("&=", TokenKind::AmpEq),
    ("|=", TokenKind::PipeEq),
    ("^=", TokenKind::CaretEq),
    ("->", TokenKind::Arrow),
    ("::", TokenKind::ColonColon),
    ("..", TokenKind::DotDot),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("=", TokenKind::Eq),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("!", TokenKind::Bang),
    ("&", TokenKind::Amp),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
    ("~", TokenKind::Tilde),
    (".", TokenKind::Dot),
    (",", TokenKind::Comma),
    (";", TokenKind::Semi),
    (":", TokenKind::Colon),
    ("?", TokenKind::Question),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
];

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    /// The fixed spelling of operator and punctuation kinds.
    pub fn spelling(self) -> Option<&'static str> {
        PUNCTUATION
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(text, _)| *text)
    }

    pub fn describe(self) -> String {
        match self {
            TokenKind::Ident => "identifier".to_string(),
            TokenKind::Keyword(kw) => format!("keyword `{}`", kw.as_str()),
            TokenKind::Int => "integer literal".to_string(),
            TokenKind::Float => "float literal".to_string(),
            TokenKind::Str => "string literal".to_string(),
            TokenKind::Whitespace => "whitespace".to_string(),
            TokenKind::LineComment | TokenKind::BlockComment => "comment".to_string(),
            TokenKind::Invalid(c) => format!("invalid character {c:?}"),
            TokenKind::Eof => "end of file".to_string(),
            punct => match punct.spelling() {
                Some(text) => format!("`{text}`"),
                None => format!("{punct:?}"),
            },
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// The ordered, lossless output of the lexer.
///
/// Always ends with exactly one [`TokenKind::Eof`] token, and the lexemes of
/// all tokens, trivia included, concatenate back to the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Wraps a token list, appending an end-of-file token when it is missing
    /// and dropping anything after the first one.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if let Some(eof) = tokens.iter().position(|t| t.kind == TokenKind::Eof) {
            tokens.truncate(eof + 1);
        } else {
            let position = match tokens.last() {
                Some(last) => SourcePosition {
                    offset: last.end_offset() as u32,
                    ..last.position
                },
                None => SourcePosition::start(Default::default()),
            };
            tokens.push(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                position,
                recovered: false,
            });
        }
        Self { tokens }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Tokens the parser cares about: everything except whitespace and comments.
    pub fn significant(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| !t.is_trivia())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Never true: a stream holds at least its end-of-file token.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn eof(&self) -> &Token {
        &self.tokens[self.tokens.len() - 1]
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Concatenates every lexeme; equals the source text the stream came from.
    pub fn reconstruct(&self) -> String {
        self.tokens.iter().map(|t| t.lexeme.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
