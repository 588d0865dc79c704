use super::{ParseResult, Parser};
use crate::ast::{AssignOp, BinaryOp, Expr, ExprKind, Ident, Literal, UnaryOp};
use crate::error::SyntaxError;
use crate::lexer::{unescape, Keyword, TokenKind};

/// Binding power of assignment, the loosest operator.
const ASSIGN_PREC: u8 = 1;

enum Infix {
    Assign(AssignOp),
    Binary(BinaryOp),
}

/// Precedence and operator for a token in infix position.
fn infix(kind: TokenKind) -> Option<(u8, Infix)> {
    use Infix::{Assign, Binary};
    Some(match kind {
        TokenKind::Eq => (ASSIGN_PREC, Assign(AssignOp::Assign)),
        TokenKind::PlusEq => (ASSIGN_PREC, Assign(AssignOp::Add)),
        TokenKind::MinusEq => (ASSIGN_PREC, Assign(AssignOp::Sub)),
        TokenKind::StarEq => (ASSIGN_PREC, Assign(AssignOp::Mul)),
        TokenKind::SlashEq => (ASSIGN_PREC, Assign(AssignOp::Div)),
        TokenKind::PercentEq => (ASSIGN_PREC, Assign(AssignOp::Rem)),
        TokenKind::AmpEq => (ASSIGN_PREC, Assign(AssignOp::BitAnd)),
        TokenKind::PipeEq => (ASSIGN_PREC, Assign(AssignOp::BitOr)),
        TokenKind::CaretEq => (ASSIGN_PREC, Assign(AssignOp::BitXor)),
        TokenKind::ShlEq => (ASSIGN_PREC, Assign(AssignOp::Shl)),
        TokenKind::ShrEq => (ASSIGN_PREC, Assign(AssignOp::Shr)),
        TokenKind::DotDot => (2, Binary(BinaryOp::Range)),
        TokenKind::OrOr => (3, Binary(BinaryOp::Or)),
        TokenKind::AndAnd => (4, Binary(BinaryOp::And)),
        TokenKind::EqEq => (5, Binary(BinaryOp::Eq)),
        TokenKind::NotEq => (5, Binary(BinaryOp::NotEq)),
        TokenKind::Lt => (6, Binary(BinaryOp::Lt)),
        TokenKind::Le => (6, Binary(BinaryOp::Le)),
        TokenKind::Gt => (6, Binary(BinaryOp::Gt)),
        TokenKind::Ge => (6, Binary(BinaryOp::Ge)),
        TokenKind::Pipe => (7, Binary(BinaryOp::BitOr)),
        TokenKind::Caret => (8, Binary(BinaryOp::BitXor)),
        TokenKind::Amp => (9, Binary(BinaryOp::BitAnd)),
        TokenKind::Shl => (10, Binary(BinaryOp::Shl)),
        TokenKind::Shr => (10, Binary(BinaryOp::Shr)),
        TokenKind::Plus => (11, Binary(BinaryOp::Add)),
        TokenKind::Minus => (11, Binary(BinaryOp::Sub)),
        TokenKind::Star => (12, Binary(BinaryOp::Mul)),
        TokenKind::Slash => (12, Binary(BinaryOp::Div)),
        TokenKind::Percent => (12, Binary(BinaryOp::Rem)),
        _ => return None,
    })
}

/// Value of an integer lexeme, radix prefix and `_` separators included.
fn int_value(lexeme: &str) -> Option<u64> {
    let digits: String = lexeme.chars().filter(|c| *c != '_').collect();
    let (radix, body) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        _ => (10, digits.as_str()),
    };
    u64::from_str_radix(body, radix).ok()
}

impl<'t, 's> Parser<'t, 's> {
    pub(crate) fn can_start_expr(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Ident
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::Str
                | TokenKind::Keyword(Keyword::True | Keyword::False)
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Minus
                | TokenKind::Bang
                | TokenKind::Tilde
                | TokenKind::Invalid(_)
        )
    }

    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.descend(|p| p.parse_binary(ASSIGN_PREC))
    }

    /// Precedence climbing over [`infix`]. Assignment is right-associative,
    /// everything else is left-associative.
    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<Expr> {
        self.restoring_depth(|p| p.parse_binary_chain(min_prec))
    }

    fn parse_binary_chain(&mut self, min_prec: u8) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let Some((prec, op)) = infix(self.peek_kind()) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.deepen()?;
            self.advance();
            let start = left.position;
            left = match op {
                Infix::Assign(op) => {
                    let value = self.descend(|p| p.parse_binary(prec))?;
                    if !left.is_place() {
                        self.report(SyntaxError::InvalidAssignmentTarget, start, left.span.len());
                    }
                    let kind = ExprKind::Assign {
                        target: Box::new(left),
                        op,
                        value: Box::new(value),
                    };
                    Expr::new(kind, start, self.span_from(start))
                }
                Infix::Binary(op) => {
                    let right = self.descend(|p| p.parse_binary(prec + 1))?;
                    let kind = ExprKind::Binary {
                        left: Box::new(left),
                        op,
                        right: Box::new(right),
                    };
                    Expr::new(kind, start, self.span_from(start))
                }
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.peek_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            _ => return self.parse_postfix(),
        };
        let start = self.advance().position;
        let expr = self.descend(|p| p.parse_unary())?;
        let kind = ExprKind::Unary {
            op,
            expr: Box::new(expr),
        };
        Ok(Expr::new(kind, start, self.span_from(start)))
    }

    /// Calls, indexing and field access, applied left to right.
    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        self.restoring_depth(|p| p.parse_postfix_chain())
    }

    fn parse_postfix_chain(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            let start = expr.position;
            if matches!(self.peek_kind(), TokenKind::LParen | TokenKind::LBracket | TokenKind::Dot) {
                self.deepen()?;
            }
            let kind = match self.peek_kind() {
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_delimited(TokenKind::RParen, |p| p.parse_expr())?;
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    ExprKind::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    }
                }
                TokenKind::Dot => {
                    self.advance();
                    let name = self.expect_ident()?;
                    ExprKind::Field {
                        object: Box::new(expr),
                        name,
                    }
                }
                _ => break,
            };
            expr = Expr::new(kind, start, self.span_from(start));
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek();
        let start = token.position;
        let kind = match token.kind {
            TokenKind::Int => {
                self.advance();
                // Malformed literals were reported by the lexer.
                ExprKind::Literal(Literal::Int(int_value(&token.lexeme).unwrap_or(0)))
            }
            TokenKind::Float => {
                self.advance();
                let text: String = token.lexeme.chars().filter(|c| *c != '_').collect();
                ExprKind::Literal(Literal::Float(text.parse().unwrap_or(0.0)))
            }
            TokenKind::Str => {
                self.advance();
                ExprKind::Literal(Literal::String(unescape(&token.lexeme)))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                ExprKind::Literal(Literal::Bool(true))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                ExprKind::Literal(Literal::Bool(false))
            }
            TokenKind::Ident => {
                self.advance();
                ExprKind::Ident(Ident {
                    name: token.lexeme.clone(),
                    position: start,
                    span: token.span(),
                })
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                ExprKind::Paren(Box::new(inner))
            }
            TokenKind::LBracket => {
                self.advance();
                let elements = self.parse_delimited(TokenKind::RBracket, |p| p.parse_expr())?;
                ExprKind::List(elements)
            }
            _ => return self.error_expected("expression"),
        };
        Ok(Expr::new(kind, start, self.span_from(start)))
    }

    /// Parses `item (',' item)* ','?` followed by `close`. The opening
    /// delimiter has already been consumed.
    pub(crate) fn parse_delimited<T>(
        &mut self,
        close: TokenKind,
        mut item: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Vec<T>> {
        let mut items = Vec::new();
        while !self.check(close) {
            items.push(item(self)?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(close)?;
        Ok(items)
    }
}
