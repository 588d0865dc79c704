use super::{ParseFailure, ParseResult, Parser};
use crate::ast::{Block, IfStmt, LetStmt, Stmt, StmtKind};
use crate::error::SyntaxError;
use crate::lexer::{Keyword, TokenKind};

impl<'t, 's> Parser<'t, 's> {
    pub(crate) fn can_start_stmt(&self) -> bool {
        match self.peek_kind() {
            TokenKind::LBrace => true,
            TokenKind::Keyword(
                Keyword::Let
                | Keyword::Const
                | Keyword::Return
                | Keyword::Break
                | Keyword::Continue
                | Keyword::If
                | Keyword::While
                | Keyword::For,
            ) => true,
            _ => self.can_start_expr(),
        }
    }

    pub(crate) fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        self.descend(|p| {
            let start = p.peek().position;
            let kind = p.parse_stmt_kind()?;
            Ok(Stmt::new(kind, start, p.span_from(start)))
        })
    }

    fn parse_stmt_kind(&mut self) -> ParseResult<StmtKind> {
        match self.peek_kind() {
            TokenKind::Keyword(Keyword::Let | Keyword::Const) => self.parse_let().map(StmtKind::Let),
            TokenKind::Keyword(Keyword::Return) => {
                self.advance();
                let value = if self.check(TokenKind::Semi) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(TokenKind::Semi)?;
                Ok(StmtKind::Return(value))
            }
            TokenKind::Keyword(Keyword::Break) => {
                self.advance();
                self.expect(TokenKind::Semi)?;
                Ok(StmtKind::Break)
            }
            TokenKind::Keyword(Keyword::Continue) => {
                self.advance();
                self.expect(TokenKind::Semi)?;
                Ok(StmtKind::Continue)
            }
            TokenKind::Keyword(Keyword::If) => self.parse_if().map(StmtKind::If),
            TokenKind::Keyword(Keyword::While) => {
                self.advance();
                let condition = self.parse_expr()?;
                let body = self.parse_block()?;
                Ok(StmtKind::While { condition, body })
            }
            TokenKind::Keyword(Keyword::For) => {
                self.advance();
                let binding = self.expect_ident()?;
                self.expect(TokenKind::Keyword(Keyword::In))?;
                let iterable = self.parse_expr()?;
                let body = self.parse_block()?;
                Ok(StmtKind::For {
                    binding,
                    iterable,
                    body,
                })
            }
            TokenKind::LBrace => self.parse_block().map(StmtKind::Block),
            _ if self.can_start_expr() => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semi)?;
                Ok(StmtKind::Expr(expr))
            }
            _ => self.error_expected("statement"),
        }
    }

    /// `('let' | 'const') 'mut'? IDENT (':' type)? ('=' expr)? ';'`
    fn parse_let(&mut self) -> ParseResult<LetStmt> {
        let constant = self.advance().kind == TokenKind::Keyword(Keyword::Const);
        let mutable = self.eat(TokenKind::Keyword(Keyword::Mut)).is_some();
        let name = self.expect_ident()?;
        let ty = match self.eat(TokenKind::Colon) {
            Some(_) => Some(self.parse_type()?),
            None => None,
        };
        let value = match self.eat(TokenKind::Eq) {
            Some(_) => Some(self.parse_expr()?),
            None => None,
        };
        self.expect(TokenKind::Semi)?;
        Ok(LetStmt {
            constant,
            mutable,
            name,
            ty,
            value,
        })
    }

    fn parse_if(&mut self) -> ParseResult<IfStmt> {
        self.advance();
        let condition = self.parse_expr()?;
        let then_branch = self.parse_block()?;
        if !self.check_keyword(Keyword::Else) {
            return Ok(IfStmt {
                condition,
                then_branch,
                else_branch: None,
            });
        }

        self.advance();
        let start = self.peek().position;
        let kind = match self.peek_kind() {
            TokenKind::Keyword(Keyword::If) => StmtKind::If(self.descend(|p| p.parse_if())?),
            TokenKind::LBrace => StmtKind::Block(self.parse_block()?),
            _ => return self.error_expected("`if` or block after `else`"),
        };
        Ok(IfStmt {
            condition,
            then_branch,
            else_branch: Some(Box::new(Stmt::new(kind, start, self.span_from(start)))),
        })
    }

    /// `'{' stmt* '}'`, recovering statement by statement.
    pub(crate) fn parse_block(&mut self) -> ParseResult<Block> {
        self.descend(|p| p.parse_block_inner())
    }

    fn parse_block_inner(&mut self) -> ParseResult<Block> {
        let open = self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        loop {
            if self.eat(TokenKind::RBrace).is_some() {
                break;
            }
            if self.at_eof() {
                let eof = self.peek();
                if !self.unclosed_reported {
                    self.unclosed_reported = true;
                    let err = SyntaxError::UnclosedBlock {
                        opened: open.position.to_string(),
                    };
                    self.report_at(err, eof);
                }
                break;
            }

            let start = self.pos;
            let result = match self.peek_kind() {
                TokenKind::Keyword(Keyword::Fn | Keyword::Struct | Keyword::Import) => {
                    self.error_expected("statement")
                }
                _ => self.parse_stmt(),
            };
            match result {
                Ok(stmt) => stmts.push(stmt),
                Err(ParseFailure::Syntax) => {
                    let node = self.recover(start, true);
                    stmts.push(Stmt::from_error(node));
                }
                Err(ParseFailure::TooDeep) => return Err(ParseFailure::TooDeep),
            }
        }
        Ok(Block {
            stmts,
            position: open.position,
            span: self.span_from(open.position),
        })
    }
}
