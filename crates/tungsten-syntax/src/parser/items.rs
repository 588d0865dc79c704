use super::{ParseResult, Parser};
use crate::ast::{Field, Function, Import, Item, ItemKind, Param, StructDef, TypeRef, TypeRefKind};
use crate::lexer::{Keyword, TokenKind};

impl<'t, 's> Parser<'t, 's> {
    pub(crate) fn parse_item(&mut self) -> ParseResult<Item> {
        let start = self.peek().position;
        let kind = match self.peek_kind() {
            TokenKind::Keyword(Keyword::Fn) => ItemKind::Function(self.parse_function()?),
            TokenKind::Keyword(Keyword::Struct) => ItemKind::Struct(self.parse_struct()?),
            TokenKind::Keyword(Keyword::Import) => ItemKind::Import(self.parse_import()?),
            _ if self.can_start_stmt() => ItemKind::Stmt(self.parse_stmt()?),
            _ => return self.error_expected("item"),
        };
        Ok(Item::new(kind, start, self.span_from(start)))
    }

    /// `'fn' IDENT '(' params ')' ('->' type)? block`
    fn parse_function(&mut self) -> ParseResult<Function> {
        self.advance();
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let params = self.parse_delimited(TokenKind::RParen, |p| p.parse_param())?;
        let return_type = match self.eat(TokenKind::Arrow) {
            Some(_) => Some(self.parse_type()?),
            None => None,
        };
        let body = self.parse_block()?;
        Ok(Function {
            name,
            params,
            return_type,
            body,
        })
    }

    fn parse_param(&mut self) -> ParseResult<Param> {
        let start = self.peek().position;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        Ok(Param {
            name,
            ty,
            position: start,
            span: self.span_from(start),
        })
    }

    fn parse_struct(&mut self) -> ParseResult<StructDef> {
        self.advance();
        let name = self.expect_ident()?;
        self.expect(TokenKind::LBrace)?;
        let fields = self.parse_delimited(TokenKind::RBrace, |p| {
            let start = p.peek().position;
            let name = p.expect_ident()?;
            p.expect(TokenKind::Colon)?;
            let ty = p.parse_type()?;
            Ok(Field {
                name,
                ty,
                position: start,
                span: p.span_from(start),
            })
        })?;
        Ok(StructDef { name, fields })
    }

    /// `'import' IDENT ('::' IDENT)* ';'`
    fn parse_import(&mut self) -> ParseResult<Import> {
        self.advance();
        let mut path = vec![self.expect_ident()?];
        while self.eat(TokenKind::ColonColon).is_some() {
            path.push(self.expect_ident()?);
        }
        self.expect(TokenKind::Semi)?;
        Ok(Import { path })
    }

    /// `IDENT ('::' IDENT)* | '[' type ']'`
    pub(crate) fn parse_type(&mut self) -> ParseResult<TypeRef> {
        let start = self.peek().position;
        let kind = match self.peek_kind() {
            TokenKind::LBracket => {
                self.advance();
                let element = self.descend(|p| p.parse_type())?;
                self.expect(TokenKind::RBracket)?;
                TypeRefKind::List(Box::new(element))
            }
            TokenKind::Ident => {
                let mut path = vec![self.expect_ident()?];
                while self.eat(TokenKind::ColonColon).is_some() {
                    path.push(self.expect_ident()?);
                }
                TypeRefKind::Path(path)
            }
            _ => return self.error_expected("type"),
        };
        Ok(TypeRef {
            kind,
            position: start,
            span: self.span_from(start),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{ItemKind, Program, TypeRefKind};
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use tungsten_source::{Diagnostic, FileId, LexerConfig, ParserConfig};

    fn parse_str(input: &str) -> (Program, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let tokens = tokenize(input, FileId::default(), &LexerConfig::default(), &mut diagnostics);
        let program = parse(&tokens, &ParserConfig::default(), &mut diagnostics);
        (program, diagnostics)
    }

    #[test]
    fn test_parse_function() {
        let (program, diagnostics) = parse_str("fn add(a: int, b: int,) -> int { return a + b; }");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let ItemKind::Function(func) = &program.items[0].kind else {
            panic!("expected function");
        };
        assert_eq!(func.name.name, "add");
        let params: Vec<_> = func.params.iter().map(|p| p.name.name.as_str()).collect();
        assert_eq!(params, vec!["a", "b"]);
        assert!(func.return_type.is_some());
        assert_eq!(func.body.stmts.len(), 1);
        assert_eq!(program.items[0].span.len(), 48);
    }

    #[test]
    fn test_parse_struct_and_import() {
        let (program, diagnostics) =
            parse_str("import std::io;\nstruct Point { x: float, tags: [std::str] }");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let ItemKind::Import(import) = &program.items[0].kind else {
            panic!("expected import");
        };
        let path: Vec<_> = import.path.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(path, vec!["std", "io"]);

        let ItemKind::Struct(def) = &program.items[1].kind else {
            panic!("expected struct");
        };
        assert_eq!(def.name.name, "Point");
        assert_eq!(def.fields.len(), 2);
        let TypeRefKind::List(element) = &def.fields[1].ty.kind else {
            panic!("expected list type");
        };
        assert!(matches!(&element.kind, TypeRefKind::Path(path) if path.len() == 2));
        assert_eq!(program.items[1].position.line, 2);
    }

    #[test]
    fn test_stray_closing_brace_at_top_level() {
        let (program, diagnostics) = parse_str("}\nlet x = 1;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "expected item, found `}`");
        assert_eq!(program.items.len(), 2);
        assert!(program.items[0].is_error());
    }

    #[test]
    fn test_bad_function_header_recovers_after_body() {
        let (program, diagnostics) = parse_str("fn (a) { x; }\nfn ok() {}");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "expected identifier, found `(`");
        assert_eq!(program.items.len(), 2);
        assert!(program.items[0].is_error());
        assert!(matches!(program.items[1].kind, ItemKind::Function(_)));
    }

    #[test]
    fn test_missing_type() {
        let (_, diagnostics) = parse_str("fn f(a: ) {}");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "expected type, found `)`");
    }
}
