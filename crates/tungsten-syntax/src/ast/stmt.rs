use super::common::{ErrorNode, Ident, TypeRef};
use super::expr::Expr;
use miette::SourceSpan;
use tungsten_source::SourcePosition;

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub position: SourcePosition,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Let(LetStmt),
    Expr(Expr),
    Return(Option<Expr>),
    Break,
    Continue,
    If(IfStmt),
    While {
        condition: Expr,
        body: Block,
    },
    For {
        binding: Ident,
        iterable: Expr,
        body: Block,
    },
    Block(Block),
    Error(ErrorNode),
}

/// `let` and `const` declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct LetStmt {
    pub constant: bool,
    pub mutable: bool,
    pub name: Ident,
    pub ty: Option<TypeRef>,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Block,
    /// Either another `if` statement or a block statement
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub position: SourcePosition,
    pub span: SourceSpan,
}

impl Stmt {
    pub fn new(kind: StmtKind, position: SourcePosition, span: SourceSpan) -> Self {
        Self { kind, position, span }
    }

    pub fn from_error(node: ErrorNode) -> Self {
        Self {
            position: node.position,
            span: node.span,
            kind: StmtKind::Error(node),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, StmtKind::Error(_))
    }
}
