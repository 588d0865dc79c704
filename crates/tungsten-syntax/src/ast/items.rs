use super::common::{ErrorNode, Ident, TypeRef};
use super::stmt::{Block, Stmt};
use miette::SourceSpan;
use tungsten_source::SourcePosition;

/// Root of the tree for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub items: Vec<Item>,
    pub position: SourcePosition,
}

/// A top-level declaration or statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub position: SourcePosition,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Function(Function),
    Struct(StructDef),
    Import(Import),
    Stmt(Stmt),
    Error(ErrorNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Ident,
    pub params: Vec<Param>,
    pub return_type: Option<TypeRef>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Ident,
    pub ty: TypeRef,
    pub position: SourcePosition,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDef {
    pub name: Ident,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: Ident,
    pub ty: TypeRef,
    pub position: SourcePosition,
    pub span: SourceSpan,
}

/// `import a::b::c;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: Vec<Ident>,
}

impl Program {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Item {
    pub fn new(kind: ItemKind, position: SourcePosition, span: SourceSpan) -> Self {
        Self { kind, position, span }
    }

    pub fn from_error(node: ErrorNode) -> Self {
        Self {
            position: node.position,
            span: node.span,
            kind: ItemKind::Error(node),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, ItemKind::Error(_))
    }
}
