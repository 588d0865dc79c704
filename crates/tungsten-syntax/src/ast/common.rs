use miette::SourceSpan;
use tungsten_source::SourcePosition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub position: SourcePosition,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(u64),
    Float(f64),
    String(String),
    Bool(bool),
}

/// A type annotation, e.g. `int`, `std::io::File` or `[str]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub kind: TypeRefKind,
    pub position: SourcePosition,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRefKind {
    Path(Vec<Ident>),
    List(Box<TypeRef>),
}

/// Placeholder for source the parser skipped after a syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNode {
    pub position: SourcePosition,
    pub span: SourceSpan,
    /// Number of significant tokens that were skipped
    pub skipped: usize,
}
