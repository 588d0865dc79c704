//! Syntax tree produced by the parser.
//!
//! Every node owns its children and records the position of its first token
//! plus the byte span it covers. Parse failures that were recovered from are
//! kept in the tree as [`ErrorNode`]s.

pub mod common;
pub mod expr;
pub mod items;
pub mod stmt;

pub use common::{ErrorNode, Ident, Literal, TypeRef, TypeRefKind};
pub use expr::{AssignOp, BinaryOp, Expr, ExprKind, UnaryOp};
pub use items::{Field, Function, Import, Item, ItemKind, Param, Program, StructDef};
pub use stmt::{Block, IfStmt, LetStmt, Stmt, StmtKind};
