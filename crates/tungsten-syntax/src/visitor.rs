use crate::ast::{
    Block, ErrorNode, Expr, ExprKind, Function, Ident, Item, ItemKind, Literal, Program, Stmt,
    StmtKind, TypeRef, TypeRefKind,
};
use std::convert::Infallible;

/// Trait for implementing the visitor pattern over the syntax tree
pub trait Visitor: Sized {
    type Error;

    fn visit_program(&mut self, program: &Program) -> Result<(), Self::Error> {
        for item in &program.items {
            self.visit_item(item)?;
        }
        Ok(())
    }

    // Item nodes
    fn visit_item(&mut self, item: &Item) -> Result<(), Self::Error> {
        walk_item(self, item)
    }

    fn visit_function(&mut self, func: &Function) -> Result<(), Self::Error> {
        for param in &func.params {
            self.visit_type(&param.ty)?;
        }
        if let Some(ret_ty) = &func.return_type {
            self.visit_type(ret_ty)?;
        }
        self.visit_block(&func.body)
    }

    // Statement nodes
    fn visit_stmt(&mut self, stmt: &Stmt) -> Result<(), Self::Error> {
        walk_stmt(self, stmt)
    }

    fn visit_block(&mut self, block: &Block) -> Result<(), Self::Error> {
        for stmt in &block.stmts {
            self.visit_stmt(stmt)?;
        }
        Ok(())
    }

    // Expression nodes
    fn visit_expr(&mut self, expr: &Expr) -> Result<(), Self::Error> {
        walk_expr(self, expr)
    }

    fn visit_literal(&mut self, _lit: &Literal) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_ident(&mut self, _ident: &Ident) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_type(&mut self, ty: &TypeRef) -> Result<(), Self::Error> {
        match &ty.kind {
            TypeRefKind::Path(_) => Ok(()),
            TypeRefKind::List(element) => self.visit_type(element),
        }
    }

    /// Called for every recovered parse failure, at any level of the tree.
    fn visit_error(&mut self, _node: &ErrorNode) -> Result<(), Self::Error> {
        Ok(())
    }
}

// Helper functions to traverse the tree
pub fn walk_item<V: Visitor>(visitor: &mut V, item: &Item) -> Result<(), V::Error> {
    match &item.kind {
        ItemKind::Function(func) => visitor.visit_function(func),
        ItemKind::Struct(def) => {
            for field in &def.fields {
                visitor.visit_type(&field.ty)?;
            }
            Ok(())
        }
        ItemKind::Import(_) => Ok(()),
        ItemKind::Stmt(stmt) => visitor.visit_stmt(stmt),
        ItemKind::Error(node) => visitor.visit_error(node),
    }
}

pub fn walk_stmt<V: Visitor>(visitor: &mut V, stmt: &Stmt) -> Result<(), V::Error> {
    match &stmt.kind {
        StmtKind::Let(decl) => {
            if let Some(ty) = &decl.ty {
                visitor.visit_type(ty)?;
            }
            if let Some(value) = &decl.value {
                visitor.visit_expr(value)?;
            }
            Ok(())
        }
        StmtKind::Expr(expr) => visitor.visit_expr(expr),
        StmtKind::Return(value) => match value {
            Some(value) => visitor.visit_expr(value),
            None => Ok(()),
        },
        StmtKind::Break | StmtKind::Continue => Ok(()),
        StmtKind::If(if_stmt) => {
            visitor.visit_expr(&if_stmt.condition)?;
            visitor.visit_block(&if_stmt.then_branch)?;
            if let Some(else_branch) = &if_stmt.else_branch {
                visitor.visit_stmt(else_branch)?;
            }
            Ok(())
        }
        StmtKind::While { condition, body } => {
            visitor.visit_expr(condition)?;
            visitor.visit_block(body)
        }
        StmtKind::For { iterable, body, .. } => {
            visitor.visit_expr(iterable)?;
            visitor.visit_block(body)
        }
        StmtKind::Block(block) => visitor.visit_block(block),
        StmtKind::Error(node) => visitor.visit_error(node),
    }
}

pub fn walk_expr<V: Visitor>(visitor: &mut V, expr: &Expr) -> Result<(), V::Error> {
    match &expr.kind {
        ExprKind::Literal(lit) => visitor.visit_literal(lit),
        ExprKind::Ident(ident) => visitor.visit_ident(ident),
        ExprKind::Unary { expr, .. } => visitor.visit_expr(expr),
        ExprKind::Binary { left, right, .. } => {
            visitor.visit_expr(left)?;
            visitor.visit_expr(right)
        }
        ExprKind::Assign { target, value, .. } => {
            visitor.visit_expr(target)?;
            visitor.visit_expr(value)
        }
        ExprKind::Call { callee, args } => {
            visitor.visit_expr(callee)?;
            for arg in args {
                visitor.visit_expr(arg)?;
            }
            Ok(())
        }
        ExprKind::Index { object, index } => {
            visitor.visit_expr(object)?;
            visitor.visit_expr(index)
        }
        ExprKind::Field { object, .. } => visitor.visit_expr(object),
        ExprKind::Paren(inner) => visitor.visit_expr(inner),
        ExprKind::List(elements) => {
            for element in elements {
                visitor.visit_expr(element)?;
            }
            Ok(())
        }
    }
}

#[derive(Default)]
struct ErrorCounter {
    count: usize,
}

impl Visitor for ErrorCounter {
    type Error = Infallible;

    fn visit_error(&mut self, _node: &ErrorNode) -> Result<(), Self::Error> {
        self.count += 1;
        Ok(())
    }
}

/// Number of error nodes anywhere in `program`.
pub fn count_error_nodes(program: &Program) -> usize {
    let mut counter = ErrorCounter::default();
    match counter.visit_program(program) {
        Ok(()) => counter.count,
        Err(never) => match never {},
    }
}
