use log::debug;
use serde::Serialize;

use crate::Span;

use super::{
    expressions::{Expr, ExprId, ExprKind, Ident},
    statements::{Decl, DeclId, DeclKind, Stmt, StmtId, StmtKind},
    types::Type,
};

/// A reference to any node, used for parent links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeId {
    Program,
    Decl(DeclId),
    Stmt(StmtId),
    Expr(ExprId),
}

/// Abstract syntax tree
///
/// All nodes live in three arenas and refer to each other by id. Pushing a
/// node sets the parent link of every child it names, so children must be
/// pushed before their parent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ast {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    decls: Vec<Decl>,
    /// Top-level declarations in source order.
    pub program: Vec<DeclId>,
    pub span: Span,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.0]
    }

    pub fn expr_mut(&mut self, id: ExprId) -> &mut Expr {
        &mut self.exprs[id.0]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.0]
    }

    pub fn stmt_mut(&mut self, id: StmtId) -> &mut Stmt {
        &mut self.stmts[id.0]
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.0]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.0]
    }

    pub fn expr_ids(&self) -> impl Iterator<Item = ExprId> {
        (0..self.exprs.len()).map(ExprId)
    }

    pub fn push_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId(self.exprs.len());
        for child in kind.children() {
            self.expr_mut(child).parent = Some(NodeId::Expr(id));
        }
        self.exprs.push(Expr {
            kind,
            span,
            parent: None,
            resolved_type: None,
        });
        id
    }

    pub fn push_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        let id = StmtId(self.stmts.len());
        for child in kind.children() {
            self.set_parent(child, NodeId::Stmt(id));
        }
        self.stmts.push(Stmt {
            kind,
            span,
            parent: None,
        });
        id
    }

    pub fn push_decl(&mut self, kind: DeclKind, ident: Ident, ty: Type, span: Span) -> DeclId {
        let id = DeclId(self.decls.len());
        for child in kind.children() {
            self.set_parent(child, NodeId::Decl(id));
        }
        self.decls.push(Decl {
            kind,
            ident,
            ty,
            span,
            parent: None,
        });
        id
    }

    /// Records the top-level declarations and makes them children of the program.
    pub fn set_program(&mut self, decls: Vec<DeclId>, span: Span) {
        for decl in &decls {
            self.decl_mut(*decl).parent = Some(NodeId::Program);
        }
        self.program = decls;
        self.span = span;
    }

    fn set_parent(&mut self, node: NodeId, parent: NodeId) {
        match node {
            NodeId::Expr(id) => self.expr_mut(id).parent = Some(parent),
            NodeId::Stmt(id) => self.stmt_mut(id).parent = Some(parent),
            NodeId::Decl(id) => self.decl_mut(id).parent = Some(parent),
            NodeId::Program => {}
        }
    }

    /// Wraps `operand` in an `IntToFloat` node and redirects its parent to the wrapper.
    ///
    /// Returns the id of the new node, which is typed Float.
    pub fn wrap_int_to_float(&mut self, operand: ExprId) -> ExprId {
        let parent = self.expr(operand).parent;
        let span = self.expr(operand).span;

        let wrapper = self.push_expr(ExprKind::IntToFloat { operand }, span);
        let node = self.expr_mut(wrapper);
        node.parent = parent;
        node.resolved_type = Some(Type::Float);

        if let Some(parent) = parent {
            self.replace_child(parent, operand, wrapper);
        }
        debug!("{}: inserted int-to-float conversion", span);
        wrapper
    }

    fn replace_child(&mut self, parent: NodeId, old: ExprId, new: ExprId) {
        let slots = match parent {
            NodeId::Expr(id) => self.expr_mut(id).kind.children_mut(),
            NodeId::Stmt(id) => self.stmt_mut(id).kind.child_exprs_mut(),
            NodeId::Decl(id) => self.decl_mut(id).kind.init_mut().into_iter().collect(),
            NodeId::Program => vec![],
        };

        for slot in slots {
            if *slot == old {
                *slot = new;
                return;
            }
        }
    }

    /// Walks parent links from `node` until `predicate` holds.
    pub fn find_ancestor(
        &self,
        node: NodeId,
        predicate: impl Fn(NodeId) -> bool,
    ) -> Option<NodeId> {
        let mut current = self.parent_of(node);
        while let Some(candidate) = current {
            if predicate(candidate) {
                return Some(candidate);
            }
            current = self.parent_of(candidate);
        }
        None
    }

    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        match node {
            NodeId::Expr(id) => self.expr(id).parent,
            NodeId::Stmt(id) => self.stmt(id).parent,
            NodeId::Decl(id) => self.decl(id).parent,
            NodeId::Program => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{
            expressions::{ExprKind, Ident, Operator},
            statements::{DeclKind, StmtKind},
            types::Type,
        },
        Span,
    };

    use super::{Ast, NodeId};

    #[test]
    fn test_push_sets_parents() {
        let mut ast = Ast::new();
        let left = ast.push_expr(ExprKind::IntLiteral("1".to_string()), Span::dummy());
        let right = ast.push_expr(ExprKind::IntLiteral("2".to_string()), Span::dummy());
        let op = Operator {
            spelling: "+".to_string(),
            span: Span::dummy(),
        };
        let sum = ast.push_expr(ExprKind::Binary { op, left, right }, Span::dummy());
        let stmt = ast.push_stmt(StmtKind::Expr { expr: sum }, Span::dummy());

        assert_eq!(ast.expr(left).parent, Some(NodeId::Expr(sum)));
        assert_eq!(ast.expr(right).parent, Some(NodeId::Expr(sum)));
        assert_eq!(ast.expr(sum).parent, Some(NodeId::Stmt(stmt)));
    }

    #[test]
    fn test_wrap_int_to_float_redirects_parent() {
        let mut ast = Ast::new();
        let value = ast.push_expr(ExprKind::IntLiteral("3".to_string()), Span::dummy());
        let decl = ast.push_decl(
            DeclKind::LocalVar { init: Some(value) },
            Ident::new("x".to_string(), Span::dummy()),
            Type::Float,
            Span::dummy(),
        );

        let wrapper = ast.wrap_int_to_float(value);

        assert_eq!(ast.decl(decl).kind.init(), Some(wrapper));
        assert_eq!(ast.expr(wrapper).parent, Some(NodeId::Decl(decl)));
        assert_eq!(ast.expr(value).parent, Some(NodeId::Expr(wrapper)));
        assert_eq!(ast.expr(wrapper).resolved_type, Some(Type::Float));
    }

    #[test]
    fn test_find_ancestor() {
        let mut ast = Ast::new();
        let value = ast.push_expr(ExprKind::IntLiteral("0".to_string()), Span::dummy());
        let ret = ast.push_stmt(StmtKind::Return { value: Some(value) }, Span::dummy());
        let body = ast.push_stmt(
            StmtKind::Compound {
                decls: vec![],
                stmts: vec![ret],
            },
            Span::dummy(),
        );
        let func = ast.push_decl(
            DeclKind::Func {
                params: vec![],
                body: Some(body),
                has_return: false,
            },
            Ident::new("main".to_string(), Span::dummy()),
            Type::Int,
            Span::dummy(),
        );
        ast.set_program(vec![func], Span::dummy());

        let found = ast.find_ancestor(NodeId::Expr(value), |node| matches!(node, NodeId::Decl(_)));
        assert_eq!(found, Some(NodeId::Decl(func)));
        assert_eq!(ast.parent_of(NodeId::Decl(func)), Some(NodeId::Program));
    }
}
