use serde::Serialize;

use crate::Span;

use super::{
    ast::NodeId,
    expressions::{ExprId, Ident},
    types::Type,
};

/// Index of a statement in the `Ast` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StmtId(pub usize);

/// Index of a declaration in the `Ast` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DeclId(pub usize);

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    /// `{ local declarations; statements }`
    Compound {
        decls: Vec<DeclId>,
        stmts: Vec<StmtId>,
    },
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    For {
        init: Option<ExprId>,
        /// An omitted condition is filled in with a `true` literal by the checker.
        cond: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
    },
    Break,
    Continue,
    Return {
        value: Option<ExprId>,
    },
    Expr {
        expr: ExprId,
    },
    Empty,
}

impl StmtKind {
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            StmtKind::Compound { decls, stmts } => decls
                .iter()
                .map(|decl| NodeId::Decl(*decl))
                .chain(stmts.iter().map(|stmt| NodeId::Stmt(*stmt)))
                .collect(),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let mut children = vec![NodeId::Expr(*cond), NodeId::Stmt(*then_branch)];
                children.extend(else_branch.map(NodeId::Stmt));
                children
            }
            StmtKind::While { cond, body } => vec![NodeId::Expr(*cond), NodeId::Stmt(*body)],
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => [init, cond, update]
                .into_iter()
                .flatten()
                .map(|expr| NodeId::Expr(*expr))
                .chain(std::iter::once(NodeId::Stmt(*body)))
                .collect(),
            StmtKind::Return { value } => value.iter().map(|expr| NodeId::Expr(*expr)).collect(),
            StmtKind::Expr { expr } => vec![NodeId::Expr(*expr)],
            StmtKind::Break | StmtKind::Continue | StmtKind::Empty => vec![],
        }
    }

    pub fn child_exprs_mut(&mut self) -> Vec<&mut ExprId> {
        match self {
            StmtKind::If { cond, .. } | StmtKind::While { cond, .. } => vec![cond],
            StmtKind::For {
                init, cond, update, ..
            } => [init, cond, update]
                .into_iter()
                .filter_map(Option::as_mut)
                .collect(),
            StmtKind::Return { value } => value.iter_mut().collect(),
            StmtKind::Expr { expr } => vec![expr],
            StmtKind::Compound { .. } | StmtKind::Break | StmtKind::Continue | StmtKind::Empty => {
                vec![]
            }
        }
    }
}

/// Declaration
///
/// Functions, global and local variables, and parameters. `ty` is the
/// declared type; for functions it is the return type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decl {
    pub kind: DeclKind,
    pub ident: Ident,
    pub ty: Type,
    pub span: Span,
    pub parent: Option<NodeId>,
}

impl Decl {
    pub fn is_function(&self) -> bool {
        matches!(self.kind, DeclKind::Func { .. })
    }

    pub fn params(&self) -> &[DeclId] {
        match &self.kind {
            DeclKind::Func { params, .. } => params,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DeclKind {
    Func {
        params: Vec<DeclId>,
        /// `None` for the predeclared standard library functions.
        body: Option<StmtId>,
        /// Set by the checker when every control path through the body returns.
        has_return: bool,
    },
    GlobalVar {
        init: Option<ExprId>,
    },
    LocalVar {
        init: Option<ExprId>,
    },
    Param,
}

impl DeclKind {
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            DeclKind::Func { params, body, .. } => params
                .iter()
                .map(|param| NodeId::Decl(*param))
                .chain(body.map(NodeId::Stmt))
                .collect(),
            DeclKind::GlobalVar { init } | DeclKind::LocalVar { init } => {
                init.iter().map(|expr| NodeId::Expr(*expr)).collect()
            }
            DeclKind::Param => vec![],
        }
    }

    pub fn init(&self) -> Option<ExprId> {
        match self {
            DeclKind::GlobalVar { init } | DeclKind::LocalVar { init } => *init,
            _ => None,
        }
    }

    pub fn init_mut(&mut self) -> Option<&mut ExprId> {
        match self {
            DeclKind::GlobalVar { init } | DeclKind::LocalVar { init } => init.as_mut(),
            _ => None,
        }
    }
}
