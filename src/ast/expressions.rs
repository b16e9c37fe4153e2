use serde::Serialize;

use crate::Span;

use super::{ast::NodeId, statements::DeclId, types::Type};

/// Index of an expression in the `Ast` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ExprId(pub usize);

/// An identifier occurrence: a use site or the name in a declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ident {
    pub spelling: String,
    pub span: Span,
    /// The declaration this use is bound to, filled in by the checker.
    pub decl: Option<DeclId>,
}

impl Ident {
    pub fn new(spelling: String, span: Span) -> Self {
        Ident {
            spelling,
            span,
            decl: None,
        }
    }
}

/// A unary or binary operator.
///
/// The checker rewrites `spelling` to carry an `i` or `f` operand tag
/// (`i+`, `f<`, `i!`) once the operand types are known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operator {
    pub spelling: String,
    pub span: Span,
}

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub parent: Option<NodeId>,
    /// Unset until the checker has visited the node.
    pub resolved_type: Option<Type>,
}

impl Expr {
    /// The checked type, `Error` for a node the checker has not reached.
    pub fn get_type(&self) -> Type {
        self.resolved_type.clone().unwrap_or(Type::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    Binary {
        op: Operator,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: Operator,
        operand: ExprId,
    },
    Assign {
        target: ExprId,
        value: ExprId,
    },
    Var {
        ident: Ident,
    },
    ArrayAccess {
        ident: Ident,
        index: ExprId,
    },
    Call {
        ident: Ident,
        args: Vec<ExprId>,
    },
    /// Brace initialiser; only valid directly under a variable declaration.
    InitList {
        elements: Vec<ExprId>,
    },
    IntLiteral(String),
    FloatLiteral(String),
    BooleanLiteral(String),
    StringLiteral(String),
    /// Inserted by the checker around Int expressions used where a Float is expected.
    IntToFloat {
        operand: ExprId,
    },
}

impl ExprKind {
    pub fn children(&self) -> Vec<ExprId> {
        match self {
            ExprKind::Binary { left, right, .. } => vec![*left, *right],
            ExprKind::Unary { operand, .. } | ExprKind::IntToFloat { operand } => vec![*operand],
            ExprKind::Assign { target, value } => vec![*target, *value],
            ExprKind::ArrayAccess { index, .. } => vec![*index],
            ExprKind::Call { args, .. } => args.clone(),
            ExprKind::InitList { elements } => elements.clone(),
            ExprKind::Var { .. }
            | ExprKind::IntLiteral(_)
            | ExprKind::FloatLiteral(_)
            | ExprKind::BooleanLiteral(_)
            | ExprKind::StringLiteral(_) => vec![],
        }
    }

    pub fn children_mut(&mut self) -> Vec<&mut ExprId> {
        match self {
            ExprKind::Binary { left, right, .. } => vec![left, right],
            ExprKind::Unary { operand, .. } | ExprKind::IntToFloat { operand } => vec![operand],
            ExprKind::Assign { target, value } => vec![target, value],
            ExprKind::ArrayAccess { index, .. } => vec![index],
            ExprKind::Call { args, .. } => args.iter_mut().collect(),
            ExprKind::InitList { elements } => elements.iter_mut().collect(),
            ExprKind::Var { .. }
            | ExprKind::IntLiteral(_)
            | ExprKind::FloatLiteral(_)
            | ExprKind::BooleanLiteral(_)
            | ExprKind::StringLiteral(_) => vec![],
        }
    }

    /// Whether the expression can appear on the left of `=`.
    pub fn is_lvalue(&self) -> bool {
        matches!(self, ExprKind::Var { .. } | ExprKind::ArrayAccess { .. })
    }

    pub fn is_true_literal(&self) -> bool {
        matches!(self, ExprKind::BooleanLiteral(value) if value == "true")
    }
}
