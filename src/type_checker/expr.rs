use crate::{
    ast::{
        ast::NodeId,
        expressions::{ExprId, ExprKind, Ident, Operator},
        statements::{DeclId, StmtKind},
        types::Type,
    },
    errors::errors::ErrorImpl,
    Span,
};

use super::type_checker::TypeChecker;

impl TypeChecker<'_> {
    /// Checks `id` and its subexpressions, recording the result as the node's type.
    pub(super) fn check_expr(&mut self, id: ExprId) -> Type {
        let ty = self.visit_expr(id);
        self.ast.expr_mut(id).resolved_type = Some(ty.clone());
        ty
    }

    fn visit_expr(&mut self, id: ExprId) -> Type {
        let expr = self.ast.expr(id);
        let span = expr.span;

        match expr.kind.clone() {
            ExprKind::IntLiteral(_) => Type::Int,
            ExprKind::FloatLiteral(_) => Type::Float,
            ExprKind::BooleanLiteral(_) => Type::Boolean,
            ExprKind::StringLiteral(_) => Type::String,
            ExprKind::Var { ident } => self.check_var_expr(id, &ident, span),
            ExprKind::ArrayAccess { ident, index } => {
                self.check_array_access(id, &ident, index, span)
            }
            ExprKind::Call { ident, args } => self.check_call_expr(id, &ident, &args, span),
            ExprKind::Unary { op, operand } => self.check_unary_expr(id, &op, operand, span),
            ExprKind::Binary { op, left, right } => {
                self.check_binary_expr(id, &op, left, right, span)
            }
            ExprKind::Assign { target, value } => self.check_assignment_expr(target, value, span),
            // Only reached for an initialiser in a scalar declaration.
            ExprKind::InitList { elements } => {
                for element in elements {
                    self.check_expr(element);
                }
                Type::Error
            }
            ExprKind::IntToFloat { operand } => {
                self.check_expr(operand);
                Type::Float
            }
        }
    }

    /// Looks `name` up and records the binding on the identifier of `expr`.
    fn bind(&mut self, expr: ExprId, name: &str) -> Option<DeclId> {
        let decl = self.symbols.retrieve(name)?;

        match &mut self.ast.expr_mut(expr).kind {
            ExprKind::Var { ident }
            | ExprKind::ArrayAccess { ident, .. }
            | ExprKind::Call { ident, .. } => ident.decl = Some(decl),
            _ => {}
        }
        Some(decl)
    }

    /// Spelling of the variable or function an expression names, empty otherwise.
    fn name_of(&self, expr: ExprId) -> String {
        match &self.ast.expr(expr).kind {
            ExprKind::Var { ident }
            | ExprKind::ArrayAccess { ident, .. }
            | ExprKind::Call { ident, .. } => ident.spelling.clone(),
            _ => String::new(),
        }
    }

    fn tag_operator(&mut self, expr: ExprId, tag: &str) {
        if let ExprKind::Binary { op, .. } | ExprKind::Unary { op, .. } =
            &mut self.ast.expr_mut(expr).kind
        {
            op.spelling = format!("{}{}", tag, op.spelling);
        }
    }

    fn check_var_expr(&mut self, id: ExprId, ident: &Ident, span: Span) -> Type {
        let Some(decl) = self.bind(id, &ident.spelling) else {
            self.report(
                ErrorImpl::Undeclared {
                    name: ident.spelling.clone(),
                },
                span,
            );
            return Type::Error;
        };

        let decl = self.ast.decl(decl);
        if !decl.is_function() {
            return decl.ty.clone();
        }

        // A bare function name is tolerated only as a whole expression statement.
        let statement = match self.ast.expr(id).parent {
            Some(NodeId::Stmt(stmt)) => matches!(self.ast.stmt(stmt).kind, StmtKind::Expr { .. }),
            _ => false,
        };
        if statement {
            return decl.ty.clone();
        }

        self.report(
            ErrorImpl::NotScalar {
                name: ident.spelling.clone(),
            },
            span,
        );
        Type::Error
    }

    fn check_array_access(&mut self, id: ExprId, ident: &Ident, index: ExprId, span: Span) -> Type {
        let binding = self.bind(id, &ident.spelling);
        let index_type = self.check_expr(index);
        let name = ident.spelling.clone();

        let Some(decl) = binding else {
            self.report(ErrorImpl::Undeclared { name }, span);
            return Type::Error;
        };

        let decl = self.ast.decl(decl);
        let element = match decl.is_function() {
            false => decl.ty.element_type().cloned(),
            true => None,
        };
        let Some(element) = element else {
            self.report(ErrorImpl::NotArray { name }, span);
            return Type::Error;
        };

        if !index_type.is_int() && !index_type.is_error() {
            let index_span = self.ast.expr(index).span;
            self.report(ErrorImpl::SubscriptNotInteger, index_span);
            return Type::Error;
        }
        element
    }

    fn check_call_expr(&mut self, id: ExprId, ident: &Ident, args: &[ExprId], span: Span) -> Type {
        if ident.spelling == "main" {
            self.report(ErrorImpl::MainCalled, span);
            self.check_exprs(args);
            return Type::Error;
        }

        let Some(decl) = self.bind(id, &ident.spelling) else {
            self.report(
                ErrorImpl::Undeclared {
                    name: ident.spelling.clone(),
                },
                ident.span,
            );
            self.check_exprs(args);
            return Type::Error;
        };

        if !self.ast.decl(decl).is_function() {
            self.report(ErrorImpl::NotFunction, span);
            self.check_exprs(args);
            return Type::Error;
        }

        self.check_args(decl, args, span);
        self.ast.decl(decl).ty.clone()
    }

    fn check_exprs(&mut self, exprs: &[ExprId]) {
        for expr in exprs {
            self.check_expr(*expr);
        }
    }

    /// Matches actual arguments against the formal parameters of `function`.
    fn check_args(&mut self, function: DeclId, args: &[ExprId], span: Span) {
        let params: Vec<Type> = self
            .ast
            .decl(function)
            .params()
            .iter()
            .map(|param| self.ast.decl(*param).ty.clone())
            .collect();

        for (index, arg) in args.iter().enumerate() {
            let arg_type = self.check_expr(*arg);
            let arg_span = self.ast.expr(*arg).span;

            let Some(param_type) = params.get(index) else {
                if index == params.len() {
                    self.report(ErrorImpl::TooManyArguments, arg_span);
                }
                continue;
            };

            let compatible = match (param_type, &arg_type) {
                (_, Type::Error) => true,
                (
                    Type::Array {
                        element: expected, ..
                    },
                    Type::Array { element: found, .. },
                ) => expected.assignable(found),
                _ => param_type.assignable(&arg_type),
            };

            if !compatible {
                self.report(ErrorImpl::WrongArgumentType, arg_span);
            } else if param_type.needs_int_to_float(&arg_type) {
                self.ast.wrap_int_to_float(*arg);
            }
        }

        if args.len() < params.len() {
            self.report(ErrorImpl::TooFewArguments, span);
        }
    }

    fn check_unary_expr(&mut self, id: ExprId, op: &Operator, operand: ExprId, span: Span) -> Type {
        let operand_type = self.check_expr(operand);
        if operand_type.is_error() {
            return Type::Error;
        }

        let (ty, tag) = match (op.spelling.as_str(), operand_type) {
            ("!", Type::Boolean) => (Type::Boolean, "i"),
            ("+" | "-", Type::Int) => (Type::Int, "i"),
            ("+" | "-", Type::Float) => (Type::Float, "f"),
            _ => {
                self.report(
                    ErrorImpl::IncompatibleUnaryOperand {
                        operator: op.spelling.clone(),
                    },
                    span,
                );
                return Type::Error;
            }
        };

        self.tag_operator(id, tag);
        ty
    }

    /// Promotes a mixed int/float operand pair to float.
    ///
    /// Returns the operator tag, or `None` when the operands are not both numeric.
    fn unify_numeric(
        &mut self,
        left: ExprId,
        right: ExprId,
        left_type: &Type,
        right_type: &Type,
    ) -> Option<&'static str> {
        if !left_type.is_numeric() || !right_type.is_numeric() {
            return None;
        }

        match (left_type, right_type) {
            (Type::Int, Type::Int) => Some("i"),
            (Type::Float, Type::Float) => Some("f"),
            (Type::Int, Type::Float) => {
                self.ast.wrap_int_to_float(left);
                Some("f")
            }
            (Type::Float, Type::Int) => {
                self.ast.wrap_int_to_float(right);
                Some("f")
            }
            _ => None,
        }
    }

    fn check_binary_expr(
        &mut self,
        id: ExprId,
        op: &Operator,
        left: ExprId,
        right: ExprId,
        span: Span,
    ) -> Type {
        let left_type = self.check_expr(left);
        let right_type = self.check_expr(right);

        if left_type.is_error() || right_type.is_error() {
            return Type::Error;
        }

        if left_type.is_array() || right_type.is_array() {
            let operand = if left_type.is_array() { left } else { right };
            let name = self.name_of(operand);
            self.report(ErrorImpl::NotScalar { name }, span);
            return Type::Error;
        }

        let result = match op.spelling.as_str() {
            // Strings only ever appear as call arguments.
            _ if left_type.is_string() || right_type.is_string() => None,
            "+" | "-" | "*" | "/" => self
                .unify_numeric(left, right, &left_type, &right_type)
                .map(|tag| (if tag == "i" { Type::Int } else { Type::Float }, tag)),
            "<" | "<=" | ">" | ">=" => self
                .unify_numeric(left, right, &left_type, &right_type)
                .map(|tag| (Type::Boolean, tag)),
            "==" | "!=" => match (&left_type, &right_type) {
                (Type::Boolean, Type::Boolean) => Some((Type::Boolean, "i")),
                _ => self
                    .unify_numeric(left, right, &left_type, &right_type)
                    .map(|tag| (Type::Boolean, tag)),
            },
            "&&" | "||" => match (&left_type, &right_type) {
                (Type::Boolean, Type::Boolean) => Some((Type::Boolean, "i")),
                _ => None,
            },
            _ => None,
        };

        match result {
            Some((ty, tag)) => {
                self.tag_operator(id, tag);
                ty
            }
            None => {
                self.report(
                    ErrorImpl::IncompatibleBinaryOperand {
                        operator: op.spelling.clone(),
                    },
                    span,
                );
                Type::Error
            }
        }
    }

    fn check_assignment_expr(&mut self, target: ExprId, value: ExprId, span: Span) -> Type {
        if !self.ast.expr(target).kind.is_lvalue() {
            self.report(ErrorImpl::InvalidLvalue, span);
            self.check_expr(target);
            self.check_expr(value);
            return Type::Error;
        }

        let target_type = self.check_expr(target);
        let value_type = self.check_expr(value);

        if target_type.is_array() {
            self.report(ErrorImpl::InvalidLvalue, span);
            return Type::Error;
        }
        if value_type.is_array() {
            let name = self.name_of(value);
            self.report(ErrorImpl::NotScalar { name }, span);
            return Type::Error;
        }
        if !target_type.assignable(&value_type) {
            self.report(ErrorImpl::IncompatibleAssignment, span);
            return Type::Error;
        }

        if target_type.needs_int_to_float(&value_type) {
            self.ast.wrap_int_to_float(value);
        }
        target_type
    }
}
