use log::{debug, trace};

use crate::{
    ast::{
        ast::{Ast, NodeId},
        expressions::{ExprId, ExprKind},
        statements::{DeclId, DeclKind, StmtId, StmtKind},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl, ErrorReporter},
    Span,
};

use super::{environment::StdEnvironment, symbol_table::SymbolTable};

/// Switches for the advisory diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerOptions {
    /// Report `*30` for statements following a `return`.
    pub report_unreachable: bool,
    /// Report `*31` for non-void functions that can fall off the end.
    pub report_missing_return: bool,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            report_unreachable: true,
            report_missing_return: true,
        }
    }
}

/// Semantic checker.
///
/// Walks the AST once in source order, binding identifier uses to their
/// declarations, assigning a type to every expression and inserting the
/// implicit int-to-float conversions. Every problem is reported and the
/// offending expression typed `Error`, which suppresses follow-up reports.
pub struct TypeChecker<'a> {
    pub ast: &'a mut Ast,
    pub(super) std_env: StdEnvironment,
    pub(super) symbols: SymbolTable,
    reporter: &'a mut dyn ErrorReporter,
    options: CheckerOptions,
    /// Number of enclosing `while`/`for` bodies.
    loop_depth: usize,
    current_function: Option<DeclId>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(
        ast: &'a mut Ast,
        reporter: &'a mut dyn ErrorReporter,
        options: CheckerOptions,
    ) -> Self {
        let mut symbols = SymbolTable::new();
        let std_env = StdEnvironment::install(ast, &mut symbols);

        TypeChecker {
            ast,
            std_env,
            symbols,
            reporter,
            options,
            loop_depth: 0,
            current_function: None,
        }
    }

    pub(super) fn report(&mut self, error: ErrorImpl, span: Span) {
        Error::new(error, span).report(&mut *self.reporter);
    }

    pub fn check_program(&mut self) {
        let program = self.ast.program.clone();
        for decl in program {
            match self.ast.decl(decl).kind {
                DeclKind::Func { .. } => self.check_func_decl(decl),
                _ => self.check_var_decl(decl),
            }
        }

        let span = self.ast.span;
        match self.symbols.retrieve("main") {
            Some(main) if self.ast.decl(main).is_function() => {
                if !self.ast.decl(main).ty.is_int() {
                    self.report(ErrorImpl::MainNotInt, span);
                }
            }
            _ => self.report(ErrorImpl::MainMissing, span),
        }
    }

    /// Enters `decl` into the innermost scope, reporting a clash within that scope.
    fn declare(&mut self, decl: DeclId) {
        let ident = &self.ast.decl(decl).ident;
        let (name, span) = (ident.spelling.clone(), ident.span);

        if let Some(existing) = self.symbols.retrieve_one_level(&name) {
            if self.std_env.contains(existing) {
                debug!("{} clashes with the standard library function {}", span, name);
            }
            self.report(ErrorImpl::Redeclared { name: name.clone() }, span);
        }
        self.symbols.insert(&name, decl);
    }

    /// `*3`/`*4` for a declaration of type `void` or `void[]`.
    fn void_declaration_error(&self, decl: DeclId) -> Option<ErrorImpl> {
        let decl = self.ast.decl(decl);
        let name = decl.ident.spelling.clone();

        match &decl.ty {
            Type::Void => Some(ErrorImpl::DeclaredVoid { name }),
            Type::Array { element, .. } if element.is_void() => {
                Some(ErrorImpl::DeclaredVoidArray { name })
            }
            _ => None,
        }
    }

    fn check_func_decl(&mut self, id: DeclId) {
        self.declare(id);
        trace!("Checking function {}", self.ast.decl(id).ident.spelling);

        let DeclKind::Func { params, body, .. } = self.ast.decl(id).kind.clone() else {
            return;
        };

        self.symbols.open_scope();
        let enclosing = self.current_function.replace(id);

        for param in params {
            self.check_param(param);
        }

        let has_return = match body {
            Some(body) => {
                self.check_stmt(body);
                self.always_returns(body)
            }
            None => false,
        };
        if let DeclKind::Func {
            has_return: flag, ..
        } = &mut self.ast.decl_mut(id).kind
        {
            *flag = has_return;
        }

        let decl = self.ast.decl(id);
        if self.options.report_missing_return && !decl.ty.is_void() && !has_return {
            let span = decl.span;
            self.report(ErrorImpl::MissingReturn, span);
        }

        self.current_function = enclosing;
        self.symbols.close_scope();
    }

    fn check_param(&mut self, id: DeclId) {
        self.declare(id);

        if let Some(error) = self.void_declaration_error(id) {
            let span = self.ast.decl(id).ident.span;
            self.report(error, span);
        }
    }

    /// Global and local variable declarations, including their initialisers.
    fn check_var_decl(&mut self, id: DeclId) {
        self.declare(id);

        let decl = self.ast.decl(id);
        let ty = decl.ty.clone();
        let span = decl.span;
        let ident_span = decl.ident.span;
        let init = decl.kind.init();

        if let Some(error) = self.void_declaration_error(id) {
            self.report(error, ident_span);
            if let Some(init) = init {
                self.check_expr(init);
            }
            return;
        }

        let Some(init) = init else {
            if ty.is_array() && ty.array_size().is_none() {
                self.report(ErrorImpl::ArraySizeMissing, span);
            }
            return;
        };

        let is_list = matches!(self.ast.expr(init).kind, ExprKind::InitList { .. });
        match (&ty, is_list) {
            (Type::Array { element, size }, true) => self.check_init_list(id, init, element, *size),
            (Type::Array { .. }, false) => {
                self.check_expr(init);
                self.report(ErrorImpl::ScalarInitialiserForArray, span);
            }
            (_, true) => {
                self.check_expr(init);
                self.report(ErrorImpl::ArrayInitialiserForScalar, span);
            }
            (_, false) => {
                let init_type = self.check_expr(init);
                if !ty.assignable(&init_type) {
                    self.report(ErrorImpl::IncompatibleAssignment, span);
                } else if ty.needs_int_to_float(&init_type) {
                    self.ast.wrap_int_to_float(init);
                }
            }
        }
    }

    /// Checks `{ e1, ..., en }` against an array declaration and fills in an omitted size.
    fn check_init_list(&mut self, decl: DeclId, list: ExprId, element: &Type, size: Option<usize>) {
        let elements = self.ast.expr(list).kind.children();

        for expr in &elements {
            let expr_type = self.check_expr(*expr);
            if !element.assignable(&expr_type) {
                let span = self.ast.expr(*expr).span;
                self.report(ErrorImpl::WrongInitialiserElement, span);
            } else if element.needs_int_to_float(&expr_type) {
                self.ast.wrap_int_to_float(*expr);
            }
        }

        let array_type = Type::array(element.clone(), Some(size.unwrap_or(elements.len())));
        self.ast.expr_mut(list).resolved_type = Some(array_type.clone());

        match size {
            Some(size) if elements.len() > size => {
                let span = self.ast.expr(list).span;
                self.report(ErrorImpl::ExcessElements, span);
            }
            Some(_) => {}
            None => {
                debug!(
                    "Inferred size {} for array {}",
                    elements.len(),
                    self.ast.decl(decl).ident.spelling
                );
                self.ast.decl_mut(decl).ty = array_type;
            }
        }
    }

    fn check_stmt(&mut self, id: StmtId) {
        let stmt = self.ast.stmt(id);
        let span = stmt.span;

        match stmt.kind.clone() {
            StmtKind::Compound { decls, stmts } => {
                // A function body shares the scope holding the parameters.
                let own_scope = !matches!(stmt.parent, Some(NodeId::Decl(_)));
                if own_scope {
                    self.symbols.open_scope();
                }

                for decl in decls {
                    self.check_var_decl(decl);
                }
                self.check_stmt_list(&stmts);

                if own_scope {
                    self.symbols.close_scope();
                }
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.check_condition(cond, |found| ErrorImpl::IfConditionNotBoolean { found });
                self.check_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_stmt(else_branch);
                }
            }
            StmtKind::While { cond, body } => {
                self.loop_depth += 1;
                self.check_condition(cond, |found| ErrorImpl::WhileConditionNotBoolean { found });
                self.check_stmt(body);
                self.loop_depth -= 1;
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                self.loop_depth += 1;
                if let Some(init) = init {
                    self.check_expr(init);
                }
                let cond = match cond {
                    Some(cond) => cond,
                    None => self.fill_for_condition(id),
                };
                self.check_condition(cond, |found| ErrorImpl::ForConditionNotBoolean { found });
                if let Some(update) = update {
                    self.check_expr(update);
                }
                self.check_stmt(body);
                self.loop_depth -= 1;
            }
            StmtKind::Break => {
                if self.loop_depth == 0 {
                    self.report(ErrorImpl::BreakOutsideLoop, span);
                }
            }
            StmtKind::Continue => {
                if self.loop_depth == 0 {
                    self.report(ErrorImpl::ContinueOutsideLoop, span);
                }
            }
            StmtKind::Return { value } => self.check_return(value, span),
            StmtKind::Expr { expr } => {
                self.check_expr(expr);
            }
            StmtKind::Empty => {}
        }
    }

    fn check_stmt_list(&mut self, stmts: &[StmtId]) {
        for (index, stmt) in stmts.iter().enumerate() {
            self.check_stmt(*stmt);

            let is_return = matches!(self.ast.stmt(*stmt).kind, StmtKind::Return { .. });
            if !is_return || !self.options.report_unreachable {
                continue;
            }
            if let Some(next) = stmts.get(index + 1) {
                let span = self.ast.stmt(*next).span;
                self.report(ErrorImpl::StatementNotReached, span);
            }
        }
    }

    fn check_condition(&mut self, cond: ExprId, error: fn(Type) -> ErrorImpl) {
        let cond_type = self.check_expr(cond);

        if !cond_type.is_boolean() && !cond_type.is_error() {
            let span = self.ast.expr(cond).span;
            self.report(error(cond_type), span);
        }
    }

    /// Materialises the omitted condition of `for (init; ; update)` as `true`.
    fn fill_for_condition(&mut self, stmt: StmtId) -> ExprId {
        let span = self.ast.stmt(stmt).span;
        let cond = self
            .ast
            .push_expr(ExprKind::BooleanLiteral("true".to_string()), span);
        self.ast.expr_mut(cond).parent = Some(NodeId::Stmt(stmt));

        if let StmtKind::For { cond: slot, .. } = &mut self.ast.stmt_mut(stmt).kind {
            *slot = Some(cond);
        }
        cond
    }

    fn check_return(&mut self, value: Option<ExprId>, span: Span) {
        let value_type = match value {
            Some(value) => self.check_expr(value),
            None => Type::Void,
        };

        let Some(function) = self.current_function else {
            return;
        };
        let function = self.ast.decl(function);
        let return_type = function.ty.clone();

        if function.ident.spelling == "main" {
            if !value_type.is_int() && !value_type.is_error() {
                self.report(ErrorImpl::MainNotInt, span);
            }
        } else if !return_type.assignable(&value_type) {
            self.report(ErrorImpl::IncompatibleReturn, span);
        } else if let Some(value) = value {
            if return_type.needs_int_to_float(&value_type) {
                self.ast.wrap_int_to_float(value);
            }
        }
    }

    /// Whether every control path through `stmt` ends in a `return`.
    pub fn always_returns(&self, stmt: StmtId) -> bool {
        match &self.ast.stmt(stmt).kind {
            StmtKind::Return { .. } => true,
            StmtKind::Compound { stmts, .. } => stmts.iter().any(|stmt| self.always_returns(*stmt)),
            StmtKind::If {
                then_branch,
                else_branch: Some(else_branch),
                ..
            } => self.always_returns(*then_branch) && self.always_returns(*else_branch),
            StmtKind::While { cond, body } => {
                self.ast.expr(*cond).kind.is_true_literal() && !self.breaks_out(*body)
            }
            StmtKind::For { cond, body, .. } => {
                cond.map_or(true, |cond| self.ast.expr(cond).kind.is_true_literal())
                    && !self.breaks_out(*body)
            }
            _ => false,
        }
    }

    /// Whether `stmt` contains a `break` that leaves the loop whose body it is.
    fn breaks_out(&self, stmt: StmtId) -> bool {
        match &self.ast.stmt(stmt).kind {
            StmtKind::Break => true,
            StmtKind::Compound { stmts, .. } => stmts.iter().any(|stmt| self.breaks_out(*stmt)),
            StmtKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.breaks_out(*then_branch)
                    || else_branch.map_or(false, |else_branch| self.breaks_out(else_branch))
            }
            _ => false,
        }
    }
}

/// Checks `ast` in place, reporting every semantic error into `reporter`.
pub fn type_check(ast: &mut Ast, reporter: &mut dyn ErrorReporter, options: CheckerOptions) {
    let mut checker = TypeChecker::new(ast, reporter, options);
    checker.check_program();
}
