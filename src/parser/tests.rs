//! Unit tests for the parser module.
//!
//! This module contains tests for parsing VC constructs including:
//! - Global and local variable declarations
//! - Function declarations and parameters
//! - Expressions and operator precedence
//! - Control flow statements
//! - Syntax error reporting

use pretty_assertions::assert_eq;

use crate::{
    ast::{
        ast::{Ast, NodeId},
        expressions::{ExprId, ExprKind},
        statements::{DeclKind, StmtId, StmtKind},
        types::Type,
    },
    errors::errors::{Diagnostics, Error, ErrorReporter},
    lexer::{lexer::Scanner, source::SourceFile},
};

use super::parser::parse;

fn parse_source(source: &str) -> (Result<Ast, Error>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let result = parse(Scanner::new(SourceFile::new(source), &mut diagnostics));
    (result, diagnostics)
}

fn parse_ok(source: &str) -> Ast {
    let (result, diagnostics) = parse_source(source);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics.entries());
    result.expect("parse should succeed")
}

/// Statements of the body of the `index`-th top-level function.
fn body_stmts(ast: &Ast, index: usize) -> Vec<StmtId> {
    let DeclKind::Func { body: Some(body), .. } = &ast.decl(ast.program[index]).kind else {
        panic!("not a function");
    };
    let StmtKind::Compound { stmts, .. } = &ast.stmt(*body).kind else {
        panic!("body is not compound");
    };
    stmts.clone()
}

/// The expression of an expression statement.
fn stmt_expr(ast: &Ast, stmt: StmtId) -> ExprId {
    match ast.stmt(stmt).kind {
        StmtKind::Expr { expr } => expr,
        ref other => panic!("not an expression statement: {:?}", other),
    }
}

fn operator(ast: &Ast, expr: ExprId) -> &str {
    match &ast.expr(expr).kind {
        ExprKind::Binary { op, .. } | ExprKind::Unary { op, .. } => &op.spelling,
        other => panic!("not an operator: {:?}", other),
    }
}

#[test]
fn test_parse_empty_program() {
    let ast = parse_ok("");
    assert!(ast.program.is_empty());
}

#[test]
fn test_parse_global_variables() {
    let ast = parse_ok("int x = 1, y[3], z[] = {1, 2};\nfloat f;");

    assert_eq!(ast.program.len(), 4);
    let x = ast.decl(ast.program[0]);
    assert_eq!(x.ident.spelling, "x");
    assert_eq!(x.ty, Type::Int);
    assert!(matches!(x.kind, DeclKind::GlobalVar { init: Some(_) }));

    let y = ast.decl(ast.program[1]);
    assert_eq!(y.ty, Type::array(Type::Int, Some(3)));
    assert!(matches!(y.kind, DeclKind::GlobalVar { init: None }));

    let z = ast.decl(ast.program[2]);
    assert_eq!(z.ty, Type::array(Type::Int, None));
    let init = z.kind.init().expect("initialiser");
    assert!(matches!(&ast.expr(init).kind, ExprKind::InitList { elements } if elements.len() == 2));

    assert_eq!(ast.decl(ast.program[3]).ty, Type::Float);
    for decl in &ast.program {
        assert_eq!(ast.decl(*decl).parent, Some(NodeId::Program));
    }
}

#[test]
fn test_parse_function_declaration() {
    let ast = parse_ok("int add(int a, float b[]) { return a; }");

    let func = ast.decl(ast.program[0]);
    assert_eq!(func.ident.spelling, "add");
    assert_eq!(func.ty, Type::Int);
    let params = func.params();
    assert_eq!(params.len(), 2);
    assert_eq!(ast.decl(params[0]).ty, Type::Int);
    assert_eq!(ast.decl(params[1]).ty, Type::array(Type::Float, None));
    assert_eq!(ast.decl(params[1]).parent, Some(NodeId::Decl(ast.program[0])));

    let stmts = body_stmts(&ast, 0);
    assert!(matches!(ast.stmt(stmts[0]).kind, StmtKind::Return { value: Some(_) }));
}

#[test]
fn test_parse_local_declarations_before_statements() {
    let ast = parse_ok("void f() { int i, j = 2; boolean b; i = j; }");

    let DeclKind::Func { body: Some(body), .. } = ast.decl(ast.program[0]).kind else {
        panic!("not a function");
    };
    let StmtKind::Compound { decls, stmts } = &ast.stmt(body).kind else {
        panic!("body is not compound");
    };
    assert_eq!(decls.len(), 3);
    assert_eq!(stmts.len(), 1);
    assert!(matches!(ast.decl(decls[1]).kind, DeclKind::LocalVar { init: Some(_) }));
    assert_eq!(ast.decl(decls[2]).ty, Type::Boolean);
}

#[test]
fn test_parse_precedence() {
    let ast = parse_ok("void f() { a = 1 + 2 * 3 < 4 || !b && c; }");

    let assign = stmt_expr(&ast, body_stmts(&ast, 0)[0]);
    let ExprKind::Assign { value, .. } = ast.expr(assign).kind else {
        panic!("not an assignment");
    };
    assert_eq!(operator(&ast, value), "||");

    let ExprKind::Binary { left, right, .. } = &ast.expr(value).kind else {
        unreachable!()
    };
    assert_eq!(operator(&ast, *left), "<");
    assert_eq!(operator(&ast, *right), "&&");

    let ExprKind::Binary { left: sum, .. } = &ast.expr(*left).kind else {
        unreachable!()
    };
    assert_eq!(operator(&ast, *sum), "+");
    let ExprKind::Binary { right: product, .. } = &ast.expr(*sum).kind else {
        unreachable!()
    };
    assert_eq!(operator(&ast, *product), "*");
}

#[test]
fn test_parse_left_associativity() {
    let ast = parse_ok("void f() { 1 - 2 - 3; }");

    let outer = stmt_expr(&ast, body_stmts(&ast, 0)[0]);
    let ExprKind::Binary { left, right, .. } = &ast.expr(outer).kind else {
        panic!("not binary");
    };
    assert_eq!(operator(&ast, *left), "-");
    assert!(matches!(&ast.expr(*right).kind, ExprKind::IntLiteral(value) if value == "3"));
}

#[test]
fn test_parse_assignment_is_right_associative() {
    let ast = parse_ok("void f() { a = b = 3; }");

    let outer = stmt_expr(&ast, body_stmts(&ast, 0)[0]);
    let ExprKind::Assign { target, value } = ast.expr(outer).kind else {
        panic!("not an assignment");
    };
    assert!(matches!(ast.expr(target).kind, ExprKind::Var { .. }));
    assert!(matches!(ast.expr(value).kind, ExprKind::Assign { .. }));
}

#[test]
fn test_parse_unary_binds_tighter() {
    let ast = parse_ok("void f() { -a * b; }");

    let product = stmt_expr(&ast, body_stmts(&ast, 0)[0]);
    assert_eq!(operator(&ast, product), "*");
    let ExprKind::Binary { left, .. } = &ast.expr(product).kind else {
        unreachable!()
    };
    assert_eq!(operator(&ast, *left), "-");
}

#[test]
fn test_parse_calls_and_array_access() {
    let ast = parse_ok("void f() { putInt(a[i + 1], g()); }");

    let call = stmt_expr(&ast, body_stmts(&ast, 0)[0]);
    let ExprKind::Call { ident, args } = &ast.expr(call).kind else {
        panic!("not a call");
    };
    assert_eq!(ident.spelling, "putInt");
    assert_eq!(args.len(), 2);
    assert!(matches!(
        &ast.expr(args[0]).kind,
        ExprKind::ArrayAccess { ident, .. } if ident.spelling == "a"
    ));
    assert!(matches!(&ast.expr(args[1]).kind, ExprKind::Call { args, .. } if args.is_empty()));
    assert_eq!(ast.expr(args[0]).parent, Some(NodeId::Expr(call)));
}

#[test]
fn test_parse_grouping() {
    let ast = parse_ok("void f() { (1 + 2) * 3; }");

    let product = stmt_expr(&ast, body_stmts(&ast, 0)[0]);
    assert_eq!(operator(&ast, product), "*");
}

#[test]
fn test_parse_control_flow() {
    let ast = parse_ok(
        "void f() {\n\
         if (a) x = 1; else { x = 2; }\n\
         while (true) break;\n\
         for (;;) continue;\n\
         for (i = 0; i < 10; i = i + 1) ;\n\
         return;\n\
         }",
    );

    let stmts = body_stmts(&ast, 0);
    assert_eq!(stmts.len(), 5);
    assert!(matches!(ast.stmt(stmts[0]).kind, StmtKind::If { else_branch: Some(_), .. }));
    assert!(matches!(ast.stmt(stmts[1]).kind, StmtKind::While { .. }));
    assert!(matches!(
        ast.stmt(stmts[2]).kind,
        StmtKind::For { init: None, cond: None, update: None, .. }
    ));
    let StmtKind::For {
        body,
        init: Some(_),
        cond: Some(_),
        update: Some(_),
    } = ast.stmt(stmts[3]).kind
    else {
        panic!("expected a full for statement");
    };
    assert_eq!(ast.stmt(body).kind, StmtKind::Empty);
    assert_eq!(ast.stmt(stmts[4]).kind, StmtKind::Return { value: None });
}

#[test]
fn test_parse_spans() {
    let ast = parse_ok("int main() {\n  return 1 + 2;\n}");

    let stmts = body_stmts(&ast, 0);
    let span = ast.stmt(stmts[0]).span;
    assert_eq!(span.to_string(), "2(3)..2(16)");
    assert_eq!(ast.decl(ast.program[0]).span.to_string(), "1(1)..3(2)");
}

#[test]
fn test_missing_semicolon() {
    let (result, diagnostics) = parse_source("int main() {\n  x = 1\n}");

    assert!(result.is_err());
    assert_eq!(diagnostics.num_errors(), 1);
    let diagnostic = &diagnostics.entries()[0];
    assert_eq!(diagnostic.message, "\";\" expected here");
    assert_eq!(diagnostic.position.to_string(), "3(1)..3(2)");
}

#[test]
fn test_illegal_primary_expression() {
    let (result, diagnostics) = parse_source("int main() { x = ; }");

    assert!(result.is_err());
    assert_eq!(diagnostics.entries()[0].message, "illegal primary expression: ;");
}

#[test]
fn test_identifier_expected() {
    let (result, diagnostics) = parse_source("int 42;");

    assert!(result.is_err());
    assert_eq!(diagnostics.entries()[0].message, "identifier expected here");
}

#[test]
fn test_type_expected() {
    let (result, diagnostics) = parse_source("main() {}");

    assert!(result.is_err());
    assert_eq!(diagnostics.entries()[0].message, "type expected here");
}

#[test]
fn test_array_size_must_be_literal() {
    let (result, diagnostics) = parse_source("int a[n];");

    assert!(result.is_err());
    assert_eq!(diagnostics.entries()[0].message, "\"]\" expected here");
}

#[test]
fn test_invalid_array_size() {
    let (result, diagnostics) = parse_source("int a[99999999999999999999999];");

    assert!(result.is_err());
    assert_eq!(
        diagnostics.entries()[0].message,
        "99999999999999999999999: invalid array size"
    );
}

#[test]
fn test_only_first_syntax_error_is_reported() {
    let (result, diagnostics) = parse_source("int main() { x = ; y = ; }\nint 3;");

    assert!(result.is_err());
    assert_eq!(diagnostics.num_errors(), 1);
}

#[test]
fn test_unclosed_block_reports_at_eof() {
    let (result, diagnostics) = parse_source("int main() {");

    assert!(result.is_err());
    assert_eq!(diagnostics.entries()[0].message, "illegal primary expression: $");
}
