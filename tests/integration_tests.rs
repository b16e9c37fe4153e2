//! Integration tests for the whole front end.
//!
//! These tests run complete VC programs through `compile`: scanning,
//! parsing and semantic checking, and inspect the diagnostics and the
//! decorated AST that come out.

use pretty_assertions::assert_eq;
use vc::{
    ast::{expressions::ExprKind, types::Type},
    compile,
    errors::errors::{Diagnostics, ErrorReporter},
    type_checker::type_checker::CheckerOptions,
};

fn run(source: &str) -> (Option<vc::ast::ast::Ast>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let ast = compile(source, &mut diagnostics, CheckerOptions::default());
    (ast, diagnostics)
}

const GCD: &str = "
int gcd(int a, int b) {
    if (b == 0)
        return a;
    else
        return gcd(b, a - b * (a / b));
}

int main() {
    int i = getInt();
    int j = getInt();
    putIntLn(gcd(i, j));
    return 0;
}
";

#[test]
fn test_compile_valid_program() {
    let (ast, diagnostics) = run(GCD);

    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics.entries());
    let ast = ast.expect("compilation should succeed");
    for id in ast.expr_ids() {
        assert!(ast.expr(id).resolved_type.is_some());
    }
}

#[test]
fn test_compile_program_with_loops_and_arrays() {
    let source = "
float average(float values[], int n) {
    float sum = 0;
    int i;
    for (i = 0; i < n; i = i + 1)
        sum = sum + values[i];
    return sum / n;
}

int main() {
    float data[] = {1, 2.5, 3};
    boolean done = false;
    while (!done) {
        putFloatLn(average(data, 3));
        done = true;
    }
    return 0;
}
";
    let (ast, diagnostics) = run(source);

    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics.entries());
    let ast = ast.expect("compilation should succeed");
    let conversions = ast
        .expr_ids()
        .filter(|id| matches!(ast.expr(*id).kind, ExprKind::IntToFloat { .. }))
        .count();
    // `sum = 0`, `sum / n` and the two int elements of `data`.
    assert_eq!(conversions, 4);

    let data = ast
        .expr_ids()
        .find(|id| matches!(ast.expr(*id).kind, ExprKind::InitList { .. }))
        .expect("initialiser list");
    assert_eq!(ast.expr(data).get_type(), Type::array(Type::Float, Some(3)));
}

#[test]
fn test_missing_main() {
    let (ast, diagnostics) = run("int f() { return 1; }");

    assert!(ast.is_none());
    assert_eq!(diagnostics.codes(), vec![0]);
    assert_eq!(
        diagnostics.entries()[0].to_string(),
        "ERROR: 1(1)..1(22): *0: main function is missing"
    );
}

#[test]
fn test_main_must_return_int() {
    let (_, diagnostics) = run("float main() { return 1.0; }");
    assert_eq!(diagnostics.codes(), vec![1, 1]);
}

#[test]
fn test_break_outside_loop() {
    let (_, diagnostics) = run("int main() {\n  break;\n  return 0;\n}");

    assert_eq!(diagnostics.codes(), vec![23]);
    assert_eq!(diagnostics.entries()[0].position.to_string(), "2(3)..2(9)");
}

#[test]
fn test_excess_initialisers() {
    let (_, diagnostics) = run("int main() { int a[2] = {1, 2, 3}; return 0; }");
    assert_eq!(diagnostics.codes(), vec![16]);
}

#[test]
fn test_argument_count_and_types() {
    let source = "
void f(int x, float y) { }
int main() {
    f(1);
    f(1, 2.0, 3, 4);
    f(1.0, 2);
    return 0;
}
";
    let (_, diagnostics) = run(source);
    assert_eq!(diagnostics.codes(), vec![26, 25, 27]);
}

#[test]
fn test_shadowing_and_redeclaration() {
    let source = "
int x;
int main() {
    float x = 1.0;
    {
        boolean x = true;
        int y;
        int y;
    }
    return 0;
}
";
    let (_, diagnostics) = run(source);

    assert_eq!(diagnostics.codes(), vec![2]);
    assert_eq!(diagnostics.entries()[0].message, "*2: identifier redeclared: y");
    assert_eq!(diagnostics.entries()[0].position.start.line, 8);
}

#[test]
fn test_missing_return_reported_once() {
    let source = "
int sign(int n) {
    if (n < 0)
        return -1;
    else if (n > 0)
        return 1;
}
int main() { return sign(3); }
";
    let (_, diagnostics) = run(source);
    assert_eq!(diagnostics.codes(), vec![31]);

    let mut quiet = Diagnostics::new();
    let options = CheckerOptions {
        report_unreachable: false,
        report_missing_return: false,
    };
    assert!(compile(source, &mut quiet, options).is_some());
}

#[test]
fn test_lexical_errors_fail_compilation() {
    let (ast, diagnostics) = run("int main() { int a = 1 # 2; return 0; }");

    assert!(ast.is_none());
    assert_eq!(diagnostics.entries()[0].message, "#: illegal character");
}

#[test]
fn test_syntax_error_skips_checking() {
    let (ast, diagnostics) = run("int main() { return y }");

    assert!(ast.is_none());
    assert_eq!(diagnostics.num_errors(), 1);
    assert_eq!(diagnostics.entries()[0].message, "\";\" expected here");
}

#[test]
fn test_semantic_errors_are_all_reported() {
    let source = "
int main() {
    int i;
    boolean b;
    i = true;
    b = 1 + 2;
    if (i) putLn();
    while (b) continue;
    undefined = 3;
    return 0;
    putLn();
}
";
    let (ast, diagnostics) = run(source);

    assert!(ast.is_none());
    assert_eq!(diagnostics.codes(), vec![6, 6, 20, 5, 30]);
}
