//! Parser tests

use palmtree::ast::{BinaryOp, Expr, Literal, Program, Stmt};
use palmtree::diagnostics::Error;
use palmtree::lexer::lex;
use palmtree::parser::{MAX_EXPR_DEPTH, parse};
use pretty_assertions::assert_eq;

fn parse_ok(source: &str) -> Program {
    let tokens = lex(source).expect("Lexing failed");
    parse(&tokens).expect("Parse failed")
}

fn parse_err(source: &str) -> Error {
    let tokens = lex(source).expect("Lexing failed");
    parse(&tokens).expect_err("Parse unexpectedly succeeded")
}

/// Shape of an expression with spans erased
fn shape(program: &Program, expr: &Expr) -> String {
    match expr {
        Expr::Literal { value, .. } => match value {
            Literal::Int(n) => n.to_string(),
            Literal::Float(f) => format!("{:?}", f),
            Literal::String(s) => format!("{:?}", s),
        },
        Expr::Variable { name, .. } => name.clone(),
        Expr::Binary {
            op, left, right, ..
        } => format!(
            "({} {} {})",
            shape(program, left),
            op,
            shape(program, right)
        ),
        Expr::Call { name, args, .. } => {
            let args: Vec<String> = args.iter().map(|a| shape(program, a)).collect();
            format!("{}({})", name, args.join(", "))
        }
        Expr::Lambda(id) => {
            let lambda = program.lambda(*id);
            format!(
                "(({}) => {})",
                lambda.params.join(", "),
                shape(program, &lambda.body)
            )
        }
    }
}

fn expr_shape(source: &str) -> String {
    let program = parse_ok(source);
    match &program.statements[0] {
        Stmt::Expr(expr) => shape(&program, expr),
        Stmt::Let {
            init: Some(expr), ..
        } => shape(&program, expr),
        other => panic!("expected an expression, got {:?}", other),
    }
}

// ==================== Statements ====================

#[test]
fn test_parse_empty_program() {
    let program = parse_ok("");
    assert!(program.statements.is_empty());
    assert_eq!(program.lambdas.len(), 0);
}

#[test]
fn test_parse_let_forms() {
    let program = parse_ok("let a; let b mut; let c = 1; let d mut = 2;");
    let summary: Vec<(String, bool, bool)> = program
        .statements
        .iter()
        .map(|stmt| match stmt {
            Stmt::Let {
                name,
                mutable,
                init,
                ..
            } => (name.clone(), *mutable, init.is_some()),
            other => panic!("expected let, got {:?}", other),
        })
        .collect();

    assert_eq!(
        summary,
        vec![
            ("a".to_string(), false, false),
            ("b".to_string(), true, false),
            ("c".to_string(), false, true),
            ("d".to_string(), true, true),
        ]
    );
}

#[test]
fn test_parse_assignment() {
    let program = parse_ok("x = x + 1;");
    match &program.statements[0] {
        Stmt::Assign { name, value, span } => {
            assert_eq!(name, "x");
            assert_eq!(shape(&program, value), "(x + 1)");
            assert_eq!((span.start, span.end), (0, 10));
        }
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_let_requires_semicolon() {
    let err = parse_err("let x = 1");
    match err {
        Error::UnexpectedToken {
            expected, found, ..
        } => {
            assert_eq!(expected, "`;`");
            assert_eq!(found, "`<eof>`");
        }
        other => panic!("expected UnexpectedToken, got {:?}", other),
    }
}

#[test]
fn test_call_statement_requires_semicolon() {
    assert!(matches!(
        parse_err("print(1)"),
        Error::UnexpectedToken { .. }
    ));
    assert_eq!(parse_ok("print(1);").statements.len(), 1);
}

#[test]
fn test_pipe_statement_semicolon_optional() {
    let program = parse_ok("5 |> increment |> double");
    assert_eq!(program.statements.len(), 1);

    let program = parse_ok("f(1) |> g\nf(2) + 1\nprint(3);");
    assert_eq!(program.statements.len(), 3);
    assert_eq!(shape(&program, expr_of(&program, 0)), "g(f(1))");
    assert_eq!(shape(&program, expr_of(&program, 1)), "(f(2) + 1)");
}

#[test]
fn test_nested_call_statement_requires_semicolon() {
    assert!(matches!(
        parse_err("print(f(g(1)), 2) x"),
        Error::UnexpectedToken { expected, found, .. }
            if expected == "`;`" && found == "`<ident>`"
    ));
}

#[test]
fn test_expression_statement_semicolon_optional() {
    let program = parse_ok("1 + 2 3;");
    assert_eq!(program.statements.len(), 2);
}

// ==================== Expressions ====================

#[test]
fn test_precedence() {
    assert_eq!(expr_shape("let x1 = 1 + 3 * (1 + 2);"), "(1 + (3 * (1 + 2)))");
    assert_eq!(expr_shape("1 - 2 - 3"), "((1 - 2) - 3)");
    assert_eq!(expr_shape("8 / 4 % 3 * 2"), "(((8 / 4) % 3) * 2)");
}

#[test]
fn test_binary_operator_kinds() {
    let program = parse_ok("a % b");
    match &program.statements[0] {
        Stmt::Expr(Expr::Binary { op, .. }) => assert_eq!(*op, BinaryOp::Rem),
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_parse_literals() {
    assert_eq!(expr_shape("2.5"), "2.5");
    assert_eq!(expr_shape(r#""tab\there""#), r#""tab\there""#);
}

#[test]
fn test_parse_lambda() {
    let program = parse_ok("let add = (x, y) => x + y;");
    assert_eq!(program.lambdas.len(), 1);
    assert_eq!(shape_of_let(&program), "((x, y) => (x + y))");
}

#[test]
fn test_parse_lambda_arities() {
    assert_eq!(expr_shape("let f = (x) => x * 2;"), "((x) => (x * 2))");
    assert_eq!(expr_shape("let f = () => PI();"), "(() => PI())");
}

#[test]
fn test_parenthesised_variable_is_not_lambda() {
    assert_eq!(expr_shape("(x) * 2"), "(x * 2)");
}

#[test]
fn test_lambda_body_can_be_lambda() {
    let program = parse_ok("let k = (a) => (b) => a;");
    assert_eq!(program.lambdas.len(), 2);
    assert_eq!(shape_of_let(&program), "((a) => ((b) => a))");
}

#[test]
fn test_parse_call_arguments() {
    assert_eq!(expr_shape("f();"), "f()");
    assert_eq!(expr_shape("f(1, g(2), 3 + 4);"), "f(1, g(2), (3 + 4))");
}

#[test]
fn test_pipe_desugars_to_calls() {
    assert_eq!(
        expr_shape("5 |> increment |> double"),
        "double(increment(5))"
    );
    assert_eq!(expr_shape("1 + 2 |> f(3, 4)"), "f((1 + 2), 3, 4)");
}

#[test]
fn test_pipe_requires_function_name() {
    assert!(matches!(
        parse_err("1 |> 2"),
        Error::UnexpectedToken { expected, .. } if expected == "`<ident>`"
    ));
}

#[test]
fn test_missing_operand() {
    assert!(matches!(
        parse_err("let x = 1 + ;"),
        Error::UnexpectedToken { expected, found, .. }
            if expected == "expression" && found == "`;`"
    ));
}

#[test]
fn test_unclosed_paren() {
    assert!(matches!(
        parse_err("(1 + 2"),
        Error::UnexpectedToken { expected, .. } if expected == "`)`"
    ));
}

#[test]
fn test_integer_literal_overflow() {
    assert!(matches!(
        parse_err("99999999999999999999"),
        Error::InvalidNumber { text, .. } if text == "99999999999999999999"
    ));
}

#[test]
fn test_spans_cover_expressions() {
    let program = parse_ok("let s = 10 + f(2);");
    match &program.statements[0] {
        Stmt::Let {
            init: Some(init),
            span,
            ..
        } => {
            let expr_span = init.span(&program.lambdas);
            assert_eq!((expr_span.start, expr_span.end), (8, 17));
            assert_eq!((span.start, span.end), (0, 18));
        }
        other => panic!("expected let, got {:?}", other),
    }
}

// ==================== Limits ====================

#[test]
fn test_long_sum_exceeds_depth_limit() {
    let source = vec!["1"; 10_000].join(" + ");
    assert!(matches!(
        parse_err(&source),
        Error::ExpressionTooDeep { limit: MAX_EXPR_DEPTH, .. }
    ));
}

#[test]
fn test_deep_parentheses_exceed_depth_limit() {
    let source = format!("{}1{}", "(".repeat(2_000), ")".repeat(2_000));
    assert!(matches!(
        parse_err(&source),
        Error::ExpressionTooDeep { limit: MAX_EXPR_DEPTH, .. }
    ));
}

#[test]
fn test_deep_call_nesting_exceeds_depth_limit() {
    let source = format!("{}1{};", "f(".repeat(1_000), ")".repeat(1_000));
    assert!(matches!(
        parse_err(&source),
        Error::ExpressionTooDeep { .. }
    ));
}

#[test]
fn test_expressions_within_limit_parse() {
    let source = vec!["1"; MAX_EXPR_DEPTH - 1].join(" * ");
    assert_eq!(parse_ok(&source).statements.len(), 1);

    let depth = MAX_EXPR_DEPTH - 1;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(expr_shape(&source), "1");
}

fn expr_of(program: &Program, index: usize) -> &Expr {
    match &program.statements[index] {
        Stmt::Expr(expr) => expr,
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

fn shape_of_let(program: &Program) -> String {
    match &program.statements[0] {
        Stmt::Let {
            init: Some(expr), ..
        } => shape(program, expr),
        other => panic!("expected let with initializer, got {:?}", other),
    }
}
