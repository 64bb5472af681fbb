// Integration tests for the interpreter

use minic::interpreter::engine::Interpreter;
use minic::interpreter::errors::RuntimeError;
use minic::parser::Parser;
use minic::{run_source, run_source_with, Config, Error};

/// Parse and run, returning output so far plus the run result
fn run_partial(source: &str) -> (Vec<String>, Result<(), RuntimeError>) {
    let mut parser = Parser::new(source).expect("Parser creation failed");
    let program = parser.parse_program().expect("Parsing failed");

    let mut interpreter = Interpreter::new(program);
    let result = interpreter.run();
    (interpreter.output(), result)
}

#[test]
fn test_shadowing_restores_outer_binding() {
    let output = run_source("int t; t=100; { int t; t=50; print(t); } print(t);").unwrap();
    assert_eq!(output, vec!["50", "100"]);
}

#[test]
fn test_nested_shadowing_three_levels() {
    let source = r#"
        int temp;
        temp = 100;
        if (temp > 50) {
            int temp;
            temp = 50;
            if (temp < 100) {
                int temp;
                temp = 25;
                print(temp);
            }
            print(temp);
        }
        print(temp);
    "#;
    assert_eq!(run_source(source).unwrap(), vec!["25", "50", "100"]);
}

#[test]
fn test_operator_precedence() {
    let source = r#"
        int r;
        r = 2 + 3 * 4;   print(r);
        r = (2 + 3) * 4; print(r);
        r = 10 - 6 / 2;  print(r);
    "#;
    assert_eq!(run_source(source).unwrap(), vec!["14", "20", "7"]);
}

#[test]
fn test_integer_division_and_modulo() {
    let output = run_source("print(17 % 5); print(100 % 7); print(10 / 3);").unwrap();
    assert_eq!(output, vec!["2", "2", "3"]);
}

#[test]
fn test_int_assigned_to_float_prints_as_float() {
    let output = run_source("float floatVal; floatVal = 10; print(floatVal);").unwrap();
    assert_eq!(output, vec!["10.0"]);
}

#[test]
fn test_float_assigned_to_int_truncates() {
    let output = run_source("int n; n = 7.9; print(n); n = -7.9; print(n);").unwrap();
    assert_eq!(output, vec!["7", "-7"]);
}

#[test]
fn test_mixed_arithmetic_promotes() {
    let output = run_source("int i = 3; float f = 1.5; print(i * f); print(i / 2); print(i / 2.0);").unwrap();
    assert_eq!(output, vec!["4.5", "1", "1.5"]);
}

#[test]
fn test_float_division_by_zero_is_not_an_error() {
    let output = run_source("float z; print(1.0 / z); print(-1 / 0.0);").unwrap();
    assert_eq!(output, vec!["inf", "-inf"]);
}

#[test]
fn test_division_by_zero_halts_before_later_prints() {
    let (output, result) = run_partial("print(1);\nint z;\nprint(5 / z);\nprint(2);");
    assert_eq!(output, vec!["1"]);
    match result {
        Err(RuntimeError::DivisionByZero { location, .. }) => assert_eq!(location.line, 3),
        other => panic!("Expected DivisionByZero, got {:?}", other),
    }
}

#[test]
fn test_modulo_by_zero() {
    let (_, result) = run_partial("int a = 4; a = a % 0;");
    assert!(matches!(result, Err(RuntimeError::DivisionByZero { .. })));
}

#[test]
fn test_float_modulo_is_type_error() {
    let err = run_source("float f = 5.5; print(f % 2);").unwrap_err();
    assert_eq!(err.category(), "TypeError");
}

#[test]
fn test_loop_local_rebinding() {
    let source = "int i; i = 0; while (i < 3) { int sq; sq = i * i; print(sq); i = i + 1; }";
    assert_eq!(run_source(source).unwrap(), vec!["0", "1", "4"]);
}

#[test]
fn test_undeclared_identifier_produces_no_output() {
    let (output, result) = run_partial("x = 1;");
    assert!(output.is_empty());
    assert!(matches!(
        result,
        Err(RuntimeError::UndeclaredIdentifier { ref name, .. }) if name == "x"
    ));
}

#[test]
fn test_duplicate_declaration_keeps_earlier_output() {
    let (output, result) = run_partial("int a; print(1); int a;");
    assert_eq!(output, vec!["1"]);
    assert!(matches!(result, Err(RuntimeError::DuplicateDeclaration { .. })));
}

#[test]
fn test_static_check_rejects_before_any_output() {
    let config = Config::default().with_check(true);
    let err = run_source_with("print(1); { int y; } y = 2;", &config).unwrap_err();
    assert!(matches!(err, Error::Analysis(_)));
    assert_eq!(err.category(), "UndeclaredIdentifier");
    assert_eq!(err.line(), Some(1));
}

#[test]
fn test_error_categories_and_lines() {
    let lexical = run_source("int x;\nx = 3 @ 4;").unwrap_err();
    assert_eq!(lexical.category(), "LexicalError");
    assert_eq!(lexical.line(), Some(2));

    let syntax = run_source("int x;\n\nx = (1 + 2;").unwrap_err();
    assert_eq!(syntax.category(), "SyntaxError");
    assert_eq!(syntax.line(), Some(3));

    let unterminated = run_source("int x; /* never closed").unwrap_err();
    assert_eq!(unterminated.category(), "LexicalError");

    let runtime = run_source("int x;\nx = 1 / 0;").unwrap_err();
    assert_eq!(runtime.category(), "DivisionByZero");
    assert_eq!(runtime.line(), Some(2));
}

#[test]
fn test_integer_overflow_is_reported() {
    let err = run_source("int big = 9223372036854775807; big = big + 1;").unwrap_err();
    assert_eq!(err.category(), "IntegerOverflow");
}

#[test]
fn test_output_is_deterministic() {
    let source = "int i; float acc; while (i < 10) { acc = acc + i / 3.0; print(acc); i = i + 1; }";
    let first = run_source(source).unwrap();
    for _ in 0..5 {
        assert_eq!(run_source(source).unwrap(), first);
    }
}

#[test]
fn test_deeply_nested_input_is_a_syntax_error() {
    let depth = 20_000;
    let parens = format!("print({}1{});", "(".repeat(depth), ")".repeat(depth));
    let err = run_source(&parens).unwrap_err();
    assert_eq!(err.category(), "SyntaxError");
    assert_eq!(err.line(), Some(1));

    let blocks = format!("int x;\n{}x = 1;{}", "{".repeat(depth), "}".repeat(depth));
    assert_eq!(run_source(&blocks).unwrap_err().category(), "SyntaxError");
}

#[test]
fn test_duplicate_with_unconvertible_initializer() {
    let (_, result) = run_partial("int n;\nint n = 1.0 / 0.0;");
    assert!(matches!(
        result,
        Err(RuntimeError::DuplicateDeclaration { ref name, .. }) if name == "n"
    ));
}

#[test]
fn test_rerunning_an_interpreter_starts_over() {
    let program = minic::parser::parse_source("int x; print(1);").unwrap();
    let mut interpreter = Interpreter::new(program);
    interpreter.run().unwrap();
    interpreter.run().unwrap();
    assert_eq!(interpreter.output(), vec!["1"]);
}
