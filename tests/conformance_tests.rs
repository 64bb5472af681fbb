// Runs every program in demos/ and compares against its .expected file

use minic::run_source;
use std::fs;
use std::path::Path;

fn check_demo(name: &str) {
    let dir = Path::new("demos");
    let source = fs::read_to_string(dir.join(format!("{name}.c"))).expect("Failed to read demo program");
    let expected = fs::read_to_string(dir.join(format!("{name}.expected"))).expect("Failed to read expected output");

    let output = run_source(&source).unwrap_or_else(|e| panic!("{name} failed: {e}"));
    let expected: Vec<&str> = expected.lines().collect();

    assert_eq!(output, expected, "output mismatch for {name}");
}

#[test]
fn test_scopes_and_arithmetic() {
    check_demo("scopes_and_arithmetic");
}

#[test]
fn test_control_flow() {
    check_demo("control_flow");
}

#[test]
fn test_demos_pass_static_check() {
    for name in ["scopes_and_arithmetic", "control_flow"] {
        let source = fs::read_to_string(Path::new("demos").join(format!("{name}.c"))).unwrap();
        let program = minic::parser::parse_source(&source).unwrap();
        assert!(minic::analysis::analyze(&program).is_ok(), "{name} failed the static check");
    }
}
