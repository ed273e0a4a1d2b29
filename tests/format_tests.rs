use imp_compiler::ast::Program;
use imp_compiler::driver::{ast_at_stage, to_ast, Stage};
use imp_compiler::format::format_program;

fn parse(source: &str) -> Program {
    to_ast(source, "test.imp").expect("parse failed")
}

// Formatting a parsed program and re-parsing the output must converge:
// the second rendering equals the first.
fn assert_round_trip(source: &str) {
    let once = format_program(&parse(source));
    let twice = format_program(&parse(&once));
    assert_eq!(once, twice, "round trip diverged for: {}", source);
}

#[test]
fn statements_round_trip() {
    assert_round_trip("var x = 1;");
    assert_round_trip("var x int;");
    assert_round_trip("print 1 + 2 * 3;");
    assert_round_trip("print (1 + 2) * 3;");
    assert_round_trip("print -1 + 2;");
    assert_round_trip("print not true;");
    assert_round_trip("print 3.5;");
    assert_round_trip("print 'a';");
}

#[test]
fn control_flow_round_trips() {
    assert_round_trip("var i = 0;\nwhile i < 10 {\n  i = i + 1;\n  if i == 5 { break; }\n}");
    assert_round_trip("if 1 < 2 { print 1; } else { print 2; }");
}

#[test]
fn functions_round_trip() {
    assert_round_trip(
        "func fib(n int) int {\n  if n < 2 { return 1; }\n  return fib(n - 1) + fib(n - 2);\n}\nprint fib(10);",
    );
    assert_round_trip("func nothing() int { return 5; }\nprint nothing();");
    assert_round_trip("func multi(x int, y float, z bool, a char) bool {\n  return true and false;\n}");
}

#[test]
fn simple_statements_format_as_expected() {
    assert_eq!(format_program(&parse("print 1+2;")), "print 1 + 2;\n");
    assert_eq!(format_program(&parse("var x=1;")), "var x = 1;\n");
    assert_eq!(format_program(&parse("var x int;")), "var x int;\n");
}

#[test]
fn analyzed_trees_render_their_resolution() {
    let source = "var g = 1;\nfunc f(n int) int { return g + n; }\nprint f(1);";
    let program = ast_at_stage(source, "test.imp", Stage::Resolve).expect("pipeline failed");
    let rendered = format_program(&program);
    assert!(rendered.contains("global g;"), "{}", rendered);
    assert!(rendered.contains("global[g] + local[n]"), "{}", rendered);
}
