use imp_compiler::driver::compile_to_ir;

fn ir(source: &str) -> String {
    compile_to_ir(source, "test.imp").expect("compilation failed")
}

fn trimmed_lines(text: &str) -> Vec<&str> {
    text.lines().map(|l| l.trim()).collect()
}

#[test]
fn module_preamble_declares_every_print_primitive_once() {
    let out = ir("print 1;");
    let lines = trimmed_lines(&out);
    assert_eq!(lines[0], "declare i32 @_print_int(i32 %x)");
    assert_eq!(lines[1], "declare i32 @_print_float(double %x)");
    assert_eq!(lines[2], "declare i32 @_print_char(i32 %x)");
    assert_eq!(lines[3], "declare i32 @_print_bool(i1 %x)");
    assert_eq!(out.matches("declare").count(), 4);
}

#[test]
fn repeated_compilation_is_deterministic() {
    let source = "var i = 0;\nwhile i < 3 {\n  print i;\n  i = i + 1;\n}";
    assert_eq!(ir(source), ir(source));
}

#[test]
fn function_definition_lowers_header_params_and_body() {
    let source = "func square(n int) int {\n  return n * n;\n}\nprint square(5);";
    let out = ir(source);
    assert!(out.contains("define i32 @square(i32 %.a0) {"), "{}", out);
    assert!(out.contains("%n = alloca i32"), "{}", out);
    assert!(out.contains("store i32 %.a0, i32* %n"), "{}", out);
    assert!(out.contains("mul i32"), "{}", out);
    // Literal argument is substituted directly, no load.
    assert!(out.contains("call i32 (i32) @square(i32 5)"), "{}", out);
    assert!(out.contains("call i32 (i32) @_print_int"), "{}", out);
    // The synthesized entry point is a real definition.
    assert!(out.contains("define i32 @main(i32 %.a0) {"), "{}", out);
    assert!(out.contains("ret i32 0"), "{}", out);
}

#[test]
fn constant_expression_prints_a_literal() {
    let out = ir("print 1 + 2 + 3;");
    assert!(out.contains("call i32 (i32) @_print_int(i32 6)"), "{}", out);
}

#[test]
fn globals_are_zero_initialized_and_stored_in_main() {
    let out = ir("var x = 1;");
    assert!(out.contains("@x = global i32 0"), "{}", out);
    assert!(out.contains("store i32 1, i32* @x"), "{}", out);
}

#[test]
fn float_arithmetic_selects_float_opcodes() {
    let source = "var x = 1.5;\nprint x + 0.25;";
    let out = ir(source);
    assert!(out.contains("@x = global double 0.0"), "{}", out);
    assert!(out.contains("store double 1.5, double* @x"), "{}", out);
    assert!(out.contains("load double, double* @x"), "{}", out);
    assert!(out.contains("fadd double"), "{}", out);
    assert!(out.contains("call i32 (double) @_print_float"), "{}", out);
}

#[test]
fn comparisons_and_logic_lower_to_bit_instructions() {
    let source = "var x = 1;\nprint x < 2 and true;";
    let out = ir(source);
    assert!(out.contains("icmp slt i32"), "{}", out);
    assert!(out.contains("and i1"), "{}", out);
    assert!(out.contains("call i32 (i1) @_print_bool"), "{}", out);
}

#[test]
fn negation_lowers_to_xor_against_true() {
    let out = ir("print not false;");
    assert!(out.contains("xor i1 1, 0"), "{}", out);
}

#[test]
fn char_print_uses_the_char_primitive() {
    let out = ir("print 'a';");
    assert!(out.contains("call i32 (i32) @_print_char(i32 97)"), "{}", out);
}

#[test]
fn while_lowers_to_test_body_exit_blocks() {
    let source = "var i = 0;\nwhile i < 10 {\n  i = i + 1;\n}";
    let out = ir(source);
    let labels: Vec<&str> = out
        .lines()
        .map(str::trim)
        .filter(|l| l.ends_with(':'))
        .collect();
    // test, body, exit
    assert_eq!(labels.len(), 3, "{}", out);
    let test_label = labels[0].trim_end_matches(':');
    // Unconditional entry into the test block, and re-entry after the body.
    assert_eq!(
        out.matches(&format!("br label %{}", test_label)).count(),
        2,
        "{}",
        out
    );
    assert!(out.contains("br i1"), "{}", out);
}

#[test]
fn break_jumps_to_the_loop_exit() {
    let source = "var i = 0;\nwhile true {\n  break;\n}\nprint i;";
    let out = ir(source);
    let labels: Vec<&str> = out
        .lines()
        .map(str::trim)
        .filter(|l| l.ends_with(':'))
        .collect();
    let exit_label = labels[2].trim_end_matches(':');
    // Once from the loop test, once from the break itself.
    assert_eq!(out.matches(&format!("label %{}", exit_label)).count(), 2, "{}", out);
}

#[test]
fn branch_lowers_to_then_else_merge_blocks() {
    let source = "if 1 < 2 {\n  print 1;\n} else {\n  print 2;\n}";
    let out = ir(source);
    let labels: Vec<&str> = out
        .lines()
        .map(str::trim)
        .filter(|l| l.ends_with(':'))
        .collect();
    assert_eq!(labels.len(), 3, "{}", out);
    let merge_label = labels[2].trim_end_matches(':');
    // Both arms jump into the merge block.
    assert_eq!(
        out.matches(&format!("br label %{}", merge_label)).count(),
        2,
        "{}",
        out
    );
}

#[test]
fn locals_allocate_stack_slots() {
    let source = "func f() int {\n  var a = 7;\n  return a;\n}\nprint f();";
    let out = ir(source);
    assert!(out.contains("%a = alloca i32"), "{}", out);
    assert!(out.contains("store i32 7, i32* %a"), "{}", out);
    assert!(out.contains("load i32, i32* %a"), "{}", out);
}

#[test]
fn recursive_calls_lower_like_any_other_call() {
    let source = "func fib(n int) int {\n  if n < 2 {\n    return 1;\n  } else {\n    return fib(n - 1) + fib(n - 2);\n  }\n  return 0;\n}\nprint fib(10);";
    let out = ir(source);
    assert!(out.matches("call i32 (i32) @fib").count() >= 3, "{}", out);
    assert!(out.contains("call i32 (i32) @_print_int"), "{}", out);
}

#[test]
fn explicit_trailing_return_suppresses_the_default() {
    let source = "func f() int {\n  return 5;\n}\nprint f();";
    let out = ir(source);
    let defines: Vec<usize> = out
        .lines()
        .enumerate()
        .filter(|(_, l)| l.starts_with("define i32 @f("))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(defines.len(), 1);
    // Between the header and the closing brace there is exactly one ret.
    let body: Vec<&str> = out
        .lines()
        .skip(defines[0] + 1)
        .take_while(|l| *l != "}")
        .collect();
    let rets = body.iter().filter(|l| l.trim().starts_with("ret")).count();
    assert_eq!(rets, 1, "{}", out);
}

#[test]
fn synthetic_names_are_never_reused() {
    let source = "var i = 0;\nprint i + 1;\nprint i + 2;";
    let out = ir(source);
    let mut seen = std::collections::HashSet::new();
    for line in out.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("%.") {
            if let Some((id, _)) = rest.split_once(" = ") {
                assert!(seen.insert(id.to_string()), "reused name %.{}", id);
            }
        }
    }
}
