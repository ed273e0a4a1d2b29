use imp_compiler::ast::{ExprKind, Expression, Program, Scope, Stmt, StmtKind, Typing};
use imp_compiler::diagnostics::Diagnostic;
use imp_compiler::driver::{ast_at_stage, CompileError, Stage};
use imp_compiler::format::format_program;
use imp_compiler::passes::unscript::ENTRY_NAME;

fn ast_at(source: &str, stage: Stage) -> Program {
    ast_at_stage(source, "test.imp", stage).expect("pipeline failed")
}

fn rejected_at(source: &str, stage: Stage) -> Vec<Diagnostic> {
    match ast_at_stage(source, "test.imp", stage) {
        Err(CompileError::Rejected(diags)) => diags,
        other => panic!("expected rejection, got {:?}", other.map(|p| p.statements)),
    }
}

fn each_expr(stmt: &Stmt, f: &mut impl FnMut(&Expression)) {
    fn expr_rec(e: &Expression, f: &mut impl FnMut(&Expression)) {
        f(e);
        match &e.kind {
            ExprKind::BinOp { lhs, rhs, .. }
            | ExprKind::RelOp { lhs, rhs, .. }
            | ExprKind::LogicOp { lhs, rhs, .. } => {
                expr_rec(lhs, f);
                expr_rec(rhs, f);
            }
            ExprKind::Negation { expr }
            | ExprKind::UnaryOp { expr }
            | ExprKind::Parenthesis { expr } => expr_rec(expr, f),
            ExprKind::Call { args, .. } => args.iter().for_each(|a| expr_rec(a, f)),
            _ => {}
        }
    }
    match &stmt.kind {
        StmtKind::VarInit { init, .. } => expr_rec(init, f),
        StmtKind::Assign { target, value } => {
            expr_rec(target, f);
            expr_rec(value, f);
        }
        StmtKind::Print { expr } | StmtKind::Return { expr } | StmtKind::ExprStmt { expr } => {
            expr_rec(expr, f)
        }
        StmtKind::Branch { condition, body, orelse } => {
            expr_rec(condition, f);
            body.iter().for_each(|s| each_expr(s, f));
            orelse.iter().for_each(|s| each_expr(s, f));
        }
        StmtKind::While { condition, body } => {
            expr_rec(condition, f);
            body.iter().for_each(|s| each_expr(s, f));
        }
        StmtKind::Function { body, .. } => body.iter().for_each(|s| each_expr(s, f)),
        StmtKind::VarDecl { .. } | StmtKind::Break => {}
    }
}

fn count_stmts(stmts: &[Stmt]) -> usize {
    stmts
        .iter()
        .map(|s| {
            1 + match &s.kind {
                StmtKind::Branch { body, orelse, .. } => {
                    count_stmts(body) + count_stmts(orelse)
                }
                StmtKind::While { body, .. } | StmtKind::Function { body, .. } => {
                    count_stmts(body)
                }
                _ => 0,
            }
        })
        .sum()
}

// Pulls the folded literal out of `print <expr>;`.
fn folded_print_value(source: &str) -> i64 {
    let program = ast_at(source, Stage::Fold);
    let StmtKind::Print { expr } = &program.statements[0].kind else {
        panic!("expected a print statement");
    };
    match expr.kind {
        ExprKind::Integer(v) => v,
        ref other => panic!("expected a folded integer, got {:?}", other),
    }
}

#[test]
fn folding_respects_precedence() {
    assert_eq!(folded_print_value("print 1 + 2 * 3;"), 7);
    assert_eq!(folded_print_value("print 1 * 2 - 3;"), -1);
    assert_eq!(folded_print_value("print (1 + 2) * 3;"), 9);
    assert_eq!(folded_print_value("print -1 + 2 * 3;"), 5);
    assert_eq!(folded_print_value("print -1 + ((2 * 3) - 4 * 2 - 3 + 1);"), -5);
}

#[test]
fn folding_handles_float_literals() {
    let program = ast_at("print 1.5 + 2.25;", Stage::Fold);
    let StmtKind::Print { expr } = &program.statements[0].kind else {
        panic!("expected a print statement");
    };
    assert!(matches!(expr.kind, ExprKind::Float(v) if (v - 3.75).abs() < 1e-9));
}

#[test]
fn folding_leaves_division_by_zero_alone() {
    let program = ast_at("print 1 / 0;", Stage::Fold);
    let StmtKind::Print { expr } = &program.statements[0].kind else {
        panic!("expected a print statement");
    };
    assert!(matches!(expr.kind, ExprKind::BinOp { .. }));
}

#[test]
fn every_expression_is_typed_after_type_assignment() {
    let source = "var x = 1; var y = 2.5; print x + 2; print y * 2.0; print x < 3;";
    let program = ast_at(source, Stage::Types);
    for stmt in &program.statements {
        each_expr(stmt, &mut |e| {
            assert_ne!(e.ty, Typing::Untyped, "untyped expression: {:?}", e)
        });
    }
}

#[test]
fn undefined_name_is_reported() {
    let diags = rejected_at("print x;", Stage::Types);
    assert!(diags[0].message.contains("\"x\" is not defined"));
}

#[test]
fn mixed_operand_types_are_reported() {
    let diags = rejected_at("print 1 + 2.5;", Stage::Types);
    assert!(diags[0].message.contains("Operator + not supported"));
}

#[test]
fn wrong_arity_is_reported() {
    let source = "func f(n int) int { return n; }\nprint f(1, 2);";
    let diags = rejected_at(source, Stage::Types);
    assert!(diags[0]
        .message
        .contains("expects 1 arguments, but received 2 arguments"));
}

#[test]
fn wrong_argument_type_is_reported_but_call_still_types() {
    let source = "func f(n int) int { return n; }\nprint f(1.5) + 1;";
    let diags = rejected_at(source, Stage::Types);
    assert!(diags[0].message.contains("Argument of type \"float\""));
    assert_eq!(diags.len(), 1, "enclosing expression should not re-error");
}

#[test]
fn return_type_mismatch_is_rejected() {
    let diags = rejected_at("func f() int { return 1.5; }", Stage::Check);
    assert!(diags[0]
        .message
        .contains("cannot be assigned to return type \"int\""));
}

#[test]
fn break_outside_loop_is_rejected() {
    let diags = rejected_at("break;", Stage::Check);
    assert!(diags[0].message.contains("can only be used within a loop"));
}

#[test]
fn break_inside_loop_is_accepted() {
    let source = "var i = 0; while i < 10 { break; }";
    ast_at(source, Stage::Check);
}

#[test]
fn return_outside_function_is_rejected() {
    let diags = rejected_at("return 1;", Stage::Check);
    assert!(diags[0].message.contains("within a function"));
}

#[test]
fn deinit_removes_all_initializers_and_grows_statement_count() {
    let source = "var x = 1; if x < 2 { var y = 2; } func f() int { var z = 3; return z; }";
    let before = ast_at(source, Stage::Fold);
    let after = ast_at(source, Stage::Deinit);

    for stmt in &after.statements {
        let mut check = |s: &Stmt| {
            assert!(
                !matches!(s.kind, StmtKind::VarInit { .. }),
                "initializer survived deinit"
            )
        };
        fn walk(s: &Stmt, check: &mut impl FnMut(&Stmt)) {
            check(s);
            match &s.kind {
                StmtKind::Branch { body, orelse, .. } => {
                    body.iter().for_each(|s| walk(s, check));
                    orelse.iter().for_each(|s| walk(s, check));
                }
                StmtKind::While { body, .. } | StmtKind::Function { body, .. } => {
                    body.iter().for_each(|s| walk(s, check))
                }
                _ => {}
            }
        }
        walk(stmt, &mut check);
    }
    assert!(count_stmts(&after.statements) >= count_stmts(&before.statements));
}

#[test]
fn redeclaration_in_same_scope_is_rejected() {
    let diags = rejected_at("var x = 1; var x = 2;", Stage::Resolve);
    assert!(diags[0].message.contains("Redeclaration of existing variable `x`"));
}

#[test]
fn top_level_names_resolve_global_from_any_depth() {
    let source = "var g = 1;\nfunc f(n int) int {\n  if n < 2 { g = g + 1; }\n  return g + n;\n}\nprint f(1);";
    let program = ast_at(source, Stage::Resolve);
    let rendered = format_program(&program);
    assert!(rendered.contains("global[g]"), "{}", rendered);
    assert!(rendered.contains("local[n]"), "{}", rendered);
    assert!(!rendered.contains("local[g]"), "{}", rendered);
}

#[test]
fn inner_declarations_are_invisible_afterward() {
    let source = "if 1 == 2 { var t = 3; }\nprint t;";
    let diags = rejected_at(source, Stage::Resolve);
    assert!(diags[0].message.contains("Undeclared variable: `t`"));
}

#[test]
fn unscript_leaves_only_declarations_and_functions_at_top_level() {
    let source = "var g = 1;\nfunc f() int { return 2; }\nprint f();\nprint g;";
    let program = ast_at(source, Stage::Unscript);

    for stmt in &program.statements {
        assert!(
            matches!(
                stmt.kind,
                StmtKind::VarDecl { scope: Scope::Global, .. } | StmtKind::Function { .. }
            ),
            "executable statement at top level: {:?}",
            stmt
        );
    }

    let mains: Vec<&Stmt> = program
        .statements
        .iter()
        .filter(|s| matches!(&s.kind, StmtKind::Function { name, .. } if name == ENTRY_NAME))
        .collect();
    assert_eq!(mains.len(), 1);

    let StmtKind::Function { body, .. } = &mains[0].kind else {
        unreachable!()
    };
    assert!(matches!(body.last().unwrap().kind, StmtKind::Return { .. }));
}

#[test]
fn unscript_preserves_original_order() {
    let source = "var a = 1;\nfunc f() int { return 1; }\nvar b = 2;\nprint 3;";
    let program = ast_at(source, Stage::Unscript);
    let names: Vec<String> = program
        .statements
        .iter()
        .map(|s| match &s.kind {
            StmtKind::VarDecl { name, .. } => name.clone(),
            StmtKind::Function { name, .. } => name.clone(),
            other => panic!("unexpected top-level statement: {:?}", other),
        })
        .collect();
    assert_eq!(names, vec!["a", "f", "b", ENTRY_NAME]);
}
