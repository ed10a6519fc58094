use super::*;
use crate::{BinaryOp, ProgramBuilder, StringInterner, Type};

#[test]
fn test_empty_program_counts_root() {
    let program = Program::default();
    assert_eq!(count_program(&program), 1);
}

#[test]
fn test_counts_expressions_and_statements() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);

    // int x = 1 + 2;
    let one = b.int(1);
    let two = b.int(2);
    let sum = b.binary(BinaryOp::Add, one, two, Type::Int);
    let decl = b.decl(Type::Int, "x", Some(sum));
    let main = b.function("main", Vec::new(), None, [decl]);
    b.set_main(main);
    let program = b.finish();

    assert_eq!(count_expr(&program.arena, sum), 3);
    assert_eq!(count_stmt(&program.arena, decl), 4);
    // root + main + decl + 3 expressions
    assert_eq!(count_program(&program), 6);
}

#[test]
fn test_call_counts_callee_and_args() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);

    let a = b.ident("a", Type::Int);
    let c = b.ident("b", Type::Int);
    let call = b.call("gcd", [a, c], Type::Int);
    let program = b.finish();

    assert_eq!(count_expr(&program.arena, call), 4);
}

#[test]
fn test_invalid_children_count_nothing() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);

    let stmt = b.expr_stmt(ExprId::INVALID);
    let program = b.finish();

    assert_eq!(count_expr(&program.arena, ExprId::INVALID), 0);
    assert_eq!(count_stmt(&program.arena, stmt), 1);
    assert_eq!(count_stmt(&program.arena, StmtId::INVALID), 0);
}

#[test]
fn test_type_def_fields_and_methods() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);

    let x = b.record_field(Type::Float, "x");
    let y = b.record_field(Type::Float, "y");
    let zero = b.int(0);
    let ret = b.ret(Some(zero));
    let method = b.function("norm", Vec::new(), Some(Type::Int), [ret]);
    let def = b.type_def("Point", vec![x, y, TypeMember::Method(method)]);
    b.add_type(def);
    b.add_import("math");
    let program = b.finish();

    // root + import + typedef + 2 fields + method + return + literal
    assert_eq!(count_program(&program), 8);
}

#[test]
fn test_try_counts_catch_clauses() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);

    let body = b.brk();
    let handler = b.cont();
    let clause = b.catch_clause(None, Some("e"), [handler]);
    let try_stmt = b.try_stmt([body], vec![clause], None);
    let program = b.finish();

    // try + body stmt + clause + handler stmt
    assert_eq!(count_stmt(&program.arena, try_stmt), 4);
}

#[test]
fn test_teardown_releases_once() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);
    let one = b.int(1);
    let ret = b.ret(Some(one));
    let main = b.function("main", Vec::new(), None, [ret]);
    b.set_main(main);

    let mut root = Some(b.finish());
    assert_eq!(teardown(&mut root), 4);
    assert!(root.is_none());
    assert_eq!(teardown(&mut root), 0);
}

#[test]
fn test_teardown_on_empty_slot() {
    let mut root: Option<Program> = None;
    assert_eq!(teardown(&mut root), 0);
}

#[test]
fn test_deep_expression_chain() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);

    let mut expr = b.int(0);
    for _ in 0..50_000 {
        let one = b.int(1);
        expr = b.binary(BinaryOp::Add, expr, one, Type::Int);
    }
    let program = b.finish();

    assert_eq!(count_expr(&program.arena, expr), 100_001);
}
