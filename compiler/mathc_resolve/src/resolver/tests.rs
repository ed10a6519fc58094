use super::*;
use mathc_ir::{ProgramBuilder, TypeMember};
use pretty_assertions::assert_eq;

fn builtin_tag(program: &Program, call: ExprId) -> Option<Builtin> {
    match program.arena.get_expr(call).kind {
        ExprKind::Call { builtin, .. } => builtin,
        ref other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn test_tags_builtin_calls() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);

    let one = b.int(1);
    let two = b.int(2);
    let xs = b.array_lit([one, two], Type::Int);
    let decl = b.decl(Type::array(Type::Int), "xs", Some(xs));
    let arg = b.ident("xs", Type::array(Type::Int));
    let total = b.call("sum", [arg], Type::Int);
    let print = b.call("println", [total], Type::Void);
    let stmt = b.expr_stmt(print);
    let main = b.function("main", Vec::new(), None, [decl, stmt]);
    b.set_main(main);
    let mut program = b.finish();

    let errors = resolve_program(&mut program, &interner);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(builtin_tag(&program, total), Some(Builtin::Sum));
    assert_eq!(builtin_tag(&program, print), Some(Builtin::Println));
}

#[test]
fn test_user_function_shadows_builtin() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);

    // int sum(int a) { return a; }
    let a = b.ident("a", Type::Int);
    let ret = b.ret(Some(a));
    let param = b.param(Type::Int, "a");
    let sum = b.function("sum", vec![param], Some(Type::Int), [ret]);
    b.add_function(sum);

    // pre-tagged by the front end, must be cleared
    let five = b.int(5);
    let call = b.builtin_call(Builtin::Sum, [five], Type::Int);
    let stmt = b.expr_stmt(call);
    let main = b.function("main", Vec::new(), None, [stmt]);
    b.set_main(main);
    let mut program = b.finish();

    let errors = resolve_program(&mut program, &interner);
    assert!(errors.is_empty());
    assert_eq!(builtin_tag(&program, call), None);
}

#[test]
fn test_local_variable_shadows_builtin_only_in_its_scope() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);

    let cond = b.bool(true);
    let zero = b.int(0);
    let shadow = b.decl(Type::Int, "max", Some(zero));
    let x = b.int(1);
    let y = b.int(2);
    let inner = b.call("max", [x, y], Type::Int);
    let inner_stmt = b.expr_stmt(inner);
    let if_stmt = b.if_stmt(cond, [shadow, inner_stmt]);

    let p = b.int(3);
    let q = b.int(4);
    let outer = b.call("max", [p, q], Type::Int);
    let outer_stmt = b.expr_stmt(outer);

    let main = b.function("main", Vec::new(), None, [if_stmt, outer_stmt]);
    b.set_main(main);
    let mut program = b.finish();

    resolve_program(&mut program, &interner);
    assert_eq!(builtin_tag(&program, inner), None);
    assert_eq!(builtin_tag(&program, outer), Some(Builtin::Max));
}

#[test]
fn test_reports_duplicates_and_undefined() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);

    b.at(2);
    let first = b.decl(Type::Int, "x", None);
    b.at(3);
    let second = b.decl(Type::Float, "x", None);
    b.at(4);
    let y = b.ident("y", Type::Int);
    let use_y = b.expr_stmt(y);
    b.at(5);
    let call = b.call("frobnicate", [], Type::Void);
    let use_call = b.expr_stmt(call);

    b.at(1);
    let main = b.function("main", Vec::new(), None, [first, second, use_y, use_call]);
    b.set_main(main);
    let mut program = b.finish();

    let errors = resolve_program(&mut program, &interner);
    assert_eq!(
        errors,
        vec![
            ResolveError::DuplicateDefinition {
                name: "x".to_string(),
                line: 3,
                first_line: 2,
            },
            ResolveError::Undefined {
                name: "y".to_string(),
                line: 4,
            },
            ResolveError::Undefined {
                name: "frobnicate".to_string(),
                line: 5,
            },
        ]
    );
    assert_eq!(builtin_tag(&program, call), None);
    assert_eq!(
        errors[1].to_string(),
        "line 4: `y` is not defined"
    );
}

#[test]
fn test_predefined_constants_and_loop_bindings() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);

    let ten = b.int(10);
    let range = b.call("range", [ten], Type::array(Type::Int));
    let i = b.ident("i", Type::Int);
    let pi = b.ident("PI", Type::Float);
    let product = b.binary(mathc_ir::BinaryOp::Mul, i, pi, Type::Float);
    let body = b.expr_stmt(product);
    let for_stmt = b.for_stmt("i", Some("k"), range, [body]);

    // i is not visible after the loop
    let after = b.ident("i", Type::Int);
    let after_stmt = b.expr_stmt(after);

    let main = b.function("main", Vec::new(), None, [for_stmt, after_stmt]);
    b.set_main(main);
    let mut program = b.finish();

    let errors = resolve_program(&mut program, &interner);
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], ResolveError::Undefined { name, .. } if name == "i"));
    assert_eq!(builtin_tag(&program, range), Some(Builtin::Range));
}

#[test]
fn test_method_sees_this_and_params() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);

    let this = b.ident("this", Type::Custom(interner.intern("Point")));
    let x = b.get_field(this, "x", Type::Float);
    let k = b.ident("k", Type::Float);
    let scaled = b.binary(mathc_ir::BinaryOp::Mul, x, k, Type::Float);
    let ret = b.ret(Some(scaled));
    let param = b.param(Type::Float, "k");
    let method = b.function("scale", vec![param], Some(Type::Float), [ret]);
    let field = b.record_field(Type::Float, "x");
    let def = b.type_def("Point", vec![field, TypeMember::Method(method)]);
    b.add_type(def);
    let mut program = b.finish();

    let errors = resolve_program(&mut program, &interner);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn test_parameter_redeclared_in_body() {
    let interner = StringInterner::new();
    let mut b = ProgramBuilder::new(&interner);

    let redecl = b.decl(Type::Int, "n", None);
    let param = b.param(Type::Int, "n");
    let func = b.function("f", vec![param], None, [redecl]);
    b.add_function(func);
    let mut program = b.finish();

    let errors = resolve_program(&mut program, &interner);
    assert!(matches!(
        &errors[..],
        [ResolveError::DuplicateDefinition { name, .. }] if name == "n"
    ));
}
