use super::*;
use mathc_ir::ExprArena;
use pretty_assertions::assert_eq;

#[test]
fn test_fresh_label_is_monotonic() {
    let interner = StringInterner::new();
    let arena = ExprArena::new();
    let mut ctx = CodegenContext::new(&interner, &arena);
    assert_eq!(ctx.fresh_label().to_string(), "L0");
    assert_eq!(ctx.fresh_label().to_string(), "L1");
    assert_eq!(ctx.fresh_label().to_string(), "L2");
}

#[test]
fn test_fresh_temp() {
    let interner = StringInterner::new();
    let arena = ExprArena::new();
    let mut ctx = CodegenContext::new(&interner, &arena);
    assert_eq!(ctx.fresh_temp(), "_tmp0");
    assert_eq!(ctx.fresh_temp_id(), 1);
    assert_eq!(ctx.fresh_temp(), "_tmp2");
}

#[test]
fn test_indent_dedent() {
    let interner = StringInterner::new();
    let arena = ExprArena::new();
    let mut ctx = CodegenContext::new(&interner, &arena);

    ctx.writeln("line1");
    ctx.indent();
    ctx.writeln("line2");
    ctx.indent();
    ctx.writeln("line3");
    ctx.dedent();
    ctx.writeln("line4");
    ctx.dedent();
    ctx.writeln("line5");

    assert_eq!(
        ctx.take_output(),
        "line1\n    line2\n        line3\n    line4\nline5\n"
    );
}

#[test]
fn test_labels_ignore_indentation() {
    let interner = StringInterner::new();
    let arena = ExprArena::new();
    let mut ctx = CodegenContext::new(&interner, &arena);
    ctx.indent();
    let label = ctx.fresh_label();
    ctx.define_label(label);
    ctx.writeln("x++;");
    assert_eq!(ctx.take_output(), "L0: ;\n    x++;\n");
}

#[test]
fn test_loop_stack_innermost_wins() {
    let interner = StringInterner::new();
    let arena = ExprArena::new();
    let mut ctx = CodegenContext::new(&interner, &arena);
    assert_eq!(ctx.current_loop(), None);

    let (a, b) = (ctx.fresh_label(), ctx.fresh_label());
    ctx.push_loop(b, a);
    let (d, e) = (ctx.fresh_label(), ctx.fresh_label());
    ctx.push_loop(d, e);

    let inner = ctx.current_loop().unwrap();
    assert_eq!((inner.end, inner.cont), (d, e));

    ctx.pop_loop();
    let outer = ctx.current_loop().unwrap();
    assert_eq!((outer.end, outer.cont), (b, a));
    ctx.pop_loop();
    assert_eq!(ctx.current_loop(), None);
}

#[test]
fn test_cleanup_frames_flush_outermost_first() {
    let interner = StringInterner::new();
    let arena = ExprArena::new();
    let mut ctx = CodegenContext::new(&interner, &arena);

    ctx.push_cleanup_frame();
    ctx.record_alloc("a");
    ctx.record_alloc("b");
    ctx.push_cleanup_frame();
    ctx.record_alloc("c");
    assert!(ctx.has_pending_frees());

    ctx.flush_cleanup_from(0, Some("b"));
    assert_eq!(ctx.take_output(), "free(a);\nfree(c);\n");

    // Flushing does not close frames.
    ctx.flush_cleanup_from(1, None);
    assert_eq!(ctx.take_output(), "free(c);\n");

    let names = |frame: Vec<Owned>| frame.into_iter().map(|o| o.name).collect::<Vec<_>>();
    assert_eq!(names(ctx.pop_cleanup_frame()), vec!["c"]);
    assert_eq!(names(ctx.pop_cleanup_frame()), vec!["a", "b"]);
    assert!(!ctx.has_pending_frees());
}

#[test]
fn test_row_tables_release_their_rows() {
    let interner = StringInterner::new();
    let arena = ExprArena::new();
    let mut ctx = CodegenContext::new(&interner, &arena);

    ctx.push_cleanup_frame();
    ctx.record_rows_alloc("m", "m__rows");
    ctx.record_alloc("v");
    ctx.flush_cleanup_from(0, None);
    assert_eq!(ctx.take_output(), "mathc_free_rows(m, m__rows);\nfree(v);\n");

    // A returned row table is kept whole.
    ctx.flush_cleanup_from(0, Some("m"));
    assert_eq!(ctx.take_output(), "free(v);\n");

    let frame = ctx.pop_cleanup_frame();
    ctx.emit_frees(&frame);
    assert_eq!(ctx.take_output(), "mathc_free_rows(m, m__rows);\nfree(v);\n");
}

#[test]
fn test_loop_remembers_cleanup_depth() {
    let interner = StringInterner::new();
    let arena = ExprArena::new();
    let mut ctx = CodegenContext::new(&interner, &arena);
    ctx.push_cleanup_frame();
    let (a, b) = (ctx.fresh_label(), ctx.fresh_label());
    ctx.push_loop(b, a);
    ctx.push_cleanup_frame();
    assert_eq!(ctx.current_loop().unwrap().cleanup_depth, 1);
}

#[test]
fn test_diagnostics_are_collected() {
    let interner = StringInterner::new();
    let arena = ExprArena::new();
    let mut ctx = CodegenContext::new(&interner, &arena);
    ctx.soft(3, "unsupported iterator");
    ctx.structural(7, "missing condition");

    let diagnostics = ctx.take_diagnostics();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].severity, Severity::Soft);
    assert_eq!(diagnostics[1].to_string(), "error (line 7): missing condition");
    assert!(ctx.take_diagnostics().is_empty());
}
