//! `for` Loop Code Generation
//!
//! Three iterable shapes lower to counted goto loops: `range(...)` calls,
//! array/set literals (materialized into a temporary backing store first)
//! and container identifiers. The loop body is a braced C block with its
//! own cleanup frame, so allocations made inside an iteration are freed
//! before the next one starts.

use mathc_ir::{Builtin, ExprId, ExprKind, Name, StmtRange, Type};

use crate::context::{CodegenContext, Label};

use super::call::emit_make_range;
use super::expr::{emit_expr, length_of};
use super::stmt::emit_block;
use super::types::CTypeMapper;

pub fn emit_for(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    iterator: Name,
    index_var: Option<Name>,
    iterable: ExprId,
    body: StmtRange,
) {
    let Some(source) = ctx.expr(iterable) else {
        ctx.structural(line, "for loop without an iterable");
        return;
    };
    let iterator = ctx.resolve_name(iterator);
    let index_var = index_var.map(|name| ctx.resolve_name(name));

    match &source.kind {
        ExprKind::Call {
            args,
            builtin: Some(Builtin::Range),
            ..
        } if (1..=3).contains(&args.len()) => {
            let args = ctx.exprs(*args);
            let Some(range) = emit_make_range(ctx, line, args) else {
                return;
            };

            // Each bound is evaluated once, inside `make_range`.
            let labels = LoopLabels::new(ctx);
            let k = ctx.fresh_temp_id();
            let cont = ctx.fresh_label();
            ctx.writeln(&format!("range_t _range{k} = {range};"));
            ctx.writeln(&format!("int _i{k} = _range{k}.start;"));
            ctx.define_label(labels.start);
            ctx.writeln(&format!(
                "if (!range_has_next(&_range{k}, _i{k})) goto {};",
                labels.end
            ));

            let mut bindings = vec![format!("int {iterator} = _i{k};")];
            if let Some(index) = index_var {
                bindings.push(format!(
                    "int {index} = (_i{k} - _range{k}.start) / _range{k}.step;"
                ));
            }
            emit_loop_body(ctx, line, labels, cont, &bindings, body);

            ctx.define_label(cont);
            ctx.writeln(&format!("_i{k} += _range{k}.step;"));
            ctx.writeln(&format!("goto {};", labels.start));
            ctx.define_label(labels.end);
        }
        ExprKind::ArrayLit(elems) | ExprKind::SetLit(elems) => {
            let elems = ctx.exprs(*elems);
            let elem = CTypeMapper::element_type(&source.ty, ctx.interner);
            let n = elems.len();

            let labels = LoopLabels::new(ctx);
            let k = ctx.fresh_temp_id();
            let cont = ctx.fresh_label();
            ctx.writeln(&format!("{elem}* _arr{k} = malloc(sizeof({elem}) * {n});"));
            for (i, &id) in elems.iter().enumerate() {
                if let Some(value) = emit_expr(ctx, id, line) {
                    ctx.writeln(&format!("_arr{k}[{i}] = {value};"));
                }
            }
            ctx.record_alloc(format!("_arr{k}"));
            ctx.writeln(&format!("int _i{k} = 0;"));
            ctx.define_label(labels.start);
            ctx.writeln(&format!("if (_i{k} >= {n}) goto {};", labels.end));

            let bindings = item_bindings(iterator, index_var, &elem, &format!("_arr{k}"), k);
            emit_counted_loop_tail(ctx, line, labels, cont, k, &bindings, body);
        }
        ExprKind::Ident(name) if source.ty.is_container() => {
            let name = ctx.resolve_name(*name);
            let item = match &source.ty {
                Type::Matrix(_) => format!("{}*", CTypeMapper::element_type(&source.ty, ctx.interner)),
                ty => CTypeMapper::element_type(ty, ctx.interner),
            };
            let len = length_of(ctx, iterable);

            let labels = LoopLabels::new(ctx);
            let k = ctx.fresh_temp_id();
            let cont = ctx.fresh_label();
            ctx.writeln(&format!("int _len{k} = {len};"));
            ctx.writeln(&format!("int _i{k} = 0;"));
            ctx.define_label(labels.start);
            ctx.writeln(&format!("if (_i{k} >= _len{k}) goto {};", labels.end));

            let bindings = item_bindings(iterator, index_var, &item, name, k);
            emit_counted_loop_tail(ctx, line, labels, cont, k, &bindings, body);
        }
        _ => {
            ctx.soft(line, format!("cannot iterate over this expression in `for {iterator}`"));
            ctx.writeln("/* unsupported iterator */");
        }
    }
}

#[derive(Copy, Clone)]
struct LoopLabels {
    start: Label,
    end: Label,
}

impl LoopLabels {
    fn new(ctx: &mut CodegenContext<'_>) -> Self {
        let start = ctx.fresh_label();
        let end = ctx.fresh_label();
        Self { start, end }
    }
}

fn item_bindings(
    iterator: &str,
    index_var: Option<&str>,
    item_type: &str,
    items: &str,
    k: u32,
) -> Vec<String> {
    let mut bindings = vec![format!("{item_type} {iterator} = {items}[_i{k}];")];
    if let Some(index) = index_var {
        bindings.push(format!("int {index} = _i{k};"));
    }
    bindings
}

/// Body, continue label, `_iK++` and the jump back.
fn emit_counted_loop_tail(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    labels: LoopLabels,
    cont: Label,
    k: u32,
    bindings: &[String],
    body: StmtRange,
) {
    emit_loop_body(ctx, line, labels, cont, bindings, body);
    ctx.define_label(cont);
    ctx.writeln(&format!("_i{k}++;"));
    ctx.writeln(&format!("goto {};", labels.start));
    ctx.define_label(labels.end);
}

/// The braced body: loop variable bindings, the statements, then the
/// frees of everything the iteration allocated.
fn emit_loop_body(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    labels: LoopLabels,
    cont: Label,
    bindings: &[String],
    body: StmtRange,
) {
    ctx.push_loop(labels.end, cont);
    ctx.writeln("{");
    ctx.indent();
    ctx.push_cleanup_frame();
    for binding in bindings {
        ctx.writeln(binding);
    }
    emit_block(ctx, body, line);
    let frees = ctx.pop_cleanup_frame();
    ctx.emit_frees(&frees);
    ctx.dedent();
    ctx.writeln("}");
    ctx.pop_loop();
}
