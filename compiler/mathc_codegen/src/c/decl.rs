//! Declaration Code Generation
//!
//! Declarations are type-directed. Containers are materialized element by
//! element into a heap backing store and declared together with their
//! companions (`__len`, or `__rows`/`__cols` for matrices). Every heap
//! allocation made here is registered with the innermost cleanup frame.

use mathc_ir::ast::Expr;
use mathc_ir::{BinaryOp, ExprId, ExprKind, Name, Type};

use crate::context::CodegenContext;

use super::expr::emit_expr;
use super::types::CTypeMapper;

pub fn emit_decl(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    ty: &Type,
    name: Name,
    init: Option<ExprId>,
    is_const: bool,
) {
    let name = ctx.resolve_name(name);
    let init = match init {
        Some(id) => {
            if let Some(expr) = ctx.expr(id) {
                Some(Init { id, expr })
            } else {
                ctx.structural(line, format!("initializer of `{name}` is missing"));
                None
            }
        }
        None => None,
    };

    match ty {
        Type::Array(_) => emit_array_decl(ctx, line, ty, name, init),
        Type::Set(_) => emit_set_decl(ctx, line, ty, name, init),
        Type::Matrix(_) => emit_matrix_decl(ctx, line, ty, name, init),
        Type::Custom(type_name) => {
            let type_name = ctx.resolve_name(*type_name);
            match init.and_then(|init| emit_expr(ctx, init.id, line)) {
                Some(value) => ctx.writeln(&format!("{type_name}* {name} = {value};")),
                None => {
                    ctx.writeln(&format!(
                        "{type_name}* {name} = calloc(1, sizeof({type_name}));"
                    ));
                    ctx.record_alloc(name);
                }
            }
        }
        _ => {
            let c_type = CTypeMapper::map_type(ty, ctx.interner);
            let qualifier = if is_const { "const " } else { "" };
            match init.and_then(|init| emit_expr(ctx, init.id, line)) {
                Some(value) => ctx.writeln(&format!("{qualifier}{c_type} {name} = {value};")),
                None => ctx.writeln(&format!("{qualifier}{c_type} {name};")),
            }
        }
    }
}

#[derive(Copy, Clone)]
struct Init<'e> {
    id: ExprId,
    expr: &'e Expr,
}

impl Init<'_> {
    /// `src` when the initializer is an identifier of the same container
    /// kind, so its companions can be copied.
    fn source_name<'c>(self, ctx: &CodegenContext<'c>, same_kind: fn(&Type) -> bool) -> Option<&'c str> {
        match self.expr.kind {
            ExprKind::Ident(src) if same_kind(&self.expr.ty) => Some(ctx.resolve_name(src)),
            _ => None,
        }
    }
}

fn emit_array_decl(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    ty: &Type,
    name: &str,
    init: Option<Init<'_>>,
) {
    if let Some(Init {
        expr: Expr {
            kind: ExprKind::ArrayLit(elems) | ExprKind::SetLit(elems),
            ..
        },
        ..
    }) = init
    {
        let elems = ctx.exprs(*elems);
        if ty.is_nested_array() {
            emit_table_literal(ctx, line, ty, name, elems);
        } else {
            emit_list_literal(ctx, line, ty, name, elems);
        }
        return;
    }

    let len = init
        .and_then(|init| init.source_name(ctx, Type::is_array))
        .map_or_else(|| "0".to_string(), |src| format!("{src}__len"));
    emit_pointer_decl(ctx, line, ty, name, init);
    ctx.writeln(&format!("int {name}__len = {len};"));
}

fn emit_set_decl(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    ty: &Type,
    name: &str,
    init: Option<Init<'_>>,
) {
    let Some(init) = init else {
        emit_pointer_decl(ctx, line, ty, name, None);
        ctx.writeln(&format!("int {name}__len = 0;"));
        return;
    };

    match &init.expr.kind {
        ExprKind::SetLit(elems) | ExprKind::ArrayLit(elems) => {
            let elems = ctx.exprs(*elems);
            emit_list_literal(ctx, line, ty, name, elems);
        }
        ExprKind::Binary {
            op: BinaryOp::Add | BinaryOp::Sub,
            left,
            right,
        } if is_set_operand(ctx, *left) || is_set_operand(ctx, *right) => {
            let Some(value) = emit_expr(ctx, init.id, line) else {
                return;
            };
            let elem = CTypeMapper::element_type(ty, ctx.interner);
            let tmp = ctx.fresh_temp();
            ctx.writeln(&format!("set_result_t {tmp} = {value};"));
            ctx.writeln(&format!("{elem}* {name} = {tmp}.ptr;"));
            ctx.writeln(&format!("int {name}__len = {tmp}.len;"));
            ctx.record_alloc(name);
        }
        _ => {
            let len = init
                .source_name(ctx, Type::is_set)
                .map_or_else(|| "0".to_string(), |src| format!("{src}__len"));
            emit_pointer_decl(ctx, line, ty, name, Some(init));
            ctx.writeln(&format!("int {name}__len = {len};"));
        }
    }
}

fn is_set_operand(ctx: &CodegenContext<'_>, id: ExprId) -> bool {
    ctx.expr(id).is_some_and(|expr| expr.ty.is_set())
}

fn emit_matrix_decl(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    ty: &Type,
    name: &str,
    init: Option<Init<'_>>,
) {
    if let Some(Init {
        expr: Expr {
            kind: ExprKind::MatrixLit(rows) | ExprKind::ArrayLit(rows),
            ..
        },
        ..
    }) = init
    {
        let rows = ctx.exprs(*rows);
        emit_matrix_literal(ctx, line, ty, name, rows);
        return;
    }

    let (rows, cols) = match init.and_then(|init| init.source_name(ctx, Type::is_matrix)) {
        Some(src) => (format!("{src}__rows"), format!("{src}__cols")),
        None => ("0".to_string(), "0".to_string()),
    };
    emit_pointer_decl(ctx, line, ty, name, init);
    ctx.writeln(&format!("int {name}__rows = {rows};"));
    ctx.writeln(&format!("int {name}__cols = {cols};"));
}

/// `T* n = init;` (or `T** n`) without materializing anything.
fn emit_pointer_decl(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    ty: &Type,
    name: &str,
    init: Option<Init<'_>>,
) {
    let c_type = CTypeMapper::map_type(ty, ctx.interner);
    match init.and_then(|init| emit_expr(ctx, init.id, line)) {
        Some(value) => ctx.writeln(&format!("{c_type} {name} = {value};")),
        None => ctx.writeln(&format!("{c_type} {name};")),
    }
}

/// One-dimensional array or set literal.
fn emit_list_literal(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    ty: &Type,
    name: &str,
    elems: &[ExprId],
) {
    let elem = CTypeMapper::element_type(ty, ctx.interner);
    let n = elems.len();
    ctx.writeln(&format!("{elem}* {name} = malloc(sizeof({elem}) * {n});"));
    ctx.writeln(&format!("int {name}__len = {n};"));
    for (i, &id) in elems.iter().enumerate() {
        if let Some(value) = emit_expr(ctx, id, line) {
            ctx.writeln(&format!("{name}[{i}] = {value};"));
        }
    }
    ctx.record_alloc(name);
}

/// `array<array<T>>` literal: a row-pointer table with one allocation per
/// row.
fn emit_table_literal(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    ty: &Type,
    name: &str,
    rows: &[ExprId],
) {
    let row_type = CTypeMapper::element_type(ty, ctx.interner);
    let cell_type = ty.element().map_or_else(
        || "int".to_string(),
        |row| CTypeMapper::element_type(row, ctx.interner),
    );
    let n = rows.len();
    ctx.writeln(&format!("{row_type}* {name} = malloc(sizeof({row_type}) * {n});"));
    ctx.writeln(&format!("int {name}__len = {n};"));

    let mut literal_rows = Vec::with_capacity(n);
    for (r, &row) in rows.iter().enumerate() {
        match ctx.expr(row).map(|expr| &expr.kind) {
            Some(ExprKind::ArrayLit(cells)) => {
                let cells = ctx.exprs(*cells);
                ctx.writeln(&format!(
                    "{name}[{r}] = malloc(sizeof({cell_type}) * {});",
                    cells.len()
                ));
                literal_rows.push((r, cells));
            }
            _ => {
                if let Some(value) = emit_expr(ctx, row, line) {
                    ctx.writeln(&format!("{name}[{r}] = {value};"));
                }
            }
        }
    }
    let all_literal = literal_rows.len() == n;
    for (r, cells) in literal_rows {
        for (c, &cell) in cells.iter().enumerate() {
            if let Some(value) = emit_expr(ctx, cell, line) {
                ctx.writeln(&format!("{name}[{r}][{c}] = {value};"));
            }
        }
    }
    // Rows taken from other arrays still belong to them.
    if all_literal {
        ctx.record_rows_alloc(name, format!("{name}__len"));
    } else {
        ctx.record_alloc(name);
    }
}

/// Matrix literal: the row table, a label/goto loop allocating every row,
/// then the cells.
fn emit_matrix_literal(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    ty: &Type,
    name: &str,
    rows: &[ExprId],
) {
    let elem = CTypeMapper::element_type(ty, ctx.interner);
    let row_cells: Vec<Option<&[ExprId]>> = rows
        .iter()
        .map(|&row| match ctx.expr(row).map(|expr| &expr.kind) {
            Some(ExprKind::ArrayLit(cells)) => Some(ctx.exprs(*cells)),
            _ => None,
        })
        .collect();
    let n_rows = rows.len();
    let n_cols = row_cells.first().copied().flatten().map_or(0, <[ExprId]>::len);

    ctx.writeln(&format!("{elem}** {name} = malloc(sizeof({elem}*) * {n_rows});"));
    ctx.writeln(&format!("int {name}__rows = {n_rows};"));
    ctx.writeln(&format!("int {name}__cols = {n_cols};"));

    let k = ctx.fresh_temp_id();
    let start = ctx.fresh_label();
    let end = ctx.fresh_label();
    ctx.writeln(&format!("int _i{k} = 0;"));
    ctx.define_label(start);
    ctx.writeln(&format!("if (!(_i{k} < {n_rows})) goto {end};"));
    ctx.writeln(&format!("{name}[_i{k}] = malloc(sizeof({elem}) * {n_cols});"));
    ctx.writeln(&format!("_i{k}++;"));
    ctx.writeln(&format!("goto {start};"));
    ctx.define_label(end);

    for (r, cells) in row_cells.into_iter().enumerate() {
        let Some(cells) = cells else {
            ctx.soft(line, format!("row {r} of matrix `{name}` is not a literal"));
            continue;
        };
        if cells.len() != n_cols {
            ctx.soft(
                line,
                format!(
                    "row {r} of matrix `{name}` has {} cells, expected {n_cols}",
                    cells.len()
                ),
            );
        }
        for (c, &cell) in cells.iter().take(n_cols).enumerate() {
            if let Some(value) = emit_expr(ctx, cell, line) {
                ctx.writeln(&format!("{name}[{r}][{c}] = {value};"));
            }
        }
    }
    ctx.record_rows_alloc(name, format!("{name}__rows"));
}
