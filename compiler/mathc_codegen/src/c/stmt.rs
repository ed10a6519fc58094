//! Statement Code Generation
//!
//! Structured control flow is flattened here: every `if`, `while` and `try`
//! becomes a sequence of labels and `goto`s.

use mathc_ir::ast::{Stmt, StmtKind};
use mathc_ir::{AssignOp, ExprId, StmtId, StmtRange};
use mathc_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::context::CodegenContext;

use super::decl::emit_decl;
use super::expr::emit_expr;
use super::for_loop::emit_for;

/// Emit C code for a statement range. `line` is the line of the construct
/// owning the block.
pub fn emit_block(ctx: &mut CodegenContext<'_>, range: StmtRange, line: u32) {
    for &id in ctx.block(range) {
        emit_stmt(ctx, id, line);
    }
}

/// Emit a nested block inside braces with its own cleanup frame, so
/// allocations made inside it are freed when control falls out of it.
pub fn emit_scoped_block(ctx: &mut CodegenContext<'_>, range: StmtRange, line: u32) {
    ctx.writeln("{");
    ctx.indent();
    ctx.push_cleanup_frame();
    emit_block(ctx, range, line);
    let frees = ctx.pop_cleanup_frame();
    ctx.emit_frees(&frees);
    ctx.dedent();
    ctx.writeln("}");
}

/// Emit C code for a single statement.
pub fn emit_stmt(ctx: &mut CodegenContext<'_>, id: StmtId, line: u32) {
    let Some(stmt) = ctx.stmt(id) else {
        ctx.structural(line, "missing statement");
        return;
    };
    ensure_sufficient_stack(|| emit_stmt_inner(ctx, stmt));
}

fn emit_stmt_inner(ctx: &mut CodegenContext<'_>, stmt: &Stmt) {
    let line = stmt.line;
    trace!(line, kind = kind_name(&stmt.kind), "lowering statement");

    match &stmt.kind {
        StmtKind::Decl {
            ty,
            name,
            init,
            is_const,
        } => emit_decl(ctx, line, ty, *name, *init, *is_const),
        StmtKind::Assign { target, op, value } => emit_assign(ctx, line, *target, *op, *value),
        StmtKind::If {
            cond,
            then_block,
            elifs,
            else_block,
        } => {
            let elifs = ctx.block(*elifs);
            emit_if(ctx, line, *cond, *then_block, elifs, *else_block);
        }
        StmtKind::While { cond, body } => emit_while(ctx, line, *cond, *body),
        StmtKind::For {
            iterator,
            index_var,
            iterable,
            body,
        } => emit_for(ctx, line, *iterator, *index_var, *iterable, *body),
        StmtKind::Return(value) => emit_return(ctx, line, *value),
        StmtKind::Break => emit_jump(ctx, line, Jump::Break),
        StmtKind::Continue => emit_jump(ctx, line, Jump::Continue),
        StmtKind::Expr(expr) => {
            if let Some(text) = emit_expr(ctx, *expr, line) {
                ctx.writeln(&format!("{text};"));
            }
        }
        StmtKind::Try {
            body,
            catches,
            finally,
        } => {
            let try_end = ctx.fresh_label();
            let catch_start = ctx.fresh_label();
            let finally_start = ctx.fresh_label();
            let try_finally_end = ctx.fresh_label();

            emit_scoped_block(ctx, *body, line);
            ctx.writeln(&format!("goto {try_end};"));
            ctx.define_label(catch_start);
            for clause in ctx.catches(*catches) {
                emit_scoped_block(ctx, clause.body, clause.line);
            }
            ctx.writeln(&format!("goto {finally_start};"));
            ctx.define_label(finally_start);
            if let Some(finally) = finally {
                emit_scoped_block(ctx, *finally, line);
            }
            ctx.define_label(try_finally_end);
            ctx.define_label(try_end);
        }
    }
}

fn kind_name(kind: &StmtKind) -> &'static str {
    match kind {
        StmtKind::Decl { .. } => "decl",
        StmtKind::Assign { .. } => "assign",
        StmtKind::If { .. } => "if",
        StmtKind::While { .. } => "while",
        StmtKind::For { .. } => "for",
        StmtKind::Return(_) => "return",
        StmtKind::Break => "break",
        StmtKind::Continue => "continue",
        StmtKind::Expr(_) => "expr",
        StmtKind::Try { .. } => "try",
    }
}

fn emit_assign(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    target: ExprId,
    op: AssignOp,
    value: ExprId,
) {
    let Some(target) = emit_expr(ctx, target, line) else {
        return;
    };
    let Some(value) = emit_expr(ctx, value, line) else {
        return;
    };
    match op.binary_symbol() {
        None => ctx.writeln(&format!("{target} = {value};")),
        Some(symbol) => ctx.writeln(&format!("{target} = {target} {symbol} {value};")),
    }
}

/// `if`, with its `elif` chain lowered as further conditionals behind the
/// else label.
fn emit_if(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    cond: ExprId,
    then_block: StmtRange,
    elifs: &[StmtId],
    else_block: Option<StmtRange>,
) {
    let Some(cond) = emit_expr(ctx, cond, line) else {
        return;
    };
    let else_label = ctx.fresh_label();
    let end_label = ctx.fresh_label();

    ctx.writeln(&format!("if (!({cond})) goto {else_label};"));
    emit_scoped_block(ctx, then_block, line);

    if elifs.is_empty() && else_block.is_none() {
        ctx.define_label(else_label);
        return;
    }

    ctx.writeln(&format!("goto {end_label};"));
    ctx.define_label(else_label);
    match elifs.split_first() {
        Some((&first, rest)) => emit_elif(ctx, line, first, rest, else_block),
        None => {
            if let Some(else_block) = else_block {
                emit_scoped_block(ctx, else_block, line);
            }
        }
    }
    ctx.define_label(end_label);
}

fn emit_elif(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    elif: StmtId,
    rest: &[StmtId],
    else_block: Option<StmtRange>,
) {
    match ctx.stmt(elif) {
        Some(Stmt {
            kind:
                StmtKind::If {
                    cond, then_block, ..
                },
            line,
        }) => emit_if(ctx, *line, *cond, *then_block, rest, else_block),
        Some(stmt) => ctx.structural(stmt.line, "elif branch is not a conditional"),
        None => ctx.structural(line, "missing elif branch"),
    }
}

fn emit_while(ctx: &mut CodegenContext<'_>, line: u32, cond: ExprId, body: StmtRange) {
    let Some(cond) = emit_expr(ctx, cond, line) else {
        return;
    };
    let start = ctx.fresh_label();
    let end = ctx.fresh_label();

    ctx.define_label(start);
    ctx.writeln(&format!("if (!({cond})) goto {end};"));
    // The loop is entered before the body frame opens, so `break` and
    // `continue` flush it.
    ctx.push_loop(end, start);
    emit_scoped_block(ctx, body, line);
    ctx.pop_loop();
    ctx.writeln(&format!("goto {start};"));
    ctx.define_label(end);
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Jump {
    Break,
    Continue,
}

/// `break`/`continue` leave the innermost loop's cleanup frames first.
fn emit_jump(ctx: &mut CodegenContext<'_>, line: u32, jump: Jump) {
    let keyword = match jump {
        Jump::Break => "break",
        Jump::Continue => "continue",
    };
    let Some(target) = ctx.current_loop() else {
        ctx.soft(line, format!("`{keyword}` outside a loop"));
        ctx.writeln(&format!("/* {keyword} outside loop */"));
        return;
    };

    ctx.flush_cleanup_from(target.cleanup_depth, None);
    let label = match jump {
        Jump::Break => target.end,
        Jump::Continue => target.cont,
    };
    ctx.writeln(&format!("goto {label};"));
}

/// Every `return` frees whatever the enclosing frames still own. A value
/// that is not a bare identifier is computed into a temporary first, since
/// it may read from memory about to be freed.
fn emit_return(ctx: &mut CodegenContext<'_>, line: u32, value: Option<ExprId>) {
    let (is_main, return_type) = match ctx.current_function() {
        Some(function) => (function.is_main, function.return_type.clone()),
        None => (false, None),
    };

    let Some(value) = value else {
        ctx.flush_cleanup_from(0, None);
        ctx.writeln(if is_main { "return 0;" } else { "return;" });
        return;
    };
    let Some(text) = emit_expr(ctx, value, line) else {
        return;
    };

    if !ctx.has_pending_frees() {
        ctx.writeln(&format!("return {text};"));
        return;
    }

    if let Some(name) = ctx.ident_name(value) {
        ctx.flush_cleanup_from(0, Some(name));
        ctx.writeln(&format!("return {name};"));
        return;
    }

    match return_type {
        Some(return_type) => {
            let tmp = ctx.fresh_temp();
            ctx.writeln(&format!("{return_type} {tmp} = {text};"));
            ctx.flush_cleanup_from(0, None);
            ctx.writeln(&format!("return {tmp};"));
        }
        None => {
            ctx.writeln(&format!("{text};"));
            ctx.flush_cleanup_from(0, None);
            ctx.writeln("return;");
        }
    }
}
