//! Call Code Generation
//!
//! Builtins dispatch on the `Builtin` tag the resolver left on the call,
//! never on the callee's text. Everything else is a plain C call with the
//! length companions of container arguments appended.

use mathc_ir::ast::Expr;
use mathc_ir::{Builtin, BuiltinKind, ExprId, ExprKind, ExprRange, Type};

use crate::context::CodegenContext;

use super::expr::{emit_expr, length_of};

pub fn emit_call(
    ctx: &mut CodegenContext<'_>,
    expr: &Expr,
    callee: ExprId,
    args: ExprRange,
    builtin: Option<Builtin>,
) -> Option<String> {
    let args = ctx.exprs(args);
    match builtin {
        Some(builtin) => emit_builtin(ctx, expr, builtin, args),
        None => {
            let callee = emit_expr(ctx, callee, expr.line)?;
            let args = emit_call_args(ctx, args, expr.line)?;
            Some(format!("{callee}({args})"))
        }
    }
}

/// Arguments of a user call. Containers travel with their companions:
/// `a, a__len` for arrays and sets, `m, m__rows, m__cols` for matrices.
pub fn emit_call_args(ctx: &mut CodegenContext<'_>, args: &[ExprId], line: u32) -> Option<String> {
    let mut out = Vec::with_capacity(args.len());
    for &arg in args {
        out.push(emit_expr(ctx, arg, line)?);
        if let Some(Expr {
            kind: ExprKind::Ident(name),
            ty,
            ..
        }) = ctx.expr(arg)
        {
            let name = ctx.resolve_name(*name);
            match ty {
                Type::Array(_) | Type::Set(_) => out.push(format!("{name}__len")),
                Type::Matrix(_) => {
                    out.push(format!("{name}__rows"));
                    out.push(format!("{name}__cols"));
                }
                _ => {}
            }
        }
    }
    Some(out.join(", "))
}

/// Arguments passed through unchanged.
fn emit_plain_args(ctx: &mut CodegenContext<'_>, args: &[ExprId], line: u32) -> Option<String> {
    let mut out = Vec::with_capacity(args.len());
    for &arg in args {
        out.push(emit_expr(ctx, arg, line)?);
    }
    Some(out.join(", "))
}

fn emit_builtin(
    ctx: &mut CodegenContext<'_>,
    expr: &Expr,
    builtin: Builtin,
    args: &[ExprId],
) -> Option<String> {
    let line = expr.line;
    let name = builtin.name();
    let first_ident = args.first().and_then(|&arg| ctx.ident_name(arg));

    match builtin.kind() {
        BuiltinKind::Length => Some(
            args.first()
                .map_or_else(|| "0".to_string(), |&arg| length_of(ctx, arg)),
        ),
        BuiltinKind::Input => Some(format!("mathc_input_{}()", input_suffix(&expr.ty))),
        BuiltinKind::Print { newline } => emit_print(ctx, line, args, newline),
        BuiltinKind::Reduction | BuiltinKind::InPlace | BuiltinKind::Cardinality => {
            Some(match first_ident {
                Some(array) => format!("mathc_{name}({array}, {array}__len)"),
                None => format!("mathc_{name}(NULL, 0)"),
            })
        }
        BuiltinKind::Pop => Some(match first_ident {
            Some(array) => format!("mathc_pop({array}, &{array}__len)"),
            None => "mathc_pop(NULL, &(int){0})".to_string(),
        }),
        BuiltinKind::Search => {
            let [_, value] = args else {
                ctx.soft(line, format!("`{name}` expects an array and a value"));
                return Some(format!("/* unsupported {name} call */"));
            };
            let value = emit_expr(ctx, *value, line)?;
            Some(match first_ident {
                Some(array) => format!("mathc_{name}({array}, {array}__len, {value})"),
                None => format!("mathc_{name}(NULL, 0, {value})"),
            })
        }
        BuiltinKind::Range => emit_make_range(ctx, line, args),
        BuiltinKind::Passthrough => {
            let args = emit_plain_args(ctx, args, line)?;
            Some(format!("{name}({args})"))
        }
        BuiltinKind::Runtime => {
            let args = emit_plain_args(ctx, args, line)?;
            Some(format!("mathc_{name}({args})"))
        }
    }
}

/// `range(n)`, `range(a, b)` and `range(a, b, step)` as a `range_t`.
pub fn emit_make_range(ctx: &mut CodegenContext<'_>, line: u32, args: &[ExprId]) -> Option<String> {
    let (start, end, step) = match args {
        [end] => ("0".to_string(), emit_expr(ctx, *end, line)?, "1".to_string()),
        [start, end] => (
            emit_expr(ctx, *start, line)?,
            emit_expr(ctx, *end, line)?,
            "1".to_string(),
        ),
        [start, end, step] => (
            emit_expr(ctx, *start, line)?,
            emit_expr(ctx, *end, line)?,
            emit_expr(ctx, *step, line)?,
        ),
        _ => {
            ctx.soft(line, format!("`range` takes 1 to 3 arguments, got {}", args.len()));
            ("0".to_string(), "0".to_string(), "1".to_string())
        }
    };
    Some(format!("make_range({start}, {end}, {step})"))
}

fn input_suffix(ty: &Type) -> &'static str {
    match ty {
        Type::Int => "int",
        Type::Float => "float",
        Type::Char => "char",
        _ => "string",
    }
}

fn emit_print(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    args: &[ExprId],
    newline: bool,
) -> Option<String> {
    let Some((last, init)) = args.split_last() else {
        return Some(if newline { "printf(\"\\n\")" } else { "((void)0)" }.to_string());
    };

    let mut calls = Vec::with_capacity(args.len());
    for &arg in init {
        calls.push(emit_print_one(ctx, line, arg, false)?);
    }
    calls.push(emit_print_one(ctx, line, *last, newline)?);

    if calls.len() == 1 {
        calls.pop()
    } else {
        Some(format!("({})", calls.join(", ")))
    }
}

fn emit_print_one(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    arg: ExprId,
    newline: bool,
) -> Option<String> {
    let value = emit_expr(ctx, arg, line)?;
    let expr = ctx.expr(arg)?;
    let prefix = if newline { "mathc_println" } else { "mathc_print" };

    let printer = match &expr.ty {
        Type::Int | Type::Bool => "int",
        Type::Float => "float",
        Type::String => "string",
        Type::Complex => "complex",
        Type::Char => "char",
        Type::Array(_) | Type::Set(_) => {
            let kind = if expr.ty.is_set() { "set" } else { "array" };
            let len = length_of(ctx, arg);
            return Some(format!("{prefix}_{kind}({value}, {len})"));
        }
        Type::Undefined => untyped_printer(&expr.kind),
        Type::Matrix(_) | Type::Custom(_) | Type::Graph | Type::Void => "int",
    };
    Some(format!("{prefix}_{printer}({value})"))
}

/// Without a resolved type, pick a printer from the literal's shape.
fn untyped_printer(kind: &ExprKind) -> &'static str {
    match kind {
        ExprKind::Int(_) | ExprKind::Bool(_) => "int",
        ExprKind::Str(_) => "string",
        ExprKind::Complex(_) => "complex",
        ExprKind::Char(_) => "char",
        _ => "float",
    }
}
