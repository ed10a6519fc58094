//! Expression Code Generation
//!
//! Expressions lower to C text without touching the output buffer; only
//! statements write lines. `None` means the expression contributed nothing
//! because a required child was missing, and the diagnostic has already been
//! recorded.

use mathc_ir::ast::Expr;
use mathc_ir::{BinaryOp, ExprId, ExprKind, Type, UnaryOp};
use mathc_stack::ensure_sufficient_stack;

use crate::context::CodegenContext;

use super::call::emit_call;
use super::member::emit_member;

/// Emit C code for an expression. A missing child is reported against
/// `line`, the line of the node that required it.
pub fn emit_expr(ctx: &mut CodegenContext<'_>, id: ExprId, line: u32) -> Option<String> {
    let Some(expr) = ctx.expr(id) else {
        ctx.structural(line, "missing expression");
        return None;
    };
    ensure_sufficient_stack(|| emit_expr_inner(ctx, expr))
}

fn emit_expr_inner(ctx: &mut CodegenContext<'_>, expr: &Expr) -> Option<String> {
    let line = expr.line;
    match &expr.kind {
        ExprKind::Int(value) => Some(value.to_string()),
        ExprKind::Float(bits) => Some(float_literal(ExprKind::float_value(*bits))),
        ExprKind::Bool(value) => Some(if *value { "1" } else { "0" }.to_string()),
        ExprKind::Str(text) => Some(string_literal(ctx.resolve_name(*text))),
        ExprKind::Char(byte) => Some(char_literal(*byte)),
        ExprKind::Complex(text) => {
            let text = ctx.resolve_name(*text);
            match complex_parts(text) {
                Some((re, im)) => Some(format!(
                    "({} + {} * I)",
                    float_literal(re),
                    float_literal(im)
                )),
                None => {
                    ctx.soft(line, format!("malformed complex literal `{text}`"));
                    Some("/* malformed complex literal */".to_string())
                }
            }
        }
        ExprKind::Ident(name) => Some(ctx.resolve_name(*name).to_string()),
        ExprKind::Binary { op, left, right } => emit_binary(ctx, expr, *op, *left, *right),
        ExprKind::Unary { op, operand } => {
            let operand = emit_expr(ctx, *operand, line)?;
            Some(emit_unary_op(*op, &operand))
        }
        ExprKind::Call {
            callee,
            args,
            builtin,
        } => emit_call(ctx, expr, *callee, *args, *builtin),
        ExprKind::Index { array, index } => {
            let array = emit_expr(ctx, *array, line)?;
            let index = emit_expr(ctx, *index, line)?;
            Some(format!("{array}[{index}]"))
        }
        ExprKind::Member {
            object,
            member,
            args,
        } => emit_member(ctx, expr, *object, *member, *args),
        ExprKind::ArrayLit(_) => Some(literal_placeholder(ctx, line, "array")),
        ExprKind::MatrixLit(_) => Some(literal_placeholder(ctx, line, "matrix")),
        ExprKind::SetLit(_) => Some(literal_placeholder(ctx, line, "set")),
    }
}

/// Composite literals only lower inside declarations and `for` headers.
fn literal_placeholder(ctx: &mut CodegenContext<'_>, line: u32, what: &str) -> String {
    ctx.soft(line, format!("{what} literal used as an expression"));
    format!("/* {what} literal used as expression */")
}

/// The companion holding an identifier's element count: `x__len`, or
/// `x__rows` for a matrix. Anything else has no companion and counts as
/// empty.
pub fn length_of(ctx: &CodegenContext<'_>, id: ExprId) -> String {
    match ctx.expr(id) {
        Some(Expr {
            kind: ExprKind::Ident(name),
            ty,
            ..
        }) => {
            let name = ctx.resolve_name(*name);
            if ty.is_matrix() {
                format!("{name}__rows")
            } else {
                format!("{name}__len")
            }
        }
        _ => "0".to_string(),
    }
}

fn is_collection_ident(expr: &Expr) -> bool {
    matches!(expr.kind, ExprKind::Ident(_)) && (expr.ty.is_set() || expr.ty.is_array())
}

fn emit_binary(
    ctx: &mut CodegenContext<'_>,
    expr: &Expr,
    op: BinaryOp,
    left: ExprId,
    right: ExprId,
) -> Option<String> {
    let line = expr.line;
    let (Some(lhs), Some(rhs)) = (ctx.expr(left), ctx.expr(right)) else {
        ctx.structural(
            line,
            format!("operator `{}` is missing an operand", op.as_symbol()),
        );
        return None;
    };

    let on_sets = lhs.ty.is_set() || rhs.ty.is_set();
    if op == BinaryOp::In {
        return emit_membership(ctx, line, on_sets, (left, lhs), (right, rhs));
    }

    let l = emit_expr(ctx, left, line)?;
    let r = emit_expr(ctx, right, line)?;

    if on_sets {
        let helper = match op {
            BinaryOp::Add => "set_union",
            BinaryOp::Sub => "set_difference",
            _ => {
                ctx.soft(
                    line,
                    format!("operator `{}` is not supported on sets", op.as_symbol()),
                );
                return Some("/* unsupported set operation */".to_string());
            }
        };
        let (l_len, r_len) = (length_of(ctx, left), length_of(ctx, right));
        return Some(format!("{helper}({l}, {l_len}, {r}, {r_len})"));
    }

    Some(match op {
        BinaryOp::Power if expr.ty == Type::Complex => format!("cpow({l}, {r})"),
        BinaryOp::Power => format!("pow({l}, {r})"),
        BinaryOp::FloorDiv => format!("mathc_floor_div({l}, {r})"),
        BinaryOp::MatMul => format!("({l} * {r})"),
        _ => format!("({l} {} {r})", op.as_symbol()),
    })
}

/// `x in s` and `a in b`.
fn emit_membership(
    ctx: &mut CodegenContext<'_>,
    line: u32,
    on_sets: bool,
    (left, lhs): (ExprId, &Expr),
    (right, rhs): (ExprId, &Expr),
) -> Option<String> {
    let subset = on_sets && is_collection_ident(lhs);
    let contains = on_sets || (rhs.ty.is_array() && matches!(rhs.kind, ExprKind::Ident(_)));
    if !subset && !contains {
        ctx.soft(line, "`in` needs a set or array identifier on the right");
        return Some("/* unsupported 'in' operand */".to_string());
    }

    let l = emit_expr(ctx, left, line)?;
    let r = emit_expr(ctx, right, line)?;
    let r_len = length_of(ctx, right);
    if subset {
        let l_len = length_of(ctx, left);
        Some(format!("set_is_subset({l}, {l_len}, {r}, {r_len})"))
    } else {
        Some(format!("set_contains({r}, {r_len}, {l})"))
    }
}

fn emit_unary_op(op: UnaryOp, operand: &str) -> String {
    if op.is_postfix() {
        format!("({operand}{})", op.as_symbol())
    } else {
        format!("({}{operand})", op.as_symbol())
    }
}

/// A C double literal that reads back to the same value and always contains
/// a `.` or an exponent.
pub fn float_literal(value: f64) -> String {
    if value.is_nan() {
        "NAN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "INFINITY" } else { "(-INFINITY)" }.to_string()
    } else {
        format!("{value:?}")
    }
}

/// Quote and escape a string for C.
pub fn string_literal(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for byte in s.bytes() {
        match byte {
            b'"' => result.push_str("\\\""),
            b'\\' => result.push_str("\\\\"),
            b'\n' => result.push_str("\\n"),
            b'\t' => result.push_str("\\t"),
            b'\r' => result.push_str("\\r"),
            32..=126 => result.push(char::from(byte)),
            _ => result.push_str(&format!("\\{byte:03o}")),
        }
    }
    result.push('"');
    result
}

/// A C character constant.
pub fn char_literal(byte: u8) -> String {
    match byte {
        b'\n' => "'\\n'".to_string(),
        b'\t' => "'\\t'".to_string(),
        b'\r' => "'\\r'".to_string(),
        b'\\' => "'\\\\'".to_string(),
        b'\'' => "'\\''".to_string(),
        b'"' => "'\\\"'".to_string(),
        32..=126 => format!("'{}'", char::from(byte)),
        _ => format!("'\\{byte:03o}'"),
    }
}

/// Split complex literal text such as `3+4i`, `-2.5e-3-1i` or `-i` into
/// its real and imaginary parts.
pub fn complex_parts(text: &str) -> Option<(f64, f64)> {
    let text = text.trim();
    let Some(body) = text.strip_suffix(|c: char| c == 'i' || c == 'j') else {
        return Some((text.parse().ok()?, 0.0));
    };

    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&k| matches!(bytes[k], b'+' | b'-') && !matches!(bytes[k - 1], b'e' | b'E'));

    match split {
        Some(k) => Some((body[..k].parse().ok()?, imaginary_coefficient(&body[k..])?)),
        None => Some((0.0, imaginary_coefficient(body)?)),
    }
}

fn imaginary_coefficient(s: &str) -> Option<f64> {
    match s {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        _ => s.parse().ok(),
    }
}
