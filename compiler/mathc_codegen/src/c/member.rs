//! Member Access Code Generation
//!
//! Handles `obj.field`, `obj.method(args)` and the growable-array methods
//! `add`, `remove` and `clear`.

use mathc_ir::ast::Expr;
use mathc_ir::{ExprId, ExprKind, ExprRange, Name, Type};

use crate::context::CodegenContext;

use super::call::emit_call_args;
use super::expr::emit_expr;

pub fn emit_member(
    ctx: &mut CodegenContext<'_>,
    expr: &Expr,
    object: ExprId,
    member: Name,
    args: Option<ExprRange>,
) -> Option<String> {
    let line = expr.line;
    let Some(target) = ctx.expr(object) else {
        ctx.structural(line, "member access without an object");
        return None;
    };
    let member = ctx.resolve_name(member);
    let args = args.map(|range| ctx.exprs(range));

    if let (Type::Array(_), ExprKind::Ident(array)) = (&target.ty, &target.kind) {
        let array = ctx.resolve_name(*array);
        match (member, args) {
            ("add", Some([value, ..])) => {
                let value = emit_expr(ctx, *value, line)?;
                return Some(format!(
                    "({array} = realloc({array}, sizeof(*{array}) * ({array}__len + 1)), \
                     {array}[{array}__len++] = {value})"
                ));
            }
            ("remove", Some([index, ..])) => {
                let i = emit_expr(ctx, *index, line)?;
                return Some(format!(
                    "mathc_remove_at({array}, &{array}__len, {i}, sizeof(*{array}))"
                ));
            }
            ("clear", _) => return Some(format!("{array}__len = 0")),
            _ => {}
        }
    }

    let obj = emit_expr(ctx, object, line)?;

    if let Type::Custom(type_name) = &target.ty {
        return match args {
            None if matches!(target.kind, ExprKind::Ident(_)) => Some(format!("{obj}->{member}")),
            None => Some(format!("{obj}.{member}")),
            Some(args) => {
                let type_name = ctx.resolve_name(*type_name);
                let args = emit_call_args(ctx, args, line)?;
                if args.is_empty() {
                    Some(format!("{type_name}_{member}({obj})"))
                } else {
                    Some(format!("{type_name}_{member}({obj}, {args})"))
                }
            }
        };
    }

    match args {
        None => Some(format!("{obj}->{member}")),
        Some(args) => {
            ctx.soft(
                line,
                format!("method `{member}` called on a value with no methods"),
            );
            let args = emit_call_args(ctx, args, line)?;
            Some(format!("{obj}->{member}({args})"))
        }
    }
}
