//! Function Code Generation
//!
//! Signatures, prototypes and bodies of procedures and record methods.

use mathc_ir::ast::StmtKind;
use mathc_ir::{Function, Name, Param, Type};
use tracing::debug;

use crate::context::{CodegenContext, CurrentFunction};

use super::stmt::emit_block;
use super::types::CTypeMapper;

/// A function's C name: `name`, or `Type_name` for a method.
pub fn c_name(ctx: &CodegenContext<'_>, func: &Function, owner: Option<Name>) -> String {
    let name = ctx.resolve_name(func.name);
    match owner {
        Some(owner) => format!("{}_{name}", ctx.resolve_name(owner)),
        None => name.to_string(),
    }
}

pub fn is_main(ctx: &CodegenContext<'_>, func: &Function, owner: Option<Name>) -> bool {
    owner.is_none() && ctx.resolve_name(func.name) == "main"
}

/// C return type, `None` for `void`.
fn return_type(ctx: &CodegenContext<'_>, func: &Function, owner: Option<Name>) -> Option<String> {
    if is_main(ctx, func, owner) {
        return Some("int".to_string());
    }
    match &func.return_type {
        None | Some(Type::Void) => None,
        Some(ty) => Some(CTypeMapper::value_type(ty, ctx.interner)),
    }
}

/// A parameter with its companions.
fn param_decl(ctx: &CodegenContext<'_>, param: &Param) -> String {
    let name = ctx.resolve_name(param.name);
    let c_type = CTypeMapper::value_type(&param.ty, ctx.interner);
    match &param.ty {
        Type::Array(_) | Type::Set(_) => format!("{c_type} {name}, int {name}__len"),
        Type::Matrix(_) => format!("{c_type} {name}, int {name}__rows, int {name}__cols"),
        _ => format!("{c_type} {name}"),
    }
}

/// `R name(params)`, without a trailing `;` or body.
pub fn signature(ctx: &CodegenContext<'_>, func: &Function, owner: Option<Name>) -> String {
    let ret = return_type(ctx, func, owner).unwrap_or_else(|| "void".to_string());
    let name = c_name(ctx, func, owner);

    let mut params = Vec::with_capacity(func.params.len() + 1);
    if let Some(owner) = owner {
        params.push(format!("{}* this", ctx.resolve_name(owner)));
    }
    params.extend(func.params.iter().map(|param| param_decl(ctx, param)));

    if params.is_empty() {
        format!("{ret} {name}(void)")
    } else {
        format!("{ret} {name}({})", params.join(", "))
    }
}

/// Emit a prototype.
pub fn emit_prototype(ctx: &mut CodegenContext<'_>, func: &Function, owner: Option<Name>) {
    let signature = signature(ctx, func, owner);
    ctx.writeln(&format!("{signature};"));
}

/// True if control cannot fall off the end of `func`'s body.
fn ends_with_return(ctx: &CodegenContext<'_>, func: &Function) -> bool {
    ctx.block(func.body)
        .last()
        .and_then(|&id| ctx.stmt(id))
        .is_some_and(|stmt| matches!(stmt.kind, StmtKind::Return(_)))
}

/// Emit a complete function definition. Allocations still owned by the
/// function frame are freed at the natural end of the body.
pub fn emit_function(ctx: &mut CodegenContext<'_>, func: &Function, owner: Option<Name>) {
    let name = c_name(ctx, func, owner);
    let main = is_main(ctx, func, owner);
    debug!(function = %name, params = func.params.len(), "lowering function");

    let signature = signature(ctx, func, owner);
    ctx.writeln(&format!("{signature} {{"));
    ctx.indent();

    ctx.begin_function(CurrentFunction {
        name,
        is_main: main,
        return_type: return_type(ctx, func, owner),
    });
    ctx.push_cleanup_frame();
    emit_block(ctx, func.body, func.line);
    let frees = ctx.pop_cleanup_frame();
    if !ends_with_return(ctx, func) {
        ctx.emit_frees(&frees);
        if main {
            ctx.writeln("return 0;");
        }
    }
    ctx.end_function();

    ctx.dedent();
    ctx.writeln("}");
    ctx.newline();
}
