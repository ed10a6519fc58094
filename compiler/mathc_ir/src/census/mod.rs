//! Node census and tree teardown.
//!
//! Counts every node reachable from a root: expressions, statements, catch
//! clauses, functions, type definitions (each field counts as one more
//! declaration), imports and the program root itself. Absent children
//! (`INVALID` ids) contribute nothing.

use mathc_stack::ensure_sufficient_stack;
use tracing::debug;

use crate::ast::{ExprKind, Function, Program, StmtKind, TypeDef, TypeMember};
use crate::{ExprArena, ExprId, ExprRange, StmtId, StmtRange};

/// Count every node reachable from the program root, the root included.
pub fn count_program(program: &Program) -> usize {
    let arena = &program.arena;
    let mut count = 1 + program.imports.len();
    for func in program.functions() {
        count += count_function(arena, func);
    }
    for def in program.type_defs() {
        count += count_type_def(arena, def);
    }
    if let Some(main) = &program.main {
        count += count_function(arena, main);
    }
    count
}

/// Count a function node and its body.
pub fn count_function(arena: &ExprArena, func: &Function) -> usize {
    1 + count_block(arena, func.body)
}

fn count_type_def(arena: &ExprArena, def: &TypeDef) -> usize {
    1 + def
        .members
        .iter()
        .map(|member| match member {
            TypeMember::Field { .. } => 1,
            TypeMember::Method(func) => count_function(arena, func),
        })
        .sum::<usize>()
}

/// Count every statement of a block, recursively.
pub fn count_block(arena: &ExprArena, block: StmtRange) -> usize {
    arena
        .get_stmt_list(block)
        .iter()
        .map(|&stmt| count_stmt(arena, stmt))
        .sum()
}

fn count_exprs(arena: &ExprArena, range: ExprRange) -> usize {
    arena
        .get_expr_list(range)
        .iter()
        .map(|&expr| count_expr(arena, expr))
        .sum()
}

/// Count a statement and everything under it.
pub fn count_stmt(arena: &ExprArena, id: StmtId) -> usize {
    ensure_sufficient_stack(|| {
        let Some(stmt) = arena.try_get_stmt(id) else {
            return 0;
        };
        let children = match &stmt.kind {
            StmtKind::Decl { init, .. } => init.map_or(0, |init| count_expr(arena, init)),
            StmtKind::Assign { target, value, .. } => {
                count_expr(arena, *target) + count_expr(arena, *value)
            }
            StmtKind::If {
                cond,
                then_block,
                elifs,
                else_block,
            } => {
                count_expr(arena, *cond)
                    + count_block(arena, *then_block)
                    + count_block(arena, *elifs)
                    + else_block.map_or(0, |block| count_block(arena, block))
            }
            StmtKind::While { cond, body } => count_expr(arena, *cond) + count_block(arena, *body),
            StmtKind::For { iterable, body, .. } => {
                count_expr(arena, *iterable) + count_block(arena, *body)
            }
            StmtKind::Return(value) => value.map_or(0, |value| count_expr(arena, value)),
            StmtKind::Break | StmtKind::Continue => 0,
            StmtKind::Expr(expr) => count_expr(arena, *expr),
            StmtKind::Try {
                body,
                catches,
                finally,
            } => {
                let catches: usize = arena
                    .get_catches(*catches)
                    .iter()
                    .map(|clause| 1 + count_block(arena, clause.body))
                    .sum();
                count_block(arena, *body)
                    + catches
                    + finally.map_or(0, |block| count_block(arena, block))
            }
        };
        1 + children
    })
}

/// Count an expression and everything under it.
pub fn count_expr(arena: &ExprArena, id: ExprId) -> usize {
    ensure_sufficient_stack(|| {
        let Some(expr) = arena.try_get_expr(id) else {
            return 0;
        };
        let children = match &expr.kind {
            ExprKind::Int(_)
            | ExprKind::Float(_)
            | ExprKind::Bool(_)
            | ExprKind::Complex(_)
            | ExprKind::Str(_)
            | ExprKind::Char(_)
            | ExprKind::Ident(_) => 0,
            ExprKind::Binary { left, right, .. } => {
                count_expr(arena, *left) + count_expr(arena, *right)
            }
            ExprKind::Unary { operand, .. } => count_expr(arena, *operand),
            ExprKind::Call { callee, args, .. } => {
                count_expr(arena, *callee) + count_exprs(arena, *args)
            }
            ExprKind::Index { array, index } => {
                count_expr(arena, *array) + count_expr(arena, *index)
            }
            ExprKind::Member { object, args, .. } => {
                count_expr(arena, *object) + args.map_or(0, |args| count_exprs(arena, args))
            }
            ExprKind::ArrayLit(elems) | ExprKind::MatrixLit(elems) | ExprKind::SetLit(elems) => {
                count_exprs(arena, *elems)
            }
        };
        1 + children
    })
}

/// Release a whole program tree.
///
/// Takes the tree out of `root`, so a second call sees `None` and does
/// nothing. Returns how many nodes were released.
pub fn teardown(root: &mut Option<Program>) -> usize {
    let Some(program) = root.take() else {
        return 0;
    };
    let released = count_program(&program);
    drop(program);
    debug!(released, "program tree released");
    released
}

#[cfg(test)]
mod tests;
