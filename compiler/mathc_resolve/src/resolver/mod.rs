//! The resolution pass.
//!
//! Scoping follows the lowered C: a function's parameters and its top-level
//! body share one scope, and every nested block opens another.

use tracing::{debug, trace};

use mathc_ir::{
    Builtin, Definition, ExprArena, ExprId, ExprKind, Function, Name, Program, StmtId, StmtKind,
    StmtRange, StringInterner, Type, TypeDef,
};
use mathc_stack::ensure_sufficient_stack;

use crate::{ResolveError, SymbolKind, SymbolTable};

/// Names every program can use without declaring them.
const PREDEFINED: &[&str] = &["PI", "E"];

/// Resolve every name in `program`.
///
/// Calls whose callee is an unshadowed builtin name get their `builtin` tag
/// set; calls to user functions get it cleared. Returns every problem found.
pub fn resolve_program(program: &mut Program, interner: &StringInterner) -> Vec<ResolveError> {
    let Program {
        arena,
        imports,
        definitions,
        main,
        ..
    } = program;

    let mut resolver = Resolver {
        arena,
        interner,
        table: SymbolTable::new(),
        errors: Vec::new(),
    };

    for import in imports.iter() {
        resolver.declare(import.module, Type::Undefined, SymbolKind::Constant, import.line);
    }
    for def in definitions.iter() {
        match def {
            Definition::Function(func) => resolver.declare_function(func),
            Definition::Type(ty) => {
                resolver.declare(ty.name, Type::Custom(ty.name), SymbolKind::Type, ty.line);
            }
        }
    }
    if let Some(main) = main.as_ref() {
        resolver.declare_function(main);
    }

    for def in definitions.iter() {
        match def {
            Definition::Function(func) => resolver.function(func, None),
            Definition::Type(ty) => resolver.type_def(ty),
        }
    }
    if let Some(main) = main.as_ref() {
        resolver.function(main, None);
    }

    debug!(errors = resolver.errors.len(), "name resolution finished");
    resolver.errors
}

struct Resolver<'a> {
    arena: &'a mut ExprArena,
    interner: &'a StringInterner,
    table: SymbolTable,
    errors: Vec<ResolveError>,
}

impl Resolver<'_> {
    fn declare(&mut self, name: Name, ty: Type, kind: SymbolKind, line: u32) {
        self.declare_with_params(name, ty, kind, line, Vec::new());
    }

    fn declare_with_params(
        &mut self,
        name: Name,
        ty: Type,
        kind: SymbolKind,
        line: u32,
        params: Vec<mathc_ir::Param>,
    ) {
        if let Some(existing) = self.table.lookup_current_scope(name) {
            self.errors.push(ResolveError::DuplicateDefinition {
                name: self.interner.lookup(name).to_string(),
                line,
                first_line: existing.line,
            });
            return;
        }
        self.table.insert(name, ty, kind, line, params);
    }

    fn declare_function(&mut self, func: &Function) {
        let ty = func.return_type.clone().unwrap_or(Type::Void);
        self.declare_with_params(
            func.name,
            ty,
            SymbolKind::Function,
            func.line,
            func.params.clone(),
        );
    }

    fn type_def(&mut self, def: &TypeDef) {
        for method in def.methods() {
            self.function(method, Some(def.name));
        }
    }

    /// Resolve a function body. `owner` is the record type of a method.
    fn function(&mut self, func: &Function, owner: Option<Name>) {
        trace!(function = self.interner.lookup(func.name), "resolving");
        self.table.enter_scope();
        if let Some(owner) = owner {
            let this = self.interner.intern("this");
            self.declare(this, Type::Custom(owner), SymbolKind::Parameter, func.line);
        }
        for param in &func.params {
            self.declare(param.name, param.ty.clone(), SymbolKind::Parameter, func.line);
        }
        self.stmts(func.body);
        self.table.leave_scope();
    }

    /// Resolve a nested block in a fresh scope.
    fn block(&mut self, block: StmtRange) {
        self.table.enter_scope();
        self.stmts(block);
        self.table.leave_scope();
    }

    fn stmts(&mut self, block: StmtRange) {
        let ids = self.arena.get_stmt_list(block).to_vec();
        for id in ids {
            self.stmt(id);
        }
    }

    fn stmt(&mut self, id: StmtId) {
        ensure_sufficient_stack(|| {
            let Some(stmt) = self.arena.try_get_stmt(id) else {
                return;
            };
            let (kind, line) = (stmt.kind.clone(), stmt.line);
            match kind {
                StmtKind::Decl {
                    ty,
                    name,
                    init,
                    is_const,
                } => {
                    if let Some(init) = init {
                        self.expr(init);
                    }
                    let kind = if is_const {
                        SymbolKind::Constant
                    } else {
                        SymbolKind::Variable
                    };
                    self.declare(name, ty, kind, line);
                }
                StmtKind::Assign { target, value, .. } => {
                    self.expr(target);
                    self.expr(value);
                }
                StmtKind::If {
                    cond,
                    then_block,
                    elifs,
                    else_block,
                } => {
                    self.expr(cond);
                    self.block(then_block);
                    self.stmts(elifs);
                    if let Some(block) = else_block {
                        self.block(block);
                    }
                }
                StmtKind::While { cond, body } => {
                    self.expr(cond);
                    self.block(body);
                }
                StmtKind::For {
                    iterator,
                    index_var,
                    iterable,
                    body,
                } => {
                    self.expr(iterable);
                    let elem = self.iteration_type(iterable);
                    self.table.enter_scope();
                    self.declare(iterator, elem, SymbolKind::Variable, line);
                    if let Some(index) = index_var {
                        self.declare(index, Type::Int, SymbolKind::Variable, line);
                    }
                    self.stmts(body);
                    self.table.leave_scope();
                }
                StmtKind::Return(value) => {
                    if let Some(value) = value {
                        self.expr(value);
                    }
                }
                StmtKind::Break | StmtKind::Continue => {}
                StmtKind::Expr(expr) => self.expr(expr),
                StmtKind::Try {
                    body,
                    catches,
                    finally,
                } => {
                    self.block(body);
                    let clauses = self.arena.get_catches(catches).to_vec();
                    for clause in clauses {
                        self.table.enter_scope();
                        if let Some(var) = clause.var_name {
                            let ty = clause.exception_type.clone().unwrap_or(Type::Undefined);
                            self.declare(var, ty, SymbolKind::Variable, clause.line);
                        }
                        self.stmts(clause.body);
                        self.table.leave_scope();
                    }
                    if let Some(block) = finally {
                        self.block(block);
                    }
                }
            }
        });
    }

    /// Type bound to a `for` iterator.
    fn iteration_type(&self, iterable: ExprId) -> Type {
        let Some(expr) = self.arena.try_get_expr(iterable) else {
            return Type::Undefined;
        };
        if let ExprKind::Call {
            builtin: Some(Builtin::Range),
            ..
        } = expr.kind
        {
            return Type::Int;
        }
        expr.ty.element().cloned().unwrap_or(Type::Int)
    }

    fn exprs(&mut self, ids: &[ExprId]) {
        for &id in ids {
            self.expr(id);
        }
    }

    fn expr(&mut self, id: ExprId) {
        ensure_sufficient_stack(|| {
            let Some(expr) = self.arena.try_get_expr(id) else {
                return;
            };
            let (kind, line) = (expr.kind.clone(), expr.line);
            match kind {
                ExprKind::Int(_)
                | ExprKind::Float(_)
                | ExprKind::Bool(_)
                | ExprKind::Complex(_)
                | ExprKind::Str(_)
                | ExprKind::Char(_) => {}
                ExprKind::Ident(name) => self.use_name(name, line),
                ExprKind::Binary { left, right, .. } => {
                    self.expr(left);
                    self.expr(right);
                }
                ExprKind::Unary { operand, .. } => self.expr(operand),
                ExprKind::Call { callee, args, .. } => {
                    self.call(id, callee, line);
                    let args = self.arena.get_expr_list(args).to_vec();
                    self.exprs(&args);
                }
                ExprKind::Index { array, index } => {
                    self.expr(array);
                    self.expr(index);
                }
                ExprKind::Member { object, args, .. } => {
                    self.expr(object);
                    if let Some(args) = args {
                        let args = self.arena.get_expr_list(args).to_vec();
                        self.exprs(&args);
                    }
                }
                ExprKind::ArrayLit(elems) | ExprKind::MatrixLit(elems) | ExprKind::SetLit(elems) => {
                    let elems = self.arena.get_expr_list(elems).to_vec();
                    self.exprs(&elems);
                }
            }
        });
    }

    /// Check an identifier that is read as a value.
    fn use_name(&mut self, name: Name, line: u32) {
        if self.table.lookup(name).is_some() {
            return;
        }
        let text = self.interner.lookup(name);
        if PREDEFINED.contains(&text) || Builtin::from_name(text).is_some() {
            return;
        }
        self.errors.push(ResolveError::Undefined {
            name: text.to_string(),
            line,
        });
    }

    /// Resolve a callee and set the call's builtin tag.
    fn call(&mut self, call: ExprId, callee: ExprId, line: u32) {
        let callee_name = match self.arena.try_get_expr(callee).map(|e| &e.kind) {
            Some(ExprKind::Ident(name)) => *name,
            Some(_) => {
                self.expr(callee);
                return;
            }
            None => return,
        };

        let tag = if self.table.lookup(callee_name).is_some() {
            None
        } else {
            let text = self.interner.lookup(callee_name);
            let builtin = Builtin::from_name(text);
            if builtin.is_none() {
                self.errors.push(ResolveError::Undefined {
                    name: text.to_string(),
                    line,
                });
            }
            builtin
        };

        if let ExprKind::Call { builtin, .. } = &mut self.arena.get_expr_mut(call).kind {
            *builtin = tag;
        }
    }
}

#[cfg(test)]
mod tests;
