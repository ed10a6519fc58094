//! Program tree construction.
//!
//! One constructor per source construct. Children are always allocated
//! before the parent that links them, so every ID a constructor receives
//! already refers to a finished node.

use crate::ast::{
    AssignOp, BinaryOp, CatchClause, Definition, Expr, ExprKind, Function, Import, Param,
    Program, Stmt, StmtKind, TypeDef, TypeMember, UnaryOp,
};
use crate::{Builtin, ExprId, Name, StmtId, StmtRange, StringInterner, Type};

/// Builds a `Program` and its arena.
pub struct ProgramBuilder<'a> {
    interner: &'a StringInterner,
    program: Program,
    line: u32,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        Self {
            interner,
            program: Program {
                line: 1,
                ..Program::default()
            },
            line: 1,
        }
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    /// Set the source line recorded on subsequently built nodes.
    pub fn at(&mut self, line: u32) -> &mut Self {
        self.line = line;
        self
    }

    pub fn name(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    fn expr(&mut self, kind: ExprKind, ty: Type) -> ExprId {
        let line = self.line;
        self.program.arena.alloc_expr(Expr::new(kind, ty, line))
    }

    fn stmt(&mut self, kind: StmtKind) -> StmtId {
        let line = self.line;
        self.program.arena.alloc_stmt(Stmt { kind, line })
    }

    fn block(&mut self, stmts: impl IntoIterator<Item = StmtId>) -> StmtRange {
        self.program.arena.alloc_stmt_list(stmts)
    }

    // ===== Literals =====

    pub fn int(&mut self, value: i64) -> ExprId {
        self.expr(ExprKind::Int(value), Type::Int)
    }

    pub fn float(&mut self, value: f64) -> ExprId {
        self.expr(ExprKind::Float(value.to_bits()), Type::Float)
    }

    pub fn bool(&mut self, value: bool) -> ExprId {
        self.expr(ExprKind::Bool(value), Type::Bool)
    }

    pub fn complex(&mut self, text: &str) -> ExprId {
        let name = self.name(text);
        self.expr(ExprKind::Complex(name), Type::Complex)
    }

    pub fn string(&mut self, text: &str) -> ExprId {
        let name = self.name(text);
        self.expr(ExprKind::Str(name), Type::String)
    }

    pub fn char(&mut self, value: u8) -> ExprId {
        self.expr(ExprKind::Char(value), Type::Char)
    }

    // ===== Expressions =====

    pub fn ident(&mut self, name: &str, ty: Type) -> ExprId {
        let name = self.name(name);
        self.expr(ExprKind::Ident(name), ty)
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId, ty: Type) -> ExprId {
        self.expr(ExprKind::Binary { op, left, right }, ty)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId, ty: Type) -> ExprId {
        self.expr(ExprKind::Unary { op, operand }, ty)
    }

    /// Call by name. Builtin identity is left for resolution to decide.
    pub fn call(&mut self, name: &str, args: impl IntoIterator<Item = ExprId>, ty: Type) -> ExprId {
        let callee = self.ident(name, Type::Undefined);
        let args = self.program.arena.alloc_expr_list(args);
        self.expr(
            ExprKind::Call {
                callee,
                args,
                builtin: None,
            },
            ty,
        )
    }

    /// Call to a builtin whose identity is already known.
    pub fn builtin_call(
        &mut self,
        builtin: Builtin,
        args: impl IntoIterator<Item = ExprId>,
        ty: Type,
    ) -> ExprId {
        let callee = self.ident(builtin.name(), Type::Undefined);
        let args = self.program.arena.alloc_expr_list(args);
        self.expr(
            ExprKind::Call {
                callee,
                args,
                builtin: Some(builtin),
            },
            ty,
        )
    }

    pub fn index(&mut self, array: ExprId, index: ExprId, ty: Type) -> ExprId {
        self.expr(ExprKind::Index { array, index }, ty)
    }

    /// `object.member`
    pub fn get_field(&mut self, object: ExprId, member: &str, ty: Type) -> ExprId {
        let member = self.name(member);
        self.expr(
            ExprKind::Member {
                object,
                member,
                args: None,
            },
            ty,
        )
    }

    /// `object.member(args)`
    pub fn call_method(
        &mut self,
        object: ExprId,
        member: &str,
        args: impl IntoIterator<Item = ExprId>,
        ty: Type,
    ) -> ExprId {
        let member = self.name(member);
        let args = self.program.arena.alloc_expr_list(args);
        self.expr(
            ExprKind::Member {
                object,
                member,
                args: Some(args),
            },
            ty,
        )
    }

    pub fn array_lit(&mut self, elems: impl IntoIterator<Item = ExprId>, elem_ty: Type) -> ExprId {
        let elems = self.program.arena.alloc_expr_list(elems);
        self.expr(ExprKind::ArrayLit(elems), Type::array(elem_ty))
    }

    /// Matrix literal; each row should be an array literal.
    pub fn matrix_lit(&mut self, rows: impl IntoIterator<Item = ExprId>, elem_ty: Type) -> ExprId {
        let rows = self.program.arena.alloc_expr_list(rows);
        self.expr(ExprKind::MatrixLit(rows), Type::matrix(elem_ty))
    }

    pub fn set_lit(&mut self, elems: impl IntoIterator<Item = ExprId>, elem_ty: Type) -> ExprId {
        let elems = self.program.arena.alloc_expr_list(elems);
        self.expr(ExprKind::SetLit(elems), Type::set(elem_ty))
    }

    // ===== Statements =====

    pub fn decl(&mut self, ty: Type, name: &str, init: Option<ExprId>) -> StmtId {
        let name = self.name(name);
        self.stmt(StmtKind::Decl {
            ty,
            name,
            init,
            is_const: false,
        })
    }

    pub fn const_decl(&mut self, ty: Type, name: &str, init: ExprId) -> StmtId {
        let name = self.name(name);
        self.stmt(StmtKind::Decl {
            ty,
            name,
            init: Some(init),
            is_const: true,
        })
    }

    pub fn assign(&mut self, target: ExprId, value: ExprId) -> StmtId {
        self.compound_assign(target, AssignOp::Assign, value)
    }

    pub fn compound_assign(&mut self, target: ExprId, op: AssignOp, value: ExprId) -> StmtId {
        self.stmt(StmtKind::Assign { target, op, value })
    }

    pub fn if_stmt(&mut self, cond: ExprId, then: impl IntoIterator<Item = StmtId>) -> StmtId {
        self.if_chain(cond, then, Vec::new(), None)
    }

    pub fn if_else(
        &mut self,
        cond: ExprId,
        then: impl IntoIterator<Item = StmtId>,
        otherwise: impl IntoIterator<Item = StmtId>,
    ) -> StmtId {
        let otherwise: Vec<StmtId> = otherwise.into_iter().collect();
        self.if_chain(cond, then, Vec::new(), Some(otherwise))
    }

    /// `if` with `elif` branches and an optional `else`.
    pub fn if_chain(
        &mut self,
        cond: ExprId,
        then: impl IntoIterator<Item = StmtId>,
        elifs: Vec<(ExprId, Vec<StmtId>)>,
        otherwise: Option<Vec<StmtId>>,
    ) -> StmtId {
        let then_block = self.block(then);
        let elif_stmts: Vec<StmtId> = elifs
            .into_iter()
            .map(|(elif_cond, body)| {
                let body = self.block(body);
                self.stmt(StmtKind::If {
                    cond: elif_cond,
                    then_block: body,
                    elifs: StmtRange::EMPTY,
                    else_block: None,
                })
            })
            .collect();
        let elifs = self.block(elif_stmts);
        let else_block = otherwise.map(|stmts| self.block(stmts));
        self.stmt(StmtKind::If {
            cond,
            then_block,
            elifs,
            else_block,
        })
    }

    pub fn while_stmt(&mut self, cond: ExprId, body: impl IntoIterator<Item = StmtId>) -> StmtId {
        let body = self.block(body);
        self.stmt(StmtKind::While { cond, body })
    }

    pub fn for_stmt(
        &mut self,
        iterator: &str,
        index_var: Option<&str>,
        iterable: ExprId,
        body: impl IntoIterator<Item = StmtId>,
    ) -> StmtId {
        let iterator = self.name(iterator);
        let index_var = index_var.map(|n| self.name(n));
        let body = self.block(body);
        self.stmt(StmtKind::For {
            iterator,
            index_var,
            iterable,
            body,
        })
    }

    pub fn ret(&mut self, value: Option<ExprId>) -> StmtId {
        self.stmt(StmtKind::Return(value))
    }

    pub fn brk(&mut self) -> StmtId {
        self.stmt(StmtKind::Break)
    }

    pub fn cont(&mut self) -> StmtId {
        self.stmt(StmtKind::Continue)
    }

    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.stmt(StmtKind::Expr(expr))
    }

    pub fn catch_clause(
        &mut self,
        exception_type: Option<Type>,
        var_name: Option<&str>,
        body: impl IntoIterator<Item = StmtId>,
    ) -> CatchClause {
        let var_name = var_name.map(|n| self.name(n));
        let body = self.block(body);
        CatchClause {
            exception_type,
            var_name,
            body,
            line: self.line,
        }
    }

    pub fn try_stmt(
        &mut self,
        body: impl IntoIterator<Item = StmtId>,
        catches: Vec<CatchClause>,
        finally: Option<Vec<StmtId>>,
    ) -> StmtId {
        let body = self.block(body);
        let catches = self.program.arena.alloc_catches(catches);
        let finally = finally.map(|stmts| self.block(stmts));
        self.stmt(StmtKind::Try {
            body,
            catches,
            finally,
        })
    }

    // ===== Items =====

    pub fn param(&self, ty: Type, name: &str) -> Param {
        Param {
            ty,
            name: self.name(name),
        }
    }

    pub fn function(
        &mut self,
        name: &str,
        params: Vec<Param>,
        return_type: Option<Type>,
        body: impl IntoIterator<Item = StmtId>,
    ) -> Function {
        let body = self.block(body);
        Function {
            name: self.name(name),
            params,
            return_type,
            body,
            line: self.line,
        }
    }

    pub fn record_field(&self, ty: Type, name: &str) -> TypeMember {
        TypeMember::Field {
            ty,
            name: self.name(name),
            line: self.line,
        }
    }

    pub fn type_def(&self, name: &str, members: Vec<TypeMember>) -> TypeDef {
        TypeDef {
            name: self.name(name),
            members,
            line: self.line,
        }
    }

    pub fn add_import(&mut self, module: &str) -> &mut Self {
        let module = self.name(module);
        let line = self.line;
        self.program.imports.push(Import { module, line });
        self
    }

    pub fn add_function(&mut self, func: Function) -> &mut Self {
        self.program.definitions.push(Definition::Function(func));
        self
    }

    pub fn add_type(&mut self, def: TypeDef) -> &mut Self {
        self.program.definitions.push(Definition::Type(def));
        self
    }

    pub fn set_main(&mut self, func: Function) -> &mut Self {
        self.program.main = Some(func);
        self
    }

    pub fn finish(self) -> Program {
        self.program
    }
}
