//! Indented S-expression rendering of a program tree.
//!
//! Leaves print on one line, e.g. `(INT 5)` or `(ID x)`. Interior nodes open
//! with their label, list children one level deeper and close with `)` on
//! its own line.

use mathc_stack::ensure_sufficient_stack;

use crate::ast::{ExprKind, Function, Program, StmtKind, TypeDef, TypeMember};
use crate::{ExprArena, ExprId, ExprRange, StmtId, StmtRange, StringInterner, Type};

/// Render the whole program.
pub fn dump_program(program: &Program, interner: &StringInterner) -> String {
    let mut dumper = TreeDumper::new(&program.arena, interner);
    dumper.program(program);
    dumper.out
}

/// Render one expression subtree.
pub fn dump_expr(arena: &ExprArena, interner: &StringInterner, id: ExprId) -> String {
    let mut dumper = TreeDumper::new(arena, interner);
    dumper.expr(id);
    dumper.out
}

/// Render one statement subtree.
pub fn dump_stmt(arena: &ExprArena, interner: &StringInterner, id: StmtId) -> String {
    let mut dumper = TreeDumper::new(arena, interner);
    dumper.stmt(id);
    dumper.out
}

struct TreeDumper<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    out: String,
    indent: usize,
}

impl<'a> TreeDumper<'a> {
    fn new(arena: &'a ExprArena, interner: &'a StringInterner) -> Self {
        Self {
            arena,
            interner,
            out: String::new(),
            indent: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, text: &str) {
        self.line(&format!("({text}"));
        self.indent += 1;
    }

    fn close(&mut self) {
        self.indent -= 1;
        self.line(")");
    }

    fn ty(&self, ty: &Type) -> String {
        ty.display(self.interner).to_string()
    }

    fn program(&mut self, program: &Program) {
        self.open("PROGRAM");
        for import in &program.imports {
            let module = self.interner.lookup(import.module);
            self.line(&format!("(IMPORT {module})"));
        }
        for def in program.type_defs() {
            self.type_def(def);
        }
        for func in program.functions() {
            self.function(func);
        }
        if let Some(main) = &program.main {
            self.function(main);
        }
        self.close();
    }

    fn type_def(&mut self, def: &TypeDef) {
        self.open(&format!("TYPE {}", self.interner.lookup(def.name)));
        for member in &def.members {
            match member {
                TypeMember::Field { ty, name, .. } => {
                    let text = format!("(FIELD {} {})", self.ty(ty), self.interner.lookup(*name));
                    self.line(&text);
                }
                TypeMember::Method(func) => self.function(func),
            }
        }
        self.close();
    }

    fn function(&mut self, func: &Function) {
        let ret = func
            .return_type
            .as_ref()
            .map_or_else(|| "void".to_string(), |ty| self.ty(ty));
        self.open(&format!("FUNCTION {} {ret}", self.interner.lookup(func.name)));
        for param in &func.params {
            let text = format!("(PARAM {} {})", self.ty(&param.ty), self.interner.lookup(param.name));
            self.line(&text);
        }
        self.labeled_block("BODY", func.body);
        self.close();
    }

    fn labeled_block(&mut self, label: &str, block: StmtRange) {
        self.open(label);
        self.block(block);
        self.close();
    }

    fn block(&mut self, block: StmtRange) {
        let arena = self.arena;
        for &stmt in arena.get_stmt_list(block) {
            self.stmt(stmt);
        }
    }

    fn exprs(&mut self, range: ExprRange) {
        let arena = self.arena;
        for &expr in arena.get_expr_list(range) {
            self.expr(expr);
        }
    }

    fn stmt(&mut self, id: StmtId) {
        let arena = self.arena;
        ensure_sufficient_stack(|| {
            let Some(stmt) = arena.try_get_stmt(id) else {
                self.line("(MISSING)");
                return;
            };
            match &stmt.kind {
                StmtKind::Decl {
                    ty,
                    name,
                    init,
                    is_const,
                } => {
                    let keyword = if *is_const { "CONST" } else { "DECL" };
                    let text = format!("{keyword} {} {}", self.ty(ty), self.interner.lookup(*name));
                    match init {
                        Some(init) => {
                            self.open(&text);
                            self.expr(*init);
                            self.close();
                        }
                        None => self.line(&format!("({text})")),
                    }
                }
                StmtKind::Assign { target, op, value } => {
                    self.open(&format!("ASSIGN {}", op.as_symbol()));
                    self.expr(*target);
                    self.expr(*value);
                    self.close();
                }
                StmtKind::If {
                    cond,
                    then_block,
                    elifs,
                    else_block,
                } => {
                    self.open("IF");
                    self.expr(*cond);
                    self.labeled_block("THEN", *then_block);
                    if !elifs.is_empty() {
                        self.labeled_block("ELIF", *elifs);
                    }
                    if let Some(block) = else_block {
                        self.labeled_block("ELSE", *block);
                    }
                    self.close();
                }
                StmtKind::While { cond, body } => {
                    self.open("WHILE");
                    self.expr(*cond);
                    self.labeled_block("BODY", *body);
                    self.close();
                }
                StmtKind::For {
                    iterator,
                    index_var,
                    iterable,
                    body,
                } => {
                    let mut header = format!("FOR {}", self.interner.lookup(*iterator));
                    if let Some(index) = index_var {
                        header.push_str(", ");
                        header.push_str(self.interner.lookup(*index));
                    }
                    self.open(&header);
                    self.expr(*iterable);
                    self.labeled_block("BODY", *body);
                    self.close();
                }
                StmtKind::Return(None) => self.line("(RETURN)"),
                StmtKind::Return(Some(value)) => {
                    self.open("RETURN");
                    self.expr(*value);
                    self.close();
                }
                StmtKind::Break => self.line("(BREAK)"),
                StmtKind::Continue => self.line("(CONTINUE)"),
                StmtKind::Expr(expr) => {
                    self.open("EXPR_STMT");
                    self.expr(*expr);
                    self.close();
                }
                StmtKind::Try {
                    body,
                    catches,
                    finally,
                } => {
                    self.open("TRY");
                    self.labeled_block("BODY", *body);
                    for clause in arena.get_catches(*catches) {
                        let mut header = String::from("CATCH");
                        if let Some(ty) = &clause.exception_type {
                            header.push(' ');
                            header.push_str(&self.ty(ty));
                        }
                        if let Some(var) = clause.var_name {
                            header.push(' ');
                            header.push_str(self.interner.lookup(var));
                        }
                        self.open(&header);
                        self.block(clause.body);
                        self.close();
                    }
                    if let Some(block) = finally {
                        self.labeled_block("FINALLY", *block);
                    }
                    self.close();
                }
            }
        });
    }

    fn expr(&mut self, id: ExprId) {
        let arena = self.arena;
        ensure_sufficient_stack(|| {
            let Some(expr) = arena.try_get_expr(id) else {
                self.line("(MISSING)");
                return;
            };
            match &expr.kind {
                ExprKind::Int(value) => self.line(&format!("(INT {value})")),
                ExprKind::Float(bits) => {
                    self.line(&format!("(FLOAT {:?})", ExprKind::float_value(*bits)));
                }
                ExprKind::Bool(value) => self.line(&format!("(BOOL {value})")),
                ExprKind::Complex(text) => {
                    self.line(&format!("(COMPLEX {})", self.interner.lookup(*text)));
                }
                ExprKind::Str(text) => {
                    self.line(&format!("(STRING {:?})", self.interner.lookup(*text)));
                }
                ExprKind::Char(c) => {
                    self.line(&format!("(CHAR {:?})", char::from(*c)));
                }
                ExprKind::Ident(name) => {
                    self.line(&format!("(ID {})", self.interner.lookup(*name)));
                }
                ExprKind::Binary { op, left, right } => {
                    self.open(&format!("BINOP {}", op.as_symbol()));
                    self.expr(*left);
                    self.expr(*right);
                    self.close();
                }
                ExprKind::Unary { op, operand } => {
                    self.open(&format!("UNOP {}", op.as_symbol()));
                    self.expr(*operand);
                    self.close();
                }
                ExprKind::Call {
                    callee,
                    args,
                    builtin,
                } => {
                    self.open(if builtin.is_some() { "CALL builtin" } else { "CALL" });
                    self.expr(*callee);
                    self.exprs(*args);
                    self.close();
                }
                ExprKind::Index { array, index } => {
                    self.open("INDEX");
                    self.expr(*array);
                    self.expr(*index);
                    self.close();
                }
                ExprKind::Member {
                    object,
                    member,
                    args,
                } => {
                    self.open(&format!("MEMBER {}", self.interner.lookup(*member)));
                    self.expr(*object);
                    if let Some(args) = args {
                        self.open("ARGS");
                        self.exprs(*args);
                        self.close();
                    }
                    self.close();
                }
                ExprKind::ArrayLit(elems) => {
                    self.open("ARRAY");
                    self.exprs(*elems);
                    self.close();
                }
                ExprKind::MatrixLit(rows) => {
                    self.open("MATRIX");
                    self.exprs(*rows);
                    self.close();
                }
                ExprKind::SetLit(elems) => {
                    self.open("SET");
                    self.exprs(*elems);
                    self.close();
                }
            }
        });
    }
}
