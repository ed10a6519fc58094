//! Code generation context and state.
//!
//! The `CodegenContext` holds all state needed during lowering: the output
//! buffer, label and temporary counters, the loop-context stack, the cleanup
//! frames of pending frees and the collected diagnostics. One context exists
//! per compilation and is passed by `&mut` through every lowering function.

use std::fmt;

use mathc_ir::ast::{CatchClause, Expr, Stmt};
use mathc_ir::{
    CatchRange, ExprArena, ExprId, ExprKind, ExprRange, Name, StmtId, StmtRange, StringInterner,
};
use tracing::warn;

use crate::{CodegenDiagnostic, Severity};

/// A jump target, written as `L{n}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Label(u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Jump targets of one enclosing loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoopContext {
    /// `break` target.
    pub end: Label,
    /// `continue` target.
    pub cont: Label,
    /// Number of cleanup frames open when the loop was entered.
    pub cleanup_depth: usize,
}

/// A heap allocation released when its cleanup frame is left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Owned {
    pub name: String,
    /// Row count expression when each row is a separate allocation.
    pub rows: Option<String>,
}

impl Owned {
    fn release(&self) -> String {
        match &self.rows {
            None => format!("free({});", self.name),
            Some(rows) => format!("mathc_free_rows({}, {rows});", self.name),
        }
    }
}

/// The function whose body is being lowered.
#[derive(Clone, Debug)]
pub struct CurrentFunction {
    pub name: String,
    pub is_main: bool,
    /// C return type, `None` for `void`.
    pub return_type: Option<String>,
}

/// Code generation context.
pub struct CodegenContext<'a> {
    /// String interner for resolving names.
    pub interner: &'a StringInterner,
    /// Node storage of the program being lowered.
    pub arena: &'a ExprArena,
    /// Current indentation level.
    indent: usize,
    /// Generated code output.
    output: String,
    label_counter: u32,
    temp_counter: u32,
    loops: Vec<LoopContext>,
    /// Names to free, innermost frame last.
    cleanup: Vec<Vec<Owned>>,
    function: Option<CurrentFunction>,
    diagnostics: Vec<CodegenDiagnostic>,
}

fn push_line(output: &mut String, indent: usize, s: &str) {
    for _ in 0..indent {
        output.push_str("    ");
    }
    output.push_str(s);
    output.push('\n');
}

impl<'a> CodegenContext<'a> {
    /// Create a new codegen context.
    pub fn new(interner: &'a StringInterner, arena: &'a ExprArena) -> Self {
        Self {
            interner,
            arena,
            indent: 0,
            output: String::with_capacity(4096),
            label_counter: 0,
            temp_counter: 0,
            loops: Vec::new(),
            cleanup: Vec::new(),
            function: None,
            diagnostics: Vec::new(),
        }
    }

    // ===== Tree access =====

    /// Resolve a name to its string representation.
    #[inline]
    pub fn resolve_name(&self, name: Name) -> &'a str {
        self.interner.lookup(name)
    }

    /// Expression by ID, `None` for a missing child.
    #[inline]
    pub fn expr(&self, id: ExprId) -> Option<&'a Expr> {
        self.arena.try_get_expr(id)
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> Option<&'a Stmt> {
        self.arena.try_get_stmt(id)
    }

    #[inline]
    pub fn block(&self, range: StmtRange) -> &'a [StmtId] {
        self.arena.get_stmt_list(range)
    }

    #[inline]
    pub fn exprs(&self, range: ExprRange) -> &'a [ExprId] {
        self.arena.get_expr_list(range)
    }

    #[inline]
    pub fn catches(&self, range: CatchRange) -> &'a [CatchClause] {
        self.arena.get_catches(range)
    }

    /// Name of an identifier expression.
    pub fn ident_name(&self, id: ExprId) -> Option<&'a str> {
        match self.expr(id)?.kind {
            ExprKind::Ident(name) => Some(self.resolve_name(name)),
            _ => None,
        }
    }

    // ===== Labels and temporaries =====

    /// Allocate a label. Labels are never reused within a compilation.
    pub fn fresh_label(&mut self) -> Label {
        let label = Label(self.label_counter);
        self.label_counter += 1;
        label
    }

    /// Allocate a temporary suffix, shared by `_tmp`, `_arr`, `_i`, `_len`
    /// and `_range` names.
    pub fn fresh_temp_id(&mut self) -> u32 {
        let n = self.temp_counter;
        self.temp_counter += 1;
        n
    }

    /// Generate a unique temporary variable name.
    pub fn fresh_temp(&mut self) -> String {
        let n = self.fresh_temp_id();
        format!("_tmp{n}")
    }

    // ===== Output =====

    /// Increase indentation level.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease indentation level.
    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write a string to output.
    pub fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    /// Write a line to output (with indentation and newline).
    pub fn writeln(&mut self, s: &str) {
        push_line(&mut self.output, self.indent, s);
    }

    /// Write a newline.
    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// Define `label` at column 0. The null statement keeps a label legal in
    /// front of a declaration.
    pub fn define_label(&mut self, label: Label) {
        push_line(&mut self.output, 0, &format!("{label}: ;"));
    }

    /// Take the generated output.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    // ===== Loops =====

    pub fn push_loop(&mut self, end: Label, cont: Label) {
        self.loops.push(LoopContext {
            end,
            cont,
            cleanup_depth: self.cleanup.len(),
        });
    }

    pub fn pop_loop(&mut self) {
        debug_assert!(!self.loops.is_empty(), "pop_loop called outside a loop");
        self.loops.pop();
    }

    /// The innermost enclosing loop.
    pub fn current_loop(&self) -> Option<LoopContext> {
        self.loops.last().copied()
    }

    // ===== Cleanup =====

    /// Open a lexical region whose allocations are freed when it is left.
    pub fn push_cleanup_frame(&mut self) {
        self.cleanup.push(Vec::new());
    }

    /// Close the innermost region, returning its allocations in
    /// registration order.
    pub fn pop_cleanup_frame(&mut self) -> Vec<Owned> {
        self.cleanup.pop().unwrap_or_default()
    }

    /// Register a heap allocation in the innermost frame.
    pub fn record_alloc(&mut self, name: impl Into<String>) {
        self.record(Owned {
            name: name.into(),
            rows: None,
        });
    }

    /// Register a row table whose first `rows` entries are separate
    /// allocations owned by the table.
    pub fn record_rows_alloc(&mut self, name: impl Into<String>, rows: impl Into<String>) {
        self.record(Owned {
            name: name.into(),
            rows: Some(rows.into()),
        });
    }

    fn record(&mut self, owned: Owned) {
        debug_assert!(
            !self.cleanup.is_empty(),
            "allocation recorded outside any cleanup frame"
        );
        if let Some(frame) = self.cleanup.last_mut() {
            frame.push(owned);
        }
    }

    /// True if leaving every open frame would free something.
    pub fn has_pending_frees(&self) -> bool {
        self.cleanup.iter().any(|frame| !frame.is_empty())
    }

    /// Write the release statement of each allocation in `owned`.
    pub fn emit_frees(&mut self, owned: &[Owned]) {
        for item in owned {
            push_line(&mut self.output, self.indent, &item.release());
        }
    }

    /// Free everything registered in frames `depth..`, outermost first,
    /// without closing them. `keep` is skipped.
    pub fn flush_cleanup_from(&mut self, depth: usize, keep: Option<&str>) {
        let frames = self.cleanup.get(depth..).unwrap_or_default();
        for item in frames.iter().flatten() {
            if keep == Some(item.name.as_str()) {
                continue;
            }
            push_line(&mut self.output, self.indent, &item.release());
        }
    }

    // ===== Functions =====

    pub fn begin_function(&mut self, function: CurrentFunction) {
        debug_assert!(self.loops.is_empty(), "function started inside a loop");
        self.function = Some(function);
    }

    pub fn end_function(&mut self) {
        self.function = None;
    }

    pub fn current_function(&self) -> Option<&CurrentFunction> {
        self.function.as_ref()
    }

    // ===== Diagnostics =====

    /// Record an unsupported construct.
    pub fn soft(&mut self, line: u32, message: impl Into<String>) {
        self.report(Severity::Soft, line, message.into());
    }

    /// Record a node dropped for a missing child.
    pub fn structural(&mut self, line: u32, message: impl Into<String>) {
        self.report(Severity::Structural, line, message.into());
    }

    fn report(&mut self, severity: Severity, line: u32, message: String) {
        warn!(%severity, line, "{message}");
        self.diagnostics.push(CodegenDiagnostic {
            severity,
            line,
            message,
        });
    }

    pub fn take_diagnostics(&mut self) -> Vec<CodegenDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests;
