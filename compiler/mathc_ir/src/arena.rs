//! Arena allocation for the flat program tree.
//!
//! - All expressions and statements stored in contiguous `Vec`s
//! - Child references use `ExprId`/`StmtId` indices
//! - Ordered child lists use ranges into flattened list storage
//! - Dropping the arena releases the whole tree at once

use crate::ast::{CatchClause, Expr, Stmt};
use crate::{CatchRange, ExprId, ExprRange, StmtId, StmtRange};

/// Contiguous storage for every node of one program.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprArena {
    /// All expressions (indexed by `ExprId`).
    exprs: Vec<Expr>,

    /// Flattened expression lists (call args, literal elements, ...).
    expr_lists: Vec<ExprId>,

    /// All statements (indexed by `StmtId`).
    stmts: Vec<Stmt>,

    /// Flattened statement lists (blocks).
    stmt_lists: Vec<StmtId>,

    /// All catch clauses.
    catches: Vec<CatchClause>,
}

#[inline]
fn index_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("program tree exceeds u32::MAX nodes"))
}

impl ExprArena {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Expressions =====

    /// Allocate expression, return ID.
    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(index_u32(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    /// Get expression by ID.
    ///
    /// # Panics
    /// Panics if `id` is invalid or out of bounds.
    #[inline]
    #[track_caller]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Get expression by ID, `None` for the `INVALID` sentinel.
    #[inline]
    pub fn try_get_expr(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id.index())
    }

    /// Get mutable expression by ID.
    ///
    /// # Panics
    /// Panics if `id` is invalid or out of bounds.
    #[inline]
    #[track_caller]
    pub fn get_expr_mut(&mut self, id: ExprId) -> &mut Expr {
        &mut self.exprs[id.index()]
    }

    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Allocate expression list, return range.
    pub fn alloc_expr_list(&mut self, exprs: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = index_u32(self.expr_lists.len());
        self.expr_lists.extend(exprs);
        ExprRange::new(start, index_u32(self.expr_lists.len()) - start)
    }

    /// Get expression list by range.
    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    // ===== Statements =====

    /// Allocate statement, return ID.
    #[inline]
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(index_u32(self.stmts.len()));
        self.stmts.push(stmt);
        id
    }

    /// Get statement by ID.
    ///
    /// # Panics
    /// Panics if `id` is invalid or out of bounds.
    #[inline]
    #[track_caller]
    pub fn get_stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    /// Get statement by ID, `None` for the `INVALID` sentinel.
    #[inline]
    pub fn try_get_stmt(&self, id: StmtId) -> Option<&Stmt> {
        self.stmts.get(id.index())
    }

    #[inline]
    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    /// Allocate a block, return range.
    pub fn alloc_stmt_list(&mut self, stmts: impl IntoIterator<Item = StmtId>) -> StmtRange {
        let start = index_u32(self.stmt_lists.len());
        self.stmt_lists.extend(stmts);
        StmtRange::new(start, index_u32(self.stmt_lists.len()) - start)
    }

    /// Get a block's statements by range.
    #[inline]
    pub fn get_stmt_list(&self, range: StmtRange) -> &[StmtId] {
        let start = range.start as usize;
        &self.stmt_lists[start..start + range.len()]
    }

    // ===== Catch clauses =====

    /// Allocate catch clauses, return range.
    pub fn alloc_catches(&mut self, catches: impl IntoIterator<Item = CatchClause>) -> CatchRange {
        let start = index_u32(self.catches.len());
        self.catches.extend(catches);
        CatchRange::new(start, index_u32(self.catches.len()) - start)
    }

    #[inline]
    pub fn get_catches(&self, range: CatchRange) -> &[CatchClause] {
        let start = range.start as usize;
        &self.catches[start..start + range.len()]
    }
}
