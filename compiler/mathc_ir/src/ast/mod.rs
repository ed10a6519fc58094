//! Program tree nodes.
//!
//! Expressions and statements are stored flat in an `ExprArena`; children are
//! referenced by `ExprId`/`StmtId` and ordered lists by range types.
//! Ownership flows strictly downward and no node refers to its parent.

mod items;
mod operators;

pub use items::{Definition, Function, Import, Param, Program, TypeDef, TypeMember};
pub use operators::{AssignOp, BinaryOp, UnaryOp};

use crate::{Builtin, CatchRange, ExprId, ExprRange, Name, StmtRange, Type};

/// Expression node. Every expression carries its resolved type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
    pub line: u32,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Type, line: u32) -> Self {
        Expr { kind, ty, line }
    }
}

/// Expression kinds.
///
/// Floats are stored as `u64` bits so the tree stays `Eq + Hash`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    Int(i64),
    Float(u64),
    Bool(bool),
    /// Complex literal kept as source text, e.g. `3+4i`.
    Complex(Name),
    Str(Name),
    Char(u8),
    Ident(Name),
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Call {
        callee: ExprId,
        args: ExprRange,
        /// Set by resolution when the callee names a builtin.
        builtin: Option<Builtin>,
    },
    Index {
        array: ExprId,
        index: ExprId,
    },
    /// `obj.member` (args `None`) or `obj.member(args)`.
    Member {
        object: ExprId,
        member: Name,
        args: Option<ExprRange>,
    },
    ArrayLit(ExprRange),
    /// Rows, each an `ArrayLit`.
    MatrixLit(ExprRange),
    SetLit(ExprRange),
}

impl ExprKind {
    /// Decode a float literal's bits.
    pub fn float_value(bits: u64) -> f64 {
        f64::from_bits(bits)
    }
}

/// Statement node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: u32,
}

/// Statement kinds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum StmtKind {
    Decl {
        ty: Type,
        name: Name,
        init: Option<ExprId>,
        is_const: bool,
    },
    Assign {
        target: ExprId,
        op: AssignOp,
        value: ExprId,
    },
    If {
        cond: ExprId,
        then_block: StmtRange,
        /// `elif` branches, each an `If` statement without elifs/else of its own.
        elifs: StmtRange,
        else_block: Option<StmtRange>,
    },
    While {
        cond: ExprId,
        body: StmtRange,
    },
    For {
        iterator: Name,
        index_var: Option<Name>,
        iterable: ExprId,
        body: StmtRange,
    },
    Return(Option<ExprId>),
    Break,
    Continue,
    Expr(ExprId),
    Try {
        body: StmtRange,
        catches: CatchRange,
        finally: Option<StmtRange>,
    },
}

/// `catch (Type name) { ... }`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct CatchClause {
    pub exception_type: Option<Type>,
    pub var_name: Option<Name>,
    pub body: StmtRange,
    pub line: u32,
}
