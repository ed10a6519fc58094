//! mathc IR - program tree types
//!
//! This crate contains the data structures shared by the mathc back end:
//! - Names for interned identifiers and literal text
//! - `Type`, the resolved type carried by every expression
//! - Arena-allocated expressions, statements and catch clauses
//! - The builtin catalogue
//! - Builders, census/teardown and a tree dump
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → Name(u32)
//! - **Flatten Everything**: No Box<Expr>, use ExprId(u32) indices
//!
//! Types that contain floats store them as u64 bits for Hash compatibility.

mod arena;
pub mod ast;
mod builder;
mod builtin;
#[cfg(feature = "cache")]
mod cache;
pub mod census;
pub mod dump;
mod expr_id;
mod interner;
mod name;
mod ty;

pub use arena::ExprArena;
pub use ast::{
    AssignOp, BinaryOp, CatchClause, Definition, Expr, ExprKind, Function, Import, Param,
    Program, Stmt, StmtKind, TypeDef, TypeMember, UnaryOp,
};
pub use builder::ProgramBuilder;
pub use builtin::{Builtin, BuiltinKind};
#[cfg(feature = "cache")]
pub use cache::TreeFile;
pub use census::teardown;
pub use expr_id::{CatchRange, ExprId, ExprRange, StmtId, StmtRange};
pub use interner::{InternError, InternSnapshot, StringInterner};
pub use name::Name;
pub use ty::{Type, TypeDisplay};
