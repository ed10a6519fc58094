//! Name resolution for mathc.
//!
//! - [`SymbolTable`]: a stack of hash-bucketed scopes with shadowing
//! - [`resolve_program`]: walks a program, reports duplicate and undefined
//!   names, and tags calls to builtins so lowering can dispatch on
//!   [`Builtin`](mathc_ir::Builtin) instead of callee text

mod error;
mod resolver;
mod table;

pub use error::ResolveError;
pub use resolver::resolve_program;
pub use table::{Symbol, SymbolKind, SymbolTable, SymbolTableDisplay};
