//! C code generation backend for mathc.
//!
//! Lowers a resolved program tree to a single C translation unit in which
//! every structured construct has been flattened to labels and `goto`s.
//!
//! # Architecture
//!
//! ```text
//! Program + StringInterner
//!        ↓
//!     CCodegen        (runtime library, structs, prototypes, functions)
//!        ↓
//!   CodegenResult     (C source + diagnostics)
//! ```
//!
//! Generation never fails. Constructs that cannot be lowered leave an inert
//! comment in the output and a [`CodegenDiagnostic`] in the result.

pub mod c;
mod context;

use std::fmt;

use mathc_ir::{Program, StringInterner};

pub use c::CCodegen;
pub use context::{CodegenContext, Label, LoopContext, Owned};

/// Lower `program` to C.
pub fn generate(program: &Program, interner: &StringInterner) -> CodegenResult {
    CCodegen::new(program, interner).generate()
}

/// Result of code generation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CodegenResult {
    /// Generated C code.
    pub code: String,
    /// Everything lowering skipped or replaced with a placeholder.
    pub diagnostics: Vec<CodegenDiagnostic>,
}

impl CodegenResult {
    /// True if some node was dropped because a required child was missing.
    pub fn has_structural_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Structural)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// How bad a diagnostic is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// An unsupported construct became a placeholder comment.
    Soft,
    /// A node was missing a required child and emitted nothing.
    Structural,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Soft => f.write_str("warning"),
            Severity::Structural => f.write_str("error"),
        }
    }
}

/// A problem found while lowering.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CodegenDiagnostic {
    pub severity: Severity,
    pub line: u32,
    pub message: String,
}

impl fmt::Display for CodegenDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {}): {}", self.severity, self.line, self.message)
    }
}

impl std::error::Error for CodegenDiagnostic {}
