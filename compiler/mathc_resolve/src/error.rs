//! Resolution errors.

/// A problem found while resolving names.
///
/// Resolution never stops at the first error; every problem in the program
/// is collected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A name declared twice in the same scope.
    #[error("line {line}: `{name}` is already defined in this scope (first defined on line {first_line})")]
    DuplicateDefinition {
        name: String,
        line: u32,
        first_line: u32,
    },

    /// A name used with no visible declaration.
    #[error("line {line}: `{name}` is not defined")]
    Undefined { name: String, line: u32 },
}

impl ResolveError {
    /// Source line the error points at.
    pub fn line(&self) -> u32 {
        match self {
            ResolveError::DuplicateDefinition { line, .. } | ResolveError::Undefined { line, .. } => {
                *line
            }
        }
    }
}
