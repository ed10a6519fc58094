//! Serialized tree files.
//!
//! A front end hands the back end one `TreeFile`: the program plus the
//! interner contents its `Name`s index into.

use serde::{Deserialize, Serialize};

use crate::{InternError, InternSnapshot, Program, StringInterner};

/// A program tree together with its names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeFile {
    pub names: InternSnapshot,
    pub program: Program,
}

impl TreeFile {
    pub fn new(interner: &StringInterner, program: Program) -> Self {
        TreeFile {
            names: interner.snapshot(),
            program,
        }
    }

    /// Rebuild the interner and hand back the program.
    pub fn into_parts(self) -> Result<(StringInterner, Program), InternError> {
        let interner = StringInterner::from_snapshot(&self.names)?;
        Ok((interner, self.program))
    }
}
