//! Top-level items: functions, record types, imports and the program root.

use crate::{ExprArena, Name, StmtRange, Type};

/// A `(type, name)` parameter pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub ty: Type,
    pub name: Name,
}

/// A procedure definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub name: Name,
    pub params: Vec<Param>,
    /// `None` means the procedure declares no return value.
    pub return_type: Option<Type>,
    pub body: StmtRange,
    pub line: u32,
}

/// A field or method of a record type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeMember {
    Field { ty: Type, name: Name, line: u32 },
    Method(Function),
}

/// A user-declared record type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDef {
    pub name: Name,
    pub members: Vec<TypeMember>,
    pub line: u32,
}

impl TypeDef {
    pub fn fields(&self) -> impl Iterator<Item = (&Type, Name)> {
        self.members.iter().filter_map(|m| match m {
            TypeMember::Field { ty, name, .. } => Some((ty, *name)),
            TypeMember::Method(_) => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &Function> {
        self.members.iter().filter_map(|m| match m {
            TypeMember::Method(func) => Some(func),
            TypeMember::Field { .. } => None,
        })
    }
}

/// `import <module>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Import {
    pub module: Name,
    pub line: u32,
}

/// A top-level definition, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Definition {
    Function(Function),
    Type(TypeDef),
}

/// Program root. Owns the arena holding every expression and statement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    pub arena: ExprArena,
    pub imports: Vec<Import>,
    pub definitions: Vec<Definition>,
    /// Explicit entry procedure, if the parser split it out.
    pub main: Option<Function>,
    pub line: u32,
}

impl Program {
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Function(func) => Some(func),
            Definition::Type(_) => None,
        })
    }

    pub fn type_defs(&self) -> impl Iterator<Item = &TypeDef> {
        self.definitions.iter().filter_map(|d| match d {
            Definition::Type(def) => Some(def),
            Definition::Function(_) => None,
        })
    }
}
