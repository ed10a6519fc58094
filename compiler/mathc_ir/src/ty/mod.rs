//! Resolved types attached to every expression.
//!
//! Container kinds carry their element type and nominal types carry their
//! name, so an array without an element type or a custom type without a name
//! cannot be constructed.

use std::fmt;

use crate::{Name, StringInterner};

/// A resolved type descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    Int,
    Float,
    Bool,
    Complex,
    Char,
    String,
    Void,
    /// Type inference could not settle on a type.
    Undefined,
    Graph,
    Array(Box<Type>),
    Matrix(Box<Type>),
    Set(Box<Type>),
    /// User-declared record type, referenced by name.
    Custom(Name),
}

impl Type {
    pub fn array(elem: Type) -> Self {
        Type::Array(Box::new(elem))
    }

    pub fn matrix(elem: Type) -> Self {
        Type::Matrix(Box::new(elem))
    }

    pub fn set(elem: Type) -> Self {
        Type::Set(Box::new(elem))
    }

    /// Element type of a container, `None` for everything else.
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array(elem) | Type::Matrix(elem) | Type::Set(elem) => Some(elem),
            _ => None,
        }
    }

    /// Arrays, matrices and sets own a heap backing store.
    pub fn is_container(&self) -> bool {
        matches!(self, Type::Array(_) | Type::Matrix(_) | Type::Set(_))
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        matches!(self, Type::Set(_))
    }

    #[inline]
    pub fn is_matrix(&self) -> bool {
        matches!(self, Type::Matrix(_))
    }

    /// `array<array<T>>`, lowered as a row-pointer table.
    pub fn is_nested_array(&self) -> bool {
        matches!(self, Type::Array(elem) if elem.is_array())
    }

    /// Name of a nominal type.
    pub fn custom_name(&self) -> Option<Name> {
        match self {
            Type::Custom(name) => Some(*name),
            _ => None,
        }
    }

    /// Display adapter that resolves custom names.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> TypeDisplay<'a> {
        TypeDisplay { ty: self, interner }
    }
}

/// Renders a `Type` in source syntax, e.g. `array<int>` or `Point`.
pub struct TypeDisplay<'a> {
    ty: &'a Type,
    interner: &'a StringInterner,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::Int => f.write_str("int"),
            Type::Float => f.write_str("float"),
            Type::Bool => f.write_str("bool"),
            Type::Complex => f.write_str("complex"),
            Type::Char => f.write_str("char"),
            Type::String => f.write_str("string"),
            Type::Void => f.write_str("void"),
            Type::Undefined => f.write_str("undefined"),
            Type::Graph => f.write_str("graph"),
            Type::Array(elem) => write!(f, "array<{}>", elem.display(self.interner)),
            Type::Matrix(elem) => write!(f, "matrix<{}>", elem.display(self.interner)),
            Type::Set(elem) => write!(f, "set<{}>", elem.display(self.interner)),
            Type::Custom(name) => f.write_str(self.interner.lookup(*name)),
        }
    }
}

#[cfg(test)]
mod tests;
