//! Type Mapping: mathc Types → C Types
//!
//! - Scalars map directly; `bool` is an `int`, `string` is a `char*`
//! - Arrays and sets are a pointer to their element type plus a `__len`
//!   companion, matrices a row-pointer table plus `__rows`/`__cols`
//! - Records are always handled through a pointer

use mathc_ir::{StringInterner, Type};

/// Type mapper for converting mathc types to C types.
pub struct CTypeMapper;

impl CTypeMapper {
    /// Storage type of a value of `ty`, as used for struct fields and
    /// array elements.
    pub fn map_type(ty: &Type, interner: &StringInterner) -> String {
        match ty {
            Type::Int | Type::Bool | Type::Undefined => "int".to_string(),
            Type::Float => "double".to_string(),
            Type::Complex => "double complex".to_string(),
            Type::Char => "char".to_string(),
            Type::String => "char*".to_string(),
            Type::Void => "void".to_string(),
            Type::Graph => "void*".to_string(),
            Type::Array(elem) | Type::Set(elem) => {
                format!("{}*", Self::map_type(elem, interner))
            }
            Type::Matrix(elem) => format!("{}**", Self::map_type(elem, interner)),
            Type::Custom(name) => interner.lookup(*name).to_string(),
        }
    }

    /// Type of a local, parameter or return value holding `ty`. Records
    /// are passed around by pointer.
    pub fn value_type(ty: &Type, interner: &StringInterner) -> String {
        match ty {
            Type::Custom(name) => format!("{}*", interner.lookup(*name)),
            _ => Self::map_type(ty, interner),
        }
    }

    /// C type of a container's elements, `int` when unknown.
    pub fn element_type(ty: &Type, interner: &StringInterner) -> String {
        ty.element()
            .map_or_else(|| "int".to_string(), |elem| Self::map_type(elem, interner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_scalars() {
        let interner = StringInterner::new();
        assert_eq!(CTypeMapper::map_type(&Type::Int, &interner), "int");
        assert_eq!(CTypeMapper::map_type(&Type::Bool, &interner), "int");
        assert_eq!(CTypeMapper::map_type(&Type::Float, &interner), "double");
        assert_eq!(
            CTypeMapper::map_type(&Type::Complex, &interner),
            "double complex"
        );
        assert_eq!(CTypeMapper::map_type(&Type::String, &interner), "char*");
        assert_eq!(CTypeMapper::map_type(&Type::Char, &interner), "char");
    }

    #[test]
    fn test_map_containers() {
        let interner = StringInterner::new();
        let nested = Type::array(Type::array(Type::Float));
        assert_eq!(CTypeMapper::map_type(&nested, &interner), "double**");
        assert_eq!(
            CTypeMapper::map_type(&Type::matrix(Type::Int), &interner),
            "int**"
        );
        assert_eq!(CTypeMapper::element_type(&nested, &interner), "double*");
        assert_eq!(CTypeMapper::element_type(&Type::Int, &interner), "int");
    }

    #[test]
    fn test_records_are_pointers_as_values() {
        let interner = StringInterner::new();
        let point = Type::Custom(interner.intern("Point"));
        assert_eq!(CTypeMapper::map_type(&point, &interner), "Point");
        assert_eq!(CTypeMapper::value_type(&point, &interner), "Point*");
    }
}
