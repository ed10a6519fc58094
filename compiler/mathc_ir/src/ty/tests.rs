use super::*;

#[test]
fn test_element_of_containers() {
    assert_eq!(Type::array(Type::Int).element(), Some(&Type::Int));
    assert_eq!(Type::set(Type::Char).element(), Some(&Type::Char));
    assert_eq!(Type::matrix(Type::Float).element(), Some(&Type::Float));
    assert_eq!(Type::Int.element(), None);
}

#[test]
fn test_container_predicates() {
    assert!(Type::array(Type::Int).is_container());
    assert!(!Type::String.is_container());
    assert!(Type::array(Type::array(Type::Int)).is_nested_array());
    assert!(!Type::array(Type::Int).is_nested_array());
}

#[test]
fn test_display() {
    let interner = StringInterner::new();
    let point = interner.intern("Point");
    assert_eq!(
        Type::array(Type::set(Type::Int)).display(&interner).to_string(),
        "array<set<int>>"
    );
    assert_eq!(Type::Custom(point).display(&interner).to_string(), "Point");
    assert_eq!(Type::Custom(point).custom_name(), Some(point));
}
