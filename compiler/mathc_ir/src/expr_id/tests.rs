use super::*;

#[test]
fn test_invalid_sentinel() {
    assert!(!ExprId::INVALID.is_valid());
    assert!(!StmtId::default().is_valid());
    assert!(ExprId::new(0).is_valid());
    assert_eq!(format!("{:?}", ExprId::INVALID), "ExprId::INVALID");
    assert_eq!(format!("{:?}", StmtId::new(7)), "StmtId(7)");
}

#[test]
fn test_range_basics() {
    assert!(ExprRange::EMPTY.is_empty());
    assert_eq!(StmtRange::default(), StmtRange::EMPTY);

    let range = CatchRange::new(4, 3);
    assert_eq!(range.len(), 3);
    assert!(!range.is_empty());
    assert_eq!(format!("{range:?}"), "CatchRange(4..7)");
}
