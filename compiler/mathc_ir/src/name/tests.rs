use super::*;
use crate::StringInterner;

#[test]
fn test_shard_and_slot_split() {
    let name = Name::new(5, 1000);
    assert_eq!(name.shard(), 5);
    assert_eq!(name.local(), 1000);

    let last = Name::new(15, Name::MAX_LOCAL);
    assert_eq!(last.shard(), 15);
    assert_eq!(last.local(), Name::MAX_LOCAL as usize);
}

#[test]
fn test_empty_is_default() {
    assert_eq!(Name::default(), Name::EMPTY);
    assert_eq!((Name::EMPTY.shard(), Name::EMPTY.local()), (0, 0));
}

#[test]
fn test_same_slot_in_different_shards_differs() {
    assert_ne!(Name::new(0, 7), Name::new(1, 7));
}

#[test]
fn test_debug_shows_location() {
    assert_eq!(format!("{:?}", Name::new(3, 17)), "Name(3:17)");
}

#[test]
fn test_interned_names_point_at_their_text() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let total = interner.intern("total");
    assert_ne!(x, total);
    assert_eq!(interner.intern("x"), x);
    assert_eq!(interner.lookup(total), "total");
}
