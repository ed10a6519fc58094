use super::*;

#[test]
fn test_intern_and_lookup() {
    let interner = StringInterner::new();

    let hello = interner.intern("hello");
    let world = interner.intern("world");
    let hello2 = interner.intern("hello");

    assert_eq!(hello, hello2);
    assert_ne!(hello, world);

    assert_eq!(interner.lookup(hello), "hello");
    assert_eq!(interner.lookup(world), "world");
}

#[test]
fn test_empty_string() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn test_keywords_pre_interned() {
    let interner = StringInterner::new();
    assert!(interner.get("while").is_some());
    assert!(interner.get("main").is_some());
    assert!(interner.get("not_a_keyword").is_none());
}

#[test]
fn test_interning_is_deterministic() {
    let a = StringInterner::new();
    let b = StringInterner::new();
    for word in ["x", "values", "print", "Point"] {
        assert_eq!(a.intern(word), b.intern(word));
    }
}

#[test]
fn test_len_counts_new_strings_only() {
    let interner = StringInterner::new();
    let before = interner.len();
    interner.intern("fresh");
    interner.intern("fresh");
    assert_eq!(interner.len(), before + 1);
}

#[test]
fn test_snapshot_restore_preserves_names() {
    let interner = StringInterner::new();
    let names: Vec<_> = ["alpha", "beta", "gamma", "delta"]
        .iter()
        .map(|s| interner.intern(s))
        .collect();

    let restored = StringInterner::from_snapshot(&interner.snapshot()).unwrap();
    for (name, text) in names.iter().zip(["alpha", "beta", "gamma", "delta"]) {
        assert_eq!(restored.lookup(*name), text);
    }
    assert_eq!(restored.len(), interner.len());
    assert_eq!(restored.intern("alpha"), names[0]);
}

#[test]
fn test_snapshot_rejects_wrong_shard_count() {
    let snapshot = InternSnapshot { shards: vec![Vec::new(); 3] };
    assert_eq!(
        StringInterner::from_snapshot(&snapshot).err(),
        Some(InternError::ShardCount { found: 3 })
    );
}

#[test]
fn test_snapshot_rejects_misplaced_string() {
    let interner = StringInterner::new();
    let mut snapshot = interner.snapshot();
    let home = StringInterner::shard_for("misplaced");
    let wrong = (home + 1) % Name::NUM_SHARDS;
    snapshot.shards[wrong].push("misplaced".to_owned());
    assert!(matches!(
        StringInterner::from_snapshot(&snapshot),
        Err(InternError::ShardMismatch { .. })
    ));
}
