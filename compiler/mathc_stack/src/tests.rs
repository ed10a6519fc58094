use super::*;

/// Depth of a chain of nested binary nodes, walked recursively.
fn nesting_depth(levels: u32) -> u32 {
    ensure_sufficient_stack(|| {
        if levels == 0 {
            0
        } else {
            nesting_depth(levels - 1) + 1
        }
    })
}

#[test]
fn test_shallow_nesting() {
    assert_eq!(nesting_depth(16), 16);
}

#[test]
fn test_deep_nesting_grows_stack() {
    // Far deeper than a default 8MB stack allows without growth.
    assert_eq!(nesting_depth(200_000), 200_000);
}

#[test]
fn test_passes_result_through() {
    let lowered: Result<String, &str> = ensure_sufficient_stack(|| Ok("x + 1".to_string()));
    assert_eq!(lowered, Ok("x + 1".to_string()));
}
