//! Stack growth for recursive tree walks.
//!
//! The census, the resolver, the tree dump and C lowering all recurse once
//! per nesting level of the program tree. Front ends can hand us arbitrarily
//! deep expressions (long `a + b + c + ...` chains nest left), so every
//! recursive entry point goes through [`ensure_sufficient_stack`].
//!
//! On native targets the stack is extended with `stacker` when less than
//! [`RED_ZONE`] bytes remain. On `wasm32` the closure runs directly.

/// Grow when less than this much stack remains (128KB).
///
/// Lowering a single expression formats several strings on the way back up,
/// so the margin is a little wider than a bare recursive count needs.
pub const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment (1MB).
pub const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first growing the stack if it is close to exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
