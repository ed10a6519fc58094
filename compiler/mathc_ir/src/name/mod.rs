//! Handles for interned text.
//!
//! Identifiers, string literals and complex-literal spellings are stored once
//! in the [`StringInterner`](crate::StringInterner); tree nodes carry a
//! `Name` instead. Two names are equal exactly when their text is, so scopes
//! are keyed on `Name` and never compare strings.

use std::fmt;

/// Handle to a string held by a `StringInterner`.
///
/// The top bits pick the interner shard holding the text, the rest its slot
/// inside that shard.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The empty string. Every interner holds it in slot 0 of shard 0.
    pub const EMPTY: Name = Name(0);

    const SHARD_BITS: u32 = 4;
    const LOCAL_BITS: u32 = u32::BITS - Self::SHARD_BITS;

    pub(crate) const NUM_SHARDS: usize = 1 << Self::SHARD_BITS;
    /// Highest slot a shard can hand out.
    pub(crate) const MAX_LOCAL: u32 = (1 << Self::LOCAL_BITS) - 1;

    pub(crate) const fn new(shard: u32, local: u32) -> Self {
        debug_assert!((shard as usize) < Self::NUM_SHARDS);
        debug_assert!(local <= Self::MAX_LOCAL);
        Name((shard << Self::LOCAL_BITS) | local)
    }

    #[inline]
    pub(crate) const fn shard(self) -> usize {
        (self.0 >> Self::LOCAL_BITS) as usize
    }

    #[inline]
    pub(crate) const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({}:{})", self.shard(), self.local())
    }
}

#[cfg(test)]
mod tests;
