//! Sharded string interner for identifiers and literal text.
//!
//! Provides O(1) interning and lookup with per-shard locking. Interning is
//! deterministic: the same sequence of `intern` calls against a fresh
//! interner always yields the same `Name`s, which keeps generated output
//! byte-stable across runs.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-shard storage for interned strings.
struct InternShard {
    /// Map from string content to local index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents.
    strings: Vec<&'static str>,
}

/// Error when interning or restoring strings fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// Shard exceeded capacity.
    ShardOverflow { shard_idx: usize, count: usize },
    /// A snapshot placed a string in a shard its hash does not select.
    ShardMismatch { shard_idx: usize, text: String },
    /// A snapshot listed the same string twice.
    Duplicate { text: String },
    /// A snapshot did not have exactly `Name::NUM_SHARDS` shards.
    ShardCount { found: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::ShardOverflow { shard_idx, count } => write!(
                f,
                "interner shard {shard_idx} exceeded capacity: {count} strings, max is {}",
                Name::MAX_LOCAL
            ),
            InternError::ShardMismatch { shard_idx, text } => {
                write!(f, "snapshot stores {text:?} in shard {shard_idx}, which does not own it")
            }
            InternError::Duplicate { text } => write!(f, "snapshot interns {text:?} twice"),
            InternError::ShardCount { found } => write!(
                f,
                "snapshot has {found} shards, expected {}",
                Name::NUM_SHARDS
            ),
        }
    }
}

impl std::error::Error for InternError {}

impl InternShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        }
    }

    fn with_empty() -> Self {
        let mut shard = Self::new();
        // Pre-intern empty string at index 0
        let empty: &'static str = "";
        shard.map.insert(empty, 0);
        shard.strings.push(empty);
        shard
    }

    fn push(&mut self, shard_idx: usize, text: &'static str) -> Result<u32, InternError> {
        let local = u32::try_from(self.strings.len())
            .ok()
            .filter(|&local| local <= Name::MAX_LOCAL)
            .ok_or(InternError::ShardOverflow {
                shard_idx,
                count: self.strings.len(),
            })?;
        self.strings.push(text);
        self.map.insert(text, local);
        Ok(local)
    }
}

/// Per-shard copy of every interned string, in `Name` order.
///
/// Carried next to a serialized program tree so the reader can rebuild an
/// interner whose `Name`s match the ones stored in the tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct InternSnapshot {
    pub shards: Vec<Vec<String>>,
}

/// Sharded string interner.
///
/// Strings are leaked to obtain `'static` references; an interner lives for
/// the whole compilation so this never grows unbounded in practice.
pub struct StringInterner {
    shards: [RwLock<InternShard>; Name::NUM_SHARDS],
    /// Total count of interned strings across all shards (O(1) `len()`).
    total_count: AtomicUsize,
}

impl StringInterner {
    /// Create a new interner with pre-interned keywords.
    pub fn new() -> Self {
        let interner = Self::empty();
        interner.pre_intern_keywords();
        interner
    }

    /// Interner holding only the empty string.
    fn empty() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(InternShard::with_empty())
            } else {
                RwLock::new(InternShard::new())
            }
        });

        Self {
            shards,
            total_count: AtomicUsize::new(1),
        }
    }

    /// Compute shard for a string based on its hash.
    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hash = 0u32;
        for byte in s.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Name::NUM_SHARDS
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        let shard_idx = Self::shard_for(s);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (16)"
        )]
        let shard_idx_u32 = shard_idx as u32;
        let shard = &self.shards[shard_idx];

        // Fast path: check if already interned
        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(s) {
                return Ok(Name::new(shard_idx_u32, local));
            }
        }

        let mut guard = shard.write();

        // Double-check after acquiring write lock
        if let Some(&local) = guard.map.get(s) {
            return Ok(Name::new(shard_idx_u32, local));
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let local = guard.push(shard_idx, leaked)?;
        self.total_count.fetch_add(1, Ordering::Relaxed);

        Ok(Name::new(shard_idx_u32, local))
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity. Use `try_intern` for fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Look up the string for a Name.
    pub fn lookup(&self, name: Name) -> &str {
        let guard = self.shards[name.shard()].read();
        guard.strings[name.local()]
    }

    /// Look up a string without interning it.
    pub fn get(&self, s: &str) -> Option<Name> {
        let shard_idx = Self::shard_for(s);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "shard_idx is bounded by NUM_SHARDS (16)"
        )]
        let shard_idx_u32 = shard_idx as u32;
        let guard = self.shards[shard_idx].read();
        guard
            .map
            .get(s)
            .map(|&local| Name::new(shard_idx_u32, local))
    }

    /// Copy out every interned string, shard by shard.
    pub fn snapshot(&self) -> InternSnapshot {
        let shards = self
            .shards
            .iter()
            .map(|shard| {
                shard
                    .read()
                    .strings
                    .iter()
                    .map(|s| (*s).to_owned())
                    .collect()
            })
            .collect();
        InternSnapshot { shards }
    }

    /// Rebuild an interner from a snapshot so that every `Name` recorded
    /// alongside the snapshot resolves to the same text.
    pub fn from_snapshot(snapshot: &InternSnapshot) -> Result<Self, InternError> {
        if snapshot.shards.len() != Name::NUM_SHARDS {
            return Err(InternError::ShardCount {
                found: snapshot.shards.len(),
            });
        }

        let interner = Self::empty();
        let mut total = 1;
        for (shard_idx, strings) in snapshot.shards.iter().enumerate() {
            let mut guard = interner.shards[shard_idx].write();
            for text in strings {
                if shard_idx == 0 && text.is_empty() && guard.strings.len() == 1 {
                    continue;
                }
                if Self::shard_for(text) != shard_idx {
                    return Err(InternError::ShardMismatch {
                        shard_idx,
                        text: text.clone(),
                    });
                }
                if guard.map.contains_key(text.as_str()) {
                    return Err(InternError::Duplicate { text: text.clone() });
                }
                let leaked: &'static str = Box::leak(text.clone().into_boxed_str());
                guard.push(shard_idx, leaked)?;
                total += 1;
            }
        }
        interner.total_count.store(total, Ordering::Relaxed);
        Ok(interner)
    }

    /// Pre-intern the math language's keywords and type names.
    fn pre_intern_keywords(&self) {
        const KEYWORDS: &[&str] = &[
            // Statements
            "if", "elif", "else", "while", "for", "in", "return", "break", "continue", "try",
            "catch", "finally", "import", "type", "const", "def",
            // Types
            "int", "float", "bool", "complex", "char", "string", "void", "array", "matrix",
            "set", "graph",
            // Common identifiers
            "main", "this", "true", "false", "PI", "E",
        ];

        for kw in KEYWORDS {
            self.intern(kw);
        }
    }

    /// Get the number of interned strings (O(1)).
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    /// Check if the interner is empty (only has the empty string).
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
