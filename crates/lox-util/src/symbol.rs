//! String interning for identifier text.
//!
//! Every environment frame and every resolver scope is keyed by identifier
//! name. Interning those names once turns the (extremely hot) name
//! comparisons done on every variable lookup into a `u32` comparison
//! instead of a string comparison, and lets `Environment`/`Scope` use
//! `FxHashMap<Symbol, _>` instead of hashing whole strings repeatedly.
//!
//! Strings are leaked to obtain `'static` string slices. This is safe and
//! bounded: a Lox program interns at most one symbol per distinct
//! identifier lexeme it contains, and the process exits shortly after
//! interpretation finishes.

use ahash::AHasher;
use dashmap::DashMap;
use std::hash::{Hash, Hasher};
use std::sync::{OnceLock, RwLock};

/// A compact, interned handle to an identifier string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

struct Interner {
    /// string hash -> (interned text, index). Hashing first lets repeated
    /// lookups of an already-interned string skip straight to a pointer
    /// comparison on the rare occasion of a hash collision.
    by_hash: DashMap<u64, (&'static str, u32)>,
    backward: RwLock<Vec<&'static str>>,
}

fn interner() -> &'static Interner {
    static INTERNER: OnceLock<Interner> = OnceLock::new();
    INTERNER.get_or_init(|| Interner {
        by_hash: DashMap::new(),
        backward: RwLock::new(Vec::new()),
    })
}

fn hash_str(text: &str) -> u64 {
    let mut hasher = AHasher::default();
    text.hash(&mut hasher);
    hasher.finish()
}

impl Symbol {
    /// Intern `text`, returning the same `Symbol` for equal strings.
    pub fn intern(text: &str) -> Self {
        let interner = interner();
        let hash = hash_str(text);

        if let Some(entry) = interner.by_hash.get(&hash) {
            if entry.0 == text {
                return Symbol(entry.1);
            }
        }

        let mut backward = interner.backward.write().unwrap();
        // Re-check under the write lock: another thread (or a hash
        // collision resolved since the lookup above) may already have
        // this string interned.
        if let Some(entry) = interner.by_hash.get(&hash) {
            if entry.0 == text {
                return Symbol(entry.1);
            }
        }

        let leaked: &'static str = Box::leak(text.to_string().into_boxed_str());
        let index = backward.len() as u32;
        backward.push(leaked);
        interner.by_hash.insert(hash, (leaked, index));
        Symbol(index)
    }

    /// Recover the original string. `O(1)`: indexes straight into the
    /// backing vector.
    pub fn as_str(self) -> &'static str {
        interner().backward.read().unwrap()[self.0 as usize]
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
