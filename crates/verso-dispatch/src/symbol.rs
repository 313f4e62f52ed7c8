//! Interned symbolic names.
//!
//! A [`Symbol`] is an atomic identifier: it has a name, but it is not a
//! string. Handlers return symbols to name things (most commonly a view to
//! render) and the pipeline tells them apart from text by type alone.
//!
//! Symbols are interned in a process-wide table, so equality and hashing are
//! pointer comparisons and a `Symbol` is `Copy`.
//!
//! ```rust
//! use verso_dispatch::Symbol;
//!
//! let a = Symbol::intern("index");
//! let b = Symbol::from("index");
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "index");
//! assert_eq!(format!("{:?}", a), ":index");
//! ```

use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

static INTERNER: Lazy<Mutex<HashSet<&'static str>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// An interned atomic identifier.
#[derive(Clone, Copy)]
pub struct Symbol(&'static str);

impl Symbol {
    /// Returns the symbol for `name`, interning it on first use.
    ///
    /// Interned names are leaked and live for the rest of the process, so
    /// the table only grows. Do not intern names taken from request input;
    /// resolve those with [`Symbol::lookup`].
    pub fn intern(name: &str) -> Self {
        // A panic while holding the lock cannot leave the set half-updated.
        let mut table = INTERNER
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(existing) = table.get(name) {
            return Symbol(existing);
        }

        let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());
        table.insert(leaked);
        Symbol(leaked)
    }

    /// Returns the symbol for `name` if it has already been interned.
    ///
    /// Never adds to the table.
    ///
    /// ```rust
    /// use verso_dispatch::Symbol;
    ///
    /// let about = Symbol::intern("about");
    /// assert_eq!(Symbol::lookup("about"), Some(about));
    /// assert_eq!(Symbol::lookup("never-interned-name"), None);
    /// ```
    pub fn lookup(name: &str) -> Option<Self> {
        let table = INTERNER
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        table.get(name).map(|existing| Symbol(existing))
    }

    /// The name this symbol was interned from.
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.0.as_ptr() as usize).hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(other.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::intern(name)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_intern_same_name_is_identical() {
        let a = Symbol::intern("dashboard");
        let b = Symbol::intern(&String::from("dashboard"));
        assert_eq!(a, b);
        assert!(std::ptr::eq(a.as_str(), b.as_str()));
    }

    #[test]
    fn test_intern_different_names_differ() {
        assert_ne!(Symbol::intern("list"), Symbol::intern("show"));
    }

    #[test]
    fn test_symbol_as_hash_key() {
        let mut map = HashMap::new();
        map.insert(Symbol::intern("a"), 1);
        map.insert(Symbol::intern("b"), 2);
        assert_eq!(map.get(&Symbol::from("a")), Some(&1));
        assert_eq!(map.get(&Symbol::from("b")), Some(&2));
        assert_eq!(map.get(&Symbol::from("c")), None);
    }

    #[test]
    fn test_symbol_display_and_debug() {
        let sym = Symbol::intern("sym");
        assert_eq!(sym.to_string(), "sym");
        assert_eq!(format!("{:?}", sym), ":sym");
    }

    #[test]
    fn test_symbol_ordering_is_by_name() {
        let mut syms = vec![Symbol::intern("c"), Symbol::intern("a"), Symbol::intern("b")];
        syms.sort();
        let names: Vec<_> = syms.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_lookup_finds_interned() {
        let sym = Symbol::intern("lookup_target");
        assert_eq!(Symbol::lookup("lookup_target"), Some(sym));
    }

    #[test]
    fn test_lookup_does_not_intern() {
        let name = "lookup_never_interned";
        assert_eq!(Symbol::lookup(name), None);
        assert_eq!(Symbol::lookup(name), None);
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(Symbol::intern(""), Symbol::intern(""));
        assert_eq!(Symbol::intern("").as_str(), "");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn intern_preserves_name(name in "[a-z_/]{0,16}") {
                prop_assert_eq!(Symbol::intern(&name).as_str(), name.as_str());
            }

            #[test]
            fn equality_follows_names(a in "[a-c]{1,3}", b in "[a-c]{1,3}") {
                prop_assert_eq!(Symbol::intern(&a) == Symbol::intern(&b), a == b);
            }
        }
    }
}
