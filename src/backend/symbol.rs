//! Names for functors, atoms and realized random variables.
//!
//! When the `symbol-interning` feature is enabled, `Symbol` is a 4-byte key into
//! a process-wide lasso `ThreadedRodeo`; equality and hashing are O(1).
//! Without the feature it is a thin `String` wrapper with the same API.
//!
//! Both variants order lexically by their text so that terms built from
//! symbols have a stable canonical order (needed by `cvariables` sets and by
//! the ordered bookkeeping maps of the guarded formula).
//!
//! # Example
//! ```ignore
//! use crate::backend::symbol::{Symbol, intern};
//!
//! let s1 = intern("normal");
//! let s2 = intern("normal");
//! assert_eq!(s1, s2);
//! assert!(intern("a") < intern("b"));
//! ```

use std::cmp::Ordering;

#[cfg(feature = "symbol-interning")]
mod interned {
    use lasso::{Spur, ThreadedRodeo};
    use std::sync::OnceLock;

    static INTERNER: OnceLock<ThreadedRodeo> = OnceLock::new();

    #[inline]
    fn interner() -> &'static ThreadedRodeo {
        INTERNER.get_or_init(ThreadedRodeo::new)
    }

    /// Interned symbol - 4 bytes, O(1) equality
    #[derive(Copy, Clone, Eq, PartialEq, Hash)]
    pub struct Symbol(Spur);

    impl Symbol {
        #[inline]
        pub fn new(s: &str) -> Self {
            Symbol(interner().get_or_intern(s))
        }

        #[inline]
        pub fn from_string(s: String) -> Self {
            Symbol(interner().get_or_intern(s))
        }

        #[inline]
        pub fn as_str(&self) -> &'static str {
            interner().resolve(&self.0)
        }
    }

    impl std::fmt::Debug for Symbol {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "Symbol({:?})", self.as_str())
        }
    }
}

#[cfg(not(feature = "symbol-interning"))]
mod string_based {
    /// Non-interned symbol - a String wrapper with the interned API
    #[derive(Clone, Eq, PartialEq, Hash, Debug)]
    pub struct Symbol(String);

    impl Symbol {
        #[inline]
        pub fn new(s: &str) -> Self {
            Symbol(s.to_string())
        }

        /// Take ownership of `s` (no copy)
        #[inline]
        pub fn from_string(s: String) -> Self {
            Symbol(s)
        }

        #[inline]
        pub fn as_str(&self) -> &str {
            &self.0
        }
    }
}

#[cfg(feature = "symbol-interning")]
pub use interned::Symbol;

#[cfg(not(feature = "symbol-interning"))]
pub use string_based::Symbol;

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        self.as_str().cmp(other.as_str())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Symbol {
    #[inline]
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

impl From<String> for Symbol {
    #[inline]
    fn from(s: String) -> Self {
        Symbol::from_string(s)
    }
}

impl AsRef<str> for Symbol {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Intern a string and return a Symbol
#[inline]
pub fn intern(s: &str) -> Symbol {
    Symbol::new(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_equality() {
        let s1 = intern("normal");
        let s2 = Symbol::from_string("normal".to_string());
        let s3 = intern("beta");
        assert_eq!(s1, s2);
        assert_ne!(s1, s3);
        assert!(s1 == "normal");
    }

    #[test]
    fn test_symbol_order_is_lexical() {
        let mut names = vec![intern("z"), intern("a"), intern("m")];
        names.sort();
        let rendered: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        assert_eq!(rendered, vec!["a", "m", "z"]);
    }

    #[test]
    fn test_symbol_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<Symbol, i32> = HashMap::new();
        map.insert(intern("key"), 42);
        assert_eq!(map.get(&intern("key")), Some(&42));
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(format!("{}", intern("x")), "x");
    }
}
