//! Interned node identifiers.
//!
//! This module provides the [`Id`] type used to name nodes in the in-memory
//! graph and in layout documents. Identifiers are interned once so that they
//! are `Copy`, cheap to hash and cheap to compare, which matters for graph
//! handles that are looked up on every traversal step.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner shared by all identifiers.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Runs `f` with exclusive access to the global interner.
fn with_interner<T>(f: impl FnOnce(&mut DefaultStringInterner) -> T) -> T {
    let lock = INTERNER.get_or_init(|| Mutex::new(DefaultStringInterner::new()));
    // A poisoned interner is still a valid interner; symbols are append-only.
    let mut interner = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut interner)
}

/// Efficient identifier type using string interning
///
/// # Examples
///
/// ```
/// use strata_core::identifier::Id;
///
/// let source = Id::new("source");
/// let again: Id = "source".into();
/// assert_eq!(source, again);
/// assert_eq!(source.to_string(), "source");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str, interning it on first use.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Returns the interned string, or an empty string for a foreign symbol.
    fn resolve(self) -> String {
        with_interner(|interner| interner.resolve(self.0).unwrap_or_default().to_string())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolve())
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
