//! Reference table for structural sharing.
//!
//! Lifecycle: eine ReferenceTable pro Decode-Session, nicht wiederverwendbar.
//! Indizes sind 1-basiert und werden in Decode-Reihenfolge vergeben.

use crate::value::Value;
use crate::{Error, Result};

/// Anfangskapazitaet; waechst danach geometrisch (Vec-Verdopplung).
const INITIAL_CAPACITY: usize = 128;

/// Growable, 1-based table of previously decoded items.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    entries: Vec<Value>,
}

impl ReferenceTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self { entries: Vec::with_capacity(INITIAL_CAPACITY) }
    }

    /// Appends `value` and returns its 1-based index (equal to the new table length).
    pub fn append(&mut self, value: Value) -> usize {
        self.entries.push(value);
        self.entries.len()
    }

    /// Resolves a 1-based index. The returned value shares storage with the table entry.
    pub fn resolve(&self, index: i32) -> Result<Value> {
        let slot = usize::try_from(index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.entries.get(i));
        match slot {
            Some(value) => Ok(value.clone()),
            None => Err(Error::CorruptReference { index, table_len: self.entries.len() }),
        }
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::CharString;

    fn sym(name: &str) -> Value {
        Value::Symbol(CharString::from(name))
    }

    #[test]
    fn append_returns_one_based_index() {
        let mut t = ReferenceTable::new();
        assert_eq!(t.append(sym("a")), 1);
        assert_eq!(t.append(sym("b")), 2);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn resolve_in_range() {
        let mut t = ReferenceTable::new();
        t.append(sym("a"));
        t.append(sym("b"));
        assert_eq!(t.resolve(2).unwrap(), sym("b"));
        assert_eq!(t.resolve(1).unwrap(), sym("a"));
    }

    #[test]
    fn resolve_zero_is_corrupt() {
        let mut t = ReferenceTable::new();
        t.append(sym("a"));
        assert_eq!(
            t.resolve(0).unwrap_err(),
            Error::CorruptReference { index: 0, table_len: 1 }
        );
    }

    #[test]
    fn resolve_negative_is_corrupt() {
        let t = ReferenceTable::new();
        assert!(matches!(t.resolve(-4), Err(Error::CorruptReference { index: -4, .. })));
    }

    #[test]
    fn resolve_past_end_is_corrupt() {
        let mut t = ReferenceTable::new();
        t.append(sym("a"));
        assert!(matches!(t.resolve(2), Err(Error::CorruptReference { index: 2, table_len: 1 })));
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut t = ReferenceTable::new();
        for i in 0..(INITIAL_CAPACITY * 2 + 1) {
            t.append(sym(&format!("s{i}")));
        }
        assert_eq!(t.resolve(257).unwrap(), sym("s256"));
    }

    #[test]
    fn resolved_value_aliases_entry() {
        let mut t = ReferenceTable::new();
        t.append(sym("shared"));
        let a = t.resolve(1).unwrap();
        let b = t.resolve(1).unwrap();
        assert!(a.ptr_eq(&b));
    }
}
