//! The two-level navigation lookup table.

use std::collections::HashMap;

use crate::navigation::NavigationData;

/// Maps declaring type FQN to method name to source location.
///
/// A type key exists only if at least one of its methods resolved to a location. When
/// two methods of a type share a simple name (overloads), the last one inserted wins;
/// the method-name key carries no signature.
#[derive(Debug, Default)]
pub struct NavigationIndex {
    types: HashMap<String, HashMap<String, NavigationData>>,
}

impl NavigationIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> NavigationIndex {
        NavigationIndex::default()
    }

    /// Records the location of one method, overwriting any previous entry with the
    /// same type and method name.
    pub fn insert(&mut self, type_name: &str, method_name: &str, data: NavigationData) {
        self.types
            .entry(type_name.to_string())
            .or_default()
            .insert(method_name.to_string(), data);
    }

    /// Looks up a method location. Absence is `None`, never an error.
    #[must_use]
    pub fn lookup(&self, type_name: &str, method_name: &str) -> Option<&NavigationData> {
        self.types.get(type_name)?.get(method_name)
    }

    /// Number of types with at least one resolved method.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// True when no method has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Removes every entry from both levels.
    pub fn clear(&mut self) {
        self.types.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut index = NavigationIndex::new();
        assert!(index.is_empty());

        index.insert(
            "Samples.Calculator",
            "AddsTwoNumbers",
            NavigationData::new("/src/Calculator.cs".to_string(), 10),
        );

        let data = index.lookup("Samples.Calculator", "AddsTwoNumbers").unwrap();
        assert_eq!(data.file_path(), "/src/Calculator.cs");
        assert_eq!(data.min_line(), 10);

        assert!(index.lookup("Samples.Calculator", "Missing").is_none());
        assert!(index.lookup("Other.Type", "AddsTwoNumbers").is_none());
        assert_eq!(index.type_count(), 1);
    }

    #[test]
    fn last_insert_wins() {
        let mut index = NavigationIndex::new();
        index.insert(
            "T",
            "Overloaded",
            NavigationData::new("a.cs".to_string(), 1),
        );
        index.insert(
            "T",
            "Overloaded",
            NavigationData::new("b.cs".to_string(), 2),
        );

        assert_eq!(index.lookup("T", "Overloaded").unwrap().file_path(), "b.cs");
    }

    #[test]
    fn clear_empties_both_levels() {
        let mut index = NavigationIndex::new();
        index.insert("T", "M", NavigationData::new("a.cs".to_string(), 1));

        index.clear();
        assert!(index.is_empty());
        assert!(index.lookup("T", "M").is_none());

        // clearing twice is harmless
        index.clear();
        assert!(index.is_empty());
    }
}
