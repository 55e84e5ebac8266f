//! The atomic record: a finite mapping from attribute name to cell value.

use std::collections::HashMap;

/// A single record. Missing keys read as the empty string; insertion order
/// of keys carries no meaning (attribute declaration order, kept on
/// `Entity`, drives column ordering for any external writer).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self {
            cells: HashMap::new(),
        }
    }

    pub fn with_cell(mut self, attribute_name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cells.insert(attribute_name.into(), value.into());
        self
    }

    pub fn set(&mut self, attribute_name: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(attribute_name.into(), value.into());
    }

    /// Reads a cell, returning the empty string for an absent key.
    pub fn get(&self, attribute_name: &str) -> &str {
        self.cells.get(attribute_name).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty_cell(&self, attribute_name: &str) -> bool {
        self.get(attribute_name).is_empty()
    }

    pub fn contains(&self, attribute_name: &str) -> bool {
        self.cells.contains_key(attribute_name)
    }
}
