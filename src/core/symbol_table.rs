//! Process-wide symbol table.
//!
//! The scanner creates an entry the first time it sees an identifier, the
//! semantic observer stamps declared names with their type, and the IR
//! synthesis observer reads the final set of names. Entries are never
//! removed.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::error::{CompileError, CompileResult};

/// Handle through which every phase shares one symbol table.
pub type SharedSymbolTable = Rc<RefCell<SymbolTable>>;

/// Semantic type of a source level name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceCodeType {
    Int,
}

impl fmt::Display for SourceCodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceCodeType::Int => f.write_str("Int"),
        }
    }
}

/// One symbol table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTableEntry {
    name: String,
    ty: Option<SourceCodeType>,
}

impl SymbolTableEntry {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type assigned by semantic analysis, if any.
    pub fn ty(&self) -> Option<SourceCodeType> {
        self.ty
    }

    pub fn set_type(&mut self, ty: SourceCodeType) {
        self.ty = Some(ty);
    }
}

/// Mapping from identifier name to its entry.
///
/// Backed by an ordered map so that iteration (and therefore every dump and
/// every name-indexed table built from it) is deterministic.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    entries: BTreeMap<String, SymbolTableEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh table wrapped for sharing between phases.
    pub fn shared() -> SharedSymbolTable {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Insert an untyped entry for `name` unless one already exists.
    pub fn add(&mut self, name: &str) -> &mut SymbolTableEntry {
        self.entries
            .entry(name.to_string())
            .or_insert_with(|| SymbolTableEntry::new(name))
    }

    pub fn get(&self, name: &str) -> CompileResult<&SymbolTableEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| CompileError::UndeclaredSymbol { name: name.to_string() })
    }

    pub fn get_mut(&mut self, name: &str) -> CompileResult<&mut SymbolTableEntry> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| CompileError::UndeclaredSymbol { name: name.to_string() })
    }

    /// All names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render one `(name, type)` line per entry. Untyped entries print `null`.
    pub fn dump_lines(&self) -> Vec<String> {
        self.entries
            .values()
            .map(|entry| match entry.ty {
                Some(ty) => format!("({}, {})", entry.name, ty),
                None => format!("({}, null)", entry.name),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut table = SymbolTable::new();
        table.add("a");
        table.get_mut("a").unwrap().set_type(SourceCodeType::Int);
        table.add("a");

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("a").unwrap().ty(), Some(SourceCodeType::Int));
    }

    #[test]
    fn test_missing_name_is_an_error() {
        let table = SymbolTable::new();
        assert!(matches!(
            table.get("x"),
            Err(CompileError::UndeclaredSymbol { name }) if name == "x"
        ));
    }

    #[test]
    fn test_dump_is_sorted() {
        let mut table = SymbolTable::new();
        table.add("b");
        table.add("a").set_type(SourceCodeType::Int);

        assert_eq!(table.dump_lines(), vec!["(a, Int)", "(b, null)"]);
    }
}
