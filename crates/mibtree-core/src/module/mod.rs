//! Extracted module representation.
//!
//! A [`RawModule`] is the output of the extractor: the module header, every
//! OID-bearing declaration found in the text, and the import table. Nothing
//! here is resolved; parent labels are still symbols that may live in other
//! modules. Resolution against the global tree is the resolver's job.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// Module name and, when present, the assignment that anchors the module
/// into the global OID tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleIdentity {
    /// Module name from the DEFINITIONS header.
    pub name: String,
    /// MODULE-IDENTITY assignment, absent for base modules and for plain
    /// collections of definitions.
    pub anchor: Option<Anchor>,
}

impl ModuleIdentity {
    /// Creates an identity with no anchor.
    #[must_use]
    pub fn new(name: &str) -> Self {
        ModuleIdentity {
            name: String::from(name),
            anchor: None,
        }
    }
}

/// A MODULE-IDENTITY assignment: `symbol MODULE-IDENTITY ... ::= { parent index }`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    /// Symbol being defined.
    pub symbol: String,
    /// Parent label, usually imported from another module.
    pub parent: String,
    /// Arc under the parent.
    pub index: u32,
}

/// SYNTAX clause classification.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Syntax {
    /// Verbatim syntax text, e.g. `Integer32 (0..100)`.
    Plain(String),
    /// `SEQUENCE OF` syntax marking a conceptual table.
    Table {
        /// Row type named after `SEQUENCE OF`.
        element_type: String,
    },
}

/// One OID-bearing declaration.
///
/// Covers OBJECT-TYPE, OBJECT-IDENTITY, MODULE-IDENTITY, NOTIFICATION-TYPE
/// and plain `OBJECT IDENTIFIER` assignments. The metadata clauses are kept
/// as written; no vocabulary normalization happens at this stage.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Declaration {
    /// Symbol being defined.
    pub symbol: String,
    /// Parent label from the assignment suffix.
    pub parent: String,
    /// Arc under the parent.
    pub index: u32,
    /// SYNTAX clause, when the declaration form carries one.
    pub syntax: Option<Syntax>,
    /// MAX-ACCESS or ACCESS clause value.
    pub access: Option<String>,
    /// STATUS clause value.
    pub status: Option<String>,
    /// DESCRIPTION clause text with the quotes stripped.
    pub description: Option<String>,
}

impl Declaration {
    /// Creates a declaration with no metadata clauses.
    #[must_use]
    pub fn new(symbol: &str, parent: &str, index: u32) -> Self {
        Declaration {
            symbol: String::from(symbol),
            parent: String::from(parent),
            index,
            syntax: None,
            access: None,
            status: None,
            description: None,
        }
    }
}

/// Import table for one module.
///
/// Tracks both directions of the IMPORTS clause: which symbols each module
/// supplies, and which module supplies a given symbol. When two modules
/// list the same symbol the later FROM clause wins the symbol lookup, while
/// both per-module lists keep their entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportTable {
    by_module: BTreeMap<String, Vec<String>>,
    by_symbol: BTreeMap<String, String>,
}

impl ImportTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        ImportTable::default()
    }

    /// Records one FROM clause.
    pub fn add(&mut self, module: &str, symbols: &[String]) {
        let list = self.by_module.entry(String::from(module)).or_default();
        for symbol in symbols {
            list.push(symbol.clone());
            self.by_symbol
                .insert(symbol.clone(), String::from(module));
        }
    }

    /// Returns the module a symbol was imported from.
    #[must_use]
    pub fn source_of(&self, symbol: &str) -> Option<&str> {
        self.by_symbol.get(symbol).map(String::as_str)
    }

    /// Returns the symbols imported from a module.
    #[must_use]
    pub fn symbols_from(&self, module: &str) -> Option<&[String]> {
        self.by_module.get(module).map(Vec::as_slice)
    }

    /// Iterates over the imported module names.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.by_module.keys().map(String::as_str)
    }

    /// True when no FROM clause has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_module.is_empty()
    }
}

/// An extracted module before resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawModule {
    /// Module identity from the header.
    pub identity: ModuleIdentity,
    /// Declarations in source order.
    declarations: Vec<Declaration>,
    /// Symbol lookup into `declarations`; first occurrence wins.
    index: BTreeMap<String, usize>,
    /// Import table.
    pub imports: ImportTable,
}

impl RawModule {
    /// Creates an empty module with the given identity.
    #[must_use]
    pub fn new(identity: ModuleIdentity) -> Self {
        RawModule {
            identity,
            declarations: Vec::new(),
            index: BTreeMap::new(),
            imports: ImportTable::new(),
        }
    }

    /// Module name, as declared in the header.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Adds a declaration.
    ///
    /// Declarations under the parent label `"0"` (the `0.0` null anchor,
    /// e.g. `zeroDotZero`) are not addressable in the tree and are dropped
    /// here. Duplicate symbols are kept in the list, but lookups resolve to
    /// the first occurrence.
    pub fn push_declaration(&mut self, declaration: Declaration) {
        if declaration.parent == "0" {
            return;
        }
        let idx = self.declarations.len();
        self.index
            .entry(declaration.symbol.clone())
            .or_insert(idx);
        self.declarations.push(declaration);
    }

    /// Looks up a declaration by symbol.
    #[must_use]
    pub fn declaration(&self, symbol: &str) -> Option<&Declaration> {
        self.index.get(symbol).map(|&idx| &self.declarations[idx])
    }

    /// Declarations in source order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// True when the module declares nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Finds the module-local root declaration.
    ///
    /// The root is the first declaration in source order whose parent label
    /// is not itself declared in this module. Returns `None` when every
    /// parent is local, which means the module cannot hang off the global
    /// tree at all.
    #[must_use]
    pub fn find_root(&self) -> Option<&Declaration> {
        self.declarations
            .iter()
            .find(|decl| !self.index.contains_key(decl.parent.as_str()))
    }
}
