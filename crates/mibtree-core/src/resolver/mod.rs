//! Module registry and namespace resolution.
//!
//! The resolver links extracted modules into one [`OidTree`]. Modules are
//! registered by name, then [`Resolver::load`] walks a module's import
//! table, loads the imported modules first, attaches the module's anchor
//! and finally every declaration, resolving parent references across
//! module boundaries on demand. Loading is idempotent: nodes are attached
//! at most once per `(module, symbol)` pair, so overlapping or repeated
//! loads never duplicate nodes.
//!
//! All state is owned by the resolver instance. Two resolvers never share
//! a registry or a tree, so tests and independent sessions cannot
//! contaminate each other.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::Error;
use crate::lexer::Diagnostic;
use crate::module::{Declaration, RawModule};
use crate::parser::{extract, Extraction};
use crate::tree::{NodeId, OidNode, OidTree};

/// Load progress of one registered module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoadState {
    /// Registered but not loaded.
    Registered,
    /// A `load` call is currently attaching this module.
    Resolving,
    /// Every declaration is attached to the tree.
    Loaded,
}

/// Registry entry for one module.
#[derive(Clone, Debug)]
struct ModuleRecord {
    module: RawModule,
    diagnostics: Vec<Diagnostic>,
    state: LoadState,
    anchor: Option<NodeId>,
}

/// An import naming a module absent from the registry.
///
/// Recorded during the import walk instead of failing the load, since
/// real-world module sets are routinely incomplete. Loading only fails
/// later if a declaration actually needs a parent from the missing
/// module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingImport {
    /// Module whose import table named the missing module.
    pub importer: String,
    /// The module that was not registered.
    pub module: String,
}

/// A batch source whose text could not be extracted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseFailure {
    /// Where the text came from, a file path or a batch position.
    pub source: String,
    /// The extraction error.
    pub error: Error,
}

/// Module registry plus the resolved OID tree.
#[derive(Debug)]
pub struct Resolver {
    modules: BTreeMap<String, ModuleRecord>,
    tree: OidTree,
    missing_imports: Vec<MissingImport>,
    parse_failures: Vec<ParseFailure>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    /// Creates an empty resolver with a freshly seeded tree.
    #[must_use]
    pub fn new() -> Self {
        Resolver {
            modules: BTreeMap::new(),
            tree: OidTree::new(),
            missing_imports: Vec::new(),
            parse_failures: Vec::new(),
        }
    }

    /// Registers an extracted module and returns its name.
    ///
    /// Re-registering replaces the stored module and diagnostics but keeps
    /// the load state, so a module that is already loaded stays loaded.
    pub fn register(&mut self, extraction: Extraction) -> String {
        let Extraction {
            module,
            diagnostics,
        } = extraction;
        let name = String::from(module.name());
        match self.modules.get_mut(&name) {
            Some(record) => {
                record.module = module;
                record.diagnostics = diagnostics;
            }
            None => {
                self.modules.insert(
                    name.clone(),
                    ModuleRecord {
                        module,
                        diagnostics,
                        state: LoadState::Registered,
                        anchor: None,
                    },
                );
            }
        }
        name
    }

    /// Extracts, registers and loads a single module text.
    ///
    /// Returns the module name on success.
    ///
    /// # Errors
    ///
    /// Extraction errors and anything [`Resolver::load`] reports.
    pub fn load_text(&mut self, source: &str) -> Result<String, Error> {
        self.load_module(extract(source)?)
    }

    /// Registers and loads an already extracted module.
    ///
    /// # Errors
    ///
    /// Anything [`Resolver::load`] reports.
    pub fn load_module(&mut self, extraction: Extraction) -> Result<String, Error> {
        let name = self.register(extraction);
        self.load(&name)?;
        Ok(name)
    }

    /// Extracts and registers every source, then loads each one.
    ///
    /// Registration happens for the whole batch before any load, so
    /// sources may arrive in any order regardless of who imports from
    /// whom. Sources that fail extraction are recorded in
    /// [`Resolver::parse_failures`] and skipped.
    ///
    /// # Errors
    ///
    /// The first load failure; earlier modules stay loaded.
    pub fn load_all<I, S>(&mut self, sources: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = Vec::new();
        for (position, source) in sources.into_iter().enumerate() {
            match extract(source.as_ref()) {
                Ok(extraction) => names.push(self.register(extraction)),
                Err(error) => {
                    self.note_parse_failure(format!("source {}", position + 1), error);
                }
            }
        }
        for name in &names {
            self.load(name)?;
        }
        Ok(())
    }

    /// Loads a registered module: imported modules first, then the anchor,
    /// then every declaration in source order.
    ///
    /// A no-op when the module is already loaded. On failure the module
    /// drops back to its registered state so a later call can retry, for
    /// example after the missing dependency has been registered; nodes
    /// attached before the failure stay in the tree and are reused.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownModule`] when `name` was never registered, or when
    /// a declaration's parent is imported from an unregistered module.
    /// [`Error::ImportCycle`] when the module is re-entered through its
    /// own import chain. [`Error::Parse`] when the module carries an
    /// anchor but every declaration's parent is local, leaving no root to
    /// attach. [`Error::NodeNotFound`] when a parent reference cannot be
    /// resolved anywhere.
    pub fn load(&mut self, name: &str) -> Result<(), Error> {
        match self.modules.get(name) {
            None => return Err(Error::UnknownModule(String::from(name))),
            Some(record) => match record.state {
                LoadState::Loaded => return Ok(()),
                LoadState::Resolving => return Err(Error::ImportCycle(String::from(name))),
                LoadState::Registered => {}
            },
        }
        self.set_state(name, LoadState::Resolving);
        match self.load_registered(name) {
            Ok(()) => {
                self.set_state(name, LoadState::Loaded);
                Ok(())
            }
            Err(error) => {
                self.set_state(name, LoadState::Registered);
                Err(error)
            }
        }
    }

    /// Looks up a symbol in the resolved tree.
    ///
    /// The search is depth first, parent before children, children in
    /// sorted sibling order, so the first match is stable for a given
    /// tree. With `module` given, only nodes owned by that module match
    /// and the module must already be loaded.
    ///
    /// # Errors
    ///
    /// [`Error::ModuleNotLoaded`] when `module` is given but not loaded,
    /// [`Error::NodeNotFound`] when the search exhausts the tree.
    pub fn find(&self, symbol: &str, module: Option<&str>) -> Result<&OidNode, Error> {
        if let Some(scope) = module {
            if !self.is_loaded(scope) {
                return Err(Error::ModuleNotLoaded(String::from(scope)));
            }
            return self
                .tree
                .find_in(scope, symbol)
                .ok_or_else(|| Error::NodeNotFound {
                    symbol: String::from(symbol),
                    module: Some(String::from(scope)),
                });
        }
        self.tree.find(symbol).ok_or_else(|| Error::NodeNotFound {
            symbol: String::from(symbol),
            module: None,
        })
    }

    /// The registered module named `name`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownModule`] when `name` was never registered.
    pub fn module(&self, name: &str) -> Result<&RawModule, Error> {
        Ok(&self.record(name)?.module)
    }

    /// Extraction diagnostics recorded when `name` was registered.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownModule`] when `name` was never registered.
    pub fn diagnostics(&self, name: &str) -> Result<&[Diagnostic], Error> {
        Ok(&self.record(name)?.diagnostics)
    }

    /// The node a loaded module anchored into the wider namespace, or
    /// `None` for modules without an anchor or not yet loaded.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownModule`] when `name` was never registered.
    pub fn anchor(&self, name: &str) -> Result<Option<&OidNode>, Error> {
        Ok(self
            .record(name)?
            .anchor
            .and_then(|id| self.tree.node(id)))
    }

    /// Whether `name` is registered and fully loaded.
    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.modules
            .get(name)
            .is_some_and(|record| record.state == LoadState::Loaded)
    }

    /// The resolved tree.
    #[must_use]
    pub fn tree(&self) -> &OidTree {
        &self.tree
    }

    /// Imports that named modules absent from the registry.
    #[must_use]
    pub fn missing_imports(&self) -> &[MissingImport] {
        &self.missing_imports
    }

    /// Batch sources that failed extraction.
    #[must_use]
    pub fn parse_failures(&self) -> &[ParseFailure] {
        &self.parse_failures
    }

    /// Records a source that failed extraction, keyed by a caller-chosen
    /// label such as a file path.
    pub fn note_parse_failure(&mut self, source: String, error: Error) {
        self.parse_failures.push(ParseFailure { source, error });
    }

    fn record(&self, name: &str) -> Result<&ModuleRecord, Error> {
        self.modules
            .get(name)
            .ok_or_else(|| Error::UnknownModule(String::from(name)))
    }

    fn set_state(&mut self, name: &str, state: LoadState) {
        if let Some(record) = self.modules.get_mut(name) {
            record.state = state;
        }
    }

    fn note_missing_import(&mut self, importer: &str, module: &str) {
        let entry = MissingImport {
            importer: String::from(importer),
            module: String::from(module),
        };
        if !self.missing_imports.contains(&entry) {
            self.missing_imports.push(entry);
        }
    }

    fn load_registered(&mut self, name: &str) -> Result<(), Error> {
        let imported: Vec<String> = self
            .record(name)?
            .module
            .imports
            .modules()
            .map(String::from)
            .collect();
        for import in &imported {
            if import == name {
                continue;
            }
            if self.modules.contains_key(import) {
                self.load(import)?;
            } else {
                self.note_missing_import(name, import);
            }
        }

        if self.record(name)?.module.identity.anchor.is_some() {
            let root = self
                .record(name)?
                .module
                .find_root()
                .cloned()
                .ok_or_else(|| {
                    Error::Parse(String::from("All MIB nodes have parent in current mib"))
                })?;
            let anchor = self.attach(name, &root)?;
            if let Some(record) = self.modules.get_mut(name) {
                record.anchor = Some(anchor);
            }
        }

        let declarations: Vec<Declaration> =
            self.record(name)?.module.declarations().cloned().collect();
        for declaration in &declarations {
            self.attach(name, declaration)?;
        }
        Ok(())
    }

    /// Attaches one declaration, resolving and attaching its ancestors on
    /// demand. Returns the existing node when the `(module, symbol)` pair
    /// is already in the tree.
    fn attach(&mut self, module: &str, declaration: &Declaration) -> Result<NodeId, Error> {
        let mut attaching = BTreeSet::new();
        self.attach_guarded(module, declaration, &mut attaching)
    }

    fn attach_guarded(
        &mut self,
        module: &str,
        declaration: &Declaration,
        attaching: &mut BTreeSet<(String, String)>,
    ) -> Result<NodeId, Error> {
        if let Some(id) = self.tree.find_id_in(module, &declaration.symbol) {
            return Ok(id);
        }
        // Re-entry means the parent chain loops back on itself and can
        // never reach the tree.
        if !attaching.insert((String::from(module), declaration.symbol.clone())) {
            return Err(Error::NodeNotFound {
                symbol: declaration.symbol.clone(),
                module: Some(String::from(module)),
            });
        }
        let parent = self.resolve_parent(module, &declaration.parent, attaching)?;
        Ok(self.tree.attach_child(parent, module, declaration)?)
    }

    /// Resolves a parent reference to a tree node: the tree itself first,
    /// then the import table, then the module's own declarations.
    fn resolve_parent(
        &mut self,
        module: &str,
        parent: &str,
        attaching: &mut BTreeSet<(String, String)>,
    ) -> Result<NodeId, Error> {
        if let Some(id) = self.tree.find_id_in(module, parent) {
            return Ok(id);
        }
        let record = self.record(module)?;
        if let Some(owner) = record.module.imports.source_of(parent).map(String::from) {
            let declaration = self
                .record(&owner)?
                .module
                .declaration(parent)
                .cloned()
                .ok_or_else(|| Error::NodeNotFound {
                    symbol: String::from(parent),
                    module: Some(owner.clone()),
                })?;
            return self.attach_guarded(&owner, &declaration, attaching);
        }
        if let Some(declaration) = record.module.declaration(parent).cloned() {
            return self.attach_guarded(module, &declaration, attaching);
        }
        Err(Error::NodeNotFound {
            symbol: String::from(parent),
            module: Some(String::from(module)),
        })
    }
}
