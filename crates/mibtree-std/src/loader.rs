//! Filesystem loading for MIB modules.
//!
//! Reads module text from individual files or whole directory trees and
//! feeds it to a [`Resolver`]. Module names come from the text itself,
//! not from file names, so a directory can hold files in any naming
//! scheme and any order; imports are pulled in as each module loads.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use mibtree_core::error::Error;
use mibtree_core::parser::extract;
use mibtree_core::resolver::Resolver;

/// Loader error.
#[derive(Debug)]
pub enum LoadError {
    /// IO error.
    Io(io::Error),
    /// Extraction or resolution failed.
    Resolve(Error),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Resolve(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Resolve(e) => Some(e),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<Error> for LoadError {
    fn from(e: Error) -> Self {
        Self::Resolve(e)
    }
}

/// Load a single module file into the resolver.
///
/// The file is decoded lossily, so stray non-UTF-8 bytes in vendor
/// files do not abort the load.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the text is not a
/// module, or resolution fails.
pub fn load_file<P: AsRef<Path>>(resolver: &mut Resolver, path: P) -> Result<String, LoadError> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(resolver.load_text(&text)?)
}

/// Load every module file under a directory into the resolver.
///
/// Walks the tree recursively in file-name order. All parseable files
/// are registered first and loaded after, so modules may import from
/// files that sort later. Files that do not parse as modules are
/// recorded on the resolver as parse failures and skipped.
///
/// Returns the names of the registered modules in walk order.
///
/// # Errors
///
/// Returns an error if a file cannot be read or a registered module
/// fails to load.
pub fn load_dir<P: AsRef<Path>>(resolver: &mut Resolver, dir: P) -> Result<Vec<String>, LoadError> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let bytes = fs::read(entry.path())?;
        let text = String::from_utf8_lossy(&bytes);
        match extract(&text) {
            Ok(extraction) => names.push(resolver.register(extraction)),
            Err(e) => resolver.note_parse_failure(entry.path().display().to_string(), e),
        }
    }

    for name in &names {
        resolver.load(name)?;
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};

    const BASE: &str = r#"
SNMPv2-SMI DEFINITIONS ::= BEGIN

org OBJECT IDENTIFIER ::= { iso 3 }
dod OBJECT IDENTIFIER ::= { org 6 }
internet OBJECT IDENTIFIER ::= { dod 1 }
private OBJECT IDENTIFIER ::= { internet 4 }
enterprises OBJECT IDENTIFIER ::= { private 1 }

END
"#;

    const VENDOR: &str = r#"
ACME-MIB DEFINITIONS ::= BEGIN

IMPORTS
    enterprises
        FROM SNMPv2-SMI;

acme OBJECT IDENTIFIER ::= { enterprises 9999 }

END
"#;

    #[test]
    fn test_load_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), BASE).unwrap();

        let mut resolver = Resolver::new();
        let name = load_file(&mut resolver, file.path()).unwrap();
        assert_eq!(name, "SNMPv2-SMI");

        let node = resolver.find("enterprises", None).unwrap();
        assert_eq!(node.oid.to_string(), ".1.3.6.1.4.1");
    }

    #[test]
    fn test_load_file_missing() {
        let dir = tempdir().unwrap();
        let mut resolver = Resolver::new();
        let err = load_file(&mut resolver, dir.path().join("absent.mib")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_load_file_rejects_junk() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "this is not a module").unwrap();

        let mut resolver = Resolver::new();
        let err = load_file(&mut resolver, file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Resolve(Error::Parse(_))));
    }

    #[test]
    fn test_load_dir_out_of_order() {
        let dir = tempdir().unwrap();
        // ACME-MIB sorts before SNMPv2-SMI, so the importer is walked
        // first and its dependency is only registered, not yet loaded.
        fs::write(dir.path().join("ACME-MIB.mib"), VENDOR).unwrap();
        fs::write(dir.path().join("SNMPv2-SMI.mib"), BASE).unwrap();

        let mut resolver = Resolver::new();
        let names = load_dir(&mut resolver, dir.path()).unwrap();
        assert_eq!(names, vec!["ACME-MIB", "SNMPv2-SMI"]);

        assert!(resolver.is_loaded("ACME-MIB"));
        assert!(resolver.is_loaded("SNMPv2-SMI"));
        let node = resolver.find("acme", None).unwrap();
        assert_eq!(node.oid.to_string(), ".1.3.6.1.4.1.9999");
    }

    #[test]
    fn test_load_dir_recurses_subdirectories() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("SNMPv2-SMI.mib"), BASE).unwrap();
        let sub = dir.path().join("vendor");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("ACME-MIB.mib"), VENDOR).unwrap();

        let mut resolver = Resolver::new();
        load_dir(&mut resolver, dir.path()).unwrap();
        assert!(resolver.is_loaded("ACME-MIB"));
        assert!(resolver.find("acme", Some("ACME-MIB")).is_ok());
    }

    #[test]
    fn test_load_dir_records_unparseable_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("README.txt"), "notes, not a module").unwrap();
        fs::write(dir.path().join("SNMPv2-SMI.mib"), BASE).unwrap();

        let mut resolver = Resolver::new();
        let names = load_dir(&mut resolver, dir.path()).unwrap();
        assert_eq!(names, vec!["SNMPv2-SMI"]);
        assert!(resolver.is_loaded("SNMPv2-SMI"));

        let failures = resolver.parse_failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].source.ends_with("README.txt"));
    }
}
