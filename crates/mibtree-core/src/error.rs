//! Crate error type.

use alloc::string::String;
use core::fmt;

use crate::tree::TreeError;

/// Errors from extraction and resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The module text could not be understood well enough to extract.
    Parse(String),
    /// No module with this name has been registered.
    UnknownModule(String),
    /// The module is registered but was not loaded when a scoped lookup ran.
    ModuleNotLoaded(String),
    /// No tree node carries this symbol, either globally or within the
    /// named module.
    NodeNotFound {
        /// Symbol that was looked up.
        symbol: String,
        /// Module scope of the lookup, when there was one.
        module: Option<String>,
    },
    /// The module's imports loop back on themselves.
    ImportCycle(String),
    /// Tree mutation failed.
    Tree(TreeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(message) => write!(f, "{message}"),
            Error::UnknownModule(name) => write!(f, "Unknown mib {name}"),
            Error::ModuleNotLoaded(name) => write!(f, "MIB {name} not loaded"),
            Error::NodeNotFound {
                symbol,
                module: Some(module),
            } => write!(f, "No node named {symbol} in {module}"),
            Error::NodeNotFound {
                symbol,
                module: None,
            } => write!(f, "No node named {symbol} in any MIB in the tree"),
            Error::ImportCycle(name) => write!(f, "Import cycle while loading {name}"),
            Error::Tree(err) => write!(f, "{err}"),
        }
    }
}

impl From<TreeError> for Error {
    fn from(err: TreeError) -> Self {
        Error::Tree(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
