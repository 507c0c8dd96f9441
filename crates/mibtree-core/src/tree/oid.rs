//! Numeric OID representation.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Write};

/// A numeric OID, printed in dotted form with a leading dot (".1.3.6.1").
///
/// The leading dot marks the path as absolute, matching how management
/// tooling prints OIDs rooted at iso.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Oid {
    arcs: Vec<u32>,
}

impl Oid {
    /// Creates an OID from a vector of arcs.
    #[must_use]
    pub fn new(arcs: Vec<u32>) -> Self {
        Oid { arcs }
    }

    /// Parses dotted notation, with or without the leading dot.
    ///
    /// Returns `None` for empty input or non-numeric components.
    #[must_use]
    pub fn from_dotted(s: &str) -> Option<Self> {
        let s = s.strip_prefix('.').unwrap_or(s);
        if s.is_empty() {
            return None;
        }
        let arcs: Result<Vec<u32>, _> = s.split('.').map(str::parse).collect();
        arcs.ok().map(Oid::new)
    }

    /// Renders dotted notation with the leading dot.
    #[must_use]
    pub fn to_dotted(&self) -> String {
        let mut result = String::with_capacity(self.arcs.len() * 4);
        for arc in &self.arcs {
            result.push('.');
            // write! to String is infallible
            let _ = write!(result, "{arc}");
        }
        result
    }

    /// Creates a child OID by appending an arc.
    #[must_use]
    pub fn child(&self, arc: u32) -> Self {
        let mut arcs = Vec::with_capacity(self.arcs.len() + 1);
        arcs.extend_from_slice(&self.arcs);
        arcs.push(arc);
        Oid::new(arcs)
    }

    /// The arcs as a slice.
    #[must_use]
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Number of arcs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// True when the OID has no arcs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dotted())
    }
}
