//! Keyword lookup table.
//!
//! Uses a sorted static array with binary search for `no_std` compatibility.

use super::TokenKind;

/// Sorted keyword table for binary search.
///
/// IMPORTANT: entries MUST be sorted by byte value; `test_keywords_sorted`
/// verifies this at test time.
static KEYWORDS: &[(&str, TokenKind)] = &[
    ("ACCESS", TokenKind::KwAccess),
    ("AUGMENTS", TokenKind::KwAugments),
    ("BEGIN", TokenKind::KwBegin),
    ("DEFINITIONS", TokenKind::KwDefinitions),
    ("DEFVAL", TokenKind::KwDefval),
    ("DESCRIPTION", TokenKind::KwDescription),
    ("END", TokenKind::KwEnd),
    ("EXPORTS", TokenKind::KwExports),
    ("FROM", TokenKind::KwFrom),
    ("IDENTIFIER", TokenKind::KwIdentifier),
    ("IMPORTS", TokenKind::KwImports),
    ("INDEX", TokenKind::KwIndex),
    ("MACRO", TokenKind::KwMacro),
    ("MAX-ACCESS", TokenKind::KwMaxAccess),
    ("MODULE-IDENTITY", TokenKind::KwModuleIdentity),
    ("NOTIFICATION-TYPE", TokenKind::KwNotificationType),
    ("OBJECT", TokenKind::KwObject),
    ("OBJECT-IDENTITY", TokenKind::KwObjectIdentity),
    ("OBJECT-TYPE", TokenKind::KwObjectType),
    ("OF", TokenKind::KwOf),
    ("REFERENCE", TokenKind::KwReference),
    ("SEQUENCE", TokenKind::KwSequence),
    ("STATUS", TokenKind::KwStatus),
    ("SYNTAX", TokenKind::KwSyntax),
    ("UNITS", TokenKind::KwUnits),
];

/// Look up a keyword by text.
///
/// Returns `Some(TokenKind)` if the text is a keyword, `None` otherwise.
#[must_use]
pub fn lookup_keyword(text: &str) -> Option<TokenKind> {
    KEYWORDS
        .binary_search_by(|entry| entry.0.cmp(text))
        .ok()
        .map(|idx| KEYWORDS[idx].1)
}
