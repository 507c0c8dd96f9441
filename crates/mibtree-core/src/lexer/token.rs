//! Token types and spans.

use super::ByteOffset;

/// Span of source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: ByteOffset,
    /// End byte offset (exclusive).
    pub end: ByteOffset,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(start: ByteOffset, end: ByteOffset) -> Self {
        Self { start, end }
    }

    /// Get the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> ByteOffset {
        self.end - self.start
    }

    /// Check if the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Token with kind and source span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Location in source text.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token kinds.
///
/// Only the keywords the extractor dispatches on get distinct kinds;
/// every other word (type names, access and status values, clause
/// keywords of unextracted constructs) stays a plain identifier and is
/// handled by its surrounding rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    // === Special ===
    /// Lexical error.
    Error = 0,
    /// End of input.
    Eof,

    // === Identifiers ===
    /// Uppercase identifier (module names, type names).
    UppercaseIdent,
    /// Lowercase identifier (object names, access/status values).
    LowercaseIdent,

    // === Literals ===
    /// Unsigned decimal number.
    Number,
    /// Signed decimal number (negative).
    NegativeNumber,
    /// Quoted string literal.
    QuotedString,
    /// Hex string literal ('...'H).
    HexString,
    /// Binary string literal ('...'B).
    BinString,

    // === Single-character punctuation ===
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `|`
    Pipe,
    /// `-`
    Minus,

    // === Multi-character operators ===
    /// `..`
    DotDot,
    /// `::=`
    ColonColonEqual,

    // === Structural keywords ===
    /// `DEFINITIONS`
    KwDefinitions,
    /// `BEGIN`
    KwBegin,
    /// `END`
    KwEnd,
    /// `IMPORTS`
    KwImports,
    /// `EXPORTS`
    KwExports,
    /// `FROM`
    KwFrom,
    /// `MACRO`
    KwMacro,
    /// `OBJECT`
    KwObject,
    /// `IDENTIFIER`
    KwIdentifier,
    /// `SEQUENCE`
    KwSequence,
    /// `OF`
    KwOf,

    // === Declaration-kind keywords ===
    /// `OBJECT-TYPE`
    KwObjectType,
    /// `OBJECT-IDENTITY`
    KwObjectIdentity,
    /// `MODULE-IDENTITY`
    KwModuleIdentity,
    /// `NOTIFICATION-TYPE`
    KwNotificationType,

    // === Clause keywords ===
    /// `SYNTAX`
    KwSyntax,
    /// `UNITS`
    KwUnits,
    /// `MAX-ACCESS`
    KwMaxAccess,
    /// `ACCESS`
    KwAccess,
    /// `STATUS`
    KwStatus,
    /// `DESCRIPTION`
    KwDescription,
    /// `REFERENCE`
    KwReference,
    /// `INDEX`
    KwIndex,
    /// `AUGMENTS`
    KwAugments,
    /// `DEFVAL`
    KwDefval,
}

impl TokenKind {
    /// Check if this kind is any keyword.
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::KwDefinitions
                | Self::KwBegin
                | Self::KwEnd
                | Self::KwImports
                | Self::KwExports
                | Self::KwFrom
                | Self::KwMacro
                | Self::KwObject
                | Self::KwIdentifier
                | Self::KwSequence
                | Self::KwOf
                | Self::KwObjectType
                | Self::KwObjectIdentity
                | Self::KwModuleIdentity
                | Self::KwNotificationType
                | Self::KwSyntax
                | Self::KwUnits
                | Self::KwMaxAccess
                | Self::KwAccess
                | Self::KwStatus
                | Self::KwDescription
                | Self::KwReference
                | Self::KwIndex
                | Self::KwAugments
                | Self::KwDefval
        )
    }

    /// Check if this kind opens a declaration body (the tag after the
    /// declared name).
    #[must_use]
    pub const fn is_declaration_keyword(self) -> bool {
        matches!(
            self,
            Self::KwObjectType
                | Self::KwObjectIdentity
                | Self::KwModuleIdentity
                | Self::KwNotificationType
        )
    }

    /// Check if this kind starts a body clause inside a declaration.
    ///
    /// Used to delimit verbatim SYNTAX capture and to skip clauses the
    /// extractor does not record.
    #[must_use]
    pub const fn is_clause_keyword(self) -> bool {
        matches!(
            self,
            Self::KwSyntax
                | Self::KwUnits
                | Self::KwMaxAccess
                | Self::KwAccess
                | Self::KwStatus
                | Self::KwDescription
                | Self::KwReference
                | Self::KwIndex
                | Self::KwAugments
                | Self::KwDefval
        )
    }

    /// Check if a token of this kind can appear as an imported symbol
    /// name. Macro names such as `OBJECT-TYPE` are imported like any
    /// other symbol, so keywords qualify too.
    #[must_use]
    pub const fn is_symbol(self) -> bool {
        matches!(self, Self::UppercaseIdent | Self::LowercaseIdent) || self.is_keyword()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len() {
        let span = Span::new(3, 10);
        assert_eq!(span.len(), 7);
        assert!(!span.is_empty());
        assert!(Span::new(4, 4).is_empty());
    }

    #[test]
    fn test_kind_predicates() {
        assert!(TokenKind::KwObjectType.is_declaration_keyword());
        assert!(!TokenKind::KwSyntax.is_declaration_keyword());
        assert!(TokenKind::KwSyntax.is_clause_keyword());
        assert!(!TokenKind::KwBegin.is_clause_keyword());
        assert!(TokenKind::KwObjectType.is_symbol());
        assert!(TokenKind::LowercaseIdent.is_symbol());
        assert!(!TokenKind::Comma.is_symbol());
    }
}
