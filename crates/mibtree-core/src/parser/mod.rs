//! Declaration extractor.
//!
//! Walks the token stream of one module text and pulls out everything that
//! names an OID: plain `OBJECT IDENTIFIER` assignments, OBJECT-TYPE,
//! OBJECT-IDENTITY, MODULE-IDENTITY and NOTIFICATION-TYPE definitions,
//! together with the IMPORTS table. Constructs that carry no OID (type
//! assignments, macros, compliance statements) are skipped.
//!
//! Extraction is pure: no registry or tree state is touched here, so the
//! same text always yields the same [`RawModule`].

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::Error;
use crate::lexer::{Diagnostic, Lexer, Severity, Span, Token, TokenKind};
use crate::module::{Anchor, Declaration, ImportTable, ModuleIdentity, RawModule, Syntax};

/// Result of extracting one module text.
#[derive(Clone, Debug)]
pub struct Extraction {
    /// The extracted module.
    pub module: RawModule,
    /// Lexer and extractor diagnostics, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Extracts the first module from `source`.
///
/// # Errors
///
/// [`Error::Parse`] when no `DEFINITIONS ::= BEGIN` header is found, or when
/// a MODULE-IDENTITY definition is present but its OID assignment cannot be
/// read. Everything else degrades to diagnostics on the [`Extraction`].
pub fn extract(source: &str) -> Result<Extraction, Error> {
    Parser::new(source).extract_module()
}

/// Metadata clauses collected from a definition body.
#[derive(Default)]
struct Clauses {
    syntax: Option<Syntax>,
    access: Option<String>,
    status: Option<String>,
    description: Option<String>,
}

/// Token-stream extractor.
///
/// Lenient by design: a malformed definition produces a diagnostic and is
/// skipped, never sinking the remaining definitions in the module.
pub struct Parser<'src> {
    /// Source text, for extracting token content.
    source: &'src str,
    /// Tokens from the lexer.
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    /// Collected diagnostics (lexer + extractor).
    diagnostics: Vec<Diagnostic>,
    /// First MODULE-IDENTITY assignment seen.
    anchor: Option<Anchor>,
    /// Whether any MODULE-IDENTITY definition was seen at all.
    saw_module_identity: bool,
}

impl<'src> Parser<'src> {
    /// Creates an extractor over the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let (tokens, diagnostics) = Lexer::new(source).tokenize();
        Parser {
            source,
            tokens,
            pos: 0,
            diagnostics,
            anchor: None,
            saw_module_identity: false,
        }
    }

    /// Runs extraction to completion.
    ///
    /// # Errors
    ///
    /// See [`extract`].
    pub fn extract_module(mut self) -> Result<Extraction, Error> {
        let Some(name) = self.find_header() else {
            return Err(Error::Parse(String::from("MIB name not found")));
        };
        let mut module = RawModule::new(ModuleIdentity::new(&name));

        // EXPORTS precedes IMPORTS in the module grammar; the lexer has
        // already reduced its body to the terminating semicolon.
        if self.check(TokenKind::KwExports) {
            self.advance();
            if self.check(TokenKind::Semicolon) {
                self.advance();
            }
        }
        if self.check(TokenKind::KwImports) {
            if let Err(diag) = self.parse_imports(&mut module.imports) {
                self.diagnostics.push(diag);
            }
        }

        while !self.check(TokenKind::KwEnd) && !self.is_eof() {
            match self.parse_definition() {
                Ok(Some(declaration)) => module.push_declaration(declaration),
                Ok(None) => {}
                Err(diag) => {
                    self.diagnostics.push(diag);
                    self.recover_to_definition();
                }
            }
        }

        if self.check(TokenKind::KwEnd) {
            self.advance();
        } else {
            let diag = self.error("expected END");
            self.diagnostics.push(diag);
        }

        module.identity.anchor = self.anchor.take();
        if self.saw_module_identity && module.identity.anchor.is_none() {
            return Err(Error::Parse(String::from(
                "MODULE-IDENTITY assignment not found",
            )));
        }

        Ok(Extraction {
            module,
            diagnostics: self.diagnostics,
        })
    }

    /// Scans forward to `Name DEFINITIONS ::= BEGIN`, tolerating leading
    /// junk, and consumes the header.
    fn find_header(&mut self) -> Option<String> {
        loop {
            if self.is_eof() {
                return None;
            }
            let first = self.peek().kind;
            if (first == TokenKind::UppercaseIdent || first == TokenKind::LowercaseIdent)
                && self.peek_nth(1).kind == TokenKind::KwDefinitions
                && self.peek_nth(2).kind == TokenKind::ColonColonEqual
                && self.peek_nth(3).kind == TokenKind::KwBegin
            {
                let name = String::from(self.text(self.peek().span));
                self.pos += 4;
                return Some(name);
            }
            self.advance();
        }
    }

    /// Parses the IMPORTS clause into `imports`.
    fn parse_imports(&mut self, imports: &mut ImportTable) -> Result<(), Diagnostic> {
        self.expect(TokenKind::KwImports)?;
        loop {
            if self.check(TokenKind::Semicolon) {
                self.advance();
                return Ok(());
            }
            if self.is_eof() || self.check(TokenKind::KwEnd) {
                return Err(self.error("unexpected end of imports"));
            }

            // Symbols up to FROM; macro names like OBJECT-TYPE lex as
            // keywords and are legal import symbols.
            let mut symbols: Vec<String> = Vec::new();
            loop {
                if self.check(TokenKind::KwFrom) {
                    break;
                }
                if self.peek().kind.is_symbol() {
                    let token = self.advance();
                    symbols.push(String::from(self.text(token.span)));
                    if self.check(TokenKind::Comma) {
                        self.advance();
                    }
                } else {
                    return Err(self.error("expected symbol or FROM"));
                }
            }
            self.expect(TokenKind::KwFrom)?;
            let module_token = self.expect(TokenKind::UppercaseIdent)?;
            let module_name = String::from(self.text(module_token.span));
            imports.add(&module_name, &symbols);
        }
    }

    /// Dispatches on the next definition.
    ///
    /// `Ok(None)` means the definition was understood but carries no OID.
    fn parse_definition(&mut self) -> Result<Option<Declaration>, Diagnostic> {
        let first = self.peek().kind;
        let second = self.peek_nth(1).kind;

        match (first, second) {
            // name OBJECT IDENTIFIER ::= { parent arc }
            (TokenKind::LowercaseIdent, TokenKind::KwObject)
                if self.peek_nth(2).kind == TokenKind::KwIdentifier =>
            {
                self.parse_value_assignment()
            }

            (TokenKind::LowercaseIdent, TokenKind::KwObjectType) => {
                self.parse_object_like(TokenKind::KwObjectType)
            }
            (TokenKind::LowercaseIdent, TokenKind::KwObjectIdentity) => {
                self.parse_object_like(TokenKind::KwObjectIdentity)
            }
            (TokenKind::LowercaseIdent, TokenKind::KwNotificationType) => {
                self.parse_object_like(TokenKind::KwNotificationType)
            }

            (TokenKind::LowercaseIdent, TokenKind::KwModuleIdentity) => {
                self.parse_module_identity()
            }

            // The lexer swallowed the body; the tokens left are the macro
            // name, MACRO and END.
            (_, TokenKind::KwMacro) => self.parse_macro_definition(),

            // TypeName ::= ... carries no OID.
            (TokenKind::UppercaseIdent, TokenKind::ColonColonEqual) => {
                self.parse_type_assignment()
            }

            // The lexer reduced the clause to EXPORTS and a semicolon.
            (TokenKind::KwExports, _) => {
                self.advance();
                if self.check(TokenKind::Semicolon) {
                    self.advance();
                }
                Ok(None)
            }

            // Anything else (TRAP-TYPE, compliance statements, stray
            // tokens) is skipped without noise, the way a reader skims past
            // constructs that do not name an OID.
            _ => {
                self.recover_to_definition();
                Ok(None)
            }
        }
    }

    fn parse_value_assignment(&mut self) -> Result<Option<Declaration>, Diagnostic> {
        let name = self.expect(TokenKind::LowercaseIdent)?;
        let symbol = String::from(self.text(name.span));
        self.expect(TokenKind::KwObject)?;
        self.expect(TokenKind::KwIdentifier)?;
        self.expect(TokenKind::ColonColonEqual)?;
        self.finish_declaration(symbol, Clauses::default())
    }

    /// OBJECT-TYPE, OBJECT-IDENTITY and NOTIFICATION-TYPE share one shape:
    /// name, keyword, metadata clauses, assignment suffix.
    fn parse_object_like(&mut self, keyword: TokenKind) -> Result<Option<Declaration>, Diagnostic> {
        let name = self.expect(TokenKind::LowercaseIdent)?;
        let symbol = String::from(self.text(name.span));
        self.expect(keyword)?;
        let clauses = self.parse_clauses()?;
        self.finish_declaration(symbol, clauses)
    }

    fn parse_module_identity(&mut self) -> Result<Option<Declaration>, Diagnostic> {
        let name = self.expect(TokenKind::LowercaseIdent)?;
        let symbol = String::from(self.text(name.span));
        self.expect(TokenKind::KwModuleIdentity)?;
        self.saw_module_identity = true;
        let clauses = self.parse_clauses()?;
        let declaration = self.finish_declaration(symbol, clauses)?;
        if let Some(declaration) = &declaration {
            if self.anchor.is_none() {
                self.anchor = Some(Anchor {
                    symbol: declaration.symbol.clone(),
                    parent: declaration.parent.clone(),
                    index: declaration.index,
                });
            }
        }
        Ok(declaration)
    }

    fn parse_macro_definition(&mut self) -> Result<Option<Declaration>, Diagnostic> {
        self.advance(); // macro name; may itself lex as a keyword
        self.expect(TokenKind::KwMacro)?;
        self.expect(TokenKind::KwEnd)?;
        Ok(None)
    }

    fn parse_type_assignment(&mut self) -> Result<Option<Declaration>, Diagnostic> {
        self.advance(); // type name
        self.advance(); // ::=
        self.recover_to_definition();
        Ok(None)
    }

    /// Scans metadata clauses up to the `::=` of the OID assignment.
    ///
    /// Unknown clauses (LAST-UPDATED, ORGANIZATION, OBJECTS and friends)
    /// are swallowed token by token. Hitting END, end of input or the start
    /// of another definition means the assignment is missing.
    fn parse_clauses(&mut self) -> Result<Clauses, Diagnostic> {
        let mut clauses = Clauses::default();
        loop {
            match self.peek().kind {
                TokenKind::ColonColonEqual => {
                    self.advance();
                    return Ok(clauses);
                }
                TokenKind::KwSyntax => {
                    self.advance();
                    let syntax = self.parse_syntax_value()?;
                    clauses.syntax.get_or_insert(syntax);
                }
                TokenKind::KwMaxAccess | TokenKind::KwAccess => {
                    self.advance();
                    let access = self.clause_word()?;
                    clauses.access.get_or_insert(access);
                }
                TokenKind::KwStatus => {
                    self.advance();
                    let status = self.clause_word()?;
                    clauses.status.get_or_insert(status);
                }
                // First clause wins; REVISION blocks in a MODULE-IDENTITY
                // carry their own DESCRIPTION which must not replace the
                // definition's.
                TokenKind::KwDescription => {
                    self.advance();
                    let description = self.quoted_text()?;
                    clauses.description.get_or_insert(description);
                }
                TokenKind::KwReference | TokenKind::KwUnits => {
                    self.advance();
                    if self.check(TokenKind::QuotedString) {
                        self.advance();
                    }
                }
                TokenKind::KwIndex | TokenKind::KwAugments | TokenKind::KwDefval => {
                    self.advance();
                    self.skip_brace_block()?;
                }
                TokenKind::KwEnd | TokenKind::Eof => {
                    return Err(self.error("missing OID assignment"));
                }
                _ if self.at_definition_start() => {
                    return Err(self.error("missing OID assignment"));
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Reads the SYNTAX value: either `SEQUENCE OF RowType` or a verbatim
    /// slice up to the next clause keyword or the assignment.
    fn parse_syntax_value(&mut self) -> Result<Syntax, Diagnostic> {
        if self.check(TokenKind::KwSequence) && self.peek_nth(1).kind == TokenKind::KwOf {
            self.advance();
            self.advance();
            let element = self.expect(TokenKind::UppercaseIdent)?;
            return Ok(Syntax::Table {
                element_type: String::from(self.text(element.span)),
            });
        }

        let start = self.current_span().start;
        let mut end = start;
        let mut consumed = false;
        loop {
            let kind = self.peek().kind;
            if kind == TokenKind::Eof
                || kind == TokenKind::KwEnd
                || kind == TokenKind::ColonColonEqual
                || kind.is_clause_keyword()
                || self.at_definition_start()
            {
                break;
            }
            let token = self.advance();
            end = token.span.end;
            consumed = true;
        }
        if !consumed {
            return Err(self.error("empty SYNTAX clause"));
        }
        Ok(Syntax::Plain(String::from(
            self.text(Span::new(start, end)).trim(),
        )))
    }

    /// Reads `{ parent arc }` after `::=`.
    ///
    /// The braces are always consumed. Anything other than exactly one
    /// parent label and one arc is irregular; multi-component assignments
    /// like `{ iso org(3) 6 }` are rejected rather than guessed at.
    fn parse_assignment_suffix(&mut self) -> Result<(String, u32), Diagnostic> {
        self.expect(TokenKind::LBrace)?;
        let mut components: Vec<Token> = Vec::new();
        while !self.check(TokenKind::RBrace) {
            if self.is_eof() || self.check(TokenKind::KwEnd) {
                return Err(self.error("unterminated OID assignment"));
            }
            components.push(self.advance());
        }
        self.advance(); // closing brace

        match components.as_slice() {
            [parent, arc]
                if is_parent_label(parent.kind) && arc.kind == TokenKind::Number =>
            {
                let parent_text = String::from(self.text(parent.span));
                match self.text(arc.span).parse::<u32>() {
                    Ok(value) => Ok((parent_text, value)),
                    Err(_) => Err(self.error_at(arc.span, "arc is not a valid u32")),
                }
            }
            _ => Err(self.error("irregular OID assignment")),
        }
    }

    /// Builds the declaration, or drops it with a diagnostic when the
    /// assignment suffix is irregular.
    fn finish_declaration(
        &mut self,
        symbol: String,
        clauses: Clauses,
    ) -> Result<Option<Declaration>, Diagnostic> {
        match self.parse_assignment_suffix() {
            Ok((parent, index)) => Ok(Some(Declaration {
                symbol,
                parent,
                index,
                syntax: clauses.syntax,
                access: clauses.access,
                status: clauses.status,
                description: clauses.description,
            })),
            Err(diag) => {
                self.diagnostics.push(diag);
                Ok(None)
            }
        }
    }

    /// True when the cursor sits at something that opens a new definition.
    fn at_definition_start(&self) -> bool {
        let first = self.peek().kind;
        let second = self.peek_nth(1).kind;
        match (first, second) {
            (TokenKind::LowercaseIdent, TokenKind::KwObject) => {
                self.peek_nth(2).kind == TokenKind::KwIdentifier
            }
            (TokenKind::LowercaseIdent, kind) if kind.is_declaration_keyword() => true,
            (TokenKind::UppercaseIdent, TokenKind::ColonColonEqual) => true,
            (_, TokenKind::KwMacro) => true,
            _ => false,
        }
    }

    /// Advances to the next definition boundary at brace depth zero.
    fn recover_to_definition(&mut self) {
        let mut depth: u32 = 0;
        loop {
            if self.is_eof() {
                return;
            }
            if depth == 0 && (self.check(TokenKind::KwEnd) || self.at_definition_start()) {
                return;
            }
            match self.advance().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
    }

    fn skip_brace_block(&mut self) -> Result<(), Diagnostic> {
        self.expect(TokenKind::LBrace)?;
        let mut depth = 1u32;
        while depth > 0 {
            if self.is_eof() {
                return Err(self.error("unterminated brace block"));
            }
            match self.advance().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    fn clause_word(&mut self) -> Result<String, Diagnostic> {
        if self.check(TokenKind::LowercaseIdent) || self.check(TokenKind::UppercaseIdent) {
            let token = self.advance();
            Ok(String::from(self.text(token.span)))
        } else {
            Err(self.error("expected clause value"))
        }
    }

    fn quoted_text(&mut self) -> Result<String, Diagnostic> {
        let token = self.expect(TokenKind::QuotedString)?;
        let text = self.text(token.span);
        let text = text.strip_prefix('"').unwrap_or(text);
        let text = text.strip_suffix('"').unwrap_or(text);
        Ok(String::from(text))
    }

    // === Token access ===

    fn eof_token(&self) -> Token {
        let end = self.source.len() as u32;
        Token::new(TokenKind::Eof, Span::new(end, end))
    }

    fn is_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> Token {
        self.tokens
            .get(self.pos)
            .copied()
            .unwrap_or_else(|| self.eof_token())
    }

    fn peek_nth(&self, n: usize) -> Token {
        self.tokens
            .get(self.pos + n)
            .copied()
            .unwrap_or_else(|| self.eof_token())
    }

    fn advance(&mut self) -> Token {
        let token = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(&format!("expected {kind:?}")))
        }
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    fn text(&self, span: Span) -> &str {
        &self.source[span.start as usize..span.end as usize]
    }

    fn error(&self, message: &str) -> Diagnostic {
        self.error_at(self.current_span(), message)
    }

    fn error_at(&self, span: Span, message: &str) -> Diagnostic {
        Diagnostic {
            severity: Severity::Error,
            span,
            message: String::from(message),
        }
    }
}

fn is_parent_label(kind: TokenKind) -> bool {
    // Numeric parents occur in null assignments like `zeroDotZero ::= { 0 0 }`.
    matches!(
        kind,
        TokenKind::LowercaseIdent | TokenKind::UppercaseIdent | TokenKind::Number
    )
}
