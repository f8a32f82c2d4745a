use crate::{
    ast::NodeId,
    diagnostics::Diagnostics,
    error::ParseError,
    interpreter::lexer::{Symbol, TokenKind},
};

/// Result type used by all grammar rules. The error has already been
/// reported to the diagnostics sink when it is created; the `Err` variant
/// only signals that the current statement should be abandoned and the
/// cursor resynchronized.
pub type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent parser over the lexer's symbol sequence.
///
/// The parser owns the symbols because one grammar point mutates them: a
/// comparison operator's kind is upgraded in place once its `, oder gleich`
/// suffix is recognized.
///
/// Two non-standard devices shape the grammar:
///
/// 1. **Depth-bounded blocks** — a block consists of the statements whose
///    stamped indentation depth equals the parser's nesting counter;
///    [`Parser::block`] increments the counter, consumes matching
///    declarations, and decrements it again.
/// 2. **Backtracking lookahead** — several grammar points speculatively
///    consume a symbol and roll the cursor back by one when the expected
///    continuation is absent, because the grammar encodes natural-language
///    phrasing rather than unambiguous symbols.
pub struct Parser<'d> {
    pub(in crate::interpreter::parser) symbols: Vec<Symbol>,
    pub(in crate::interpreter::parser) current: usize,
    pub(in crate::interpreter::parser) depth:   usize,
    next_id:     NodeId,
    diagnostics: &'d mut Diagnostics,
}

impl<'d> Parser<'d> {
    /// Creates a parser over `symbols`. Node ids for variable references
    /// start at `first_id` so they stay unique across the lines of an
    /// interactive session.
    #[must_use]
    pub fn new(symbols: Vec<Symbol>, first_id: NodeId, diagnostics: &'d mut Diagnostics) -> Self {
        Self { symbols,
               current: 0,
               depth: 0,
               next_id: first_id,
               diagnostics }
    }

    /// Parses the whole symbol sequence into a statement list.
    ///
    /// Each malformed statement is reported and skipped by resynchronizing
    /// to the next statement boundary, so one pass can surface many
    /// independent parse errors.
    pub fn parse(&mut self) -> Vec<crate::ast::Stmt> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }
        statements
    }

    /// The first node id not handed out by this parser; the session keeps
    /// the counter going for the next line.
    #[must_use]
    pub const fn next_free_id(&self) -> NodeId {
        self.next_id
    }

    /// Hands out the next variable-reference node id.
    pub(in crate::interpreter::parser) const fn next_node_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(in crate::interpreter::parser) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// The current symbol, not yet consumed.
    pub(in crate::interpreter::parser) fn peek(&self) -> &Symbol {
        &self.symbols[self.current]
    }

    /// The kind `offset` symbols ahead of the cursor, or `Eof` past the
    /// end.
    pub(in crate::interpreter::parser) fn kind_at(&self, offset: usize) -> TokenKind {
        self.symbols
            .get(self.current + offset)
            .map_or(TokenKind::Eof, |symbol| symbol.kind)
    }

    /// The most recently consumed symbol.
    pub(in crate::interpreter::parser) fn previous(&self) -> &Symbol {
        &self.symbols[self.current - 1]
    }

    /// Consumes the current symbol (unless at the end) and returns the now
    /// previous one.
    pub(in crate::interpreter::parser) fn advance(&mut self) -> Symbol {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    /// Moves the cursor back by one symbol: the backtracking device used
    /// after a speculative consume.
    pub(in crate::interpreter::parser) const fn back_up(&mut self) {
        self.current -= 1;
    }

    /// Whether the current symbol has the given kind. Never matches the
    /// end-of-input marker.
    pub(in crate::interpreter::parser) fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// Consumes the current symbol if its kind is one of `kinds`.
    pub(in crate::interpreter::parser) fn matches(&mut self, kinds: &[TokenKind]) -> bool {
        for kind in kinds {
            if self.check(*kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    /// Consumes and returns the current symbol if its kind is one of
    /// `kinds`.
    pub(in crate::interpreter::parser) fn matches_symbol(&mut self,
                                                         kinds: &[TokenKind])
                                                         -> Option<Symbol> {
        if self.matches(kinds) {
            Some(self.previous().clone())
        } else {
            None
        }
    }

    /// Consumes the current symbol if it has the expected kind, otherwise
    /// reports `error` at it and fails the current rule.
    pub(in crate::interpreter::parser) fn consume(&mut self,
                                                  kind: TokenKind,
                                                  error: ParseError)
                                                  -> ParseResult<Symbol> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        let symbol = self.peek().clone();
        Err(self.error(symbol, error))
    }

    /// Reports a parse error at `symbol` and hands it back for
    /// propagation.
    pub(in crate::interpreter::parser) fn error(&mut self,
                                                symbol: Symbol,
                                                error: ParseError)
                                                -> ParseError {
        self.diagnostics.parse(&symbol, &error);
        error
    }

    /// Discards symbols up to the next plausible statement boundary: past
    /// a statement terminator, or in front of a statement-introducing
    /// keyword.
    pub(in crate::interpreter::parser) fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Dot {
                return;
            }

            match self.peek().kind {
                TokenKind::Funktion
                | TokenKind::Fuer
                | TokenKind::Wenn
                | TokenKind::Solange
                | TokenKind::Gib => return,
                _ => {},
            }

            self.advance();
        }
    }
}
