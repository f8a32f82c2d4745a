use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::TokenKind,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses a full expression.
    ///
    /// This is the entry point for expression parsing. It begins at the
    /// loosest precedence level, assignment, and recursively descends
    /// through the precedence hierarchy.
    pub(in crate::interpreter::parser) fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    /// Parses an assignment: `x ist <wert>` or, for one array position,
    /// `x an der Stelle i ist <wert>`.
    ///
    /// Assignment is right-associative; anything that turns out not to be
    /// an assignment is simply the parsed subexpression.
    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.logical_or()?;

        if self.matches(&[TokenKind::Ist]) {
            let equals = self.previous().clone();
            let value = Box::new(self.assignment()?);

            return Ok(match expr {
                Expr::Variable { name, .. } => Expr::Assign { id: self.next_node_id(),
                                                              name,
                                                              index: None,
                                                              value },
                Expr::Binary { left, op, right }
                    if op.kind == TokenKind::Stelle
                       && matches!(*left, Expr::Variable { .. }) =>
                {
                    let Expr::Variable { name, .. } = *left else {
                        unreachable!("guard checked the variant");
                    };
                    Expr::Assign { id: self.next_node_id(),
                                   name,
                                   index: Some(right),
                                   value }
                },
                other => {
                    self.error(equals, ParseError::InvalidAssignmentTarget);
                    other
                },
            });
        }

        Ok(expr)
    }

    /// Parses left-associative chains of `oder`.
    fn logical_or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.logical_and()?;

        while let Some(op) = self.matches_symbol(&[TokenKind::Oder]) {
            let right = self.logical_and()?;
            expr = Expr::Logical { left: Box::new(expr),
                                   op,
                                   right: Box::new(right) };
        }

        Ok(expr)
    }

    /// Parses left-associative chains of `und`.
    fn logical_and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while let Some(op) = self.matches_symbol(&[TokenKind::Und]) {
            let right = self.equality()?;
            expr = Expr::Logical { left: Box::new(expr),
                                   op,
                                   right: Box::new(right) };
        }

        Ok(expr)
    }

    /// Parses equality: `x gleich y ist`, `x ungleich y ist`.
    ///
    /// The natural-language form closes every comparison with a trailing
    /// `ist`.
    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while let Some(op) = self.matches_symbol(&[TokenKind::Ungleich, TokenKind::Gleich]) {
            let right = self.comparison()?;
            self.consume(TokenKind::Ist,
                         ParseError::ExpectedToken { expected: "ein 'ist'",
                                                     context:  "einem Vergleich", })?;
            expr = Expr::Binary { left: Box::new(expr),
                                  op,
                                  right: Box::new(right) };
        }

        Ok(expr)
    }

    /// Parses comparisons: `x größer als y ist`, optionally with the
    /// `, oder gleich` suffix.
    ///
    /// The suffix requires all three symbols — comma, `oder`, and an
    /// explicit `gleich` — and upgrades the operator symbol's kind in
    /// place. When the comma is present but the sequence is incomplete,
    /// nothing is consumed: the comma belongs to an enclosing construct
    /// such as the head of a `wenn`-Anweisung.
    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.bitwise()?;

        while self.matches(&[TokenKind::Groesser, TokenKind::Kleiner]) {
            let op_index = self.current - 1;

            self.consume(TokenKind::Als,
                         ParseError::ExpectedToken { expected: "ein 'als'",
                                                     context:
                                                         "einem größer/kleiner-Operator", })?;

            if self.check(TokenKind::Comma)
               && self.kind_at(1) == TokenKind::Oder
               && self.kind_at(2) == TokenKind::Gleich
            {
                self.advance();
                self.advance();
                self.advance();
                self.symbols[op_index].kind = match self.symbols[op_index].kind {
                    TokenKind::Groesser => TokenKind::GroesserGleich,
                    TokenKind::Kleiner => TokenKind::KleinerGleich,
                    other => other,
                };
            }

            let op = self.symbols[op_index].clone();
            let right = self.bitwise()?;
            self.consume(TokenKind::Ist,
                         ParseError::ExpectedToken { expected: "ein 'ist'",
                                                     context:  "einem Vergleich", })?;

            expr = Expr::Binary { left: Box::new(expr),
                                  op,
                                  right: Box::new(right) };
        }

        Ok(expr)
    }

    /// Parses the bitwise forms:
    ///
    /// - `logisch x und/oder/kontra y`
    /// - `x um y bit nach links/rechts verschoben`
    ///
    /// A `logisch` directly followed by `nicht` is left for the unary
    /// level.
    fn bitwise(&mut self) -> ParseResult<Expr> {
        if self.check(TokenKind::Logisch) && self.kind_at(1) != TokenKind::Nicht {
            self.advance();

            let left = self.additive()?;
            let op = match self.matches_symbol(&[TokenKind::Und,
                                                 TokenKind::Oder,
                                                 TokenKind::Kontra])
            {
                Some(op) => op,
                None => {
                    let symbol = self.peek().clone();
                    return Err(self.error(symbol,
                                          ParseError::ExpectedToken { expected:
                                                                          "'und', 'oder' oder 'kontra'",
                                                                      context:
                                                                          "dem ersten Operanden einer logisch-Verknüpfung", }));
                },
            };
            let right = self.additive()?;

            return Ok(Expr::Binary { left: Box::new(left),
                                     op,
                                     right: Box::new(right) });
        }

        let mut expr = self.additive()?;

        while self.matches(&[TokenKind::Um]) {
            let right = self.additive()?;
            self.consume(TokenKind::Bit,
                         ParseError::ExpectedToken { expected: "ein 'bit'",
                                                     context:  "dem Verschiebungswert", })?;
            self.consume(TokenKind::Nach,
                         ParseError::ExpectedToken { expected: "ein 'nach'",
                                                     context:  "einer Bit-Anweisung", })?;
            let op = match self.matches_symbol(&[TokenKind::Links, TokenKind::Rechts]) {
                Some(op) => op,
                None => {
                    let symbol = self.peek().clone();
                    return Err(self.error(symbol,
                                          ParseError::ExpectedToken { expected:
                                                                          "'links' oder 'rechts'",
                                                                      context: "'nach'", }));
                },
            };
            self.consume(TokenKind::Verschoben,
                         ParseError::ExpectedTokenAtEnd { expected: "ein 'verschoben'",
                                                          context:  "einer Bitverschiebung", })?;

            expr = Expr::Binary { left: Box::new(expr),
                                  op,
                                  right: Box::new(right) };
        }

        Ok(expr)
    }

    /// Parses additive chains: `x plus y`, `x minus y`.
    fn additive(&mut self) -> ParseResult<Expr> {
        let mut expr = self.trigonometry()?;

        while let Some(op) = self.matches_symbol(&[TokenKind::Minus, TokenKind::Plus]) {
            let right = self.trigonometry()?;
            expr = Expr::Binary { left: Box::new(expr),
                                  op,
                                  right: Box::new(right) };
        }

        Ok(expr)
    }

    /// Parses the trigonometric prefix operators: `Sinus von x`,
    /// `Arkustangens von x`, and friends.
    fn trigonometry(&mut self) -> ParseResult<Expr> {
        const TRIG: &[TokenKind] = &[TokenKind::Sinus,
                                     TokenKind::Kosinus,
                                     TokenKind::Tangens,
                                     TokenKind::Arkussinus,
                                     TokenKind::Arkuskosinus,
                                     TokenKind::Arkustangens,
                                     TokenKind::Hyperbelsinus,
                                     TokenKind::Hyperbelkosinus,
                                     TokenKind::Hyperbeltangens];

        if let Some(op) = self.matches_symbol(TRIG) {
            self.consume(TokenKind::Von,
                         ParseError::ExpectedToken { expected: "ein 'von'",
                                                     context:
                                                         "einer trigonometrischen Funktion", })?;
            let expr = self.multiplicative()?;
            return Ok(Expr::Unary { op,
                                    expr: Box::new(expr) });
        }

        self.multiplicative()
    }

    /// Parses multiplicative chains: `x mal y`, `x durch y`, `x modulo y`.
    fn multiplicative(&mut self) -> ParseResult<Expr> {
        let mut expr = self.root()?;

        while let Some(op) = self.matches_symbol(&[TokenKind::Durch,
                                                   TokenKind::Mal,
                                                   TokenKind::Modulo])
        {
            let right = self.root()?;
            expr = Expr::Binary { left: Box::new(expr),
                                  op,
                                  right: Box::new(right) };
        }

        Ok(expr)
    }

    /// Parses the root operator: `n. wurzel von x`.
    ///
    /// The dot after the degree is speculatively consumed; when no
    /// `wurzel` follows, the cursor rolls back so the dot can terminate
    /// the statement (as in `schreibe 2.`).
    fn root(&mut self) -> ParseResult<Expr> {
        let mut expr = self.power()?;

        if self.matches(&[TokenKind::Dot]) {
            if self.matches(&[TokenKind::Wurzel]) {
                let op = self.previous().clone();
                self.consume(TokenKind::Von,
                             ParseError::ExpectedToken { expected: "ein 'von'",
                                                         context:  "dem Wurzel-Operator", })?;
                let radicand = self.power()?;
                // The radicand goes left, the degree right: pow(x, 1/n).
                expr = Expr::Binary { left:  Box::new(radicand),
                                      op,
                                      right: Box::new(expr), };
            } else {
                self.back_up();
            }
        }

        Ok(expr)
    }

    /// Parses exponentiation chains: `x hoch y`.
    fn power(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while let Some(op) = self.matches_symbol(&[TokenKind::Hoch]) {
            let right = self.unary()?;
            expr = Expr::Binary { left: Box::new(expr),
                                  op,
                                  right: Box::new(right) };
        }

        Ok(expr)
    }
}
