use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::{Literal, TokenKind},
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses the unary prefix operators:
    ///
    /// - `logisch nicht x` (bitwise complement spelled out)
    /// - `ln x`
    /// - `der Betrag von x`
    /// - `nicht x`, `-x`
    ///
    /// `logisch` and `der` are speculatively consumed and rolled back when
    /// the expected continuation is absent, because both words also start
    /// other constructs.
    pub(in crate::interpreter::parser) fn unary(&mut self) -> ParseResult<Expr> {
        if self.matches(&[TokenKind::Logisch]) {
            if self.matches(&[TokenKind::Nicht]) {
                let op = self.previous().clone();
                let expr = self.unary()?;
                return Ok(Expr::Unary { op,
                                        expr: Box::new(expr) });
            }
            self.back_up();
        }

        if self.matches(&[TokenKind::Ln]) {
            let op = self.previous().clone();
            let expr = self.unary()?;
            return Ok(Expr::Unary { op,
                                    expr: Box::new(expr) });
        }

        if self.matches(&[TokenKind::Der]) {
            if self.matches(&[TokenKind::Betrag]) {
                let op = self.previous().clone();
                self.consume(TokenKind::Von,
                             ParseError::ExpectedToken { expected: "ein 'von'",
                                                         context:  "dem Betrag-Operator", })?;
                let expr = self.unary()?;
                return Ok(Expr::Unary { op,
                                        expr: Box::new(expr) });
            }
            self.back_up();
        }

        if let Some(op) = self.matches_symbol(&[TokenKind::Nicht, TokenKind::Neg]) {
            let expr = self.unary()?;
            return Ok(Expr::Unary { op,
                                    expr: Box::new(expr) });
        }

        self.allocation()
    }

    /// Parses the postfix array allocation: `n Stück` builds an array of
    /// `n` zeroes.
    fn allocation(&mut self) -> ParseResult<Expr> {
        let expr = self.call()?;

        if let Some(op) = self.matches_symbol(&[TokenKind::Stueck]) {
            return Ok(Expr::Unary { op,
                                    expr: Box::new(expr) });
        }

        Ok(expr)
    }

    /// Parses call and index postfixes: `f(x, y)` and `a an der Stelle i`.
    ///
    /// A variable directly followed by something that starts a value is a
    /// one-argument call without parentheses, as in `schreibe i.` or
    /// `schreibe 2 plus 3.` — the argument extends to the end of the
    /// expression. Juxtaposition is never legal otherwise, so there is no
    /// ambiguity.
    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.matches(&[TokenKind::LParen]) {
                expr = self.finish_call(expr)?;
            } else if let Expr::Variable { name, .. } = &expr
                      && self.juxtaposed_argument_ahead()
            {
                let paren = name.clone();
                let argument = self.expression()?;
                expr = Expr::Call { callee:    Box::new(expr),
                                    paren,
                                    arguments: vec![argument], };
            } else if self.matches(&[TokenKind::An]) {
                self.consume(TokenKind::Der,
                             ParseError::ExpectedToken { expected: "ein 'der'",
                                                         context:  "'an'", })?;
                let op = self.consume(TokenKind::Stelle,
                                      ParseError::ExpectedToken { expected: "ein 'Stelle'",
                                                                  context:  "'an der'", })?;
                let right = self.unary()?;
                expr = Expr::Binary { left: Box::new(expr),
                                      op,
                                      right: Box::new(right) };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Whether the next symbol can begin a juxtaposed call argument: a
    /// literal, a named constant, an identifier, or one of the simple
    /// unary prefixes.
    fn juxtaposed_argument_ahead(&self) -> bool {
        matches!(self.peek().kind,
                 TokenKind::Int
                 | TokenKind::Float
                 | TokenKind::Text
                 | TokenKind::CharLit
                 | TokenKind::ArrayLit
                 | TokenKind::Identifier
                 | TokenKind::Wahr
                 | TokenKind::Falsch
                 | TokenKind::Pi
                 | TokenKind::E
                 | TokenKind::Tau
                 | TokenKind::Nicht
                 | TokenKind::Neg
                 | TokenKind::Ln)
    }

    /// Parses the argument list of a call; the opening parenthesis is
    /// already consumed.
    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();

        if !self.check(TokenKind::RParen) {
            loop {
                if arguments.len() >= 255 {
                    let symbol = self.peek().clone();
                    self.error(symbol, ParseError::TooManyArguments);
                }
                arguments.push(self.expression()?);

                if !self.matches(&[TokenKind::Comma]) {
                    break;
                }
            }
        }

        let paren = self.consume(TokenKind::RParen,
                                 ParseError::ExpectedToken { expected: "eine ')'",
                                                             context:  "einem Funktionsaufruf", })?;

        Ok(Expr::Call { callee: Box::new(callee),
                        paren,
                        arguments })
    }

    /// Parses a primary expression: literals, the named constants,
    /// identifiers, and parenthesized groupings.
    fn primary(&mut self) -> ParseResult<Expr> {
        if self.matches(&[TokenKind::Falsch]) {
            return Ok(Expr::Literal { value: Literal::Bool(false),
                                      line:  self.previous().line, });
        }
        if self.matches(&[TokenKind::Wahr]) {
            return Ok(Expr::Literal { value: Literal::Bool(true),
                                      line:  self.previous().line, });
        }
        if self.matches(&[TokenKind::Pi]) {
            return Ok(Expr::Literal { value: Literal::Float(std::f64::consts::PI),
                                      line:  self.previous().line, });
        }
        if self.matches(&[TokenKind::Tau]) {
            return Ok(Expr::Literal { value: Literal::Float(std::f64::consts::TAU),
                                      line:  self.previous().line, });
        }
        if self.matches(&[TokenKind::E]) {
            return Ok(Expr::Literal { value: Literal::Float(std::f64::consts::E),
                                      line:  self.previous().line, });
        }

        if self.matches(&[TokenKind::Int,
                          TokenKind::Float,
                          TokenKind::Text,
                          TokenKind::CharLit,
                          TokenKind::ArrayLit])
        {
            let symbol = self.previous().clone();
            let line = symbol.line;
            return match symbol.literal.clone() {
                Some(value) => Ok(Expr::Literal { value, line }),
                // The lexer always attaches a payload to literal kinds.
                None => Err(self.error(symbol, ParseError::ExpressionExpected)),
            };
        }

        if self.matches(&[TokenKind::Identifier]) {
            let name = self.previous().clone();
            return Ok(Expr::Variable { id: self.next_node_id(),
                                       name });
        }

        if self.matches(&[TokenKind::LParen]) {
            let expr = self.expression()?;
            self.consume(TokenKind::RParen,
                         ParseError::ExpectedToken { expected: "eine ')'",
                                                     context:  "einem Ausdruck", })?;
            return Ok(Expr::Grouping { expr: Box::new(expr) });
        }

        let symbol = self.peek().clone();
        Err(self.error(symbol, ParseError::ExpressionExpected))
    }
}
