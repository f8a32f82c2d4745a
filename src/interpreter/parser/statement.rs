use std::rc::Rc;

use crate::{
    ast::{Expr, FunctionDecl, Stmt},
    error::ParseError,
    interpreter::{
        lexer::{Literal, Symbol, TokenKind},
        parser::core::{ParseResult, Parser},
    },
};

/// The scalar type keywords usable for parameters and return types.
const SCALAR_TYPES: &[TokenKind] = &[TokenKind::Zahl,
                                     TokenKind::Kommazahl,
                                     TokenKind::Boolean,
                                     TokenKind::Zeichenkette,
                                     TokenKind::Zeichen];

/// The plural (array) type keywords.
const PLURAL_TYPES: &[TokenKind] = &[TokenKind::Zahlen,
                                     TokenKind::Kommazahlen,
                                     TokenKind::Zeichenketten];

impl Parser<'_> {
    /// Parses one declaration or statement.
    ///
    /// Declarations start with an article (`der`/`die`/`das`); `die
    /// Funktion` introduces a function declaration. Everything else is a
    /// statement. On a grammar violation the error has already been
    /// reported; the cursor resynchronizes and `None` is returned so the
    /// caller can continue with the next statement.
    pub(in crate::interpreter::parser) fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.matches(&[TokenKind::Der]) {
            self.var_declaration(TokenKind::Der)
        } else if self.matches(&[TokenKind::Die]) {
            if self.matches(&[TokenKind::Funktion]) {
                self.function()
            } else {
                self.var_declaration(TokenKind::Die)
            }
        } else if self.matches(&[TokenKind::Das]) {
            self.var_declaration(TokenKind::Das)
        } else {
            self.statement()
        };

        match result {
            Ok(statement) => Some(statement),
            Err(_) => {
                self.synchronize();
                None
            },
        }
    }

    /// Parses a single statement.
    fn statement(&mut self) -> ParseResult<Stmt> {
        if self.matches(&[TokenKind::Fuer]) {
            return self.for_statement();
        }
        if self.matches(&[TokenKind::Wenn]) {
            return self.if_statement();
        }
        if self.matches(&[TokenKind::Gib]) {
            return self.return_statement();
        }
        if self.matches(&[TokenKind::Solange]) {
            return self.while_statement();
        }
        if self.matches(&[TokenKind::Mache]) {
            return self.do_while_statement();
        }
        if self.matches(&[TokenKind::Colon]) {
            return Ok(Stmt::Block { statements: self.block() });
        }

        self.expression_statement()
    }

    /// Parses a depth-bounded block: the statements whose stamped
    /// indentation depth equals the incremented nesting counter.
    fn block(&mut self) -> Vec<Stmt> {
        self.depth += 1;
        let mut statements = Vec::new();

        while !self.is_at_end() && self.peek().depth == self.depth {
            if let Some(statement) = self.declaration() {
                statements.push(statement);
            }
        }

        self.depth -= 1;
        statements
    }

    /// Parses an expression statement: `<ausdruck>.`
    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenKind::Dot, ParseError::DotAfterStatement)?;
        Ok(Stmt::Expression { expr })
    }

    /// Parses a variable declaration:
    ///
    /// ```text
    /// der Boolean fertig ist wahr wenn x gleich y ist.
    /// die Zahl x ist 5.
    /// die Zahlen xs sind [1; 2; 3].
    /// das Zeichen z ist 'a'.
    /// ```
    ///
    /// The article must agree with the declared type; plural (array) types
    /// take `sind` instead of `ist`. A Boolean initializer may use the
    /// `wahr/falsch wenn <bedingung>` form, where `falsch` negates the
    /// condition.
    fn var_declaration(&mut self, article: TokenKind) -> ParseResult<Stmt> {
        let declared_type = self.check_article(article)?;
        let name = self.consume(TokenKind::Identifier, ParseError::VarNameExpected)?;

        let plural = PLURAL_TYPES.contains(&declared_type.kind);
        let verb = if plural { TokenKind::Sind } else { TokenKind::Ist };

        let mut initializer = None;
        if self.matches(&[verb]) {
            initializer = Some(if declared_type.kind == TokenKind::Boolean {
                                   self.boolean_initializer(&name)?
                               } else {
                                   self.expression()?
                               });
        }

        self.consume(TokenKind::Dot, ParseError::DotAfterVarDeclaration)?;
        Ok(Stmt::Var { declared_type,
                       name,
                       initializer })
    }

    /// Parses a Boolean declaration initializer.
    ///
    /// `wahr wenn <bedingung>` yields the condition, `falsch wenn
    /// <bedingung>` the negated condition. A bare `wahr`/`falsch` (or any
    /// other Boolean expression) is also accepted; the speculatively
    /// consumed literal is rolled back when no `wenn` follows.
    fn boolean_initializer(&mut self, name: &Symbol) -> ParseResult<Expr> {
        if let Some(matched) = self.matches_symbol(&[TokenKind::Wahr, TokenKind::Falsch]) {
            if self.matches(&[TokenKind::Wenn]) {
                let condition = self.expression()?;
                if matched.kind == TokenKind::Falsch {
                    let op = Symbol { kind:    TokenKind::Nicht,
                                      lexeme:  "nicht".to_string(),
                                      literal: None,
                                      line:    name.line,
                                      column:  name.column,
                                      depth:   name.depth, };
                    return Ok(Expr::Unary { op,
                                            expr: Box::new(condition) });
                }
                return Ok(condition);
            }
            self.back_up();
        }

        self.expression()
    }

    /// Checks the article/type agreement and consumes the type keyword.
    ///
    /// `der` pairs with Boolean, `die` with the number, string and plural
    /// types, `das` with Zeichen.
    fn check_article(&mut self, article: TokenKind) -> ParseResult<Symbol> {
        match article {
            TokenKind::Der => self.consume(TokenKind::Boolean,
                                           ParseError::WrongArticle { article: "der",
                                                                      types:   "zum Typ Boolean", }),
            TokenKind::Die => {
                let types = [TokenKind::Zahl,
                             TokenKind::Kommazahl,
                             TokenKind::Zeichenkette,
                             TokenKind::Zahlen,
                             TokenKind::Kommazahlen,
                             TokenKind::Zeichenketten];
                match self.matches_symbol(&types) {
                    Some(symbol) => Ok(symbol),
                    None => {
                        let symbol = self.previous().clone();
                        Err(self.error(symbol,
                                       ParseError::WrongArticle { article: "die",
                                                                  types:
                                                                      "zu den Typen Zahl, Kommazahl, Zeichenkette, Zahlen, Kommazahlen oder Zeichenketten", }))
                    },
                }
            },
            TokenKind::Das => self.consume(TokenKind::Zeichen,
                                           ParseError::WrongArticle { article: "das",
                                                                      types:   "zum Typ Zeichen", }),
            _ => unreachable!("declaration() only dispatches on articles"),
        }
    }

    /// Parses a `wenn …, dann: …` statement with optional `wenn aber`
    /// chains and a `sonst:` branch.
    ///
    /// The chain keywords are only recognized at the statement's own
    /// indentation depth; a `wenn` starting a deeper or shallower
    /// statement belongs to someone else.
    fn if_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        let condition = self.expression()?;
        self.consume(TokenKind::Comma,
                     ParseError::ExpectedToken { expected: "ein Komma",
                                                 context:  "der Bedingung einer wenn-Anweisung", })?;
        self.consume(TokenKind::Dann,
                     ParseError::ExpectedToken { expected: "ein 'dann'",
                                                 context:  "dem Komma einer wenn-Anweisung", })?;

        let then_branch = Box::new(self.statement()?);

        let mut else_branch = None;
        if self.check(TokenKind::Wenn) && self.peek().depth == self.depth {
            self.advance();
            if self.matches(&[TokenKind::Aber]) {
                else_branch = Some(Box::new(self.if_statement()?));
            } else {
                self.back_up();
            }
        }

        if else_branch.is_none()
           && self.check(TokenKind::Sonst)
           && self.peek().depth == self.depth
        {
            self.advance();
            else_branch = Some(Box::new(self.statement()?));
        }

        Ok(Stmt::If { keyword,
                      condition,
                      then_branch,
                      else_branch })
    }

    /// Parses a `solange <bedingung>, mache: …` loop.
    fn while_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        let condition = self.expression()?;
        self.consume(TokenKind::Comma,
                     ParseError::ExpectedToken { expected: "ein Komma",
                                                 context:
                                                     "der Bedingung einer solange-Anweisung", })?;
        self.consume(TokenKind::Mache,
                     ParseError::ExpectedTokenAtEnd { expected: "ein 'mache'",
                                                      context:  "einer solange-Anweisung", })?;

        let body = Box::new(self.statement()?);
        Ok(Stmt::While { keyword,
                         condition,
                         body })
    }

    /// Parses a `mache: … solange <bedingung>.` loop.
    fn do_while_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        let body = Box::new(self.statement()?);
        self.consume(TokenKind::Solange,
                     ParseError::ExpectedToken { expected: "ein 'solange'",
                                                 context:  "einem mache-Block", })?;
        let condition = self.expression()?;
        self.consume(TokenKind::Dot, ParseError::DotAfterStatement)?;

        Ok(Stmt::DoWhile { keyword,
                           condition,
                           body })
    }

    /// Parses a `gib <wert> zurück.` statement.
    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        let value = if self.check(TokenKind::Zurueck) {
            None
        } else {
            Some(self.expression()?)
        };

        self.consume(TokenKind::Zurueck,
                     ParseError::ExpectedToken { expected: "ein 'zurück'",
                                                 context:  "einem Rückgabewert", })?;
        self.consume(TokenKind::Dot,
                     ParseError::ExpectedToken { expected: "ein Punkt",
                                                 context:  "einer Rückgabe-Anweisung", })?;
        Ok(Stmt::Return { keyword, value })
    }

    /// Parses a `für jede Zahl i von a bis b (mit schrittgröße s), mache: …`
    /// loop and desugars it.
    ///
    /// The result is an outer block holding the counting-variable
    /// declaration and a [`Stmt::For`] whose body is the user block plus an
    /// appended `i ist i plus s` step assignment. The evaluator only
    /// decides the loop direction and re-checks the guard; everything else
    /// is ordinary statement execution.
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        self.consume(TokenKind::Jede,
                     ParseError::ExpectedToken { expected: "ein 'jede'",
                                                 context:  "einer für-Anweisung", })?;

        let declared_type =
            match self.matches_symbol(&[TokenKind::Zahl, TokenKind::Kommazahl]) {
                Some(symbol) => symbol,
                None => {
                    let symbol = self.previous().clone();
                    return Err(self.error(symbol, ParseError::ForWithoutVariable));
                },
            };

        let name = self.consume(TokenKind::Identifier, ParseError::VarNameExpected)?;
        self.consume(TokenKind::Von,
                     ParseError::ExpectedToken { expected: "ein 'von'",
                                                 context:
                                                     "der Variablendeklaration in einer für-Anweisung", })?;
        let min = self.expression()?;

        self.consume(TokenKind::Bis,
                     ParseError::ExpectedToken { expected: "ein 'bis'",
                                                 context:  "dem Minimum einer für-Anweisung", })?;
        let max = self.expression()?;

        let step = if self.matches(&[TokenKind::Mit]) {
            self.consume(TokenKind::Schrittgroesse,
                         ParseError::ExpectedToken { expected: "'schrittgröße'",
                                                     context:  "'mit' in einer für-Anweisung", })?;
            self.expression()?
        } else {
            Expr::Literal { value: Literal::Int(1),
                            line:  keyword.line, }
        };

        self.consume(TokenKind::Comma,
                     ParseError::ExpectedToken { expected: "ein Komma",
                                                 context:  "einer für-Anweisung", })?;
        self.consume(TokenKind::Mache,
                     ParseError::ExpectedTokenAtEnd { expected: "ein 'mache'",
                                                      context:  "einer für-Anweisung", })?;

        let body = self.statement()?;

        // i ist i plus <schrittgröße>
        let plus = Symbol { kind:    TokenKind::Plus,
                            lexeme:  "plus".to_string(),
                            literal: None,
                            line:    name.line,
                            column:  name.column,
                            depth:   name.depth, };
        let step_assign =
            Expr::Assign { id:    self.next_node_id(),
                           name:  name.clone(),
                           index: None,
                           value: Box::new(Expr::Binary { left:
                                                              Box::new(Expr::Variable { id:   self.next_node_id(),
                                                                                        name: name.clone(), }),
                                                          op:    plus,
                                                          right: Box::new(step), }), };

        let body = Stmt::Block { statements: vec![body, Stmt::Expression { expr: step_assign }], };

        let loop_stmt = Stmt::For { keyword,
                                    variable: Expr::Variable { id:   self.next_node_id(),
                                                               name: name.clone(), },
                                    max,
                                    body: Box::new(body), };

        Ok(Stmt::Block { statements: vec![Stmt::Var { declared_type,
                                                      name,
                                                      initializer: Some(min), },
                                          loop_stmt], })
    }

    /// Parses a function declaration:
    ///
    /// ```text
    /// die Funktion summe(Zahl a, Zahl b) vom Typ Zahl macht:
    ///     gib a plus b zurück.
    /// ```
    ///
    /// If a return type is declared, the parsed body must contain a return
    /// statement; this is checked over the statement list after parsing,
    /// not by the grammar.
    fn function(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, ParseError::FuncNameExpected)?;

        self.consume(TokenKind::LParen,
                     ParseError::ExpectedToken { expected: "eine Klammer auf",
                                                 context:  "dem Funktionsnamen", })?;

        let mut params = Vec::new();
        let mut param_types = Vec::with_capacity(SCALAR_TYPES.len() + PLURAL_TYPES.len());
        param_types.extend_from_slice(SCALAR_TYPES);
        param_types.extend_from_slice(PLURAL_TYPES);

        loop {
            if params.len() >= 255 {
                let symbol = self.peek().clone();
                self.error(symbol, ParseError::TooManyArguments);
            }

            if self.matches(&param_types) {
                params.push(self.consume(TokenKind::Identifier,
                                         ParseError::ParameterNameExpected)?);
            }

            if !self.matches(&[TokenKind::Comma]) {
                break;
            }
        }

        self.consume(TokenKind::RParen,
                     ParseError::ExpectedToken { expected: "eine Klammer zu",
                                                 context:  "den Parametern", })?;

        let mut return_type = None;
        if self.matches(&[TokenKind::Vom]) {
            self.consume(TokenKind::Typ,
                         ParseError::ExpectedToken { expected: "ein 'Typ'",
                                                     context:  "einem 'vom'", })?;
            match self.matches_symbol(&param_types) {
                Some(symbol) => return_type = Some(symbol),
                None => {
                    let symbol = self.peek().clone();
                    self.error(symbol, ParseError::ReturnTypeInvalid);
                },
            }
        }

        self.consume(TokenKind::Macht,
                     ParseError::ExpectedTokenAtEnd { expected: "ein 'macht'",
                                                      context:  "eines Funktionskopfes", })?;
        self.consume(TokenKind::Colon,
                     ParseError::ExpectedToken { expected: "ein Doppelpunkt",
                                                 context:  "einer macht-Anweisung", })?;

        let body = self.block();

        // A declared return type requires a return statement somewhere in
        // the body.
        if return_type.is_some() && !contains_return(&body) {
            self.error(name.clone(), ParseError::ReturnMissing);
        }

        Ok(Stmt::Function(Rc::new(FunctionDecl { name,
                                                 params,
                                                 return_type,
                                                 body })))
    }
}

/// Whether the statement list contains a return statement on any nesting
/// level.
fn contains_return(statements: &[Stmt]) -> bool {
    statements.iter().any(statement_returns)
}

fn statement_returns(statement: &Stmt) -> bool {
    match statement {
        Stmt::Return { .. } => true,
        Stmt::Block { statements } => contains_return(statements),
        Stmt::If { then_branch,
                   else_branch, .. } => {
            statement_returns(then_branch)
            || else_branch.as_deref().is_some_and(statement_returns)
        },
        Stmt::While { body, .. }
        | Stmt::DoWhile { body, .. }
        | Stmt::For { body, .. } => statement_returns(body),
        _ => false,
    }
}
