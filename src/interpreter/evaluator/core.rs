use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{Expr, NodeId, Stmt},
    diagnostics::Diagnostics,
    error::RuntimeError,
    interpreter::{
        builtins::Registry,
        environment::{EnvRef, Environments},
        evaluator::function::{type_description, type_matches},
        lexer::{Symbol, TokenKind},
        value::{
            core::Value,
            function::{Callable, Function},
        },
    },
};

/// Result type used by expression evaluation.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The result of executing one statement: either execution continues
/// normally, or a `gib … zurück.` is travelling up to the nearest
/// enclosing function-call activation.
///
/// Modelling return as an explicit result tag keeps the only non-local
/// control transfer of the language out of the error channel.
#[derive(Debug)]
pub enum Flow {
    /// The statement completed; continue with the next one.
    Normal,
    /// A return statement was executed, carrying its optional value.
    Return(Option<Value>),
}

/// Result type used by statement execution.
pub type ExecResult = Result<Flow, RuntimeError>;

/// The tree-walking evaluator.
///
/// Executes a resolved statement list against the environment arena. The
/// global frame is pre-populated with the built-in callables from the
/// registry handed to [`Interpreter::new`]; the interpreter has no
/// knowledge of what those functions do.
///
/// `current` is the single piece of mutable scope state threaded through
/// the whole evaluation; [`Interpreter::execute_block`] restores it on
/// every exit path, including error propagation.
pub struct Interpreter {
    pub(in crate::interpreter) environments: Environments,
    pub(in crate::interpreter) current:      EnvRef,
    locals: HashMap<NodeId, usize>,
}

impl Interpreter {
    /// Creates an interpreter whose global environment holds the given
    /// built-in callables.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        let mut environments = Environments::new();
        let globals = environments.global();

        for native in registry.into_natives() {
            let name = native.name.clone();
            environments.define(globals, &name,
                                Value::Callable(Callable::Native(Rc::new(native))));
        }

        Self { environments,
               current: globals,
               locals: HashMap::new() }
    }

    /// Records a resolved hop count for a variable reference. Called by
    /// the resolver.
    pub(crate) fn resolve(&mut self, id: NodeId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Test-only view of the resolver's hop table.
    #[cfg(test)]
    pub(crate) const fn hop_table(&self) -> &HashMap<NodeId, usize> {
        &self.locals
    }

    /// Executes a resolved statement list.
    ///
    /// The first runtime error terminates the execution and is reported to
    /// `diagnostics` exactly once. A `Return` can never reach this level:
    /// the resolver rejects returns outside function bodies.
    pub fn interpret(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics) {
        for statement in statements {
            match self.execute(statement) {
                Ok(Flow::Normal) => {},
                Ok(Flow::Return(_)) => break,
                Err(error) => {
                    diagnostics.runtime(&error);
                    return;
                },
            }
        }
    }

    /// Executes one statement.
    pub(in crate::interpreter) fn execute(&mut self, statement: &Stmt) -> ExecResult {
        match statement {
            Stmt::Block { statements } => {
                let env = self.environments.push(self.current);
                self.execute_block(statements, env)
            },
            Stmt::Expression { expr } => {
                self.eval(expr)?;
                Ok(Flow::Normal)
            },
            Stmt::Function(declaration) => {
                let function = Function { declaration: declaration.clone(),
                                          closure:     self.current, };
                let value = Value::Callable(Callable::Function(Rc::new(function)));
                self.environments
                    .define(self.current, &declaration.name.lexeme, value);
                Ok(Flow::Normal)
            },
            Stmt::If { keyword,
                       condition,
                       then_branch,
                       else_branch, } => {
                if self.eval_condition(condition, keyword, "wenn-Anweisung")? {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            },
            Stmt::Return { keyword, value } => {
                let value = match value {
                    Some(expr) => Some(self.eval_required(expr, keyword)?),
                    None => None,
                };
                Ok(Flow::Return(value))
            },
            Stmt::Var { declared_type,
                        name,
                        initializer, } => self.execute_var(declared_type, name,
                                                           initializer.as_ref()),
            Stmt::While { keyword,
                          condition,
                          body, } => {
                while self.eval_condition(condition, keyword, "solange-Anweisung")? {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            },
            Stmt::DoWhile { keyword,
                            condition,
                            body, } => {
                loop {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                    if !self.eval_condition(condition, keyword, "mache-solange-Anweisung")? {
                        break;
                    }
                }
                Ok(Flow::Normal)
            },
            Stmt::For { variable, max, body, .. } => self.execute_for(variable, max, body),
        }
    }

    /// Executes `statements` with `env` installed as the current
    /// environment, restoring the previous one afterwards unconditionally
    /// (also when an error propagates out).
    pub(in crate::interpreter) fn execute_block(&mut self,
                                                statements: &[Stmt],
                                                env: EnvRef)
                                                -> ExecResult {
        let previous = self.current;
        self.current = env;
        let result = self.execute_sequence(statements);
        self.current = previous;
        result
    }

    fn execute_sequence(&mut self, statements: &[Stmt]) -> ExecResult {
        for statement in statements {
            if let Flow::Return(value) = self.execute(statement)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a variable declaration: evaluates the initializer, checks
    /// it against the declared type tag, and binds the name in the current
    /// environment.
    fn execute_var(&mut self,
                   declared_type: &Symbol,
                   name: &Symbol,
                   initializer: Option<&Expr>)
                   -> ExecResult {
        let value = match initializer {
            Some(expr) => self.eval_required(expr, name)?,
            None => {
                return Err(RuntimeError::WrongType { symbol:   name.clone(),
                                                     expected:
                                                         type_description(declared_type.kind), });
            },
        };

        if !type_matches(declared_type.kind, &value) {
            return Err(RuntimeError::WrongType { symbol:   name.clone(),
                                                 expected:
                                                     type_description(declared_type.kind), });
        }

        self.environments
            .define(self.current, &name.lexeme, value);
        Ok(Flow::Normal)
    }

    /// Runs the desugared `für` loop: decides the direction by comparing
    /// the counting variable's starting value with the bound, then
    /// re-reads the variable before every iteration. The step assignment
    /// is already part of the body.
    fn execute_for(&mut self, variable: &Expr, max: &Expr, body: &Stmt) -> ExecResult {
        let Expr::Variable { name, .. } = variable else {
            unreachable!("the parser desugars für loops around a variable expression");
        };
        let name = name.clone();

        let start = self.numeric_for_bound(variable, &name)?;
        let bound_value = self.eval_required(max, &name)?;
        let Some(bound) = bound_value.as_number() else {
            return Err(RuntimeError::ForBoundsNotNumeric { symbol: name });
        };
        let ascending = start <= bound;

        loop {
            let current = self.numeric_for_bound(variable, &name)?;
            let keep_going = if ascending { current <= bound } else { current >= bound };
            if !keep_going {
                break;
            }

            if let Flow::Return(value) = self.execute(body)? {
                return Ok(Flow::Return(value));
            }
        }

        Ok(Flow::Normal)
    }

    fn numeric_for_bound(&mut self, variable: &Expr, name: &Symbol) -> EvalResult<f64> {
        let value = self.eval_required(variable, name)?;
        value.as_number()
             .ok_or_else(|| RuntimeError::ForBoundsNotNumeric { symbol: name.clone() })
    }

    /// Evaluates an expression and returns the resulting value, or `None`
    /// for calls that produce no value.
    pub(in crate::interpreter) fn eval(&mut self, expr: &Expr) -> EvalResult<Option<Value>> {
        match expr {
            Expr::Literal { value, .. } => Ok(Some(Value::from(value))),
            Expr::Grouping { expr } => self.eval(expr),
            Expr::Variable { id, name } => self.look_up(*id, name).map(Some),
            Expr::Assign { id,
                           name,
                           index,
                           value, } => self.eval_assign(*id, name, index.as_deref(), value),
            Expr::Logical { left, op, right } => self.eval_logical(left, op, right).map(Some),
            Expr::Unary { op, expr } => self.eval_unary(op, expr).map(Some),
            Expr::Binary { left, op, right } => self.eval_binary(left, op, right).map(Some),
            Expr::Call { callee,
                         paren,
                         arguments, } => self.eval_call(callee, paren, arguments),
        }
    }

    /// Evaluates a subexpression that must produce a value; reports a
    /// missing value at `at`.
    pub(in crate::interpreter) fn eval_required(&mut self,
                                                expr: &Expr,
                                                at: &Symbol)
                                                -> EvalResult<Value> {
        self.eval(expr)?
            .ok_or_else(|| RuntimeError::MissingValue { symbol: at.clone() })
    }

    /// Evaluates a branch or loop condition, which must be exactly a
    /// Boolean; there is no truthiness coercion.
    fn eval_condition(&mut self,
                      condition: &Expr,
                      keyword: &Symbol,
                      construct: &'static str)
                      -> EvalResult<bool> {
        match self.eval_required(condition, keyword)? {
            Value::Bool(value) => Ok(value),
            _ => Err(RuntimeError::ConditionNotBoolean { symbol: keyword.clone(),
                                                         construct }),
        }
    }

    /// Reads a variable: with a recorded hop count, walk exactly that many
    /// parent links; without one, the name lives in the global
    /// environment.
    fn look_up(&self, id: NodeId, name: &Symbol) -> EvalResult<Value> {
        if let Some(distance) = self.locals.get(&id) {
            if let Some(value) = self.environments
                                     .get_at(self.current, *distance, &name.lexeme)
            {
                return Ok(value.clone());
            }
        } else if let Some(value) = self.environments
                                        .get(self.environments.global(), &name.lexeme)
        {
            return Ok(value.clone());
        }

        Err(RuntimeError::UndefinedVariable { symbol: name.clone() })
    }

    /// Evaluates an assignment, optionally into one position of an array
    /// variable.
    fn eval_assign(&mut self,
                   id: NodeId,
                   name: &Symbol,
                   index: Option<&Expr>,
                   value: &Expr)
                   -> EvalResult<Option<Value>> {
        let value = self.eval_required(value, name)?;

        match index {
            None => {
                let assigned = match self.locals.get(&id) {
                    Some(distance) => self.environments.assign_at(self.current, *distance,
                                                                  &name.lexeme, value.clone()),
                    None => {
                        let globals = self.environments.global();
                        self.environments
                            .assign(globals, &name.lexeme, value.clone())
                    },
                };

                if !assigned {
                    return Err(RuntimeError::UndefinedVariable { symbol: name.clone() });
                }
            },
            Some(index_expr) => {
                let position = match self.eval_required(index_expr, name)? {
                    Value::Int(position) => position,
                    _ => {
                        return Err(RuntimeError::OperandsOnlyIntegers { symbol: name.clone() });
                    },
                };

                let stored = match self.locals.get(&id) {
                    Some(distance) => self.environments
                                          .get_at(self.current, *distance, &name.lexeme),
                    None => self.environments
                                .get(self.environments.global(), &name.lexeme),
                };

                let Some(Value::Array(elements)) = stored else {
                    return Err(RuntimeError::NotAnArray { symbol: name.clone() });
                };

                let length = elements.len();
                if position < 1 || position as usize > length {
                    return Err(RuntimeError::IndexOutOfBounds { symbol: name.clone(),
                                                                length,
                                                                index: position, });
                }

                let mut updated = elements.as_ref().clone();
                updated[position as usize - 1] = value.clone();
                let updated = Value::from(updated);

                let assigned = match self.locals.get(&id) {
                    Some(distance) => self.environments.assign_at(self.current, *distance,
                                                                  &name.lexeme, updated),
                    None => {
                        let globals = self.environments.global();
                        self.environments.assign(globals, &name.lexeme, updated)
                    },
                };

                if !assigned {
                    return Err(RuntimeError::UndefinedVariable { symbol: name.clone() });
                }
            },
        }

        Ok(Some(value))
    }

    /// Short-circuiting `und` / `oder`; both operands must be Booleans.
    fn eval_logical(&mut self, left: &Expr, op: &Symbol, right: &Expr) -> EvalResult<Value> {
        let Value::Bool(left_value) = self.eval_required(left, op)? else {
            return Err(RuntimeError::OperandTypeMismatch { symbol: op.clone() });
        };

        if op.kind == TokenKind::Oder && left_value {
            return Ok(Value::Bool(true));
        }
        if op.kind == TokenKind::Und && !left_value {
            return Ok(Value::Bool(false));
        }

        match self.eval_required(right, op)? {
            Value::Bool(right_value) => Ok(Value::Bool(right_value)),
            _ => Err(RuntimeError::OperandTypeMismatch { symbol: op.clone() }),
        }
    }
}
