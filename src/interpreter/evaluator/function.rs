use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter},
        lexer::{Symbol, TokenKind},
        value::{
            core::Value,
            function::{Callable, Function},
        },
    },
};

impl Interpreter {
    /// Evaluates a call expression.
    ///
    /// The callee must be a callable value and the argument count must
    /// equal its declared arity. Built-ins are invoked through their
    /// handler; user-defined functions get a fresh child environment of
    /// their captured closure environment.
    pub(in crate::interpreter) fn eval_call(&mut self,
                                            callee: &Expr,
                                            paren: &Symbol,
                                            arguments: &[Expr])
                                            -> EvalResult<Option<Value>> {
        let callee_value = self.eval_required(callee, paren)?;

        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(self.eval_required(argument, paren)?);
        }

        let Value::Callable(callable) = callee_value else {
            return Err(RuntimeError::NotCallable { symbol: paren.clone() });
        };

        if args.len() != callable.arity() {
            return Err(RuntimeError::WrongArgumentCount { symbol:   paren.clone(),
                                                          expected: callable.arity(),
                                                          found:    args.len(), });
        }

        match callable {
            Callable::Native(native) => {
                (native.handler)(&args).map_err(|message| {
                                           RuntimeError::NativeFailure { symbol: paren.clone(),
                                                                         message }
                                       })
            },
            Callable::Function(function) => self.call_function(&function, args),
        }
    }

    /// Invokes a user-defined function: binds the parameters positionally
    /// in a fresh child environment of the captured closure environment,
    /// executes the body, and intercepts the `Return` flow.
    ///
    /// A returned value is type-checked against the declared return type.
    /// A body that completes without returning yields a void result.
    fn call_function(&mut self, function: &Function, args: Vec<Value>) -> EvalResult<Option<Value>> {
        let declaration = &function.declaration;

        let env = self.environments.push(function.closure);
        for (param, value) in declaration.params.iter().zip(args) {
            self.environments.define(env, &param.lexeme, value);
        }

        let flow = self.execute_block(&declaration.body, env)?;
        let returned = match flow {
            Flow::Return(value) => value,
            Flow::Normal => None,
        };

        match (&declaration.return_type, returned) {
            (Some(declared), Some(value)) => {
                if type_matches(declared.kind, &value) {
                    Ok(Some(value))
                } else {
                    Err(RuntimeError::WrongReturnType { symbol: declaration.name.clone() })
                }
            },
            (Some(_), None) | (None, None) => Ok(None),
            (None, value) => Ok(value),
        }
    }
}

/// Whether a value matches a declared type keyword.
///
/// The plural types accept arrays whose elements all carry the matching
/// tag; an empty array satisfies any plural type.
pub(in crate::interpreter) fn type_matches(kind: TokenKind, value: &Value) -> bool {
    match kind {
        TokenKind::Zahl => matches!(value, Value::Int(_)),
        TokenKind::Kommazahl => matches!(value, Value::Float(_)),
        TokenKind::Boolean => matches!(value, Value::Bool(_)),
        TokenKind::Zeichenkette => matches!(value, Value::Text(_)),
        TokenKind::Zeichen => matches!(value, Value::Char(_)),
        TokenKind::Zahlen => array_of(value, |element| matches!(element, Value::Int(_))),
        TokenKind::Kommazahlen => array_of(value, |element| matches!(element, Value::Float(_))),
        TokenKind::Zeichenketten => array_of(value, |element| matches!(element, Value::Text(_))),
        _ => false,
    }
}

/// The declared type's German description, with article, for error
/// messages.
pub(in crate::interpreter) const fn type_description(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Zahl => "eine Zahl",
        TokenKind::Kommazahl => "eine Kommazahl",
        TokenKind::Boolean => "ein Boolean",
        TokenKind::Zeichenkette => "eine Zeichenkette",
        TokenKind::Zeichen => "ein Zeichen",
        TokenKind::Zahlen => "Zahlen",
        TokenKind::Kommazahlen => "Kommazahlen",
        TokenKind::Zeichenketten => "Zeichenketten",
        _ => "ein anderer Typ",
    }
}

fn array_of(value: &Value, matches_element: impl Fn(&Value) -> bool) -> bool {
    match value {
        Value::Array(elements) => elements.iter().all(matches_element),
        _ => false,
    }
}
