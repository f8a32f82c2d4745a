use std::rc::Rc;

use crate::{
    ast::FunctionDecl,
    interpreter::{environment::EnvRef, value::core::Value},
};

/// The result a native handler produces: an optional value, or a failure
/// description that the evaluator wraps into a runtime error at the call
/// site.
pub type NativeResult = Result<Option<Value>, String>;

/// A natively implemented built-in function.
///
/// The interpreter knows nothing about what the handler does; it only
/// checks the arity and invokes it.
pub struct NativeFunction {
    /// The name the built-in is bound to in the global environment.
    pub name:    String,
    /// The exact number of arguments the handler expects.
    pub arity:   usize,
    /// The invocation function.
    pub handler: Box<dyn Fn(&[Value]) -> NativeResult>,
}

impl std::fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeFunction")
         .field("name", &self.name)
         .field("arity", &self.arity)
         .finish_non_exhaustive()
    }
}

/// A user-defined function value: the shared declaration plus the
/// environment captured at the point of declaration.
///
/// The environment is captured by handle, not by copy, which is what gives
/// lexical scoping and mutable capture.
#[derive(Debug)]
pub struct Function {
    /// The declaration this closure was created from.
    pub declaration: Rc<FunctionDecl>,
    /// The defining environment's handle.
    pub closure:     EnvRef,
}

/// Any value supporting "fixed arity" plus "invoke with that many
/// arguments": user-defined functions and built-ins alike.
#[derive(Debug, Clone)]
pub enum Callable {
    /// A user-defined function with its captured environment.
    Function(Rc<Function>),
    /// A built-in function from the registry.
    Native(Rc<NativeFunction>),
}

impl Callable {
    /// The number of arguments this callable expects.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Function(function) => function.declaration.params.len(),
            Self::Native(native) => native.arity,
        }
    }

    /// The callable's name, for display purposes.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Function(function) => &function.declaration.name.lexeme,
            Self::Native(native) => &native.name,
        }
    }
}

impl PartialEq for Callable {
    /// Two callables are equal only when they are the same object.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
