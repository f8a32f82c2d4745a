use std::rc::Rc;

use crate::interpreter::{lexer::Literal, value::function::Callable};

/// Represents a runtime value in the interpreter.
///
/// This enum models all the possible types a value can have at runtime.
/// There is no implicit null: "no value" is expressed through the
/// evaluator's plumbing, never as a `Value`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer (`Zahl`).
    Int(i64),
    /// A 64-bit floating-point number (`Kommazahl`).
    Float(f64),
    /// A boolean (`Boolean`), printed as `wahr` / `falsch`.
    Bool(bool),
    /// A single character (`Zeichen`).
    Char(char),
    /// A string (`Zeichenkette`).
    Text(String),
    /// A homogeneous array of values. Cloning is cheap; writes copy the
    /// backing storage when it is shared.
    Array(Rc<Vec<Self>>),
    /// A callable: a user-defined function or a built-in.
    Callable(Callable),
}

impl Value {
    /// The value's numeric content as `f64`, when it is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns `true` if the value is [`Int`](Self::Int).
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Self::Int(..))
    }

    /// Returns `true` if the value is a number.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Int(..) | Self::Float(..))
    }

    /// Returns `true` if the value is [`Text`](Self::Text).
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(..))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(Rc::new(v))
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Int(n) => (*n).into(),
            Literal::Float(f) => (*f).into(),
            Literal::Bool(b) => (*b).into(),
            Literal::Char(c) => (*c).into(),
            Literal::Text(s) => s.clone().into(),
            Literal::Array(elements) => {
                elements.iter().map(Self::from).collect::<Vec<_>>().into()
            },
        }
    }
}

impl std::fmt::Display for Value {
    /// Renders a value the way the language itself spells it: booleans as
    /// `wahr`/`falsch`, floats with a comma as the decimal separator,
    /// arrays in bracket-and-semicolon syntax.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{}", x.to_string().replace('.', ",")),
            Self::Bool(b) => write!(f, "{}", if *b { "wahr" } else { "falsch" }),
            Self::Char(c) => write!(f, "{c}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Array(elements) => {
                write!(f, "[")?;
                for (index, value) in elements.iter().enumerate() {
                    if index > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            },
            Self::Callable(callable) => write!(f, "<Funktion {}>", callable.name()),
        }
    }
}
