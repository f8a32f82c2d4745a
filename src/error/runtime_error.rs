use crate::interpreter::lexer::Symbol;

#[derive(Debug)]
/// Represents all errors that can be raised during evaluation.
///
/// Every runtime error carries the symbol it should be reported at; for
/// operator errors that is the operator token, for declarations the
/// variable name, for calls the closing parenthesis of the argument list.
pub enum RuntimeError {
    /// No type unification rule applies to the operands of an operator.
    OperandTypeMismatch {
        /// The operator symbol.
        symbol: Symbol,
    },
    /// Equality operands must have the identical type.
    OperandsMustMatch {
        /// The operator symbol.
        symbol: Symbol,
    },
    /// The operator is only defined for numbers.
    OperandsOnlyNumbers {
        /// The operator symbol.
        symbol: Symbol,
    },
    /// The operator is only defined for integers.
    OperandsOnlyIntegers {
        /// The operator symbol.
        symbol: Symbol,
    },
    /// `plus` is only defined for numbers and strings.
    OperandsNumbersOrText {
        /// The operator symbol.
        symbol: Symbol,
    },
    /// A unary operator was applied to a value of the wrong type.
    UnaryWrongType {
        /// The operator symbol.
        symbol:   Symbol,
        /// Description of the accepted operand type.
        expected: &'static str,
    },
    /// The condition of a branch or loop did not evaluate to a Boolean.
    ConditionNotBoolean {
        /// The introducing keyword symbol (`wenn`, `solange`, `mache`).
        symbol:    Symbol,
        /// The construct's German name for the message.
        construct: &'static str,
    },
    /// Something other than a function was called.
    NotCallable {
        /// The closing parenthesis of the call.
        symbol: Symbol,
    },
    /// A call passed the wrong number of arguments.
    WrongArgumentCount {
        /// The closing parenthesis of the call.
        symbol:   Symbol,
        /// The arity the callable declares.
        expected: usize,
        /// The number of arguments actually passed.
        found:    usize,
    },
    /// A declaration initializer did not match the declared type.
    WrongType {
        /// The variable name symbol.
        symbol:   Symbol,
        /// The declared type's German name, with article.
        expected: &'static str,
    },
    /// A function returned a value that does not match its declared return
    /// type.
    WrongReturnType {
        /// The function name symbol.
        symbol: Symbol,
    },
    /// A variable was read or assigned that is defined nowhere.
    UndefinedVariable {
        /// The variable name symbol.
        symbol: Symbol,
    },
    /// An array access was outside the valid positions.
    IndexOutOfBounds {
        /// The `Stelle` operator symbol.
        symbol: Symbol,
        /// The length of the array.
        length: usize,
        /// The position that was requested (1-based).
        index:  i64,
    },
    /// `an der Stelle` was applied to something that is not an array.
    NotAnArray {
        /// The `Stelle` operator symbol.
        symbol: Symbol,
    },
    /// `Stück` was given a negative element count.
    NegativeAllocation {
        /// The `Stück` operator symbol.
        symbol: Symbol,
    },
    /// The bounds of a `für` loop were not numeric.
    ForBoundsNotNumeric {
        /// The loop variable name symbol.
        symbol: Symbol,
    },
    /// A value could not be converted to the requested type.
    InvalidCast {
        /// The symbol the cast is reported at.
        symbol: Symbol,
        /// The target type's German name.
        target: &'static str,
    },
    /// An expression was used where a value is required, but it produced
    /// none (e.g. a call to a function without a return value).
    MissingValue {
        /// The symbol the use is reported at.
        symbol: Symbol,
    },
    /// Attempted integer division or modulo by zero.
    DivisionByZero {
        /// The operator symbol.
        symbol: Symbol,
    },
    /// A built-in function failed, e.g. an I/O error.
    NativeFailure {
        /// The closing parenthesis of the call.
        symbol:  Symbol,
        /// The failure description produced by the built-in.
        message: String,
    },
}

impl RuntimeError {
    /// The symbol this error is reported at.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        match self {
            Self::OperandTypeMismatch { symbol }
            | Self::OperandsMustMatch { symbol }
            | Self::OperandsOnlyNumbers { symbol }
            | Self::OperandsOnlyIntegers { symbol }
            | Self::OperandsNumbersOrText { symbol }
            | Self::UnaryWrongType { symbol, .. }
            | Self::ConditionNotBoolean { symbol, .. }
            | Self::NotCallable { symbol }
            | Self::WrongArgumentCount { symbol, .. }
            | Self::WrongType { symbol, .. }
            | Self::WrongReturnType { symbol }
            | Self::UndefinedVariable { symbol }
            | Self::IndexOutOfBounds { symbol, .. }
            | Self::NotAnArray { symbol }
            | Self::NegativeAllocation { symbol }
            | Self::ForBoundsNotNumeric { symbol }
            | Self::InvalidCast { symbol, .. }
            | Self::MissingValue { symbol }
            | Self::DivisionByZero { symbol }
            | Self::NativeFailure { symbol, .. } => symbol,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OperandTypeMismatch { .. } => write!(f, "Ungültiger Operanden-Typ!"),
            Self::OperandsMustMatch { .. } => {
                write!(f, "Operanden müssen den gleichen Typ besitzen!")
            },
            Self::OperandsOnlyNumbers { .. } => write!(f, "Operanden können nur Zahlen sein!"),
            Self::OperandsOnlyIntegers { .. } => {
                write!(f, "Operanden können nur ganze Zahlen sein!")
            },
            Self::OperandsNumbersOrText { .. } => {
                write!(f, "Operanden können nur Zahlen oder Zeichenketten sein!")
            },
            Self::UnaryWrongType { symbol, expected } => {
                write!(f, "Der {} Operator nimmt nur {expected}!", symbol.lexeme)
            },
            Self::ConditionNotBoolean { construct, .. } => {
                write!(f, "Die Bedingung einer {construct} muss ein Boolean sein!")
            },
            Self::NotCallable { .. } => write!(f, "Man kann nur Funktionen aufrufen!"),
            Self::WrongArgumentCount { expected, found, .. } => write!(f,
                                                                      "Es wurden {expected} Argumente erwartet, aber {found} Argumente gegeben!"),
            Self::WrongType { symbol, expected } => {
                write!(f, "Der Variable {} kann nur {expected} zugewiesen werden!",
                       symbol.lexeme)
            },
            Self::WrongReturnType { .. } => write!(f, "Falscher Rückgabetyp!"),
            Self::UndefinedVariable { symbol } => {
                write!(f, "Die Variable {} wurde noch nicht definiert!", symbol.lexeme)
            },
            Self::IndexOutOfBounds { length, index, .. } => write!(f,
                                                                  "Stelle {index} existiert nicht; die Liste hat {length} Elemente!"),
            Self::NotAnArray { .. } => {
                write!(f, "'an der Stelle' kann nur auf Listen angewendet werden!")
            },
            Self::NegativeAllocation { .. } => {
                write!(f, "'Stück' braucht eine nicht-negative Anzahl!")
            },
            Self::ForBoundsNotNumeric { .. } => {
                write!(f, "Eine für-Anweisung nimmt nur Zahlen!")
            },
            Self::InvalidCast { target, .. } => {
                write!(f, "Man kann diesen Wert nicht in {target} umwandeln!")
            },
            Self::MissingValue { .. } => write!(f, "Hier wird ein Wert gebraucht, aber der Ausdruck hat keinen ergeben!"),
            Self::DivisionByZero { .. } => write!(f, "Division durch Null!"),
            Self::NativeFailure { message, .. } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for RuntimeError {}
