#[derive(Debug)]
/// Represents all errors that can occur during parsing.
///
/// Every parse error is reported at a specific symbol; the parser passes
/// the offending symbol to the diagnostics sink alongside the error.
pub enum ParseError {
    /// A specific token was expected after some construct.
    ExpectedToken {
        /// Description of the missing token, e.g. `"ein 'dann'"`.
        expected: &'static str,
        /// Description of the construct it should follow.
        context:  &'static str,
    },
    /// A specific token was expected at the end of some construct.
    ExpectedTokenAtEnd {
        /// Description of the missing token.
        expected: &'static str,
        /// Description of the construct it should close.
        context:  &'static str,
    },
    /// A statement was not closed with a `.`.
    DotAfterStatement,
    /// A variable declaration was not closed with a `.`.
    DotAfterVarDeclaration,
    /// A variable name was expected.
    VarNameExpected,
    /// A function name was expected.
    FuncNameExpected,
    /// A parameter name was expected.
    ParameterNameExpected,
    /// The assignment target was not a variable.
    InvalidAssignmentTarget,
    /// The article does not agree with the declared type.
    WrongArticle {
        /// The article as written.
        article: &'static str,
        /// The types this article agrees with.
        types:   &'static str,
    },
    /// An expression was expected.
    ExpressionExpected,
    /// A function declared more than 255 parameters, or a call passed more
    /// than 255 arguments.
    TooManyArguments,
    /// The declared return type is not a valid type.
    ReturnTypeInvalid,
    /// A function with a declared return type contains no return statement.
    ReturnMissing,
    /// A `für` statement did not begin with a counting variable
    /// declaration.
    ForWithoutVariable,
    /// A Boolean declaration initializer did not use the
    /// `wahr/falsch wenn …` form.
    BooleanNeedsCondition,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExpectedToken { expected, context } => {
                write!(f, "Nach {context} wird {expected} erwartet!")
            },
            Self::ExpectedTokenAtEnd { expected, context } => {
                write!(f, "Am Ende {context} wird {expected} erwartet!")
            },
            Self::DotAfterStatement => write!(f,
                                              "Satzzeichen beachten! Ein Punkt muss nach einer Anweisung folgen!"),
            Self::DotAfterVarDeclaration => write!(f,
                                                   "Satzzeichen beachten! Ein Punkt muss nach einer Variablen-Deklaration folgen!"),
            Self::VarNameExpected => write!(f, "Es wurde ein Variablen-Name erwartet!"),
            Self::FuncNameExpected => write!(f, "Es wurde ein Funktions-Name erwartet!"),
            Self::ParameterNameExpected => write!(f, "Es wurde ein Parameter-Name erwartet!"),
            Self::InvalidAssignmentTarget => write!(f, "Ungültiges Zuweisungsziel!"),
            Self::WrongArticle { article, types } => {
                write!(f, "Der Artikel '{article}' passt nur {types}!")
            },
            Self::ExpressionExpected => write!(f, "Ausdruck erwartet!"),
            Self::TooManyArguments => {
                write!(f, "Eine Funktion kann nicht mehr als 255 Argumente haben!")
            },
            Self::ReturnTypeInvalid => write!(f, "Ungültiger Rückgabetyp!"),
            Self::ReturnMissing => write!(f,
                                          "Eine Funktion mit einem Rückgabetyp braucht eine Rückgabe-Anweisung!"),
            Self::ForWithoutVariable => write!(f,
                                               "Eine für-Anweisung braucht eine Variablen-Deklaration!"),
            Self::BooleanNeedsCondition => write!(f,
                                                  "Einem Boolean wird mit 'wahr wenn' oder 'falsch wenn' zugewiesen!"),
        }
    }
}

impl std::error::Error for ParseError {}
