#[derive(Debug)]
/// Represents all errors detected by the static resolver.
pub enum ResolutionError {
    /// A name was declared twice in the same scope.
    AlreadyDeclared,
    /// A variable was read inside its own initializer.
    ReadInOwnInitializer,
    /// A return statement appeared outside any function body.
    ReturnOutsideFunction,
}

impl std::fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyDeclared => {
                write!(f, "Eine Variable mit demselben Namen existiert schon!")
            },
            Self::ReadInOwnInitializer => write!(f,
                                                 "Eine Variable kann nicht in ihrem eigenen Initialisierer gelesen werden!"),
            Self::ReturnOutsideFunction => write!(f,
                                                  "Eine Rückgabe-Anweisung kann nur in einer Funktion vorkommen!"),
        }
    }
}

impl std::error::Error for ResolutionError {}
