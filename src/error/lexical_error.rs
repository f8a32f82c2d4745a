#[derive(Debug)]
/// Represents all errors that can occur during lexing.
pub enum LexicalError {
    /// Found a character the language does not recognize.
    UnexpectedCharacter {
        /// The offending character(s) as found in the source.
        character: String,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// A string literal was not closed before the end of input.
    UnterminatedText {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A character literal was not closed before the end of the line.
    UnterminatedChar {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A character literal contained more than one character.
    CharTooLong {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A character literal contained no character.
    EmptyChar {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An integer literal was too large to be represented.
    NumberTooLarge {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An array literal contained something other than literals separated
    /// by semicolons.
    MalformedArray {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An array literal mixed elements of different types.
    MixedArray {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An array literal was not closed before the end of input.
    UnterminatedArray {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `binde … ein.` directive did not follow the expected shape.
    MalformedInclude {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The file named by an include directive does not exist or could not
    /// be read.
    IncludeMissing {
        /// The path as written in the directive.
        path: String,
        /// The source line where the error occurred.
        line: usize,
    },
}

impl LexicalError {
    /// The source line the error refers to.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { line, .. }
            | Self::UnterminatedText { line }
            | Self::UnterminatedChar { line }
            | Self::CharTooLong { line }
            | Self::EmptyChar { line }
            | Self::NumberTooLarge { line }
            | Self::MalformedArray { line }
            | Self::MixedArray { line }
            | Self::UnterminatedArray { line }
            | Self::MalformedInclude { line }
            | Self::IncludeMissing { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for LexicalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedCharacter { character, .. } => {
                write!(f, "Unerwartetes Zeichen: '{character}'.")
            },
            Self::UnterminatedText { .. } => write!(f, "Unterminierte Zeichenkette!"),
            Self::UnterminatedChar { .. } => write!(f, "Unterminiertes Zeichen!"),
            Self::CharTooLong { .. } => write!(f,
                                               "Ein Zeichen kann nur ein Zeichen groß sein! Benutze eine Zeichenkette, wenn du mehr willst!"),
            Self::EmptyChar { .. } => write!(f, "Leeres Zeichen!"),
            Self::NumberTooLarge { .. } => write!(f, "Die Zahl ist zu groß!"),
            Self::MalformedArray { .. } => write!(f,
                                                  "Eine Liste darf nur Literale enthalten, getrennt durch Semikolons!"),
            Self::MixedArray { .. } => {
                write!(f, "Alle Elemente einer Liste müssen den gleichen Typ besitzen!")
            },
            Self::UnterminatedArray { .. } => write!(f, "Unterminierte Liste!"),
            Self::MalformedInclude { .. } => write!(f,
                                                    "Nach 'binde' werden ein Dateiname, 'ein' und ein Punkt erwartet!"),
            Self::IncludeMissing { path, .. } => {
                write!(f, "Die Datei '{path}' konnte nicht gelesen werden!")
            },
        }
    }
}

impl std::error::Error for LexicalError {}
