use crate::{
    error::{LexicalError, ParseError, ResolutionError, RuntimeError},
    interpreter::lexer::Symbol,
};

/// Whether a diagnostic was produced before or during execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A lexical, parse or resolution error.
    Error,
    /// An error raised while the program was running.
    RuntimeError,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "Fehler"),
            Self::RuntimeError => write!(f, "Laufzeitfehler"),
        }
    }
}

/// One reported problem: source position, a location description, and the
/// rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Compile-stage or runtime.
    pub severity: Severity,
    /// The source line the problem occurred on.
    pub line:     usize,
    /// The column on that line, or 0 when only the line is known.
    pub column:   usize,
    /// Where the problem was detected, e.g. `an 'plus'` or `am Ende`.
    pub location: String,
    /// The rendered error message.
    pub message:  String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.location.is_empty() {
            write!(f, "[Zeile {}] {}: {}", self.line, self.severity, self.message)
        } else {
            write!(f, "[Zeile {}, Spalte {}] {} {}: {}",
                   self.line, self.column, self.severity, self.location, self.message)
        }
    }
}

/// Collects diagnostics from every stage of the interpreter.
///
/// The lexer, parser and resolver report their errors here and continue, so
/// one run can surface many independent problems. The evaluator reports at
/// most one runtime error. The caller inspects the flags afterwards:
/// execution never begins when [`Diagnostics::had_error`] is set.
///
/// This replaces the original's process-wide mutable error flags with a
/// value threaded explicitly through all stages.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries:           Vec<Diagnostic>,
    had_error:         bool,
    had_runtime_error: bool,
}

impl Diagnostics {
    /// Creates an empty diagnostics sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports a problem at an explicit position.
    pub fn report(&mut self, line: usize, column: usize, location: String, message: String) {
        self.entries.push(Diagnostic { severity: Severity::Error,
                                       line,
                                       column,
                                       location,
                                       message });
        self.had_error = true;
    }

    /// Reports a lexical error. Only the line is known for these.
    pub fn lexical(&mut self, error: &LexicalError) {
        self.report(error.line(), 0, String::new(), error.to_string());
    }

    /// Reports a parse error at the offending symbol.
    pub fn parse(&mut self, symbol: &Symbol, error: &ParseError) {
        self.report(symbol.line, symbol.column, symbol.location(), error.to_string());
    }

    /// Reports a resolution error at the offending symbol.
    pub fn resolution(&mut self, symbol: &Symbol, error: &ResolutionError) {
        self.report(symbol.line, symbol.column, symbol.location(), error.to_string());
    }

    /// Reports a runtime error at the symbol it carries. Runtime errors set
    /// their own flag; they do not prevent a later run from starting.
    pub fn runtime(&mut self, error: &RuntimeError) {
        let symbol = error.symbol();
        self.entries.push(Diagnostic { severity: Severity::RuntimeError,
                                       line:     symbol.line,
                                       column:   symbol.column,
                                       location: symbol.location(),
                                       message:  error.to_string(), });
        self.had_runtime_error = true;
    }

    /// Whether any lexical, parse or resolution error has been reported.
    #[must_use]
    pub const fn had_error(&self) -> bool {
        self.had_error
    }

    /// Whether a runtime error has been reported.
    #[must_use]
    pub const fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// All reported diagnostics, in order.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Clears all entries and flags, e.g. between lines of the interactive
    /// prompt.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.had_error = false;
        self.had_runtime_error = false;
    }
}
