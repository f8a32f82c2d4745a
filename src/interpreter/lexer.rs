use std::{fs, path::PathBuf};

use logos::Logos;

use crate::{diagnostics::Diagnostics, error::LexicalError};

/// Represents a lexical token kind in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized token kinds of the language.
///
/// The language is written in German prose, so most "operators" are ordinary
/// words (`plus`, `größer`, `verschoben`) and the keyword table is large.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    /// Floating-point literals use a comma as the decimal separator,
    /// such as `3,14`. The presence of the comma selects the float type.
    #[regex(r"[0-9]+,[0-9]+")]
    Float,
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+")]
    Int,
    /// String literal tokens, such as `"hallo"`. May span lines.
    #[regex(r#""[^"]*""#)]
    Text,
    /// An unterminated string literal; reported as a diagnostic.
    #[regex(r#""[^"]*"#)]
    TextUnterminated,
    /// Character literal tokens, such as `'a'`.
    #[regex(r"'[^'\n]*'")]
    CharLit,
    /// An unterminated character literal; reported as a diagnostic.
    #[regex(r"'[^'\n]*")]
    CharUnterminated,

    // Artikel
    /// `der`
    #[token("der")]
    Der,
    /// `die`
    #[token("die")]
    Die,
    /// `das`
    #[token("das")]
    Das,

    // Typen
    /// `Zahl`
    #[token("Zahl")]
    Zahl,
    /// `Kommazahl`
    #[token("Kommazahl")]
    Kommazahl,
    /// `Boolean`
    #[token("Boolean")]
    Boolean,
    /// `Zeichenkette`
    #[token("Zeichenkette")]
    Zeichenkette,
    /// `Zeichen`
    #[token("Zeichen")]
    Zeichen,
    /// `Zahlen`
    #[token("Zahlen")]
    Zahlen,
    /// `Kommazahlen`
    #[token("Kommazahlen")]
    Kommazahlen,
    /// `Zeichenketten`
    #[token("Zeichenketten")]
    Zeichenketten,

    // Boolesche Literale
    /// `wahr`
    #[token("wahr")]
    Wahr,
    /// `falsch`
    #[token("falsch")]
    Falsch,

    // Mathematische Operatoren
    /// `ist`
    #[token("ist")]
    Ist,
    /// `sind`
    #[token("sind")]
    Sind,
    /// `plus`
    #[token("plus")]
    Plus,
    /// `minus`
    #[token("minus")]
    Minus,
    /// `mal`
    #[token("mal")]
    Mal,
    /// `durch`
    #[token("durch")]
    Durch,
    /// `modulo`
    #[token("modulo")]
    Modulo,
    /// `hoch`
    #[token("hoch")]
    Hoch,
    /// `wurzel`
    #[token("wurzel")]
    Wurzel,
    /// `ln`
    #[token("ln")]
    Ln,
    /// `Betrag`
    #[token("Betrag")]
    Betrag,
    /// `Stück`; allocates an array of n copies of a seed value.
    #[token("Stück")]
    Stueck,
    /// `an`
    #[token("an")]
    An,
    /// `Stelle`
    #[token("Stelle")]
    Stelle,

    // Vergleichsoperatoren
    /// `gleich`
    #[token("gleich")]
    Gleich,
    /// `ungleich`
    #[token("ungleich")]
    Ungleich,
    /// `kleiner`; upgraded in place to [`Self::KleinerGleich`] when the
    /// parser recognizes a trailing `, oder gleich`.
    #[token("kleiner")]
    Kleiner,
    /// `größer`; upgraded in place to [`Self::GroesserGleich`] when the
    /// parser recognizes a trailing `, oder gleich`.
    #[token("größer")]
    Groesser,
    /// `kleiner als, oder gleich` — never produced by the lexer, only by the
    /// parser's in-place upgrade of [`Self::Kleiner`].
    #[token("\u{2}")]
    KleinerGleich,
    /// `größer als, oder gleich` — never produced by the lexer, only by the
    /// parser's in-place upgrade of [`Self::Groesser`].
    #[token("\u{3}")]
    GroesserGleich,
    /// `als`
    #[token("als")]
    Als,

    // Bitweise Operatoren
    /// `logisch`
    #[token("logisch")]
    Logisch,
    /// `kontra`
    #[token("kontra")]
    Kontra,
    /// `um`
    #[token("um")]
    Um,
    /// `bit`
    #[token("bit")]
    Bit,
    /// `nach`
    #[token("nach")]
    Nach,
    /// `links`
    #[token("links")]
    Links,
    /// `rechts`
    #[token("rechts")]
    Rechts,
    /// `verschoben`
    #[token("verschoben")]
    Verschoben,

    // Konstanten
    /// `pi`
    #[token("pi")]
    Pi,
    /// `e` — one letter, so it needs explicit priority over the
    /// identifier pattern.
    #[token("e", priority = 3)]
    E,
    /// `tau`
    #[token("tau")]
    Tau,

    // Trigonometrische Funktionen
    /// `Sinus`
    #[token("Sinus")]
    Sinus,
    /// `Kosinus`
    #[token("Kosinus")]
    Kosinus,
    /// `Tangens`
    #[token("Tangens")]
    Tangens,
    /// `Arkussinus`
    #[token("Arkussinus")]
    Arkussinus,
    /// `Arkuskosinus`
    #[token("Arkuskosinus")]
    Arkuskosinus,
    /// `Arkustangens`
    #[token("Arkustangens")]
    Arkustangens,
    /// `Hyperbelsinus`
    #[token("Hyperbelsinus")]
    Hyperbelsinus,
    /// `Hyperbelkosinus`
    #[token("Hyperbelkosinus")]
    Hyperbelkosinus,
    /// `Hyperbeltangens`
    #[token("Hyperbeltangens")]
    Hyperbeltangens,

    // Logische Operatoren
    /// `und`
    #[token("und")]
    Und,
    /// `oder`
    #[token("oder")]
    Oder,
    /// `nicht`
    #[token("nicht")]
    Nicht,

    // Verzweigungen
    /// `wenn`
    #[token("wenn")]
    Wenn,
    /// `aber`
    #[token("aber")]
    Aber,
    /// `dann`
    #[token("dann")]
    Dann,
    /// `sonst`
    #[token("sonst")]
    Sonst,

    // Schleifen
    /// `für`
    #[token("für")]
    Fuer,
    /// `solange`
    #[token("solange")]
    Solange,
    /// `mache`
    #[token("mache")]
    Mache,
    /// `jede`
    #[token("jede")]
    Jede,
    /// `von`
    #[token("von")]
    Von,
    /// `bis`
    #[token("bis")]
    Bis,
    /// `schrittgröße`
    #[token("schrittgröße")]
    Schrittgroesse,
    /// `mit`
    #[token("mit")]
    Mit,

    // Funktionen
    /// `Funktion`
    #[token("Funktion")]
    Funktion,
    /// `macht`
    #[token("macht")]
    Macht,
    /// `gib`
    #[token("gib")]
    Gib,
    /// `zurück`
    #[token("zurück")]
    Zurueck,
    /// `vom`
    #[token("vom")]
    Vom,
    /// `Typ`
    #[token("Typ")]
    Typ,

    // Einbindung
    /// `binde`
    #[token("binde")]
    Binde,
    /// `ein`
    #[token("ein")]
    Ein,

    /// Identifier tokens; variable or function names such as `summe`.
    /// German letters are allowed.
    #[regex(r"[a-zA-ZäöüÄÖÜß_][a-zA-ZäöüÄÖÜß_0-9]*")]
    Identifier,

    /// `// Kommentare.`
    #[regex(r"//[^\n\r]*", logos::skip)]
    Comment,

    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `,`
    #[token(",")]
    Comma,
    /// `.` — the statement terminator.
    #[token(".")]
    Dot,
    /// `:` — introduces an indented block.
    #[token(":")]
    Colon,
    /// `;` — separates array literal elements.
    #[token(";")]
    Semicolon,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `-`
    #[token("-")]
    Neg,

    /// A bracketed array literal such as `[1; 2; 3]`; assembled by the scan
    /// driver from its element tokens, never matched directly.
    #[token("\u{1}")]
    ArrayLit,
    /// End-of-input marker, appended by the scan driver.
    #[token("\u{0}")]
    Eof,

    /// One tab, or a run of four consecutive spaces. Increments the
    /// indentation depth stamped onto the remaining tokens of the line.
    #[token("\t")]
    #[token("    ")]
    Tab,
    /// Ends a line and resets the indentation depth.
    #[token("\n")]
    Newline,
    /// Spaces and carriage returns without structural meaning.
    #[regex(r"[ \r\f]", logos::skip)]
    Ignored,
}

/// A literal payload carried by a token.
///
/// Array literals are homogeneous; the lexer infers the element type from
/// the literal texts and rejects mixed brackets.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A 64-bit signed integer literal.
    Int(i64),
    /// A 64-bit floating-point literal.
    Float(f64),
    /// A boolean literal value: `wahr` or `falsch`.
    Bool(bool),
    /// A character literal.
    Char(char),
    /// A string literal.
    Text(String),
    /// A homogeneous array literal, e.g. `[1; 2; 3]`.
    Array(Vec<Literal>),
}

/// One lexical unit: kind, source text, optional literal payload, source
/// position, and the indentation depth of its line.
///
/// Symbols are produced only by the lexer. The parser reads them and may
/// upgrade `kind` in place (comparison suffix recognition); everything else
/// is immutable after scanning.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub kind:    TokenKind,
    pub lexeme:  String,
    pub literal: Option<Literal>,
    pub line:    usize,
    pub column:  usize,
    pub depth:   usize,
}

impl Symbol {
    /// A human-readable location description for diagnostics: the lexeme
    /// itself, or `am Ende` for the end-of-input marker.
    #[must_use]
    pub fn location(&self) -> String {
        if self.kind == TokenKind::Eof {
            "am Ende".to_string()
        } else {
            format!("an '{}'", self.lexeme)
        }
    }
}

/// Scans source text into a flat [`Symbol`] sequence terminated by an
/// end-of-input symbol.
///
/// The lexer recognizes the keyword table, punctuation, number literals with
/// a comma as the decimal separator, string and character literals, and
/// bracketed array literals. Indentation is structurally significant: every
/// tab (or run of four spaces) increments a per-line depth counter that is
/// stamped onto each symbol of the line.
///
/// A `binde "pfad" ein.` directive triggers synchronous lexing of the named
/// file, resolved relative to the directory of the file currently being
/// lexed, and splices the resulting symbols into the stream.
///
/// Errors are reported to the [`Diagnostics`] sink without aborting the
/// scan, so a single pass can surface many lexical errors.
pub struct Lexer<'src> {
    source:    &'src str,
    directory: Option<PathBuf>,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer for source text with no associated file, e.g. a line
    /// typed into the interactive prompt. Include directives resolve
    /// relative to the working directory.
    #[must_use]
    pub const fn new(source: &'src str) -> Self {
        Self { source,
               directory: None }
    }

    /// Creates a lexer for the contents of a file located in `directory`.
    /// Include directives resolve relative to that directory.
    #[must_use]
    pub fn with_directory(source: &'src str, directory: PathBuf) -> Self {
        Self { source,
               directory: Some(directory) }
    }

    /// Runs the scan and returns all symbols, ending with
    /// [`TokenKind::Eof`]. Lexical errors are pushed onto `diagnostics`.
    #[must_use]
    pub fn scan(self, diagnostics: &mut Diagnostics) -> Vec<Symbol> {
        let mut scan = Scan { lexer: TokenKind::lexer(self.source),
                              source: self.source,
                              directory: self.directory,
                              symbols: Vec::new(),
                              line: 1,
                              line_start: 0,
                              depth: 0, };

        while let Some(token) = scan.lexer.next() {
            scan.handle(token, diagnostics);
        }

        let column = scan.lexer.span().end.saturating_sub(scan.line_start) + 1;
        scan.symbols.push(Symbol { kind: TokenKind::Eof,
                                   lexeme: String::new(),
                                   literal: None,
                                   line: scan.line,
                                   column,
                                   depth: scan.depth, });
        scan.symbols
    }
}

/// Mutable scanning state: the raw logos lexer plus line, column and
/// indentation tracking.
struct Scan<'src> {
    lexer:      logos::Lexer<'src, TokenKind>,
    source:     &'src str,
    directory:  Option<PathBuf>,
    symbols:    Vec<Symbol>,
    line:       usize,
    line_start: usize,
    depth:      usize,
}

impl Scan<'_> {
    /// Dispatches one raw token: layout tokens update the line/depth
    /// counters, literal tokens get their payload parsed, and the include
    /// directive and array literals are assembled here.
    fn handle(&mut self, token: Result<TokenKind, ()>, diagnostics: &mut Diagnostics) {
        let span = self.lexer.span();
        let column = span.start.saturating_sub(self.line_start) + 1;

        let kind = match token {
            Ok(kind) => kind,
            Err(()) => {
                let offending = self.lexer.slice().to_string();
                diagnostics.lexical(&LexicalError::UnexpectedCharacter { character: offending,
                                                                         line: self.line, });
                return;
            },
        };

        match kind {
            TokenKind::Newline => {
                self.line += 1;
                self.line_start = span.end;
                self.depth = 0;
            },
            TokenKind::Tab => self.depth += 1,
            TokenKind::TextUnterminated => {
                diagnostics.lexical(&LexicalError::UnterminatedText { line: self.line });
                self.track_newlines(span.start);
            },
            TokenKind::CharUnterminated => {
                diagnostics.lexical(&LexicalError::UnterminatedChar { line: self.line });
            },
            TokenKind::Binde => self.include_directive(diagnostics),
            TokenKind::LBracket => self.array_literal(column, diagnostics),
            _ => {
                let line = self.line;
                let slice = self.lexer.slice().to_string();
                let literal = match self.literal_payload(kind, &slice, diagnostics) {
                    Ok(literal) => literal,
                    Err(()) => return,
                };

                if kind == TokenKind::Text {
                    self.track_newlines(span.start);
                }

                self.symbols.push(Symbol { kind,
                                           lexeme: slice,
                                           literal,
                                           line,
                                           column,
                                           depth: self.depth, });
            },
        }
    }

    /// Parses the literal payload of a token, if its kind carries one.
    ///
    /// Returns `Err(())` when the literal is malformed (overlong character,
    /// out-of-range integer); the error has already been reported and the
    /// token is dropped so the scan can continue.
    fn literal_payload(&self,
                       kind: TokenKind,
                       slice: &str,
                       diagnostics: &mut Diagnostics)
                       -> Result<Option<Literal>, ()> {
        match kind {
            TokenKind::Int => match slice.parse::<i64>() {
                Ok(value) => Ok(Some(Literal::Int(value))),
                Err(_) => {
                    diagnostics.lexical(&LexicalError::NumberTooLarge { line: self.line });
                    Err(())
                },
            },
            // The comma-separated form is guaranteed by the token regex, so
            // the dot-normalized text always parses.
            TokenKind::Float => Ok(slice.replace(',', ".")
                                        .parse::<f64>()
                                        .ok()
                                        .map(Literal::Float)),
            TokenKind::Text => {
                let inner = &slice[1..slice.len() - 1];
                Ok(Some(Literal::Text(inner.to_string())))
            },
            TokenKind::CharLit => {
                let inner = &slice[1..slice.len() - 1];
                let mut chars = inner.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Some(Literal::Char(c))),
                    (None, _) => {
                        diagnostics.lexical(&LexicalError::EmptyChar { line: self.line });
                        Err(())
                    },
                    (Some(_), Some(_)) => {
                        diagnostics.lexical(&LexicalError::CharTooLong { line: self.line });
                        Err(())
                    },
                }
            },
            _ => Ok(None),
        }
    }

    /// Advances the line counter past newlines inside a multi-line token
    /// (string literals may span lines).
    fn track_newlines(&mut self, span_start: usize) {
        let slice = self.lexer.slice();
        let newlines = slice.chars().filter(|&c| c == '\n').count();
        if newlines > 0 {
            self.line += newlines;
            if let Some(pos) = slice.rfind('\n') {
                self.line_start = span_start + pos + 1;
            }
        }
    }

    /// Assembles a bracketed array literal `[e1; e2; …]` from its element
    /// tokens. The element type is inferred from the literal texts and must
    /// be homogeneous.
    fn array_literal(&mut self, column: usize, diagnostics: &mut Diagnostics) {
        let start = self.lexer.span().start;
        let line = self.line;
        let depth = self.depth;
        let mut elements: Vec<Literal> = Vec::new();
        let mut expect_element = true;

        loop {
            let Some(token) = self.lexer.next() else {
                diagnostics.lexical(&LexicalError::UnterminatedArray { line });
                return;
            };

            match token {
                Ok(TokenKind::RBracket) => break,
                Ok(TokenKind::Semicolon) if !expect_element => expect_element = true,
                Ok(kind @ (TokenKind::Int
                   | TokenKind::Float
                   | TokenKind::Text
                   | TokenKind::CharLit)) if expect_element => {
                    let slice = self.lexer.slice().to_string();
                    if let Ok(Some(literal)) = self.literal_payload(kind, &slice, diagnostics) {
                        elements.push(literal);
                    }
                    expect_element = false;
                },
                Ok(TokenKind::Wahr) if expect_element => {
                    elements.push(Literal::Bool(true));
                    expect_element = false;
                },
                Ok(TokenKind::Falsch) if expect_element => {
                    elements.push(Literal::Bool(false));
                    expect_element = false;
                },
                _ => {
                    diagnostics.lexical(&LexicalError::MalformedArray { line });
                    self.recover_array();
                    return;
                },
            }
        }

        let homogeneous = elements.windows(2)
                                  .all(|w| std::mem::discriminant(&w[0])
                                           == std::mem::discriminant(&w[1]));
        if !homogeneous {
            diagnostics.lexical(&LexicalError::MixedArray { line });
            return;
        }

        let lexeme = self.source[start..self.lexer.span().end].to_string();
        self.symbols.push(Symbol { kind: TokenKind::ArrayLit,
                                   lexeme,
                                   literal: Some(Literal::Array(elements)),
                                   line,
                                   column,
                                   depth, });
    }

    /// Skips tokens up to the closing bracket or end of line after a
    /// malformed array literal.
    fn recover_array(&mut self) {
        while let Some(token) = self.lexer.next() {
            match token {
                Ok(TokenKind::RBracket) => return,
                Ok(TokenKind::Newline) => {
                    self.line += 1;
                    self.line_start = self.lexer.span().end;
                    self.depth = 0;
                    return;
                },
                _ => {},
            }
        }
    }

    /// Handles the `binde "pfad" ein.` directive: lexes the named file and
    /// splices its symbols (minus the end marker) into the current stream.
    ///
    /// A missing file is a diagnostic, not a fatal abort; the including
    /// file's remaining tokens are unaffected.
    fn include_directive(&mut self, diagnostics: &mut Diagnostics) {
        let line = self.line;

        let path = match self.lexer.next() {
            Some(Ok(TokenKind::Text)) => {
                let slice = self.lexer.slice();
                slice[1..slice.len() - 1].to_string()
            },
            other => {
                diagnostics.lexical(&LexicalError::MalformedInclude { line });
                if let Some(token) = other {
                    self.handle(token, diagnostics);
                }
                return;
            },
        };

        for expected in [TokenKind::Ein, TokenKind::Dot] {
            match self.lexer.next() {
                Some(Ok(kind)) if kind == expected => {},
                other => {
                    diagnostics.lexical(&LexicalError::MalformedInclude { line });
                    if let Some(token) = other {
                        self.handle(token, diagnostics);
                    }
                    return;
                },
            }
        }

        let resolved = match &self.directory {
            Some(directory) => directory.join(&path),
            None => PathBuf::from(&path),
        };

        let contents = match fs::read_to_string(&resolved) {
            Ok(contents) => contents,
            Err(_) => {
                diagnostics.lexical(&LexicalError::IncludeMissing { path: path.clone(),
                                                                    line, });
                return;
            },
        };

        let parent = resolved.parent().map(std::path::Path::to_path_buf);
        let included = match parent {
            Some(parent) => Lexer::with_directory(&contents, parent).scan(diagnostics),
            None => Lexer::new(&contents).scan(diagnostics),
        };

        // Drop the included file's end marker before splicing.
        self.symbols.extend(included.into_iter()
                                    .filter(|symbol| symbol.kind != TokenKind::Eof));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Lexer, Literal, Symbol, TokenKind};
    use crate::diagnostics::Diagnostics;

    fn scan(source: &str) -> (Vec<Symbol>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let symbols = Lexer::new(source).scan(&mut diagnostics);
        (symbols, diagnostics)
    }

    #[test]
    fn indentation_depth_is_stamped_per_line() {
        let (symbols, diagnostics) = scan("a.\n\tb.\n\t\tc.\n    d.");
        assert!(!diagnostics.had_error());

        let depth_of = |lexeme: &str| {
            symbols.iter()
                   .find(|symbol| symbol.lexeme == lexeme)
                   .map(|symbol| symbol.depth)
        };
        assert_eq!(depth_of("a"), Some(0));
        assert_eq!(depth_of("b"), Some(1));
        assert_eq!(depth_of("c"), Some(2));
        assert_eq!(depth_of("d"), Some(1));
    }

    #[test]
    fn the_comma_selects_the_float_type() {
        let (symbols, _) = scan("1,5 12");
        assert_eq!(symbols[0].kind, TokenKind::Float);
        assert_eq!(symbols[0].literal, Some(Literal::Float(1.5)));
        assert_eq!(symbols[1].kind, TokenKind::Int);
        assert_eq!(symbols[1].literal, Some(Literal::Int(12)));
    }

    #[test]
    fn array_literals_are_assembled_with_their_payload() {
        let (symbols, diagnostics) = scan("[1; 2; 3]");
        assert!(!diagnostics.had_error());
        assert_eq!(symbols[0].kind, TokenKind::ArrayLit);
        assert_eq!(symbols[0].literal,
                   Some(Literal::Array(vec![Literal::Int(1),
                                            Literal::Int(2),
                                            Literal::Int(3)])));
    }

    #[test]
    fn mixed_array_literals_are_a_diagnostic() {
        let (_, diagnostics) = scan("[1; wahr]");
        assert!(diagnostics.had_error());
    }

    #[test]
    fn keywords_win_over_identifiers() {
        let (symbols, _) = scan("wenn wendung");
        assert_eq!(symbols[0].kind, TokenKind::Wenn);
        assert_eq!(symbols[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn lines_and_the_end_marker_are_tracked() {
        let (symbols, _) = scan("a\nb");
        assert_eq!(symbols[0].line, 1);
        assert_eq!(symbols[1].line, 2);
        assert_eq!(symbols.last().map(|symbol| symbol.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn unexpected_characters_do_not_abort_the_scan() {
        let (symbols, diagnostics) = scan("a $ b");
        assert!(diagnostics.had_error());
        let lexemes: Vec<&str> = symbols.iter()
                                        .map(|symbol| symbol.lexeme.as_str())
                                        .collect();
        assert_eq!(lexemes, vec!["a", "b", ""]);
    }
}
