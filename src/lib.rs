//! # prosa
//!
//! prosa is an interpreter for a German, natural-language-styled
//! programming language: statements read like prose (`die Zahl x ist 5.`),
//! blocks are delimited by indentation instead of braces, and numbers use
//! a comma as the decimal separator.
//!
//! Source text is scanned into depth-stamped symbols, parsed into an
//! abstract syntax tree under indentation-sensitive grammar rules,
//! statically resolved for lexical variable binding, and executed by
//! direct tree-walking evaluation.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::large_enum_variant,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc, clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::path::PathBuf;

use crate::interpreter::{evaluator::core::Interpreter, lexer::Lexer, parser::Parser,
                         resolver::Resolver};

/// Defines the structure of parsed code.
///
/// This module declares the expression and statement node families that
/// represent the syntactic structure of source code as a tree. The AST is
/// built by the parser, analyzed by the resolver, and traversed by the
/// evaluator.
pub mod ast;
/// Collects errors from every stage.
///
/// An explicit diagnostics value is threaded through the lexer, parser and
/// resolver and returned to the caller; the evaluator reports at most one
/// runtime error into it.
pub mod diagnostics;
/// Provides the error types for all stages.
///
/// Lexical, parse, resolution and runtime errors each have their own enum
/// with detailed German messages; diagnostics attach source positions.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// Ties together lexing, parsing, resolution, evaluation, the scope chain
/// and the value model into a complete runtime.
pub mod interpreter;

pub use crate::{ast::NodeId, diagnostics::Diagnostics, interpreter::builtins::Registry};

/// One interpreter session: the environment state, the resolver's side
/// table, and the node-id counter shared by every line that runs in it.
///
/// The command line, the interactive prompt and the test suite all drive
/// this same API. Declarations persist between calls to [`Session::run`],
/// which is what makes the prompt useful.
///
/// # Examples
/// ```
/// use prosa::{Diagnostics, Registry, Session};
///
/// let mut session = Session::new(Registry::standard());
/// let mut diagnostics = Diagnostics::new();
///
/// session.run("die Zahl x ist 4 plus 1.", None, &mut diagnostics);
/// assert!(!diagnostics.had_error());
/// assert!(!diagnostics.had_runtime_error());
///
/// // 'y' is not defined anywhere: a runtime error, reported once.
/// session.run("y ist 2.", None, &mut diagnostics);
/// assert!(diagnostics.had_runtime_error());
/// ```
pub struct Session {
    interpreter: Interpreter,
    next_id:     NodeId,
}

impl Session {
    /// Creates a session whose global environment holds the callables of
    /// `registry`.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self { interpreter: Interpreter::new(registry),
               next_id:     0, }
    }

    /// Runs one piece of source text.
    ///
    /// `directory` is where include directives resolve relative paths
    /// from; pass the containing directory when running a file and `None`
    /// for prompt input.
    ///
    /// All problems are reported into `diagnostics`: execution never
    /// starts when scanning, parsing or resolution reported an error, and
    /// a runtime error terminates the execution after reporting exactly
    /// once.
    pub fn run(&mut self, source: &str, directory: Option<PathBuf>, diagnostics: &mut Diagnostics) {
        let lexer = match directory {
            Some(directory) => Lexer::with_directory(source, directory),
            None => Lexer::new(source),
        };
        let symbols = lexer.scan(diagnostics);

        let mut parser = Parser::new(symbols, self.next_id, diagnostics);
        let statements = parser.parse();
        self.next_id = parser.next_free_id();

        if diagnostics.had_error() {
            return;
        }

        Resolver::new(&mut self.interpreter, diagnostics).resolve(&statements);

        if diagnostics.had_error() {
            return;
        }

        self.interpreter.interpret(&statements, diagnostics);
    }
}
