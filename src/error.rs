/// Lexical errors.
///
/// Defines all error types that can occur while scanning source text into
/// symbols: unexpected characters, unterminated string or character
/// literals, malformed array literals, and include directives that cannot
/// be resolved.
pub mod lexical_error;
/// Parsing errors.
///
/// Defines all error types that can occur while parsing the symbol
/// sequence into statements. Parse errors include missing punctuation,
/// article/type disagreements, and malformed declarations.
pub mod parse_error;
/// Resolution errors.
///
/// Contains the errors detected by the static resolver: duplicate
/// declarations in one scope, variables read in their own initializer, and
/// return statements outside a function body.
pub mod resolution_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation, such as
/// operand type mismatches, wrong call arities, undefined variables and
/// out-of-bounds array accesses.
pub mod runtime_error;

pub use lexical_error::LexicalError;
pub use parse_error::ParseError;
pub use resolution_error::ResolutionError;
pub use runtime_error::RuntimeError;
