/// The parser state and shared helpers.
///
/// Holds the symbol cursor, the block nesting counter and the diagnostics
/// sink, and provides the match/consume/back-up primitives the grammar
/// rules are built from.
pub mod core;
/// Statement and declaration parsing.
///
/// Variable declarations with article/type agreement, function
/// declarations, branches, loops (including the parse-time desugaring of
/// `für`), returns, and depth-bounded blocks.
pub mod statement;
/// Binary expression parsing.
///
/// The operator precedence chain from assignment down to exponentiation,
/// including the natural-language comparison forms and their
/// `, oder gleich` suffix.
pub mod binary;
/// Unary, call, index and primary expression parsing.
pub mod unary;

pub use core::Parser;
