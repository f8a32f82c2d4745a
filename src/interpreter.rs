/// The built-in callable registry.
///
/// Provides the registration surface for natively implemented functions
/// and the standard library installed by default: console I/O, casts, and
/// numeric helpers.
pub mod builtins;
/// The runtime scope chain.
///
/// An arena of name→value frames addressed by stable handles; parent
/// links form the lexical scope chain that closures capture by reference.
pub mod environment;
/// The tree-walking evaluator.
///
/// Executes resolved statement lists: statement dispatch with explicit
/// return flow, the per-operator semantics tables, and function
/// invocation.
pub mod evaluator;
/// The lexer.
///
/// Scans source text into depth-stamped symbols, assembles array
/// literals, and splices included files into the stream.
pub mod lexer;
/// The parser.
///
/// Recursive descent with single-symbol lookahead, depth-bounded blocks,
/// and backtracking at the grammar points where natural-language phrasing
/// is ambiguous.
pub mod parser;
/// The static resolver.
///
/// Computes the scope hop count for every variable reference ahead of
/// execution and rejects the statically detectable binding errors.
pub mod resolver;
/// Runtime values and callables.
pub mod value;
