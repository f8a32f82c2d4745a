/// The interpreter state and statement execution.
///
/// Holds the environment arena, the resolver's hop table and the current
/// scope handle, and executes statements with an explicit
/// completed-or-returning result instead of exception-based control flow.
pub mod core;
/// Binary operator evaluation: type unification and the per-operator
/// semantics table, plus the dedicated array indexing operation.
pub mod binary;
/// Unary operator evaluation, including the trigonometric prefixes and
/// array allocation.
pub mod unary;
/// Call evaluation: arity checking, built-in dispatch, closure invocation
/// and return-type checking, plus the declared-type checks shared with
/// variable declarations.
pub mod function;
