use std::collections::HashMap;

use crate::{
    ast::{Expr, FunctionDecl, Stmt},
    diagnostics::Diagnostics,
    error::ResolutionError,
    interpreter::{evaluator::core::Interpreter, lexer::Symbol},
};

/// Whether resolution is currently inside a function body; `gib … zurück.`
/// is rejected outside one.
#[derive(Clone, Copy, PartialEq, Eq)]
enum FunctionKind {
    None,
    Function,
}

/// Static variable binding.
///
/// The resolver walks the already-built statement list exactly once and
/// records, for every variable reference and assignment, how many scope
/// frames lie between the use and the declaring scope. The evaluator later
/// walks exactly that many parent links instead of searching by name.
/// Names not found in any lexical scope are assumed to live in the single
/// global environment and get no table entry.
///
/// Resolution performs no rewriting; it only reports diagnostics
/// (duplicate declarations, use-in-own-initializer, return outside a
/// function) and fills the interpreter's side table.
pub struct Resolver<'a, 'd> {
    interpreter:      &'a mut Interpreter,
    diagnostics:      &'d mut Diagnostics,
    scopes:           Vec<HashMap<String, bool>>,
    current_function: FunctionKind,
}

impl<'a, 'd> Resolver<'a, 'd> {
    /// Creates a resolver writing hop counts into `interpreter`'s side
    /// table.
    pub fn new(interpreter: &'a mut Interpreter, diagnostics: &'d mut Diagnostics) -> Self {
        Self { interpreter,
               diagnostics,
               scopes: Vec::new(),
               current_function: FunctionKind::None }
    }

    /// Resolves a whole statement list.
    pub fn resolve(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_statement(statement);
        }
    }

    fn resolve_statement(&mut self, statement: &Stmt) {
        match statement {
            Stmt::Block { statements } => {
                self.begin_scope();
                self.resolve(statements);
                self.end_scope();
            },
            Stmt::Expression { expr } => self.resolve_expr(expr),
            Stmt::Function(declaration) => {
                self.declare(&declaration.name);
                self.define(&declaration.name);
                self.resolve_function(declaration);
            },
            Stmt::If { condition,
                       then_branch,
                       else_branch,
                       .. } => {
                self.resolve_expr(condition);
                self.resolve_statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_statement(else_branch);
                }
            },
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionKind::None {
                    self.diagnostics
                        .resolution(keyword, &ResolutionError::ReturnOutsideFunction);
                }
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            },
            Stmt::Var { name, initializer, .. } => {
                self.declare(name);
                if let Some(initializer) = initializer {
                    self.resolve_expr(initializer);
                }
                self.define(name);
            },
            Stmt::While { condition, body, .. } => {
                self.resolve_expr(condition);
                self.resolve_statement(body);
            },
            Stmt::DoWhile { condition, body, .. } => {
                self.resolve_statement(body);
                self.resolve_expr(condition);
            },
            Stmt::For { variable, max, body, .. } => {
                self.resolve_expr(variable);
                self.resolve_expr(max);
                self.resolve_statement(body);
            },
        }
    }

    /// Resolves a function body in a fresh scope holding the parameters,
    /// remembering that returns are legal inside.
    fn resolve_function(&mut self, declaration: &FunctionDecl) {
        let enclosing = self.current_function;
        self.current_function = FunctionKind::Function;

        self.begin_scope();
        for param in &declaration.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve(&declaration.body);
        self.end_scope();

        self.current_function = enclosing;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Assign { id,
                           name,
                           index,
                           value, } => {
                self.resolve_expr(value);
                if let Some(index) = index {
                    self.resolve_expr(index);
                }
                self.resolve_local(*id, name);
            },
            Expr::Binary { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            },
            Expr::Call { callee, arguments, .. } => {
                self.resolve_expr(callee);
                for argument in arguments {
                    self.resolve_expr(argument);
                }
            },
            Expr::Grouping { expr } => self.resolve_expr(expr),
            Expr::Literal { .. } => {},
            Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            },
            Expr::Unary { expr, .. } => self.resolve_expr(expr),
            Expr::Variable { id, name } => {
                if let Some(scope) = self.scopes.last()
                   && scope.get(&name.lexeme) == Some(&false)
                {
                    self.diagnostics
                        .resolution(name, &ResolutionError::ReadInOwnInitializer);
                }
                self.resolve_local(*id, name);
            },
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Marks a name as declared but not yet usable in the innermost scope.
    /// Top-level declarations go to the global environment and are not
    /// tracked here.
    fn declare(&mut self, name: &Symbol) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };

        if scope.contains_key(&name.lexeme) {
            self.diagnostics
                .resolution(name, &ResolutionError::AlreadyDeclared);
        }

        scope.insert(name.lexeme.clone(), false);
    }

    /// Marks a declared name as usable.
    fn define(&mut self, name: &Symbol) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    /// Searches the scope stack from innermost to outermost and records
    /// the hop count at which the name is found. Not found means the name
    /// lives in the global environment.
    fn resolve_local(&mut self, id: crate::ast::NodeId, name: &Symbol) {
        for (hops, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(id, hops);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Resolver;
    use crate::{
        ast::Stmt,
        diagnostics::Diagnostics,
        interpreter::{builtins::Registry, evaluator::core::Interpreter, lexer::Lexer,
                      parser::Parser},
    };

    fn resolved_statements(source: &str) -> (Vec<Stmt>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let symbols = Lexer::new(source).scan(&mut diagnostics);
        let statements = Parser::new(symbols, 0, &mut diagnostics).parse();
        (statements, diagnostics)
    }

    const NESTED: &str = ":\n\tdie Zahl x ist 1.\n\t:\n\t\tdie Zahl y ist x.\n\t\ty ist y plus x.";

    #[test]
    fn resolving_the_same_ast_twice_yields_the_same_table() {
        let (statements, mut diagnostics) = resolved_statements(NESTED);
        assert!(!diagnostics.had_error());

        let mut first = Interpreter::new(Registry::new());
        Resolver::new(&mut first, &mut diagnostics).resolve(&statements);
        let mut second = Interpreter::new(Registry::new());
        Resolver::new(&mut second, &mut diagnostics).resolve(&statements);

        assert!(!diagnostics.had_error());
        assert_eq!(first.hop_table(), second.hop_table());
    }

    #[test]
    fn hop_counts_reflect_lexical_nesting() {
        let (statements, mut diagnostics) = resolved_statements(NESTED);

        let mut interpreter = Interpreter::new(Registry::new());
        Resolver::new(&mut interpreter, &mut diagnostics).resolve(&statements);
        assert!(!diagnostics.had_error());

        // `x` is read twice from one block below its declaration, `y`
        // twice from its own block.
        let mut hops: Vec<usize> = interpreter.hop_table().values().copied().collect();
        hops.sort_unstable();
        assert_eq!(hops, vec![0, 0, 1, 1]);
    }

    #[test]
    fn return_outside_a_function_is_reported() {
        let (statements, mut diagnostics) = resolved_statements("gib 1 zurück.");
        assert!(!diagnostics.had_error());

        let mut interpreter = Interpreter::new(Registry::new());
        Resolver::new(&mut interpreter, &mut diagnostics).resolve(&statements);
        assert!(diagnostics.had_error());
    }
}
