use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        lexer::{Symbol, TokenKind},
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates a unary operation.
    pub(in crate::interpreter) fn eval_unary(&mut self, op: &Symbol, expr: &Expr) -> EvalResult<Value> {
        let value = self.eval_required(expr, op)?;
        apply_unary(op, &value)
    }
}

/// Applies a unary operator to an already-evaluated value.
///
/// `nicht` negates Booleans and complements integers; `-` negates
/// numbers; `Betrag` takes the absolute value; `ln` and the trigonometric
/// prefixes compute in Float; `Stück` allocates an array of that many
/// zeroes.
fn apply_unary(op: &Symbol, value: &Value) -> EvalResult<Value> {
    match op.kind {
        TokenKind::Nicht => match value {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            Value::Int(n) => Ok(Value::Int(!n)),
            _ => Err(RuntimeError::UnaryWrongType { symbol:   op.clone(),
                                                    expected: "Booleans oder Zahlen", }),
        },

        TokenKind::Neg => match value {
            Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
            Value::Float(f) => Ok(Value::Float(-f)),
            _ => Err(RuntimeError::UnaryWrongType { symbol:   op.clone(),
                                                    expected: "Zahlen", }),
        },

        TokenKind::Betrag => match value {
            Value::Int(n) => Ok(Value::Int(n.wrapping_abs())),
            Value::Float(f) => Ok(Value::Float(f.abs())),
            _ => Err(RuntimeError::UnaryWrongType { symbol:   op.clone(),
                                                    expected: "Zahlen", }),
        },

        TokenKind::Ln => numeric(op, value).map(|x| Value::Float(x.ln())),

        TokenKind::Sinus => numeric(op, value).map(|x| Value::Float(x.sin())),
        TokenKind::Kosinus => numeric(op, value).map(|x| Value::Float(x.cos())),
        TokenKind::Tangens => numeric(op, value).map(|x| Value::Float(x.tan())),
        TokenKind::Arkussinus => numeric(op, value).map(|x| Value::Float(x.asin())),
        TokenKind::Arkuskosinus => numeric(op, value).map(|x| Value::Float(x.acos())),
        TokenKind::Arkustangens => numeric(op, value).map(|x| Value::Float(x.atan())),
        TokenKind::Hyperbelsinus => numeric(op, value).map(|x| Value::Float(x.sinh())),
        TokenKind::Hyperbelkosinus => numeric(op, value).map(|x| Value::Float(x.cosh())),
        TokenKind::Hyperbeltangens => numeric(op, value).map(|x| Value::Float(x.tanh())),

        TokenKind::Stueck => match value {
            Value::Int(count) if *count >= 0 => {
                Ok(Value::from(vec![Value::Int(0); *count as usize]))
            },
            Value::Int(_) => Err(RuntimeError::NegativeAllocation { symbol: op.clone() }),
            _ => Err(RuntimeError::UnaryWrongType { symbol:   op.clone(),
                                                    expected: "Zahlen", }),
        },

        _ => Err(RuntimeError::OperandTypeMismatch { symbol: op.clone() }),
    }
}

/// The operand as Float, or a "numbers only" error at the operator.
fn numeric(op: &Symbol, value: &Value) -> EvalResult<f64> {
    value.as_number()
         .ok_or_else(|| RuntimeError::UnaryWrongType { symbol:   op.clone(),
                                                       expected: "Zahlen", })
}
