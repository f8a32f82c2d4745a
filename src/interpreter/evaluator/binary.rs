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
    /// Evaluates a binary operation.
    ///
    /// Array indexing (`an der Stelle`) is a dedicated operation with its
    /// own typing and bounds check; every other operator first computes
    /// the unified operand type and then dispatches on a fixed semantics
    /// table.
    pub(in crate::interpreter) fn eval_binary(&mut self,
                                              left: &Expr,
                                              op: &Symbol,
                                              right: &Expr)
                                              -> EvalResult<Value> {
        if op.kind == TokenKind::Stelle {
            return self.eval_index(left, op, right);
        }

        let lhs = self.eval_required(left, op)?;
        let rhs = self.eval_required(right, op)?;
        apply_binary(op, &lhs, &rhs)
    }

    /// Evaluates `a an der Stelle i`: the left operand must be an array,
    /// the position an integer, counted from 1 and bounds-checked against
    /// the array length.
    fn eval_index(&mut self, left: &Expr, op: &Symbol, right: &Expr) -> EvalResult<Value> {
        let array = self.eval_required(left, op)?;
        let position = self.eval_required(right, op)?;

        let Value::Array(elements) = array else {
            return Err(RuntimeError::NotAnArray { symbol: op.clone() });
        };
        let Value::Int(position) = position else {
            return Err(RuntimeError::OperandsOnlyIntegers { symbol: op.clone() });
        };

        if position < 1 || position as usize > elements.len() {
            return Err(RuntimeError::IndexOutOfBounds { symbol: op.clone(),
                                                        length: elements.len(),
                                                        index:  position, });
        }

        Ok(elements[position as usize - 1].clone())
    }
}

/// Applies a binary operator to two already-evaluated values.
///
/// Type unification: Int∘Int stays Int; a Float paired with an Int or
/// Float computes in Float; `plus` with a Text on either side
/// concatenates via stringification; Bool∘Bool and Char∘Char are only
/// defined for equality. `hoch` and `wurzel` always produce a Float;
/// `modulo` and the bitwise operators are Int-only.
fn apply_binary(op: &Symbol, lhs: &Value, rhs: &Value) -> EvalResult<Value> {
    use TokenKind::{
        Durch, Gleich, Groesser, GroesserGleich, Hoch, Kleiner, KleinerGleich, Kontra, Links,
        Mal, Minus, Modulo, Oder, Plus, Rechts, Und, Ungleich, Wurzel,
    };

    match op.kind {
        Gleich | Ungleich => {
            if std::mem::discriminant(lhs) != std::mem::discriminant(rhs) {
                return Err(RuntimeError::OperandsMustMatch { symbol: op.clone() });
            }
            let equal = lhs == rhs;
            Ok(Value::Bool(if op.kind == Gleich { equal } else { !equal }))
        },

        Groesser | GroesserGleich | Kleiner | KleinerGleich => match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Bool(compare(op.kind, *a, *b))),
            _ => {
                let (a, b) = both_numbers(op, lhs, rhs)?;
                Ok(Value::Bool(compare(op.kind, a, b)))
            },
        },

        Plus => {
            if lhs.is_text() || rhs.is_text() {
                return Ok(Value::Text(format!("{lhs}{rhs}")));
            }
            match (lhs, rhs) {
                (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
                _ => match (lhs.as_number(), rhs.as_number()) {
                    (Some(a), Some(b)) => Ok(Value::Float(a + b)),
                    _ => Err(RuntimeError::OperandsNumbersOrText { symbol: op.clone() }),
                },
            }
        },

        Minus => match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_sub(*b))),
            _ => {
                let (a, b) = both_numbers(op, lhs, rhs)?;
                Ok(Value::Float(a - b))
            },
        },

        Mal => match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(*b))),
            _ => {
                let (a, b) = both_numbers(op, lhs, rhs)?;
                Ok(Value::Float(a * b))
            },
        },

        Durch => match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => {
                if *b == 0 {
                    return Err(RuntimeError::DivisionByZero { symbol: op.clone() });
                }
                Ok(Value::Int(a.wrapping_div(*b)))
            },
            _ => {
                let (a, b) = both_numbers(op, lhs, rhs)?;
                Ok(Value::Float(a / b))
            },
        },

        Modulo => match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => {
                if *b == 0 {
                    return Err(RuntimeError::DivisionByZero { symbol: op.clone() });
                }
                Ok(Value::Int(a.wrapping_rem(*b)))
            },
            _ => Err(RuntimeError::OperandsOnlyIntegers { symbol: op.clone() }),
        },

        Hoch => {
            let (a, b) = both_numbers(op, lhs, rhs)?;
            Ok(Value::Float(a.powf(b)))
        },

        // The radicand is on the left, the degree on the right:
        // n-th root of x = x ^ (1/n).
        Wurzel => {
            let (a, b) = both_numbers(op, lhs, rhs)?;
            Ok(Value::Float(a.powf(1.0 / b)))
        },

        Und => both_ints(op, lhs, rhs).map(|(a, b)| Value::Int(a & b)),
        Oder => both_ints(op, lhs, rhs).map(|(a, b)| Value::Int(a | b)),
        Kontra => both_ints(op, lhs, rhs).map(|(a, b)| Value::Int(a ^ b)),
        Links => both_ints(op, lhs, rhs).map(|(a, b)| Value::Int(a.wrapping_shl(b as u32))),
        Rechts => both_ints(op, lhs, rhs).map(|(a, b)| Value::Int(a.wrapping_shr(b as u32))),

        _ => Err(RuntimeError::OperandTypeMismatch { symbol: op.clone() }),
    }
}

/// Unifies two operands to Float, or fails with "numbers only".
fn both_numbers(op: &Symbol, lhs: &Value, rhs: &Value) -> EvalResult<(f64, f64)> {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(RuntimeError::OperandsOnlyNumbers { symbol: op.clone() }),
    }
}

/// Requires two Int operands, or fails with "integers only".
fn both_ints(op: &Symbol, lhs: &Value, rhs: &Value) -> EvalResult<(i64, i64)> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok((*a, *b)),
        _ => Err(RuntimeError::OperandsOnlyIntegers { symbol: op.clone() }),
    }
}

/// Compares two unified numeric operands with the given comparison
/// operator.
fn compare<T: PartialOrd>(kind: TokenKind, a: T, b: T) -> bool {
    match kind {
        TokenKind::Groesser => a > b,
        TokenKind::GroesserGleich => a >= b,
        TokenKind::Kleiner => a < b,
        TokenKind::KleinerGleich => a <= b,
        _ => false,
    }
}
