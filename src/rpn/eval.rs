//! Point-wise evaluation of RPN expressions with rrdtool unknown semantics

use thiserror::Error;

use super::{Expr, Op, Term};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String },

    #[error("stack underflow at term {position}")]
    StackUnderflow { position: usize },

    #[error("expression leaves {count} values on the stack")]
    Leftover { count: usize },
}

impl Expr {
    /// Evaluate the expression for one point in time
    ///
    /// `lookup` resolves variable names to their value at that point.
    /// Unknown values are represented as NaN.
    pub fn eval<F>(&self, lookup: F) -> Result<f64, EvalError>
    where
        F: Fn(&str) -> Option<f64>,
    {
        let mut stack: Vec<f64> = Vec::with_capacity(self.terms.len());

        for (position, term) in self.terms.iter().enumerate() {
            match term {
                Term::Number(n) => stack.push(*n),
                Term::Variable(name) => {
                    let value = lookup(name).ok_or_else(|| EvalError::UndefinedVariable {
                        name: name.clone(),
                    })?;
                    stack.push(value);
                }
                Term::Op(op) => {
                    let arity = op.arity();
                    if stack.len() < arity {
                        return Err(EvalError::StackUnderflow { position });
                    }
                    let args = stack.split_off(stack.len() - arity);
                    stack.push(apply(*op, &args));
                }
            }
        }

        match stack.as_slice() {
            [value] => Ok(*value),
            _ => Err(EvalError::Leftover { count: stack.len() }),
        }
    }
}

fn compare(a: f64, b: f64, test: impl Fn(f64, f64) -> bool) -> f64 {
    if a.is_nan() || b.is_nan() || a.is_infinite() || b.is_infinite() {
        return f64::NAN;
    }
    if test(a, b) {
        1.0
    } else {
        0.0
    }
}

/// Apply `op` to arguments in push order
fn apply(op: Op, args: &[f64]) -> f64 {
    match (op, args) {
        (Op::Unkn, _) => f64::NAN,
        (Op::Inf, _) => f64::INFINITY,
        (Op::NegInf, _) => f64::NEG_INFINITY,
        (Op::Abs, [a]) => a.abs(),
        (Op::Un, [a]) => {
            if a.is_nan() {
                1.0
            } else {
                0.0
            }
        }
        (Op::If, [cond, then, otherwise]) => {
            // any value other than 0 counts as true, unknown included
            if *cond != 0.0 {
                *then
            } else {
                *otherwise
            }
        }
        (Op::Add, [a, b]) => a + b,
        (Op::Sub, [a, b]) => a - b,
        (Op::Mul, [a, b]) => a * b,
        (Op::Div, [a, b]) => a / b,
        (Op::Mod, [a, b]) => a % b,
        (Op::Max, [a, b]) => {
            if a.is_nan() || b.is_nan() {
                f64::NAN
            } else {
                a.max(*b)
            }
        }
        (Op::Min, [a, b]) => {
            if a.is_nan() || b.is_nan() {
                f64::NAN
            } else {
                a.min(*b)
            }
        }
        (Op::AddNan, [a, b]) => match (a.is_nan(), b.is_nan()) {
            (true, true) => f64::NAN,
            (true, false) => *b,
            (false, true) => *a,
            (false, false) => a + b,
        },
        (Op::Lt, [a, b]) => compare(*a, *b, |a, b| a < b),
        (Op::Gt, [a, b]) => compare(*a, *b, |a, b| a > b),
        (Op::Le, [a, b]) => compare(*a, *b, |a, b| a <= b),
        (Op::Ge, [a, b]) => compare(*a, *b, |a, b| a >= b),
        (Op::Eq, [a, b]) => compare(*a, *b, |a, b| a == b),
        (Op::Ne, [a, b]) => compare(*a, *b, |a, b| a != b),
        // arity is checked by the caller
        _ => f64::NAN,
    }
}
