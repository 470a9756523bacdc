//! Reverse-polish expressions used by `CDEF` directives
//!
//! Expressions are parsed from rrdtool's comma-separated notation
//! (`active,est,+`) into a list of [`Term`]s and can be evaluated point by
//! point against sampled series.

mod eval;
mod grammar;
pub mod lexer;

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

pub use eval::EvalError;
pub use grammar::parse;

/// RPN operators and constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Max,
    Min,
    Abs,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    If,
    Un,
    Unkn,
    Inf,
    NegInf,
    AddNan,
}

impl Op {
    /// Number of values popped from the stack
    pub fn arity(&self) -> usize {
        match self {
            Op::Unkn | Op::Inf | Op::NegInf => 0,
            Op::Abs | Op::Un => 1,
            Op::If => 3,
            _ => 2,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Mod => "%",
            Op::Max => "MAX",
            Op::Min => "MIN",
            Op::Abs => "ABS",
            Op::Lt => "LT",
            Op::Gt => "GT",
            Op::Le => "LE",
            Op::Ge => "GE",
            Op::Eq => "EQ",
            Op::Ne => "NE",
            Op::If => "IF",
            Op::Un => "UN",
            Op::Unkn => "UNKN",
            Op::Inf => "INF",
            Op::NegInf => "NEGINF",
            Op::AddNan => "ADDNAN",
        }
    }
}

/// One element of an RPN expression
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Number(f64),
    Variable(String),
    Op(Op),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Number(n) => write!(f, "{}", n),
            Term::Variable(name) => f.write_str(name),
            Term::Op(op) => f.write_str(op.symbol()),
        }
    }
}

/// A parsed RPN expression
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub terms: Vec<Term>,
}

impl Expr {
    /// Variables referenced by the expression, first occurrence order
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for term in &self.terms {
            if let Term::Variable(name) = term {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Stack depth after evaluating the whole expression
    ///
    /// Returns `None` if an operator would pop from an empty stack.
    pub fn result_depth(&self) -> Option<usize> {
        let mut depth = 0usize;
        for term in &self.terms {
            match term {
                Term::Number(_) | Term::Variable(_) => depth += 1,
                Term::Op(op) => {
                    depth = depth.checked_sub(op.arity())? + 1;
                }
            }
        }
        Some(depth)
    }
}

impl FromStr for Expr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}
