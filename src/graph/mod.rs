//! Typed model of rrdtool graph definitions
//!
//! A [`GraphSpec`] holds the graph-wide [`GraphOptions`] and the ordered
//! list of [`Directive`]s. Templates build specs; the renderer turns them
//! into the text rrdtool consumes.

mod directive;
mod options;
mod spec;

pub use directive::{Color, ConsolidationFn, DataSource, Directive, Legend};
pub use options::GraphOptions;
pub use spec::GraphSpec;

use thiserror::Error;

/// Errors in graph definitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    /// Colour not in `#rrggbb` or `#rrggbbaa` form
    #[error("invalid colour '{value}': expected #rrggbb or #rrggbbaa")]
    InvalidColor { value: String },

    /// A variable defined twice
    #[error("variable '{name}' is defined more than once")]
    DuplicateVariable { name: String },

    /// A variable used before it is defined
    #[error("{keyword} at position {index} uses undefined variable '{name}'")]
    UndefinedVariable {
        name: String,
        index: usize,
        keyword: &'static str,
    },

    /// A CDEF that does not reduce to a single value
    #[error("CDEF '{vname}' leaves {} values on the stack", depth.map(|d| d.to_string()).unwrap_or_else(|| "too few".to_string()))]
    StackDepth { vname: String, depth: Option<usize> },

    /// STACK on the first drawable element
    #[error("directive at position {index} is stacked but nothing was drawn before it")]
    StackWithoutBase { index: usize },
}
