//! Graph templates
//!
//! A template turns a [`TemplateContext`] (host name, data sources and
//! their thresholds) into a [`GraphSpec`]. Templates are looked up by the
//! check command name they graph, the way PNP picks its template files.
//!
//! # Example
//!
//! ```rust
//! use rrd_graph_templates::graph::DataSource;
//! use rrd_graph_templates::template::{SourceBinding, TemplateContext, TemplateRegistry, Thresholds};
//!
//! let ctx = TemplateContext::new("web01").with_source(
//!     SourceBinding::new("offset", DataSource::new("/var/perf/web01/offset.rrd", "1"))
//!         .with_thresholds(Thresholds::new(5.0, 10.0)),
//! );
//!
//! let registry = TemplateRegistry::builtin();
//! let spec = registry.build("check_mk-systemtime", &ctx).unwrap();
//! assert_eq!(spec.options.lower_limit, Some(-10.0));
//! ```

mod connections;
mod context;
mod registry;
mod systemtime;

pub use connections::SteelheadConnections;
pub use context::{sanitize, RrdLayout, SourceBinding, TemplateContext, Thresholds, HOST_SERVICE};
pub use registry::TemplateRegistry;
pub use systemtime::SystemTimeOffset;

use std::fmt;

use thiserror::Error;

use crate::error::ParseError;
use crate::graph::{GraphError, GraphSpec};

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template not found in registry
    #[error("template not found: {name}")]
    NotFound { name: String },

    /// Duplicate template name or alias
    #[error("duplicate template definition: {name}")]
    Duplicate { name: String },

    /// The context has fewer data sources than the template reads
    #[error("template {template} needs data source {index}, but only {available} are defined")]
    MissingSource {
        template: &'static str,
        index: usize,
        available: usize,
    },

    /// A threshold the template draws is not set
    #[error("template {template} needs a {kind} threshold on data source {index}")]
    MissingThreshold {
        template: &'static str,
        kind: ThresholdKind,
        index: usize,
    },

    /// Malformed CDEF expression
    #[error("invalid expression: {0}")]
    Expression(#[from] ParseError),

    /// The produced graph definition is inconsistent
    #[error("invalid graph definition: {0}")]
    Graph(#[from] GraphError),
}

/// Which of the two thresholds is meant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdKind {
    Warning,
    Critical,
}

impl fmt::Display for ThresholdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdKind::Warning => f.write_str("warning"),
            ThresholdKind::Critical => f.write_str("critical"),
        }
    }
}

/// A graph template
pub trait GraphTemplate: fmt::Debug + Send + Sync {
    /// Check command name the template graphs
    fn name(&self) -> &'static str;

    /// Alternative names accepted by the registry
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// One-line summary for listings
    fn description(&self) -> &'static str;

    /// Build the graph definition for `ctx`
    fn build(&self, ctx: &TemplateContext) -> Result<GraphSpec, TemplateError>;
}

/// Data source `index` (1-based) or a `MissingSource` error
fn require_source<'c>(
    ctx: &'c TemplateContext,
    template: &'static str,
    index: usize,
) -> Result<&'c SourceBinding, TemplateError> {
    ctx.source(index).ok_or(TemplateError::MissingSource {
        template,
        index,
        available: ctx.sources.len(),
    })
}
