//! rrd-graph-templates - rrdtool graph definitions for monitoring checks
//!
//! This library turns plugin perfdata and a host name into the options and
//! directives rrdtool needs to draw a check's graph, the way PNP graph
//! templates do.
//!
//! # Example
//!
//! ```rust
//! use rrd_graph_templates::{render, GraphRequest, Palette};
//!
//! let mut request = GraphRequest::new("check_mk-systemtime", "web01");
//! request.perfdata = Some("offset=0.3s;5;10;;".to_string());
//!
//! let ctx = request.to_context(Palette::default()).unwrap();
//! let graph = render("check_mk-systemtime", &ctx).unwrap();
//! assert!(graph.opt.contains("-l -10 -u 10"));
//! assert!(graph.def.contains("Warning\\: +/- 5 s"));
//! ```

pub mod error;
pub mod graph;
pub mod palette;
pub mod perfdata;
pub mod preview;
pub mod renderer;
pub mod request;
pub mod rpn;
pub mod template;

pub use error::ParseError;
pub use graph::{GraphError, GraphSpec};
pub use palette::{Palette, PaletteError};
pub use preview::PreviewError;
pub use renderer::{OutputConfig, OutputFormat, PnpGraph};
pub use request::{GraphRequest, RequestError};
pub use template::{TemplateContext, TemplateError, TemplateRegistry};

use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template lookup or construction failed
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Palette could not be loaded
    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),

    /// Request could not be loaded or resolved
    #[error("request error: {0}")]
    Request(#[from] RequestError),

    /// Sample evaluation failed
    #[error("preview error: {0}")]
    Preview(#[from] PreviewError),
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Output encoding
    pub output: OutputConfig,
    /// Palette replacing the one in the context
    pub palette: Option<Palette>,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output configuration
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    /// Set the palette for colour resolution
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }
}

/// Build the graph definition of a built-in template
pub fn build(name: &str, ctx: &TemplateContext) -> Result<GraphSpec, RenderError> {
    Ok(TemplateRegistry::builtin().build(name, ctx)?)
}

/// Render a built-in template to its PNP `$opt`/`$def` strings
///
/// # Example
///
/// ```rust
/// use rrd_graph_templates::graph::DataSource;
/// use rrd_graph_templates::render;
/// use rrd_graph_templates::template::{SourceBinding, TemplateContext};
///
/// let ctx = ["active", "est", "open", "close", "pass"]
///     .iter()
///     .fold(TemplateContext::new("sh01"), |ctx, label| {
///         let file = format!("/perf/sh01/conn_{}.rrd", label);
///         ctx.with_source(SourceBinding::new(*label, DataSource::new(file, "1")))
///     });
///
/// let graph = render("connections", &ctx).unwrap();
/// assert!(graph.opt.contains("--title 'Current connections on sh01'"));
/// assert!(graph.def.starts_with("DEF:active=/perf/sh01/conn_active.rrd:1:MAX "));
/// ```
pub fn render(name: &str, ctx: &TemplateContext) -> Result<PnpGraph, RenderError> {
    let spec = build(name, ctx)?;
    Ok(renderer::render_pnp(&spec))
}

/// Render a built-in template with custom configuration
///
/// # Example
///
/// ```rust
/// use rrd_graph_templates::graph::DataSource;
/// use rrd_graph_templates::template::{SourceBinding, TemplateContext, Thresholds};
/// use rrd_graph_templates::{render_with_config, OutputConfig, OutputFormat, RenderConfig};
///
/// let ctx = TemplateContext::new("web01").with_source(
///     SourceBinding::new("offset", DataSource::new("offset.rrd", "1"))
///         .with_thresholds(Thresholds::new(5.0, 10.0)),
/// );
/// let config = RenderConfig::new()
///     .with_output(OutputConfig::new().with_format(OutputFormat::Lines));
///
/// let text = render_with_config("systemtime", &ctx, &config).unwrap();
/// assert!(text.lines().any(|l| l == "HRULE:0#c0c0c0:"));
/// ```
pub fn render_with_config(
    name: &str,
    ctx: &TemplateContext,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    let spec = match &config.palette {
        Some(palette) => build(name, &ctx.clone().with_palette(palette.clone()))?,
        None => build(name, ctx)?,
    };
    tracing::debug!(
        template = name,
        directives = spec.directives.len(),
        format = %config.output.format,
        "rendering graph"
    );
    Ok(renderer::render(&spec, &config.output))
}

/// Load a request's data and render the template it names
pub fn render_request(request: &GraphRequest, config: &RenderConfig) -> Result<String, RenderError> {
    let palette = config.palette.clone().unwrap_or_default();
    let ctx = request.to_context(palette)?;
    render_with_config(&request.template, &ctx, &RenderConfig {
        output: config.output.clone(),
        palette: None,
    })
}
