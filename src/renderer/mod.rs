//! Text encodings of a graph definition
//!
//! A [`GraphSpec`] can be written out as the `$opt`/`$def` string pair of a
//! PNP template ([`pnp`]), as an rrdtool argument vector ([`argv`]), or as a
//! listing with one directive per line for reading and diffing.

pub mod argv;
pub mod config;
pub mod pnp;

pub use argv::{render_argv, shell_join};
pub use config::{OutputConfig, OutputFormat};
pub use pnp::{render_pnp, PnpGraph};

use crate::graph::{Directive, GraphSpec, Legend};

/// How free text fields (legends, GPRINT formats) are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendStyle {
    /// Double-quoted, for strings handed to a shell
    Quoted,
    /// Raw, for arguments passed to rrdtool directly
    Bare,
}

/// Render a graph in the configured format
pub fn render(spec: &GraphSpec, config: &OutputConfig) -> String {
    match config.format {
        OutputFormat::Pnp => render_pnp(spec).to_string(),
        OutputFormat::Argv => shell_join(&render_argv(spec, config.output_path.as_deref())),
        OutputFormat::Lines => render_lines(spec),
    }
}

/// Options on the first line, then one directive per line
pub fn render_lines(spec: &GraphSpec) -> String {
    let mut out = pnp::render_options(&spec.options).trim_end().to_string();
    out.push('\n');
    for directive in &spec.directives {
        out.push_str(&directive_text(directive, LegendStyle::Quoted));
        out.push('\n');
    }
    out
}

/// rrdtool text of a single directive
pub fn directive_text(directive: &Directive, style: LegendStyle) -> String {
    match directive {
        Directive::Def { vname, source, cf } => format!(
            "DEF:{}={}:{}:{}",
            vname,
            escape_colons(&source.rrd_file),
            source.ds,
            cf
        ),
        Directive::Cdef { vname, expr } => format!("CDEF:{}={}", vname, expr),
        Directive::Area {
            vname,
            color,
            legend,
            stack,
        } => format!(
            "AREA:{}{}{}",
            vname,
            color,
            legend_suffix(legend, *stack, style)
        ),
        Directive::Line {
            width,
            vname,
            color,
            legend,
            stack,
        } => format!(
            "LINE{}:{}{}{}",
            width.map(format_number).unwrap_or_default(),
            vname,
            color,
            legend_suffix(legend, *stack, style)
        ),
        Directive::HRule {
            value,
            color,
            legend,
        } => format!(
            "HRULE:{}{}{}",
            format_number(*value),
            color,
            legend_suffix(legend, false, style)
        ),
        Directive::GPrint { vname, cf, format } => {
            format!("GPRINT:{}:{}:{}", vname, cf, text_field(format, style))
        }
    }
}

/// Legend field and stack flag after the colour
fn legend_suffix(legend: &Legend, stack: bool, style: LegendStyle) -> String {
    let mut out = match legend {
        // STACK is positional, so an omitted legend still needs its slot
        Legend::Omitted if stack => ":".to_string(),
        Legend::Omitted => String::new(),
        Legend::Blank => ":".to_string(),
        Legend::Text(text) => format!(":{}", text_field(text, style)),
    };
    if stack {
        out.push_str(":STACK");
    }
    out
}

fn text_field(text: &str, style: LegendStyle) -> String {
    let escaped = escape_colons(text);
    match style {
        LegendStyle::Quoted => format!("\"{}\"", escaped.replace('"', "\\\"")),
        LegendStyle::Bare => escaped,
    }
}

/// Escape `:` so rrdtool does not read it as a field separator
pub fn escape_colons(text: &str) -> String {
    text.replace(':', "\\:")
}

/// Shortest decimal form of a number, never `-0`
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
