//! Graph directives: the typed form of rrdtool `graph` elements

use std::fmt;
use std::str::FromStr;

use crate::rpn::Expr;

use super::GraphError;

/// Consolidation function used to read or summarize a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsolidationFn {
    Average,
    Min,
    Max,
    Last,
}

impl ConsolidationFn {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsolidationFn::Average => "AVERAGE",
            ConsolidationFn::Min => "MIN",
            ConsolidationFn::Max => "MAX",
            ConsolidationFn::Last => "LAST",
        }
    }
}

impl fmt::Display for ConsolidationFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `#rrggbb` or `#rrggbbaa` colour
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    /// Mid grey, used when no colour is configured
    pub fn neutral() -> Self {
        Color("#808080".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Color {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| GraphError::InvalidColor {
                value: s.to_string(),
            })?;
        let valid_len = digits.len() == 6 || digits.len() == 8;
        if !valid_len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GraphError::InvalidColor {
                value: s.to_string(),
            });
        }
        Ok(Color(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Legend field of a drawable element
///
/// rrdtool distinguishes a missing legend field from an empty one; both
/// forms occur in graph definitions and are kept apart here.
#[derive(Debug, Clone, PartialEq)]
pub enum Legend {
    /// No legend field at all: `AREA:x#ff0000`
    Omitted,
    /// Empty field with its separator: `LINE1:x#ff0000:`
    Blank,
    /// Legend text: `AREA:x#ff0000:"text"`
    Text(String),
}

impl Legend {
    pub fn text(text: impl Into<String>) -> Self {
        Legend::Text(text.into())
    }

    /// Legend text, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Legend::Text(s) => Some(s),
            Legend::Omitted | Legend::Blank => None,
        }
    }
}

/// An RRD file and the data source read from it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataSource {
    pub rrd_file: String,
    pub ds: String,
}

impl DataSource {
    pub fn new(rrd_file: impl Into<String>, ds: impl Into<String>) -> Self {
        Self {
            rrd_file: rrd_file.into(),
            ds: ds.into(),
        }
    }
}

/// One element of a graph definition
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// `DEF:vname=rrdfile:ds:CF`
    Def {
        vname: String,
        source: DataSource,
        cf: ConsolidationFn,
    },
    /// `CDEF:vname=rpn-expression`
    Cdef { vname: String, expr: Expr },
    /// `AREA:vname#color[:legend][:STACK]`
    Area {
        vname: String,
        color: Color,
        legend: Legend,
        stack: bool,
    },
    /// `LINE[width]:vname#color[:legend][:STACK]`
    Line {
        width: Option<f64>,
        vname: String,
        color: Color,
        legend: Legend,
        stack: bool,
    },
    /// `HRULE:value#color[:legend]`
    HRule {
        value: f64,
        color: Color,
        legend: Legend,
    },
    /// `GPRINT:vname:CF:format`
    GPrint {
        vname: String,
        cf: ConsolidationFn,
        format: String,
    },
}

impl Directive {
    pub fn def(vname: impl Into<String>, source: DataSource, cf: ConsolidationFn) -> Self {
        Directive::Def {
            vname: vname.into(),
            source,
            cf,
        }
    }

    pub fn cdef(vname: impl Into<String>, expr: Expr) -> Self {
        Directive::Cdef {
            vname: vname.into(),
            expr,
        }
    }

    pub fn area(vname: impl Into<String>, color: Color, legend: Legend) -> Self {
        Directive::Area {
            vname: vname.into(),
            color,
            legend,
            stack: false,
        }
    }

    /// A `LINE` without explicit width
    pub fn line(vname: impl Into<String>, color: Color, legend: Legend) -> Self {
        Directive::Line {
            width: None,
            vname: vname.into(),
            color,
            legend,
            stack: false,
        }
    }

    pub fn line_width(
        width: f64,
        vname: impl Into<String>,
        color: Color,
        legend: Legend,
    ) -> Self {
        Directive::Line {
            width: Some(width),
            vname: vname.into(),
            color,
            legend,
            stack: false,
        }
    }

    pub fn hrule(value: f64, color: Color, legend: Legend) -> Self {
        Directive::HRule {
            value,
            color,
            legend,
        }
    }

    pub fn gprint(vname: impl Into<String>, cf: ConsolidationFn, format: impl Into<String>) -> Self {
        Directive::GPrint {
            vname: vname.into(),
            cf,
            format: format.into(),
        }
    }

    /// Draw on top of the previous drawable. No effect on other directives.
    pub fn stacked(mut self) -> Self {
        match &mut self {
            Directive::Area { stack, .. } | Directive::Line { stack, .. } => *stack = true,
            _ => {}
        }
        self
    }

    /// The variable this directive defines, for `DEF` and `CDEF`
    pub fn defines(&self) -> Option<&str> {
        match self {
            Directive::Def { vname, .. } | Directive::Cdef { vname, .. } => Some(vname),
            _ => None,
        }
    }

    /// Variables this directive reads
    pub fn references(&self) -> Vec<&str> {
        match self {
            Directive::Def { .. } | Directive::HRule { .. } => vec![],
            Directive::Cdef { expr, .. } => expr.variables(),
            Directive::Area { vname, .. }
            | Directive::Line { vname, .. }
            | Directive::GPrint { vname, .. } => vec![vname.as_str()],
        }
    }

    /// Whether this directive draws a series (`AREA` or `LINE`)
    pub fn is_drawable(&self) -> bool {
        matches!(self, Directive::Area { .. } | Directive::Line { .. })
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Directive::Def { .. } => "DEF",
            Directive::Cdef { .. } => "CDEF",
            Directive::Area { .. } => "AREA",
            Directive::Line { .. } => "LINE",
            Directive::HRule { .. } => "HRULE",
            Directive::GPrint { .. } => "GPRINT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        "#ff0000".parse().unwrap()
    }

    #[test]
    fn test_color_parse_accepts_rgb_and_rgba() {
        assert_eq!("#30c040".parse::<Color>().unwrap().as_str(), "#30c040");
        assert_eq!("#30c040aa".parse::<Color>().unwrap().as_str(), "#30c040aa");
    }

    #[test]
    fn test_color_parse_rejects_malformed() {
        assert!("30c040".parse::<Color>().is_err());
        assert!("#30c04".parse::<Color>().is_err());
        assert!("#30c04g".parse::<Color>().is_err());
        assert!(matches!(
            "red".parse::<Color>(),
            Err(GraphError::InvalidColor { .. })
        ));
    }

    #[test]
    fn test_stacked_only_affects_drawables() {
        let area = Directive::area("a", red(), Legend::Omitted).stacked();
        assert!(matches!(area, Directive::Area { stack: true, .. }));

        let rule = Directive::hrule(0.0, red(), Legend::Blank).stacked();
        assert_eq!(rule, Directive::hrule(0.0, red(), Legend::Blank));
    }

    #[test]
    fn test_defines_and_references() {
        let expr: Expr = "a,b,+".parse().unwrap();
        let cdef = Directive::cdef("sum", expr);
        assert_eq!(cdef.defines(), Some("sum"));
        assert_eq!(cdef.references(), vec!["a", "b"]);

        let gprint = Directive::gprint("sum", ConsolidationFn::Last, "%3.0lf");
        assert_eq!(gprint.defines(), None);
        assert_eq!(gprint.references(), vec!["sum"]);
    }

    #[test]
    fn test_legend_text() {
        assert_eq!(Legend::text("Total").as_text(), Some("Total"));
        assert_eq!(Legend::Blank.as_text(), None);
    }
}
