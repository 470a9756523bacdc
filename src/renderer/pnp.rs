//! PNP template strings
//!
//! PNP templates hand rrdtool two strings per graph: `$opt` with the
//! graph-wide flags and `$def` with the directives. Both are
//! space-terminated so templates can append to them.

use std::fmt;

use crate::graph::{Directive, GraphOptions, GraphSpec};

use super::{directive_text, format_number, LegendStyle};

/// The `$opt`/`$def` pair of one graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PnpGraph {
    pub opt: String,
    pub def: String,
}

impl fmt::Display for PnpGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.opt.trim_end())?;
        write!(f, "{}", self.def.trim_end())
    }
}

pub fn render_pnp(spec: &GraphSpec) -> PnpGraph {
    PnpGraph {
        opt: render_options(&spec.options),
        def: render_directives(&spec.directives),
    }
}

/// `--vertical-label`, `-l`, `-u`, `--title`, in that order, each set
/// option followed by a space
pub fn render_options(options: &GraphOptions) -> String {
    let mut out = String::new();
    if let Some(label) = &options.vertical_label {
        out.push_str(&format!("--vertical-label {} ", single_quote(label)));
    }
    if let Some(lower) = options.lower_limit {
        out.push_str(&format!("-l {} ", format_number(lower)));
    }
    if let Some(upper) = options.upper_limit {
        out.push_str(&format!("-u {} ", format_number(upper)));
    }
    if let Some(title) = &options.title {
        out.push_str(&format!("--title {} ", single_quote(title)));
    }
    out
}

pub fn render_directives(directives: &[Directive]) -> String {
    directives
        .iter()
        .map(|d| directive_text(d, LegendStyle::Quoted) + " ")
        .collect()
}

/// Quote for a POSIX shell; embedded quotes become `'\''`
pub(crate) fn single_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "'\\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ConsolidationFn, DataSource, Legend};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_options_order_and_quoting() {
        let options = GraphOptions::new()
            .with_title("web01: offset")
            .with_upper_limit(10.0)
            .with_lower_limit(-10.0)
            .with_vertical_label("offset (s)");
        assert_eq!(
            render_options(&options),
            "--vertical-label 'offset (s)' -l -10 -u 10 --title 'web01: offset' "
        );
    }

    #[test]
    fn test_empty_options() {
        assert_eq!(render_options(&GraphOptions::default()), "");
    }

    #[test]
    fn test_single_quote_escaping() {
        assert_eq!(single_quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn test_directives_space_terminated() {
        let directives = vec![
            Directive::def(
                "a",
                DataSource::new("/perf/a.rrd", "1"),
                ConsolidationFn::Average,
            ),
            Directive::line_width(2.0, "a", "#0000ff".parse().unwrap(), Legend::Blank),
        ];
        assert_eq!(
            render_directives(&directives),
            "DEF:a=/perf/a.rrd:1:AVERAGE LINE2:a#0000ff: "
        );
    }

    #[test]
    fn test_display_puts_each_string_on_a_line() {
        let graph = PnpGraph {
            opt: "-l 0 ".to_string(),
            def: "HRULE:0#000000 ".to_string(),
        };
        assert_eq!(graph.to_string(), "-l 0\nHRULE:0#000000");
    }
}
